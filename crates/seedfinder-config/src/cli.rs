//! Command-line argument parsing for the seed finder.

use std::path::PathBuf;

use clap::Parser;
use seedfinder_terrain::Biome;

use crate::Config;

/// Seed finder command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "seedfinder", about = "Search world seeds for a target biome mix")]
pub struct CliArgs {
    /// Prefix for generated seeds.
    #[arg(long)]
    pub seed_prefix: Option<String>,

    /// Cells per side of the sampled biome map.
    #[arg(long)]
    pub resolution: Option<usize>,

    /// Fraction of logical CPUs to use (0.0 - 1.0).
    #[arg(long)]
    pub cpu_usage: Option<f32>,

    /// Sampling window size in world units.
    #[arg(long)]
    pub size: Option<u32>,

    /// Biome whose regions are scored (e.g. meadows, black-forest).
    #[arg(long)]
    pub center_biome: Option<Biome>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Stop after this many seconds; run until interrupted when absent.
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Normalize the enabled profile weights to sum to one.
    #[arg(long)]
    pub normalize: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref prefix) = args.seed_prefix {
            self.search.seed_prefix = prefix.clone();
        }
        if let Some(resolution) = args.resolution {
            self.search.resolution = resolution;
        }
        if let Some(cpu) = args.cpu_usage {
            self.search.cpu_usage = cpu;
        }
        if let Some(size) = args.size {
            self.search.size = size;
        }
        if let Some(biome) = args.center_biome {
            self.search.center_biome = biome;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if args.normalize {
            self.profile.normalize();
        }
    }
}
