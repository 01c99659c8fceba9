//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use seedfinder_search::{Options, Profile};
use seedfinder_terrain::Biome;

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Where a loaded config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Read from an existing file.
    Loaded,
    /// No file existed; defaults were written.
    Created,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed generation and scoring settings.
    pub search: SearchConfig,
    /// Target biome profile. Biomes left out keep their defaults.
    pub profile: Profile,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Search configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Seeds are generated as this prefix followed by a counter.
    pub seed_prefix: String,
    /// Cells per side of the sampled biome map.
    pub resolution: usize,
    /// Fraction of logical CPUs to use (0.0 - 1.0).
    pub cpu_usage: f32,
    /// Sampling window size in world units.
    pub size: u32,
    /// Biome whose connected regions are scored.
    pub center_biome: Biome,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Milliseconds between leaderboard reports.
    pub report_interval_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed_prefix: "vsf".to_string(),
            resolution: 120,
            cpu_usage: 0.5,
            size: 1000,
            center_biome: Biome::Meadows,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            report_interval_ms: 1000,
        }
    }
}

impl Config {
    /// Search options described by this config, at epoch 0.
    pub fn to_options(&self) -> Options {
        Options {
            seed_prefix: self.search.seed_prefix.clone(),
            resolution: self.search.resolution,
            cpu_usage: self.search.cpu_usage,
            size: self.search.size,
            center_biome: self.search.center_biome,
            profile: self.profile.clone(),
            epoch: 0,
        }
    }

    /// Reject values the search engine would refuse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_options().validate()?;
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let (config, origin) = Self::load_or_create_with_origin(config_dir)?;
        let config_path = config_dir.join(CONFIG_FILE);
        match origin {
            ConfigOrigin::Loaded => log::info!("Loaded config from {}", config_path.display()),
            ConfigOrigin::Created => {
                log::info!("Created default config at {}", config_path.display())
            }
        }
        Ok(config)
    }

    /// Like [`load_or_create`](Self::load_or_create), but silent; reports
    /// whether the file was read or written so the caller can log it once
    /// logging is up.
    pub fn load_or_create_with_origin(
        config_dir: &Path,
    ) -> Result<(Self, ConfigOrigin), ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok((Self::read(&config_path)?, ConfigOrigin::Loaded))
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            Ok((config, ConfigOrigin::Created))
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    ///
    /// A file that parses but fails validation is an error; the caller keeps
    /// running on the current config.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }
}
