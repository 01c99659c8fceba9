//! The `seedfinder` binary: a headless host for the seed search engine.

mod host;
mod platform;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use seedfinder_config::{CONFIG_FILE, CliArgs, Config, ConfigError, ConfigOrigin};
use seedfinder_search::{CoordinatorError, OptionsError, SearchCoordinator, SearchEngine};

use crate::host::Host;
use crate::platform::{PlatformDirs, PlatformError};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("seedfinder: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Config as read from disk and with CLI overrides applied.
struct StartupConfig {
    file_config: Config,
    config: Config,
    origin: ConfigOrigin,
}

/// Read or create the config file before logging is installed. Nothing is
/// logged here; `run` reports the origin once the subscriber is up.
fn load_config(dirs: &PlatformDirs, args: &CliArgs) -> Result<StartupConfig, AppError> {
    let (file_config, origin) = Config::load_or_create_with_origin(&dirs.config_dir)?;
    let mut config = file_config.clone();
    config.apply_cli_overrides(args);
    config.validate()?;
    Ok(StartupConfig {
        file_config,
        config,
        origin,
    })
}

fn run(args: CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(dir) => {
            let dirs = PlatformDirs::with_config_dir(dir);
            dirs.create_dirs()?;
            dirs
        }
        None => PlatformDirs::resolve_and_create()?,
    };

    let startup = load_config(&dirs, &args)?;
    let config = startup.config;

    seedfinder_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    let config_path = dirs.config_dir.join(CONFIG_FILE);
    match startup.origin {
        ConfigOrigin::Loaded => tracing::info!("Loaded config from {}", config_path.display()),
        ConfigOrigin::Created => {
            tracing::info!("Created default config at {}", config_path.display())
        }
    }
    tracing::info!(config_dir = %dirs.config_dir.display(), "Starting seed search");
    if !config.profile.is_searchable() {
        tracing::warn!(
            "No biome is enabled in the profile; edit {} to start scoring",
            config_path.display()
        );
    }

    let engine = Arc::new(SearchEngine::new(config.to_options())?);
    let mut coordinator = SearchCoordinator::new(Arc::clone(&engine));
    coordinator.start()?;

    let duration = args.duration_secs.map(Duration::from_secs);
    let mut host = Host::new(engine, startup.file_config, dirs.config_dir.clone(), args);
    host.run(&coordinator, duration);

    coordinator.stop();
    coordinator.join()?;
    Ok(())
}
