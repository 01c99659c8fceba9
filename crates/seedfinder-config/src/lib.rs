//! Configuration for the seed finder.
//!
//! Settings persist to disk as a RON file, accept CLI overrides via clap,
//! support hot-reload detection, and convert into the search engine's
//! [`Options`](seedfinder_search::Options).

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, ConfigOrigin, DebugConfig, SearchConfig};
pub use error::ConfigError;
