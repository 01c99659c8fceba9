//! The headless host loop: keeps the queue full, reports the leaderboard
//! and applies config file edits to the running search.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use seedfinder_config::{CliArgs, Config};
use seedfinder_search::{
    CoordinatorState, GenerationRate, QUEUE_CAPACITY, SearchCoordinator, SearchEngine,
    SearchResult,
};
use seedfinder_terrain::BiomeArea;

/// Pause between supplier passes.
const SUPPLY_INTERVAL: Duration = Duration::from_millis(5);

/// Leaderboard entries printed per report.
const REPORT_ROWS: usize = 5;

pub struct Host {
    engine: Arc<SearchEngine>,
    /// Config as last read from disk, before CLI overrides.
    file_config: Config,
    config_dir: PathBuf,
    overrides: CliArgs,
    rate: GenerationRate,
    started: Instant,
}

impl Host {
    pub fn new(
        engine: Arc<SearchEngine>,
        file_config: Config,
        config_dir: PathBuf,
        overrides: CliArgs,
    ) -> Self {
        Self {
            engine,
            file_config,
            config_dir,
            overrides,
            rate: GenerationRate::new(),
            started: Instant::now(),
        }
    }

    /// Config in effect: the file config with CLI overrides on top.
    pub fn effective_config(&self) -> Config {
        let mut config = self.file_config.clone();
        config.apply_cli_overrides(&self.overrides);
        config
    }

    /// Supply and report until `duration` elapses or the coordinator stops.
    pub fn run(&mut self, coordinator: &SearchCoordinator, duration: Option<Duration>) {
        let deadline = duration.map(|d| self.started + d);
        let mut next_report = Instant::now() + self.report_interval();

        loop {
            if coordinator.state() == CoordinatorState::Stopped {
                tracing::warn!("Coordinator stopped unexpectedly");
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                tracing::info!("Run duration reached");
                break;
            }

            self.supply();
            self.rate
                .sample(self.started.elapsed(), self.engine.total_generated());

            let now = Instant::now();
            if now >= next_report {
                self.report();
                self.reload_config();
                next_report = now + self.report_interval();
            }

            std::thread::sleep(SUPPLY_INTERVAL);
        }

        self.report();
    }

    /// Top the candidate queue up to capacity.
    pub fn supply(&self) -> usize {
        self.engine.top_up_queue(QUEUE_CAPACITY)
    }

    /// Re-read the config file and push any change into the engine.
    ///
    /// Returns `true` when a change was applied. Invalid files are logged
    /// and ignored.
    pub fn reload_config(&mut self) -> bool {
        let new_config = match self.file_config.reload(&self.config_dir) {
            Ok(Some(config)) => config,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Ignoring config file: {e}");
                return false;
            }
        };

        self.file_config = new_config;
        let effective = self.effective_config();
        match self.engine.set_options(effective.to_options()) {
            Ok(epoch) => {
                tracing::info!(epoch, "Applied config change");
                true
            }
            Err(e) => {
                tracing::warn!("Rejected config change: {e}");
                false
            }
        }
    }

    fn report_interval(&self) -> Duration {
        Duration::from_millis(self.file_config.debug.report_interval_ms.max(1))
    }

    fn report(&self) {
        let board = self.engine.leaderboard();
        tracing::info!(
            generated = self.engine.total_generated(),
            per_second = self.rate.per_second(),
            ranked = board.len(),
            "Search progress"
        );
        for (rank, result) in board.iter().take(REPORT_ROWS).enumerate() {
            tracing::info!("#{:<2} {}", rank + 1, describe(result));
        }
    }
}

/// One-line summary of a result.
fn describe(result: &SearchResult) -> String {
    let dominant = result
        .profile
        .as_ref()
        .and_then(|p| p.enabled().max_by(|a, b| a.weight.total_cmp(&b.weight)))
        .map(|e| e.biome.to_string())
        .unwrap_or_else(|| "-".to_string());
    let site = result.site();
    let area = match site.area {
        BiomeArea::Median => "inland",
        BiomeArea::Edge => "edge",
    };
    format!(
        "{:<16} score {:.4}  at ({:.0}, {:.0}) {} {}{}  mostly {}",
        result.seed,
        result.score,
        result.world_position.x,
        result.world_position.y,
        site.biome,
        area,
        if site.forested { ", forest" } else { "" },
        dominant
    )
}
