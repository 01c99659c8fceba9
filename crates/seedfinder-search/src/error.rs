//! Search engine error types.

use seedfinder_terrain::Biome;

/// A configuration value that violates the search contract.
///
/// Raised when options are built or mutated, never from the scoring path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OptionsError {
    /// Map resolution must be at least one cell.
    #[error("map resolution must be positive")]
    ZeroResolution,

    /// The sampling window may not be wider than the world.
    #[error("sampling size {size} exceeds the world width {max}")]
    SizeTooLarge { size: u32, max: u32 },

    /// CPU usage must be a fraction in `[0, 1]`.
    #[error("cpu usage {0} is outside [0, 1]")]
    CpuUsageOutOfRange(f32),

    /// Profile weights must be in `[0, 1]`.
    #[error("weight {weight} for {biome} is outside [0, 1]")]
    WeightOutOfRange { biome: Biome, weight: f32 },

    /// A profile listed the same biome twice.
    #[error("profile lists {0} more than once")]
    DuplicateProfileEntry(Biome),

    /// Seed prefixes may not contain NUL; hashing stops there.
    #[error("seed prefix contains a NUL character")]
    NulInSeedPrefix,
}

/// Errors from starting, running, or joining the search coordinator.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// `start` was called on a coordinator that already left the idle state.
    #[error("coordinator already started")]
    AlreadyStarted,

    /// A worker or coordinator thread could not be spawned.
    #[error("failed to spawn thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The scoring pool was shut down while a batch was in flight.
    #[error("scoring pool is closed")]
    PoolClosed,

    /// The coordinator thread panicked.
    #[error("coordinator thread panicked")]
    ThreadPanic,
}
