//! World generator versions and the parameters that changed between them.

use serde::{Deserialize, Serialize};

/// Historical world generator revision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorldGenVersion {
    V0,
    V1,
    #[default]
    V2,
}

/// Thresholds that depend on the generator version.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VersionParams {
    /// Noise level above which Mistlands may appear.
    pub min_darkland_noise: f64,
    /// Outer radius of the Swamp band.
    pub max_marsh_distance: f64,
    /// Radius around the origin in which mountains are flattened.
    pub min_mountain_distance: f64,
}

impl WorldGenVersion {
    /// The version new worlds are generated with.
    pub const LATEST: WorldGenVersion = WorldGenVersion::V2;

    pub fn params(self) -> VersionParams {
        match self {
            WorldGenVersion::V0 => VersionParams {
                min_darkland_noise: 0.5,
                max_marsh_distance: 8000.0,
                min_mountain_distance: 1500.0,
            },
            WorldGenVersion::V1 => VersionParams {
                min_darkland_noise: 0.5,
                max_marsh_distance: 8000.0,
                min_mountain_distance: 1000.0,
            },
            WorldGenVersion::V2 => VersionParams {
                min_darkland_noise: 0.4,
                max_marsh_distance: 6000.0,
                min_mountain_distance: 1000.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_is_default() {
        assert_eq!(WorldGenVersion::default(), WorldGenVersion::LATEST);
    }

    #[test]
    fn test_version_parameter_table() {
        let v0 = WorldGenVersion::V0.params();
        let v1 = WorldGenVersion::V1.params();
        let v2 = WorldGenVersion::V2.params();

        assert_eq!(v0.min_mountain_distance, 1500.0);
        assert_eq!(v1.min_mountain_distance, 1000.0);
        assert_eq!(v0.max_marsh_distance, v1.max_marsh_distance);
        assert_eq!(v2.max_marsh_distance, 6000.0);
        assert_eq!(v2.min_darkland_noise, 0.4);
        assert_eq!(v1.min_darkland_noise, 0.5);
    }
}
