//! # Stage Types
//!
//! Stage classification that drives obstacle density and default camera
//! size. The run-progression collaborator decides which stage is active;
//! this module only answers lookups for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Stage classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum StageType {
    /// Regular stage.
    #[default]
    Normal = 0,
    /// Boss encounter.
    Boss = 1,
    /// Final stage of a cycle.
    Final = 2,
}

impl StageType {
    /// Every stage type, densest last.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Boss, Self::Final];

    /// Default obstacles per chunk at cycle 1.
    #[must_use]
    pub const fn default_base_obstacles(self) -> u32 {
        match self {
            Self::Normal => 6,
            Self::Boss => 10,
            Self::Final => 14,
        }
    }

    /// Default camera `(width, height)` in cells. Both odd so the camera
    /// has a true center cell.
    #[must_use]
    pub const fn camera_size(self) -> (i32, i32) {
        match self {
            Self::Normal => (39, 21),
            Self::Boss | Self::Final => (47, 27),
        }
    }

    /// Lowercase name used in config files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Boss => "boss",
            Self::Final => "final",
        }
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StageType {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| WorldError::UnknownStage(trimmed.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trip_names() {
        for stage in StageType::ALL {
            assert_eq!(stage.name().parse::<StageType>().unwrap(), stage);
        }
        assert_eq!(" BOSS ".parse::<StageType>().unwrap(), StageType::Boss);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "arena".parse::<StageType>().unwrap_err();
        assert!(matches!(err, WorldError::UnknownStage(ref name) if name == "arena"));
    }

    #[test]
    fn test_density_is_monotonic() {
        let bases: Vec<u32> = StageType::ALL.iter().map(|s| s.default_base_obstacles()).collect();
        assert!(bases.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_camera_sizes_odd() {
        for stage in StageType::ALL {
            let (w, h) = stage.camera_size();
            assert_eq!(w % 2, 1);
            assert_eq!(h % 2, 1);
        }
        assert!(StageType::Boss.camera_size().0 > StageType::Normal.camera_size().0);
    }
}
