//! # World Configuration
//!
//! Raw configuration as it arrives from a file or the caller, and the
//! clamped settings a session actually runs with.
//!
//! Malformed numbers never fail a session: [`WorldConfig::sanitized`]
//! clamps every field into a safe range. Only unparseable TOML is an error.
//!
//! ## Example
//!
//! ```rust
//! use serpentine_world::{StageType, WorldConfig};
//!
//! let config = WorldConfig::from_toml_str(r#"
//!     seed = 1234
//!     chunk_size = -5
//!     stage = "boss"
//! "#).unwrap();
//!
//! let settings = config.sanitized();
//! assert_eq!(settings.chunk_size, WorldConfig::MIN_CHUNK_SIZE);
//! assert_eq!(settings.stage, StageType::Boss);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::WorldResult;
use crate::hash::WorldSeed;
use crate::stage::StageType;

/// Obstacle-count curve.
///
/// `count = base(stage) + per_cycle * (cycle - 1)`, clamped to `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    /// Base count for normal stages.
    pub normal_base: u32,
    /// Base count for boss stages.
    pub boss_base: u32,
    /// Base count for final stages.
    pub final_base: u32,
    /// Extra obstacles per completed cycle.
    pub per_cycle: u32,
    /// Lower clamp.
    pub min: u32,
    /// Upper clamp.
    pub max: u32,
}

impl DensityConfig {
    /// Base count for `stage`.
    #[must_use]
    pub const fn base(&self, stage: StageType) -> u32 {
        match stage {
            StageType::Normal => self.normal_base,
            StageType::Boss => self.boss_base,
            StageType::Final => self.final_base,
        }
    }

    /// Obstacles per chunk for `stage` at `cycle` (1-based).
    #[must_use]
    pub fn obstacle_count(&self, stage: StageType, cycle: u32) -> u32 {
        let scaled = self
            .base(stage)
            .saturating_add(self.per_cycle.saturating_mul(cycle.saturating_sub(1)));
        scaled.clamp(self.min, self.max.max(self.min))
    }

    /// Makes the curve monotonic in stage type and caps it at
    /// `cell_capacity` (the number of cells in one chunk).
    #[must_use]
    pub fn sanitized(mut self, cell_capacity: u32) -> Self {
        self.boss_base = self.boss_base.max(self.normal_base);
        self.final_base = self.final_base.max(self.boss_base);
        self.max = self.max.min(cell_capacity).max(1);
        self.min = self.min.min(self.max);
        self
    }
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            normal_base: StageType::Normal.default_base_obstacles(),
            boss_base: StageType::Boss.default_base_obstacles(),
            final_base: StageType::Final.default_base_obstacles(),
            per_cycle: 2,
            min: 2,
            max: 26,
        }
    }
}

/// Raw world configuration.
///
/// Numeric fields are wide signed integers so that any value a file can
/// hold is accepted and later clamped, rather than rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed, folded to 32 bits.
    pub seed: i64,
    /// Chunk edge length in cells.
    pub chunk_size: i64,
    /// Chunks kept active on each side of the camera's chunk.
    pub active_radius: i64,
    /// Free-list cap for pooled obstacle records.
    pub pool_max: i64,
    /// Stage type for density and default camera size.
    pub stage: StageType,
    /// Run cycle (1-based).
    pub cycle: i64,
    /// Obstacle-count curve.
    pub density: DensityConfig,
}

impl WorldConfig {
    /// Smallest chunk edge.
    pub const MIN_CHUNK_SIZE: i32 = 4;
    /// Largest chunk edge.
    pub const MAX_CHUNK_SIZE: i32 = 256;
    /// Largest active radius. Bounds the per-tick visibility scan.
    pub const MAX_ACTIVE_RADIUS: i32 = 8;
    /// Largest pool cap.
    pub const MAX_POOL: usize = 65_536;

    /// Default config with a specific seed.
    #[must_use]
    pub fn with_seed(seed: i64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parses a TOML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WorldError::ConfigParse`] if the text is not valid
    /// TOML or a value has the wrong type.
    pub fn from_toml_str(text: &str) -> WorldResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Renders the config as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`crate::WorldError::ConfigSerialize`] if rendering fails.
    pub fn to_toml_string(&self) -> WorldResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Clamps every field into its safe range.
    #[must_use]
    pub fn sanitized(&self) -> WorldSettings {
        let chunk_size = clamp_i32(self.chunk_size, Self::MIN_CHUNK_SIZE, Self::MAX_CHUNK_SIZE);
        let active_radius = clamp_i32(self.active_radius, 0, Self::MAX_ACTIVE_RADIUS);
        let pool_max = usize::try_from(self.pool_max.max(1))
            .unwrap_or(Self::MAX_POOL)
            .min(Self::MAX_POOL);
        let cycle = u32::try_from(self.cycle.max(1)).unwrap_or(u32::MAX);
        let cell_capacity = chunk_size.unsigned_abs().pow(2);

        WorldSettings {
            seed: WorldSeed::from_i64(self.seed),
            chunk_size,
            active_radius,
            pool_max,
            stage: self.stage,
            cycle,
            density: self.density.sanitized(cell_capacity),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            chunk_size: 32,
            active_radius: 2,
            pool_max: 4096,
            stage: StageType::Normal,
            cycle: 1,
            density: DensityConfig::default(),
        }
    }
}

/// Clamped settings a session runs with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldSettings {
    /// World seed.
    pub seed: WorldSeed,
    /// Chunk edge length in cells.
    pub chunk_size: i32,
    /// Chunks kept active on each side of the camera's chunk.
    pub active_radius: i32,
    /// Free-list cap for pooled obstacle records.
    pub pool_max: usize,
    /// Stage type.
    pub stage: StageType,
    /// Run cycle (1-based).
    pub cycle: u32,
    /// Obstacle-count curve, already sanitized.
    pub density: DensityConfig,
}

impl WorldSettings {
    /// Number of chunks in the active window.
    #[must_use]
    pub const fn window_chunk_count(&self) -> usize {
        let side = (2 * self.active_radius + 1) as usize;
        side * side
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        WorldConfig::default().sanitized()
    }
}

fn clamp_i32(raw: i64, min: i32, max: i32) -> i32 {
    // Clamped into i32 range first, so the cast is lossless
    raw.clamp(i64::from(min), i64::from(max)) as i32
}
