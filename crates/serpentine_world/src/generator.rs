//! # Procedural Obstacle Generator
//!
//! Fills a chunk with obstacles drawn from that chunk's own random stream.
//!
//! ## Determinism
//!
//! The obstacle set is a pure function of
//! `(seed, chunk coord, chunk size, stage type, cycle)`. Regenerating a
//! chunk after it was recycled yields the identical set, in the identical
//! order, even though the records themselves come from the pool.

use std::collections::HashSet;

use rand::Rng;
use serpentine_core::{PooledPosition, PositionPool};

use crate::chunk::{Chunk, ChunkCoord};
use crate::config::{DensityConfig, WorldSettings};
use crate::hash::{chunk_rng, WorldSeed};
use crate::stage::StageType;

/// Obstacle generator for one session.
#[derive(Clone, Debug)]
pub struct ObstacleGenerator {
    /// World seed.
    seed: WorldSeed,
    /// Stage type driving density.
    stage: StageType,
    /// Run cycle (1-based).
    cycle: u32,
    /// Obstacle-count curve.
    density: DensityConfig,
}

impl ObstacleGenerator {
    /// Candidate samples drawn per wanted obstacle before giving up.
    pub const ATTEMPTS_PER_OBSTACLE: u32 = 8;

    /// Creates a generator.
    #[must_use]
    pub fn new(seed: WorldSeed, stage: StageType, cycle: u32, density: DensityConfig) -> Self {
        Self {
            seed,
            stage,
            cycle: cycle.max(1),
            density,
        }
    }

    /// Creates a generator from session settings.
    #[must_use]
    pub fn from_settings(settings: &WorldSettings) -> Self {
        Self::new(settings.seed, settings.stage, settings.cycle, settings.density)
    }

    /// Returns the world seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Returns the stage type.
    #[inline]
    #[must_use]
    pub const fn stage(&self) -> StageType {
        self.stage
    }

    /// Returns the run cycle.
    #[inline]
    #[must_use]
    pub const fn cycle(&self) -> u32 {
        self.cycle
    }

    /// Obstacles wanted per chunk at the current stage and cycle.
    #[inline]
    #[must_use]
    pub fn target_count(&self) -> u32 {
        self.density.obstacle_count(self.stage, self.cycle)
    }

    /// Generates the obstacles of one chunk.
    ///
    /// Draws at most `target_count * ATTEMPTS_PER_OBSTACLE` local cells,
    /// skipping repeats. If the attempts run out first the chunk is simply
    /// left with fewer obstacles. Every returned record comes from `pool`.
    pub fn generate_obstacles(
        &self,
        coord: ChunkCoord,
        chunk_size: i32,
        pool: &mut PositionPool,
    ) -> Vec<PooledPosition> {
        let chunk_size = chunk_size.max(1);
        let count = self.target_count() as usize;
        let attempts = self.target_count().saturating_mul(Self::ATTEMPTS_PER_OBSTACLE);

        let mut rng = chunk_rng(self.seed, coord);
        let origin = coord.origin(chunk_size);
        let mut visited: HashSet<(i32, i32)> = HashSet::with_capacity(count);
        let mut obstacles = Vec::with_capacity(count);

        for _ in 0..attempts {
            if obstacles.len() >= count {
                break;
            }

            let local_x = rng.gen_range(0..chunk_size);
            let local_y = rng.gen_range(0..chunk_size);
            if !visited.insert((local_x, local_y)) {
                continue;
            }

            obstacles.push(pool.take(
                origin.x.wrapping_add(local_x),
                origin.y.wrapping_add(local_y),
            ));
        }

        if obstacles.len() < count {
            tracing::trace!(
                chunk_x = coord.x,
                chunk_y = coord.y,
                placed = obstacles.len(),
                wanted = count,
                "chunk under-filled"
            );
        }

        obstacles
    }

    /// Generates a whole chunk.
    pub fn generate(&self, coord: ChunkCoord, chunk_size: i32, pool: &mut PositionPool) -> Chunk {
        Chunk::new(coord, self.generate_obstacles(coord, chunk_size, pool))
    }
}
