//! # Chunk Manager
//!
//! Keeps a square window of chunks materialized around the camera.
//!
//! ## Lifecycle
//!
//! 1. `update(center)` works out which chunks the window needs
//! 2. Missing chunks are generated inline, through the pool
//! 3. Chunks that left the window are recycled, exactly once
//!
//! Generation is bounded and fast, so it runs on the tick that first needs
//! a chunk. There is no background queue.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serpentine_core::{Bounds, PoolStats, Position, PositionPool};

use crate::chunk::{Chunk, ChunkCoord};
use crate::config::WorldSettings;
use crate::generator::ObstacleGenerator;

/// Chunks generated and recycled by one [`ChunkManager::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowDelta {
    /// Chunks that entered the window.
    pub generated: usize,
    /// Chunks that left the window.
    pub recycled: usize,
}

impl WindowDelta {
    /// Returns true if the window did not change.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.generated == 0 && self.recycled == 0
    }
}

/// Cumulative streaming statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks generated since the manager was created.
    pub generated_this_session: u64,
    /// Chunks recycled since the manager was created.
    pub recycled_this_session: u64,
    /// Chunks currently active.
    pub active_chunks: usize,
    /// Records waiting in the pool.
    pub pool_free: usize,
    /// Pool lifetime counters.
    pub pool: PoolStats,
}

/// Active chunk window around a moving center.
///
/// Owns its pool and its chunks; nothing here is shared with other
/// sessions.
#[derive(Debug)]
pub struct ChunkManager {
    /// Obstacle generator.
    generator: ObstacleGenerator,
    /// Record pool for obstacles.
    pool: PositionPool,
    /// Active chunks, ordered so random picks are reproducible.
    active: BTreeMap<ChunkCoord, Chunk>,
    /// Chunk edge length in cells.
    chunk_size: i32,
    /// Chunks kept on each side of the center chunk.
    active_radius: i32,
    /// Chunk containing the last update center.
    center_chunk: Option<ChunkCoord>,
    /// Cumulative counters.
    generated_total: u64,
    /// Cumulative counters.
    recycled_total: u64,
}

impl ChunkManager {
    /// Creates an empty manager. Nothing is generated until the first
    /// [`ChunkManager::update`].
    #[must_use]
    pub fn new(settings: &WorldSettings) -> Self {
        Self {
            generator: ObstacleGenerator::from_settings(settings),
            pool: PositionPool::new(settings.pool_max),
            active: BTreeMap::new(),
            chunk_size: settings.chunk_size.max(1),
            active_radius: settings.active_radius.max(0),
            center_chunk: None,
            generated_total: 0,
            recycled_total: 0,
        }
    }

    /// Returns the chunk edge length in cells.
    #[inline]
    #[must_use]
    pub const fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Returns the active radius in chunks.
    #[inline]
    #[must_use]
    pub const fn active_radius(&self) -> i32 {
        self.active_radius
    }

    /// Returns the generator.
    #[inline]
    #[must_use]
    pub const fn generator(&self) -> &ObstacleGenerator {
        &self.generator
    }

    /// Returns the chunk containing the last update center.
    #[inline]
    #[must_use]
    pub const fn center_chunk(&self) -> Option<ChunkCoord> {
        self.center_chunk
    }

    /// Number of chunks currently active.
    #[inline]
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Returns true if `coord` is active.
    #[inline]
    #[must_use]
    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.active.contains_key(&coord)
    }

    /// Looks up an active chunk.
    #[inline]
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.active.get(&coord)
    }

    /// Active chunk coordinates in ascending order.
    pub fn active_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.active.keys().copied()
    }

    /// Picks one active chunk uniformly at random.
    pub fn random_active<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ChunkCoord> {
        if self.active.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.active.len());
        self.active.keys().nth(index).copied()
    }

    /// Returns the cumulative statistics.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            generated_this_session: self.generated_total,
            recycled_this_session: self.recycled_total,
            active_chunks: self.active.len(),
            pool_free: self.pool.free_count(),
            pool: self.pool.stats(),
        }
    }

    /// Reconciles the active window with a new camera center.
    ///
    /// Afterwards exactly `(2 * active_radius + 1)²` chunks are active:
    /// every chunk within `active_radius` of the center's chunk on both
    /// axes.
    pub fn update(&mut self, center: Position) -> WindowDelta {
        let center_chunk = ChunkCoord::from_world(center, self.chunk_size);
        if self.center_chunk == Some(center_chunk) {
            return WindowDelta::default();
        }
        self.center_chunk = Some(center_chunk);

        let radius = self.active_radius;
        let mut desired = BTreeSet::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                desired.insert(ChunkCoord::new(
                    center_chunk.x.wrapping_add(dx),
                    center_chunk.y.wrapping_add(dy),
                ));
            }
        }

        let mut delta = WindowDelta::default();

        // Recycle first so the departing records feed the new chunks
        let departed: Vec<ChunkCoord> = self
            .active
            .keys()
            .filter(|coord| !desired.contains(*coord))
            .copied()
            .collect();
        for coord in departed {
            if let Some(chunk) = self.active.remove(&coord) {
                self.pool.recycle_all(chunk.into_obstacles());
                delta.recycled += 1;
                tracing::trace!(chunk_x = coord.x, chunk_y = coord.y, "chunk recycled");
            }
        }

        for coord in desired {
            if self.active.contains_key(&coord) {
                continue;
            }
            let chunk = self.generator.generate(coord, self.chunk_size, &mut self.pool);
            tracing::trace!(
                chunk_x = coord.x,
                chunk_y = coord.y,
                obstacles = chunk.obstacle_count(),
                "chunk generated"
            );
            self.active.insert(coord, chunk);
            delta.generated += 1;
        }

        self.generated_total += delta.generated as u64;
        self.recycled_total += delta.recycled as u64;

        if !delta.is_empty() {
            tracing::debug!(
                center_x = center_chunk.x,
                center_y = center_chunk.y,
                generated = delta.generated,
                recycled = delta.recycled,
                active = self.active.len(),
                "chunk window moved"
            );
        }

        delta
    }

    /// Copies every active obstacle inside `bounds` (inclusive).
    #[must_use]
    pub fn visible_obstacles(&self, bounds: Bounds) -> Vec<Position> {
        let mut out = Vec::new();
        self.visible_obstacles_into(bounds, &mut out);
        out
    }

    /// Appends every active obstacle inside `bounds` to `out` without
    /// allocating beyond `out`'s own growth.
    pub fn visible_obstacles_into(&self, bounds: Bounds, out: &mut Vec<Position>) {
        if bounds.is_empty() {
            return;
        }
        for chunk in self.active.values() {
            out.extend(chunk.obstacles().filter(|p| bounds.contains(*p)));
        }
    }

    /// Returns true if an active chunk has an obstacle at `position`.
    #[must_use]
    pub fn is_obstacle(&self, position: Position) -> bool {
        let coord = ChunkCoord::from_world(position, self.chunk_size);
        self.active
            .get(&coord)
            .is_some_and(|chunk| chunk.has_obstacle(position))
    }

    /// Recycles every active chunk, e.g. at the end of a stage. The next
    /// `update` rebuilds the window from scratch.
    pub fn clear(&mut self) -> usize {
        let chunks = std::mem::take(&mut self.active);
        let recycled = chunks.len();
        for (_, chunk) in chunks {
            self.pool.recycle_all(chunk.into_obstacles());
        }
        self.recycled_total += recycled as u64;
        self.center_chunk = None;
        recycled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn manager(radius: i64) -> ChunkManager {
        let config = WorldConfig {
            active_radius: radius,
            ..WorldConfig::default()
        };
        ChunkManager::new(&config.sanitized())
    }

    #[test]
    fn test_window_size() {
        for radius in 0..=3 {
            let mut mgr = manager(radius);
            let side = (2 * radius + 1) as usize;
            for center in [(0, 0), (-1, -1), (-1000, 77), (5000, -5000)] {
                mgr.update(Position::from(center));
                assert_eq!(mgr.active_count(), side * side, "radius {radius} at {center:?}");
            }
        }
    }

    #[test]
    fn test_same_chunk_is_noop() {
        let mut mgr = manager(2);
        let first = mgr.update(Position::new(1, 1));
        assert_eq!(first.generated, 25);

        let again = mgr.update(Position::new(31, 31));
        assert!(again.is_empty());
        assert_eq!(mgr.center_chunk(), Some(ChunkCoord::new(0, 0)));
    }

    #[test]
    fn test_center_chunk_tracks_floor_division() {
        let mut mgr = manager(1);
        assert_eq!(mgr.center_chunk(), None);

        mgr.update(Position::new(-1, -33));
        assert_eq!(mgr.center_chunk(), Some(ChunkCoord::new(-1, -2)));

        mgr.clear();
        assert_eq!(mgr.center_chunk(), None);
    }

    #[test]
    fn test_generator_matches_settings() {
        let settings = WorldConfig::with_seed(9).sanitized();
        let mgr = ChunkManager::new(&settings);
        assert_eq!(mgr.generator().seed(), settings.seed);
        assert_eq!(mgr.generator().stage(), settings.stage);
    }

    #[test]
    fn test_step_moves_one_column() {
        let mut mgr = manager(2);
        mgr.update(Position::new(0, 0));

        let delta = mgr.update(Position::new(32, 0));
        assert_eq!(delta, WindowDelta { generated: 5, recycled: 5 });
        assert!(mgr.is_active(ChunkCoord::new(3, 0)));
        assert!(!mgr.is_active(ChunkCoord::new(-2, 0)));
    }

    #[test]
    fn test_no_double_recycle() {
        let mut mgr = manager(1);
        mgr.update(Position::new(0, 0));
        mgr.update(Position::new(10_000, 10_000));
        mgr.update(Position::new(0, 0));

        let stats = mgr.stats();
        assert_eq!(stats.generated_this_session, 27);
        assert_eq!(stats.recycled_this_session, 18);
        assert_eq!(stats.active_chunks, 9);
    }

    #[test]
    fn test_visible_obstacles_respect_bounds() {
        let mut mgr = manager(2);
        mgr.update(Position::new(0, 0));

        let bounds = Bounds::new(-20, -10, 20, 10);
        let visible = mgr.visible_obstacles(bounds);
        assert!(visible.iter().all(|p| bounds.contains(*p)));

        let everything = mgr.visible_obstacles(Bounds::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX));
        let expected: usize = mgr
            .active_coords()
            .map(|c| mgr.chunk(c).map_or(0, Chunk::obstacle_count))
            .sum();
        assert_eq!(everything.len(), expected);

        let inside = everything.iter().filter(|p| bounds.contains(**p)).count();
        assert_eq!(visible.len(), inside);

        assert!(mgr.visible_obstacles(bounds.padded(-1000)).is_empty());
    }

    #[test]
    fn test_is_obstacle() {
        let mut mgr = manager(1);
        mgr.update(Position::new(0, 0));

        let all = mgr.visible_obstacles(Bounds::new(-64, -64, 95, 95));
        assert!(!all.is_empty());
        for p in &all {
            assert!(mgr.is_obstacle(*p));
        }
        // Outside the window nothing is known
        assert!(!mgr.is_obstacle(Position::new(100_000, 0)));
    }

    #[test]
    fn test_random_active_is_active() {
        let mut mgr = manager(2);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(mgr.random_active(&mut rng).is_none());

        mgr.update(Position::new(-500, 300));
        for _ in 0..100 {
            let coord = mgr.random_active(&mut rng).unwrap();
            assert!(mgr.is_active(coord));
        }
    }

    #[test]
    fn test_clear_recycles_everything() {
        let mut mgr = manager(1);
        mgr.update(Position::new(0, 0));

        assert_eq!(mgr.clear(), 9);
        assert_eq!(mgr.active_count(), 0);
        assert!(mgr.stats().pool_free > 0);

        // Rebuilds even though the center chunk is unchanged
        assert_eq!(mgr.update(Position::new(0, 0)).generated, 9);
    }
}
