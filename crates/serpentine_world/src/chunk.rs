//! # Chunk System
//!
//! The infinite grid is cut into square chunks of `chunk_size` cells. A
//! chunk only stores its obstacle positions; everything else about it is
//! recomputable from its coordinate.

use serpentine_core::{Bounds, PooledPosition, Position};

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not cells).
    pub x: i32,
    /// Y coordinate (in chunks, not cells).
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing a world cell. Floors toward negative infinity, so
    /// cell `-1` lives in chunk `-1`, not chunk `0`.
    #[inline]
    #[must_use]
    pub const fn from_world(position: Position, chunk_size: i32) -> Self {
        Self {
            x: position.x.div_euclid(chunk_size),
            y: position.y.div_euclid(chunk_size),
        }
    }

    /// World cell at the chunk's minimum corner.
    #[inline]
    #[must_use]
    pub const fn origin(self, chunk_size: i32) -> Position {
        Position::new(
            self.x.wrapping_mul(chunk_size),
            self.y.wrapping_mul(chunk_size),
        )
    }

    /// Inclusive world-cell bounds covered by the chunk.
    #[inline]
    #[must_use]
    pub const fn bounds(self, chunk_size: i32) -> Bounds {
        let origin = self.origin(chunk_size);
        Bounds::new(
            origin.x,
            origin.y,
            origin.x.wrapping_add(chunk_size - 1),
            origin.y.wrapping_add(chunk_size - 1),
        )
    }
}

/// A generated chunk.
///
/// Owns pooled obstacle records. Dropping a chunk without handing its
/// records back through [`Chunk::into_obstacles`] just frees them.
#[derive(Debug)]
pub struct Chunk {
    /// Chunk position in the world.
    pub coord: ChunkCoord,
    /// Obstacles in world coordinates.
    obstacles: Vec<PooledPosition>,
}

impl Chunk {
    /// Wraps freshly generated obstacles.
    #[must_use]
    pub fn new(coord: ChunkCoord, obstacles: Vec<PooledPosition>) -> Self {
        Self { coord, obstacles }
    }

    /// Number of obstacles.
    #[inline]
    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Read-only copies of every obstacle.
    pub fn obstacles(&self) -> impl Iterator<Item = Position> + '_ {
        self.obstacles.iter().map(PooledPosition::position)
    }

    /// Returns true if `position` is one of this chunk's obstacles.
    #[must_use]
    pub fn has_obstacle(&self, position: Position) -> bool {
        self.obstacles.iter().any(|record| **record == position)
    }

    /// Gives up the pooled records so they can be recycled.
    #[must_use]
    pub fn into_obstacles(self) -> Vec<PooledPosition> {
        self.obstacles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serpentine_core::PositionPool;

    #[test]
    fn test_chunk_coord_from_world() {
        let at = |x, y| ChunkCoord::from_world(Position::new(x, y), 16);
        assert_eq!(at(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(at(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(at(16, 16), ChunkCoord::new(1, 1));
        assert_eq!(at(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(at(-16, -16), ChunkCoord::new(-1, -1));
        assert_eq!(at(-17, -17), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn test_origin_and_bounds() {
        let coord = ChunkCoord::new(-2, 3);
        assert_eq!(coord.origin(32), Position::new(-64, 96));

        let bounds = coord.bounds(32);
        assert_eq!(bounds, Bounds::new(-64, 96, -33, 127));
        assert_eq!(ChunkCoord::from_world(Position::new(bounds.max_x, bounds.max_y), 32), coord);
    }

    #[test]
    fn test_obstacle_queries() {
        let mut pool = PositionPool::new(8);
        let chunk = Chunk::new(
            ChunkCoord::new(0, 0),
            vec![pool.take(1, 2), pool.take(3, 4)],
        );

        assert_eq!(chunk.obstacle_count(), 2);
        assert!(chunk.has_obstacle(Position::new(3, 4)));
        assert!(!chunk.has_obstacle(Position::new(4, 3)));
        assert_eq!(
            chunk.obstacles().collect::<Vec<_>>(),
            vec![Position::new(1, 2), Position::new(3, 4)]
        );

        pool.recycle_all(chunk.into_obstacles());
        assert_eq!(pool.free_count(), 2);
    }
}
