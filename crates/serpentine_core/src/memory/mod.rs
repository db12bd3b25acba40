//! # Memory Management
//!
//! Reusable records for data that churns every time the world window moves.
//!
//! ## Design Philosophy
//!
//! Chunk obstacles are created and discarded constantly while the camera
//! travels. Instead of returning each record to the allocator, recycled
//! records wait on a bounded free list and are reborn by the next `take`.

mod pool;

pub use pool::{PoolStats, PooledPosition, PositionPool};
