//! # SERPENTINE World
//!
//! Infinite procedural world behind the endless game mode.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: a chunk's obstacles depend only on the seed, its
//!    coordinate and the stage parameters, never on visit order
//! 2. **Bounded window**: exactly `(2r + 1)²` chunks are alive at once
//! 3. **Pooled**: obstacle records are recycled through a capped free list
//! 4. **Always terminates**: every spawn search is bounded and falls back
//!    in phases, ending in a position or `None`
//!
//! ## Core Components
//!
//! - `WorldSeed` / `chunk_seed`: per-chunk random streams
//! - `ObstacleGenerator`: fills one chunk from its stream
//! - `Camera`: viewport bounds and containment
//! - `ChunkManager`: keeps the active window around the camera
//! - `spawn`: food, distant objective and edge re-entry placement
//! - `WorldSession`: one run's window, pool and spawn stream
//!
//! ## Example
//!
//! ```rust
//! use serpentine_core::Position;
//! use serpentine_world::{WorldConfig, WorldSession};
//!
//! let mut session = WorldSession::new(&WorldConfig::with_seed(42));
//! session.update(Position::new(0, 0));
//! assert_eq!(session.chunks().active_count(), 25);
//!
//! session.update(Position::new(160, 96));
//! assert_eq!(session.chunks().active_count(), 25);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod camera;
pub mod chunk;
pub mod config;
pub mod error;
pub mod generator;
pub mod hash;
pub mod manager;
pub mod session;
pub mod spawn;
pub mod stage;

pub use camera::Camera;
pub use chunk::{Chunk, ChunkCoord};
pub use config::{DensityConfig, WorldConfig, WorldSettings};
pub use error::{WorldError, WorldResult};
pub use generator::ObstacleGenerator;
pub use hash::{chunk_rng, chunk_seed, WorldSeed};
pub use manager::{ChunkManager, WindowDelta, WorldStats};
pub use session::WorldSession;
pub use spawn::{
    reenter_at_edge, spawn_distant_objective, spawn_food, step_toward, BlockedSet, EdgeEntity,
    ReentryOutcome,
};
pub use stage::StageType;
