//! # SERPENTINE Core
//!
//! Grid primitives shared by every world subsystem.
//!
//! ## Contents
//!
//! - [`Position`]: integer grid cell, the unit every other system talks in
//! - [`Bounds`]: inclusive axis-aligned rectangle with perimeter enumeration
//! - [`memory::PositionPool`]: bounded free-list of reusable position records
//!
//! ## Example
//!
//! ```rust
//! use serpentine_core::{Bounds, Position};
//! use serpentine_core::memory::PositionPool;
//!
//! let bounds = Bounds::around(Position::new(0, 0), 2, 1);
//! assert!(bounds.contains(Position::new(-2, 1)));
//!
//! let mut pool = PositionPool::new(128);
//! let record = pool.take(3, 4);
//! assert_eq!(record.position(), Position::new(3, 4));
//! pool.recycle(record);
//! assert_eq!(pool.free_count(), 1);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod memory;
pub mod position;

pub use memory::{PoolStats, PooledPosition, PositionPool};
pub use position::{Bounds, Position};
