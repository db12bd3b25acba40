//! # Camera
//!
//! Rectangular viewport over the grid. Drives both the visibility query
//! and every spawn-placement decision.
//!
//! The camera is plain geometry. The per-tick caller owns it and moves it;
//! the chunk manager only ever reads its center.

use serpentine_core::{Bounds, Position};

use crate::stage::StageType;

/// Viewport centered on a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Camera {
    /// Center cell.
    center: Position,
    /// Width in cells (≥ 1).
    width: i32,
    /// Height in cells (≥ 1).
    height: i32,
}

impl Camera {
    /// Creates a camera. Dimensions below one cell are raised to one.
    ///
    /// Odd dimensions give a true center cell; even ones still work but
    /// extend one cell further on each side than they nominally cover.
    #[must_use]
    pub const fn new(center: Position, width: i32, height: i32) -> Self {
        Self {
            center,
            width: if width < 1 { 1 } else { width },
            height: if height < 1 { 1 } else { height },
        }
    }

    /// Default-sized camera for `stage`, centered on an arbitrary cell.
    ///
    /// Used for one-off spawn evaluation when no live camera exists.
    #[must_use]
    pub const fn for_spawn(center: Position, stage: StageType) -> Self {
        let (width, height) = stage.camera_size();
        Self::new(center, width, height)
    }

    /// Returns the center cell.
    #[inline]
    #[must_use]
    pub const fn center(&self) -> Position {
        self.center
    }

    /// Returns the width in cells.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Returns the height in cells.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Moves the center.
    #[inline]
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.center = Position::new(x, y);
    }

    /// Changes the viewport size, with the same clamping as [`Camera::new`].
    pub fn resize(&mut self, width: i32, height: i32) {
        *self = Self::new(self.center, width, height);
    }

    /// Inclusive bounds `center ± floor(dimension / 2) ± padding`.
    #[inline]
    #[must_use]
    pub const fn bounds(&self, padding: i32) -> Bounds {
        Bounds::around(self.center, self.width / 2, self.height / 2).padded(padding)
    }

    /// Inclusive containment test against [`Camera::bounds`].
    #[inline]
    #[must_use]
    pub const fn contains(&self, position: Position, padding: i32) -> bool {
        self.bounds(padding).contains(position)
    }
}
