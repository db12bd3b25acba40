//! # Grid Positions
//!
//! Integer cells on the infinite grid and inclusive rectangles over them.
//!
//! Positions are plain `Copy` values. Anything that needs record reuse goes
//! through [`crate::memory::PositionPool`] instead.

use std::fmt;

/// A single cell on the infinite grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Position {
    /// The origin cell.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this position shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            y: self.y.wrapping_add(dy),
        }
    }

    /// Manhattan (taxicab) distance to `other`.
    ///
    /// Saturates instead of overflowing for cells at opposite ends of the
    /// `i32` range.
    #[inline]
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }
}

impl From<(i32, i32)> for Position {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Renders the canonical `"x,y"` occupancy key.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Inclusive axis-aligned rectangle of grid cells.
///
/// A rectangle where `min > max` on either axis is empty; it contains
/// nothing and has no perimeter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    /// Smallest column (inclusive).
    pub min_x: i32,
    /// Smallest row (inclusive).
    pub min_y: i32,
    /// Largest column (inclusive).
    pub max_x: i32,
    /// Largest row (inclusive).
    pub max_y: i32,
}

impl Bounds {
    /// Creates bounds from inclusive corners.
    #[inline]
    #[must_use]
    pub const fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Bounds spanning `center ± (half_width, half_height)`.
    #[inline]
    #[must_use]
    pub const fn around(center: Position, half_width: i32, half_height: i32) -> Self {
        Self {
            min_x: center.x.saturating_sub(half_width),
            min_y: center.y.saturating_sub(half_height),
            max_x: center.x.saturating_add(half_width),
            max_y: center.y.saturating_add(half_height),
        }
    }

    /// Grows every side by `padding` cells. Negative padding shrinks.
    #[inline]
    #[must_use]
    pub const fn padded(self, padding: i32) -> Self {
        Self {
            min_x: self.min_x.saturating_sub(padding),
            min_y: self.min_y.saturating_sub(padding),
            max_x: self.max_x.saturating_add(padding),
            max_y: self.max_y.saturating_add(padding),
        }
    }

    /// Returns true if the rectangle holds no cells.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Inclusive containment test.
    #[inline]
    #[must_use]
    pub const fn contains(self, position: Position) -> bool {
        position.x >= self.min_x
            && position.x <= self.max_x
            && position.y >= self.min_y
            && position.y <= self.max_y
    }

    /// Number of columns covered (0 when empty).
    #[inline]
    #[must_use]
    pub const fn width(self) -> u64 {
        if self.min_x > self.max_x {
            0
        } else {
            self.max_x.abs_diff(self.min_x) as u64 + 1
        }
    }

    /// Number of rows covered (0 when empty).
    #[inline]
    #[must_use]
    pub const fn height(self) -> u64 {
        if self.min_y > self.max_y {
            0
        } else {
            self.max_y.abs_diff(self.min_y) as u64 + 1
        }
    }

    /// Every cell lying exactly on the rectangle's border, each once.
    ///
    /// Order: top row left to right, bottom row left to right, then the
    /// left and right columns top to bottom (corners excluded).
    #[must_use]
    pub fn perimeter(self) -> Vec<Position> {
        if self.is_empty() {
            return Vec::new();
        }

        let cells = 2 * (self.width() + self.height());
        let mut ring = Vec::with_capacity(usize::try_from(cells).unwrap_or(0));

        for x in self.min_x..=self.max_x {
            ring.push(Position::new(x, self.min_y));
        }
        if self.max_y != self.min_y {
            for x in self.min_x..=self.max_x {
                ring.push(Position::new(x, self.max_y));
            }
        }

        // Side columns without the corners already pushed above
        if self.height() >= 3 {
            for y in (self.min_y + 1)..self.max_y {
                ring.push(Position::new(self.min_x, y));
                if self.max_x != self.min_x {
                    ring.push(Position::new(self.max_x, y));
                }
            }
        }

        ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_manhattan() {
        let a = Position::new(10, 10);
        assert_eq!(a.manhattan(Position::new(10, 10)), 0);
        assert_eq!(a.manhattan(Position::new(28, 10)), 18);
        assert_eq!(a.manhattan(Position::new(-2, 3)), 19);
        assert_eq!(
            Position::new(i32::MIN, i32::MIN).manhattan(Position::new(i32::MAX, i32::MAX)),
            u32::MAX
        );
    }

    #[test]
    fn test_display_key() {
        assert_eq!(Position::new(-3, 17).to_string(), "-3,17");
    }

    #[test]
    fn test_bounds_contains_inclusive() {
        let bounds = Bounds::around(Position::new(0, 0), 19, 10);
        assert!(bounds.contains(Position::new(19, 10)));
        assert!(bounds.contains(Position::new(-19, -10)));
        assert!(!bounds.contains(Position::new(20, 0)));
        assert!(!bounds.contains(Position::new(0, -11)));
        assert_eq!(bounds.width(), 39);
        assert_eq!(bounds.height(), 21);
    }

    #[test]
    fn test_full_range_size() {
        let everything = Bounds::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(everything.width(), 1 << 32);
        assert_eq!(everything.height(), 1 << 32);
        assert!(everything.contains(Position::new(i32::MAX, i32::MIN)));
    }

    #[test]
    fn test_padding_shrinks_to_empty() {
        let bounds = Bounds::around(Position::new(5, 5), 1, 1);
        assert!(!bounds.padded(-1).is_empty());
        assert!(bounds.padded(-2).is_empty());
        assert!(!bounds.padded(-2).contains(Position::new(5, 5)));
        assert_eq!(bounds.padded(-2).width(), 0);
    }

    #[test]
    fn test_perimeter_is_exact_ring() {
        let bounds = Bounds::new(-2, -1, 2, 1);
        let ring = bounds.perimeter();

        // 5x3 rectangle: 2*5 + 2*(3-2) = 12 border cells
        assert_eq!(ring.len(), 12);

        let unique: HashSet<_> = ring.iter().copied().collect();
        assert_eq!(unique.len(), ring.len(), "perimeter must not repeat cells");

        for cell in &ring {
            assert!(bounds.contains(*cell));
            let on_edge = cell.x == bounds.min_x
                || cell.x == bounds.max_x
                || cell.y == bounds.min_y
                || cell.y == bounds.max_y;
            assert!(on_edge, "{cell} is not on the border");
        }
    }

    #[test]
    fn test_perimeter_degenerate() {
        assert_eq!(Bounds::new(0, 0, 0, 0).perimeter(), vec![Position::new(0, 0)]);
        assert_eq!(Bounds::new(0, 0, 3, 0).perimeter().len(), 4);
        assert_eq!(Bounds::new(0, 0, 0, 3).perimeter().len(), 4);
        assert!(Bounds::new(1, 0, 0, 0).perimeter().is_empty());
    }
}
