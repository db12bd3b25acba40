//! # Position Pool
//!
//! Bounded free-list of reusable position records.

use std::collections::VecDeque;
use std::ops::Deref;

use crate::position::Position;

/// A position record owned by whoever took it from a [`PositionPool`].
///
/// The record is deliberately neither `Clone` nor `Copy`: handing it back
/// with [`PositionPool::recycle`] moves it, so a recycled record can never
/// be read again or recycled twice. Read-only copies are taken with
/// [`PooledPosition::position`].
#[derive(Debug, PartialEq, Eq)]
pub struct PooledPosition {
    /// Heap slot reused across take/recycle cycles.
    slot: Box<Position>,
}

impl PooledPosition {
    /// Returns a copy of the stored coordinates.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Position {
        *self.slot
    }
}

impl Deref for PooledPosition {
    type Target = Position;

    #[inline]
    fn deref(&self) -> &Position {
        &self.slot
    }
}

/// Lifetime counters for a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Records created because the free list was empty.
    pub allocated: u64,
    /// Records served from the free list.
    pub reused: u64,
    /// Records discarded because the free list was over capacity.
    pub trimmed: u64,
}

/// A bounded free list of position records.
///
/// `take` prefers the most recently recycled record; when the free list
/// grows past `max_size` the oldest entries are dropped first.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Each world session owns exactly one.
///
/// # Example
///
/// ```rust
/// use serpentine_core::memory::PositionPool;
///
/// let mut pool = PositionPool::new(2);
/// let a = pool.take(1, 1);
/// let b = pool.take(2, 2);
/// let c = pool.take(3, 3);
/// pool.recycle_all([a, b, c]);
///
/// // Oldest excess record discarded
/// assert_eq!(pool.free_count(), 2);
/// ```
#[derive(Debug)]
pub struct PositionPool {
    /// Free records, oldest at the front.
    free: VecDeque<PooledPosition>,
    /// Free-list cap.
    max_size: usize,
    /// Lifetime counters.
    stats: PoolStats,
}

impl PositionPool {
    /// Smallest accepted free-list cap.
    pub const MIN_SIZE: usize = 1;

    /// Creates an empty pool whose free list holds at most `max_size`
    /// records. A cap of zero is raised to [`Self::MIN_SIZE`].
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(Self::MIN_SIZE);
        Self {
            free: VecDeque::with_capacity(max_size.min(4096)),
            max_size,
            stats: PoolStats::default(),
        }
    }

    /// Returns the free-list cap.
    #[inline]
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns the number of records waiting to be reused.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Returns the lifetime counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Hands out a record holding `(x, y)`.
    ///
    /// Reuses the most recently recycled record when one is available,
    /// otherwise allocates.
    pub fn take(&mut self, x: i32, y: i32) -> PooledPosition {
        match self.free.pop_back() {
            Some(mut record) => {
                *record.slot = Position::new(x, y);
                self.stats.reused += 1;
                record
            }
            None => {
                self.stats.allocated += 1;
                PooledPosition {
                    slot: Box::new(Position::new(x, y)),
                }
            }
        }
    }

    /// Returns one record to the free list.
    pub fn recycle(&mut self, record: PooledPosition) {
        self.free.push_back(record);
        self.trim();
    }

    /// Returns every record in `records` to the free list, trimming once.
    pub fn recycle_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = PooledPosition>,
    {
        self.free.extend(records);
        self.trim();
    }

    /// Drops every free record.
    pub fn clear(&mut self) {
        self.free.clear();
    }

    /// Discards the oldest records until the free list fits its cap.
    fn trim(&mut self) {
        let excess = self.free.len().saturating_sub(self.max_size);
        if excess == 0 {
            return;
        }

        self.free.drain(..excess);
        self.stats.trimmed += excess as u64;
        tracing::trace!(excess, max = self.max_size, "position pool trimmed");
    }
}

impl Default for PositionPool {
    fn default() -> Self {
        Self::new(4096)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_allocates_when_empty() {
        let mut pool = PositionPool::new(10);

        let record = pool.take(4, -2);
        assert_eq!(record.position(), Position::new(4, -2));
        assert_eq!(record.x, 4);
        assert_eq!(pool.stats().allocated, 1);
        assert_eq!(pool.stats().reused, 0);
    }

    #[test]
    fn test_take_reuses_recycled_slot() {
        let mut pool = PositionPool::new(10);

        let record = pool.take(1, 1);
        let slot_addr = std::ptr::addr_of!(*record.slot);
        pool.recycle(record);

        let reborn = pool.take(7, 8);
        assert_eq!(reborn.position(), Position::new(7, 8));
        assert_eq!(std::ptr::addr_of!(*reborn.slot), slot_addr, "same heap slot reused");
        assert_eq!(pool.stats().reused, 1);
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_trim_discards_oldest() {
        let mut pool = PositionPool::new(3);

        let records: Vec<_> = (0..5).map(|i| pool.take(i, i)).collect();
        pool.recycle_all(records);

        assert_eq!(pool.free_count(), 3);
        assert_eq!(pool.stats().trimmed, 2);

        // Newest survivors come back first
        assert_eq!(pool.take(0, 0).position(), Position::new(0, 0));
        let survivors: Vec<_> = pool.free.iter().map(PooledPosition::position).collect();
        assert_eq!(survivors, vec![Position::new(2, 2), Position::new(3, 3)]);
    }

    #[test]
    fn test_zero_cap_is_raised() {
        let mut pool = PositionPool::new(0);
        assert_eq!(pool.max_size(), PositionPool::MIN_SIZE);

        let a = pool.take(0, 0);
        let b = pool.take(1, 1);
        pool.recycle(a);
        pool.recycle(b);
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_clear() {
        let mut pool = PositionPool::new(8);
        let record = pool.take(0, 0);
        pool.recycle(record);
        pool.clear();
        assert_eq!(pool.free_count(), 0);
    }
}
