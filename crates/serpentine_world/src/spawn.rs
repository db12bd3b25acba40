//! # Spawn Placement
//!
//! Food, distant objectives, edge re-entry and single-step chasing.
//!
//! Every search here is bounded rejection sampling with a fallback phase.
//! No loop runs unbounded: each call ends with a position or `None`, and
//! what `None` means (e.g. a saturated board ending the run) is the
//! caller's decision.
//!
//! Occupancy is never tracked here. Callers rebuild a [`BlockedSet`] from
//! the snake, other entities and generated obstacles before each call.

use std::collections::HashSet;
use std::f64::consts::TAU;

use rand::Rng;
use serpentine_core::{Bounds, Position};

use crate::camera::Camera;
use crate::manager::ChunkManager;

/// Uniform in-camera samples tried for food before falling back.
pub const FOOD_CAMERA_ATTEMPTS: u32 = 600;
/// Random active-chunk samples tried for food after the camera phase.
pub const FOOD_CHUNK_ATTEMPTS: u32 = 1_000;
/// Polar samples tried for a distant objective before the ring search.
pub const DISTANT_POLAR_ATTEMPTS: u32 = 2_000;
/// Extra radius added on top of the minimum distance in the polar phase.
pub const DISTANT_RADIUS_JITTER: f64 = 64.0;
/// How far past the minimum distance the ring search reaches.
pub const DISTANT_RING_SPAN: u32 = 96;
/// Radius step of the ring search.
pub const DISTANT_RING_STEP: usize = 2;
/// Margin around the camera inside which an entity counts as visible.
pub const REENTRY_VISIBLE_MARGIN: i32 = 6;
/// Padding of the camera ring that re-entering entities are placed on.
pub const REENTRY_RING_PADDING: i32 = 2;
/// Minimum Manhattan distance between a re-entered entity and the head.
pub const REENTRY_MIN_HEAD_DISTANCE: u32 = 8;
/// Default re-entry cooldown.
pub const DEFAULT_REENTRY_COOLDOWN_MS: u32 = 1_200;

/// Cells currently occupied, as seen by spawn placement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockedSet {
    /// Occupied cells.
    cells: HashSet<Position>,
}

impl BlockedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty set with room for `capacity` cells.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: HashSet::with_capacity(capacity),
        }
    }

    /// Marks a cell occupied. Returns false if it already was.
    pub fn insert(&mut self, position: Position) -> bool {
        self.cells.insert(position)
    }

    /// Frees a cell. Returns false if it was not occupied.
    pub fn remove(&mut self, position: Position) -> bool {
        self.cells.remove(&position)
    }

    /// Returns true if the cell is occupied.
    #[inline]
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    /// Number of occupied cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if nothing is occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Empties the set, keeping its allocation for the next rebuild.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Occupied cells in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().copied()
    }
}

impl Extend<Position> for BlockedSet {
    fn extend<I: IntoIterator<Item = Position>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl FromIterator<Position> for BlockedSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Places food, preferring cells the player can currently see.
///
/// 1. Up to [`FOOD_CAMERA_ATTEMPTS`] uniform samples strictly inside the
///    camera (one cell in from its edge).
/// 2. Up to [`FOOD_CHUNK_ATTEMPTS`] samples of a random cell in a random
///    active chunk.
///
/// Blocked cells and the head itself are always rejected.
pub fn spawn_food<R: Rng + ?Sized>(
    rng: &mut R,
    chunks: &ChunkManager,
    head: Position,
    blocked: &BlockedSet,
    camera: &Camera,
) -> Option<Position> {
    let free = |cell: Position| cell != head && !blocked.contains(cell);

    let mut area = camera.bounds(-1);
    if area.is_empty() {
        area = camera.bounds(0);
    }
    for _ in 0..FOOD_CAMERA_ATTEMPTS {
        let cell = sample_in(rng, area);
        if free(cell) {
            return Some(cell);
        }
    }

    tracing::debug!(head = %head, "food: camera exhausted, sampling active chunks");

    let chunk_size = chunks.chunk_size();
    for _ in 0..FOOD_CHUNK_ATTEMPTS {
        let Some(coord) = chunks.random_active(rng) else {
            break;
        };
        let cell = sample_in(rng, coord.bounds(chunk_size));
        if free(cell) {
            return Some(cell);
        }
    }

    tracing::warn!(head = %head, blocked = blocked.len(), "food: no free cell found");
    None
}

/// Places an objective at least `min_distance` (Manhattan) from the head,
/// optionally outside the camera.
///
/// 1. Up to [`DISTANT_POLAR_ATTEMPTS`] samples at a random angle and a
///    radius of `min_distance + [0, 64]`.
/// 2. Rings of radius `min_distance ..= min_distance + 96` (step 2), each
///    probing its 4 axis and 4 diagonal points in a fixed order.
///
/// Candidates that would leave the `i32` grid are skipped, so a distance
/// no on-grid cell can reach yields `None`.
pub fn spawn_distant_objective<R: Rng + ?Sized>(
    rng: &mut R,
    head: Position,
    blocked: &BlockedSet,
    min_distance: u32,
    require_offscreen: bool,
    camera: &Camera,
) -> Option<Position> {
    let acceptable = |cell: Position| {
        !blocked.contains(cell)
            && cell.manhattan(head) >= min_distance
            && !(require_offscreen && camera.contains(cell, 0))
    };

    for _ in 0..DISTANT_POLAR_ATTEMPTS {
        let radius = f64::from(min_distance) + rng.gen_range(0.0..=DISTANT_RADIUS_JITTER);
        let angle = rng.gen_range(0.0..TAU);
        let dx = (radius * angle.cos()).round() as i64;
        let dy = (radius * angle.sin()).round() as i64;
        if let Some(cell) = offset_on_grid(head, dx, dy).filter(|cell| acceptable(*cell)) {
            return Some(cell);
        }
    }

    tracing::debug!(head = %head, min_distance, "objective: polar phase exhausted, ring search");

    let first = i64::from(min_distance);
    for r in (first..=first + i64::from(DISTANT_RING_SPAN)).step_by(DISTANT_RING_STEP) {
        let probes = [
            (r, 0),
            (-r, 0),
            (0, r),
            (0, -r),
            (r, r),
            (r, -r),
            (-r, r),
            (-r, -r),
        ];
        if let Some(cell) = probes
            .into_iter()
            .filter_map(|(dx, dy)| offset_on_grid(head, dx, dy))
            .find(|cell| acceptable(*cell))
        {
            return Some(cell);
        }
    }

    tracing::warn!(head = %head, min_distance, require_offscreen, "objective: no cell found");
    None
}

/// An entity that may be pulled back to the camera edge when it strays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeEntity {
    /// Current cell.
    pub position: Position,
    /// Time left before another re-entry is allowed.
    pub reentry_cooldown_ms: u32,
}

impl EdgeEntity {
    /// Creates an entity that is ready to re-enter.
    #[must_use]
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            reentry_cooldown_ms: 0,
        }
    }

    /// Returns true while the re-entry cooldown is running.
    #[inline]
    #[must_use]
    pub const fn is_cooling(&self) -> bool {
        self.reentry_cooldown_ms > 0
    }
}

/// What [`reenter_at_edge`] did this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReentryOutcome {
    /// Entity is near enough to the camera; cooldown decayed only.
    Visible,
    /// Entity is off-screen but still cooling down; cooldown decayed only.
    Cooling,
    /// Entity was moved onto the camera ring and its cooldown restarted.
    Relocated(Position),
    /// No ring cell qualified; the entity stays put and retries next tick.
    NoCandidate,
}

/// Pulls a far-away entity back onto the ring just outside the camera.
///
/// While the entity is within [`REENTRY_VISIBLE_MARGIN`] of the camera, or
/// its cooldown is still running, only the cooldown decays by `delta_ms`.
/// Otherwise random cells of the camera ring (padded by
/// [`REENTRY_RING_PADDING`]) are drawn until one is at least
/// [`REENTRY_MIN_HEAD_DISTANCE`] from the head and not blocked; the entity
/// moves there and its cooldown is set to `cooldown_ms`.
pub fn reenter_at_edge<R: Rng + ?Sized>(
    rng: &mut R,
    entity: &mut EdgeEntity,
    head: Position,
    camera: &Camera,
    cooldown_ms: u32,
    blocked: &BlockedSet,
    delta_ms: u32,
) -> ReentryOutcome {
    if camera.contains(entity.position, REENTRY_VISIBLE_MARGIN) {
        entity.reentry_cooldown_ms = entity.reentry_cooldown_ms.saturating_sub(delta_ms);
        return ReentryOutcome::Visible;
    }
    if entity.is_cooling() {
        entity.reentry_cooldown_ms = entity.reentry_cooldown_ms.saturating_sub(delta_ms);
        return ReentryOutcome::Cooling;
    }

    let ring = camera.bounds(REENTRY_RING_PADDING).perimeter();
    for _ in 0..ring.len() {
        let cell = ring[rng.gen_range(0..ring.len())];
        if cell.manhattan(head) >= REENTRY_MIN_HEAD_DISTANCE && !blocked.contains(cell) {
            tracing::trace!(from = %entity.position, to = %cell, "entity re-entered at camera edge");
            entity.position = cell;
            entity.reentry_cooldown_ms = cooldown_ms;
            return ReentryOutcome::Relocated(cell);
        }
    }

    tracing::debug!(position = %entity.position, "re-entry: no ring cell qualified");
    ReentryOutcome::NoCandidate
}

/// One greedy step from `from` toward `target` over the 4-neighbourhood.
///
/// Tries the axis with the larger gap first, then the other one. Returns
/// `from` unchanged when already there or when both useful steps are
/// blocked.
#[must_use]
pub fn step_toward(from: Position, target: Position, blocked: &BlockedSet) -> Position {
    let dx = target.x.cmp(&from.x) as i32;
    let dy = target.y.cmp(&from.y) as i32;

    let horizontal = (dx != 0).then(|| from.offset(dx, 0));
    let vertical = (dy != 0).then(|| from.offset(0, dy));

    let order = if from.x.abs_diff(target.x) >= from.y.abs_diff(target.y) {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    };

    order
        .into_iter()
        .flatten()
        .find(|cell| !blocked.contains(*cell))
        .unwrap_or(from)
}

/// `origin + (dx, dy)`, or `None` when that falls off the `i32` grid.
fn offset_on_grid(origin: Position, dx: i64, dy: i64) -> Option<Position> {
    let x = i64::from(origin.x).checked_add(dx)?;
    let y = i64::from(origin.y).checked_add(dy)?;
    Some(Position::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?))
}

/// Uniform cell inside non-empty `bounds`.
fn sample_in<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds) -> Position {
    Position::new(
        rng.gen_range(bounds.min_x..=bounds.max_x),
        rng.gen_range(bounds.min_y..=bounds.max_y),
    )
}
