//! # World Session
//!
//! One run's worth of world state: the chunk window, its pool and the
//! spawn random stream. Sessions are memory-only and never shared; each
//! run or stage builds a fresh one.
//!
//! ## Tick Order
//!
//! 1. Caller moves its [`Camera`]
//! 2. [`WorldSession::update`] reconciles the chunk window
//! 3. Visibility queries and spawn placement read the reconciled window
//!
//! Step 2 takes `&mut self`, so it always finishes before the reads of
//! step 3 can begin.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serpentine_core::{Bounds, Position};

use crate::camera::Camera;
use crate::config::{WorldConfig, WorldSettings};
use crate::hash::WorldSeed;
use crate::manager::{ChunkManager, WindowDelta, WorldStats};
use crate::spawn::{self, BlockedSet, EdgeEntity, ReentryOutcome};
use crate::stage::StageType;

/// Purpose tag for the spawn stream derived from the world seed.
const SPAWN_STREAM: u32 = 0x5350_574E;

/// Streaming world for a single run.
///
/// # Example
///
/// ```rust
/// use serpentine_core::Position;
/// use serpentine_world::{BlockedSet, WorldConfig, WorldSession};
///
/// let mut session = WorldSession::new(&WorldConfig::with_seed(42));
/// let mut camera = session.default_camera(Position::new(0, 0));
///
/// camera.move_to(5, 3);
/// session.update(camera.center());
///
/// let obstacles = session.visible_obstacles(&camera, 0);
/// let blocked: BlockedSet = obstacles.iter().copied().collect();
/// let food = session.spawn_food(camera.center(), &blocked, &camera);
/// assert!(food.is_some());
/// ```
#[derive(Debug)]
pub struct WorldSession {
    /// Clamped settings.
    settings: WorldSettings,
    /// Active chunk window.
    chunks: ChunkManager,
    /// Random stream for spawn placement.
    rng: ChaCha8Rng,
}

impl WorldSession {
    /// Creates a session from raw configuration, clamping bad values.
    #[must_use]
    pub fn new(config: &WorldConfig) -> Self {
        Self::from_settings(config.sanitized())
    }

    /// Creates a session from already clamped settings.
    #[must_use]
    pub fn from_settings(settings: WorldSettings) -> Self {
        tracing::info!(
            seed = settings.seed.value(),
            chunk_size = settings.chunk_size,
            active_radius = settings.active_radius,
            stage = %settings.stage,
            cycle = settings.cycle,
            "world session created"
        );

        Self {
            chunks: ChunkManager::new(&settings),
            rng: spawn_rng(settings.seed),
            settings,
        }
    }

    /// Returns the settings the session runs with.
    #[inline]
    #[must_use]
    pub const fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Returns the world seed.
    #[inline]
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.settings.seed
    }

    /// Returns the stage type.
    #[inline]
    #[must_use]
    pub const fn stage(&self) -> StageType {
        self.settings.stage
    }

    /// Read access to the chunk window.
    #[inline]
    #[must_use]
    pub const fn chunks(&self) -> &ChunkManager {
        &self.chunks
    }

    /// Returns the cumulative statistics.
    #[must_use]
    pub fn stats(&self) -> WorldStats {
        self.chunks.stats()
    }

    /// Default camera for this session's stage, centered on `center`.
    #[must_use]
    pub const fn default_camera(&self, center: Position) -> Camera {
        Camera::for_spawn(center, self.settings.stage)
    }

    /// Reconciles the chunk window with the camera center.
    pub fn update(&mut self, center: Position) -> WindowDelta {
        self.chunks.update(center)
    }

    /// Active obstacles inside the camera, padded by `padding`.
    #[must_use]
    pub fn visible_obstacles(&self, camera: &Camera, padding: i32) -> Vec<Position> {
        self.chunks.visible_obstacles(camera.bounds(padding))
    }

    /// Active obstacles inside arbitrary bounds.
    #[must_use]
    pub fn obstacles_in(&self, bounds: Bounds) -> Vec<Position> {
        self.chunks.visible_obstacles(bounds)
    }

    /// Returns true if an active chunk has an obstacle at `position`.
    #[must_use]
    pub fn is_obstacle(&self, position: Position) -> bool {
        self.chunks.is_obstacle(position)
    }

    /// Adds every active obstacle inside `bounds` to `blocked`.
    pub fn extend_blocked(&self, bounds: Bounds, blocked: &mut BlockedSet) {
        blocked.extend(self.chunks.visible_obstacles(bounds));
    }

    /// See [`spawn::spawn_food`].
    pub fn spawn_food(
        &mut self,
        head: Position,
        blocked: &BlockedSet,
        camera: &Camera,
    ) -> Option<Position> {
        spawn::spawn_food(&mut self.rng, &self.chunks, head, blocked, camera)
    }

    /// See [`spawn::spawn_distant_objective`].
    pub fn spawn_distant_objective(
        &mut self,
        head: Position,
        blocked: &BlockedSet,
        min_distance: u32,
        require_offscreen: bool,
        camera: &Camera,
    ) -> Option<Position> {
        spawn::spawn_distant_objective(
            &mut self.rng,
            head,
            blocked,
            min_distance,
            require_offscreen,
            camera,
        )
    }

    /// See [`spawn::reenter_at_edge`].
    pub fn reenter_at_edge(
        &mut self,
        entity: &mut EdgeEntity,
        head: Position,
        camera: &Camera,
        cooldown_ms: u32,
        blocked: &BlockedSet,
        delta_ms: u32,
    ) -> ReentryOutcome {
        spawn::reenter_at_edge(
            &mut self.rng,
            entity,
            head,
            camera,
            cooldown_ms,
            blocked,
            delta_ms,
        )
    }

    /// Recycles every chunk and restarts the spawn stream. The session
    /// behaves as if freshly created, but keeps its warmed-up pool.
    pub fn reset(&mut self) {
        let recycled = self.chunks.clear();
        self.rng = spawn_rng(self.settings.seed);
        tracing::info!(recycled, "world session reset");
    }
}

fn spawn_rng(seed: WorldSeed) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(u64::from(seed.derive(SPAWN_STREAM).value()))
}
