//! Session state and the snapshots handed to the renderer
//!
//! `SimulationState` is owned by whoever drives `tick`. Nothing here is
//! shared across threads; the threaded driver talks to it through flags and
//! a command queue drained between ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::ObstacleCatalog;
use super::entity::Entity;
use super::plane::PlanePhysics;
use super::spawner::Spawner;
use crate::assets::{AssetManifest, SpriteCache, SpriteId};
use crate::consts::*;
use crate::error::SimError;
use crate::settings::{DifficultyTuning, SessionConfig};

/// Phase of the current run. Pausing is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Plane parked at the start, waiting for launch
    Idle,
    /// Physics, spawning and collisions active
    Flying,
    /// Hit an obstacle. Terminal until an explicit reset.
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Idle => "idle",
            GamePhase::Flying => "flying",
            GamePhase::GameOver => "game over",
        }
    }
}

/// Screen dimensions in pixels (world units map 1:1 to pixels vertically)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        let finite = self.width.is_finite() && self.height.is_finite();
        let ok = finite && self.width > 0.0 && self.height > 0.0;
        if ok {
            Ok(())
        } else {
            Err(SimError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Where the plane sits before launch
    pub fn plane_start(&self) -> Vec2 {
        Vec2::new(PLANE_START_X, self.height / 2.0)
    }
}

/// Emitted once per run, at the moment the plane hits an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverEvent {
    pub distance_m: u32,
    pub coins_collected: u32,
}

/// Everything a reset puts back to its initial value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunState {
    pub phase: GamePhase,
    pub paused: bool,
    pub survival_time: f32,
    pub coins: u32,
    pub camera_x: f32,
    pub plane_pos: Vec2,
    pub plane_vel: Vec2,
    pub live_obstacles: usize,
    pub live_coins: usize,
}

/// Plane data the renderer needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaneFrame {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Sprite rotation
    pub angle_deg: f32,
    pub stalling: bool,
    pub sprite: SpriteId,
}

/// One drawable entity, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityFrame {
    pub id: u32,
    pub sprite: SpriteId,
    pub pos: Vec2,
    pub size: Vec2,
}

impl From<&Entity> for EntityFrame {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            sprite: entity.sprite,
            pos: entity.pos,
            size: entity.size,
        }
    }
}

/// Snapshot of one simulated frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameState {
    pub phase: GamePhase,
    pub paused: bool,
    pub plane: PlaneFrame,
    pub camera_x: f32,
    /// Background draw offset, in `(-background_width, 0]`
    pub background_offset: f32,
    pub background_sprite: SpriteId,
    pub background_scale: Option<f32>,
    pub obstacles: Vec<EntityFrame>,
    pub coins: Vec<EntityFrame>,
    pub survival_time: f32,
    pub coins_collected: u32,
    pub distance_m: u32,
    pub coins_enabled: bool,
}

/// Complete state of one play session
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub(crate) config: SessionConfig,
    pub(crate) tuning: DifficultyTuning,
    pub(crate) manifest: AssetManifest,
    pub(crate) cache: SpriteCache,
    pub(crate) viewport: Viewport,
    pub(crate) background_scale: Option<f32>,
    pub(crate) phase: GamePhase,
    pub(crate) paused: bool,
    pub(crate) climb: bool,
    pub(crate) dive: bool,
    pub(crate) survival_time: f32,
    pub(crate) coins: u32,
    pub(crate) camera_x: f32,
    pub(crate) plane: PlanePhysics,
    pub(crate) spawner: Spawner,
}

impl SimulationState {
    /// Set up a session. The manifest lists every sprite that loaded;
    /// missing obstacle sprites drop out of the catalog and a missing coin
    /// sprite disables coins for the whole session.
    pub fn new(
        config: SessionConfig,
        manifest: AssetManifest,
        viewport: Viewport,
        seed: u64,
    ) -> Result<Self, SimError> {
        viewport.validate()?;

        let tuning = config.tuning();
        let catalog = ObstacleCatalog::for_map(config.map, &manifest);
        if catalog.is_empty() {
            log::warn!(
                "No obstacle sprites loaded for {}; nothing will spawn",
                config.map.as_str()
            );
        }
        let background = config.map.background_sprite();
        let cache = SpriteCache::build(&catalog, &manifest, background, viewport.height);
        if cache.coin_size().is_none() {
            log::warn!("Coin sprite missing; coins disabled for this session");
        }
        let background_scale = cache.background_scale(&manifest, background);

        let mut plane = PlanePhysics::new(viewport.plane_start(), PLANE_RADIUS, PLANE_MASS);
        plane.set_max_speed(tuning.max_speed);
        plane.set_drag_coefficient(tuning.drag_coefficient);
        plane.set_world_bounds(f32::MAX, viewport.height);

        log::info!(
            "Session ready: {} / {} plane / {} ({}x{}, seed {})",
            config.map.as_str(),
            config.plane_color.as_str(),
            config.difficulty.as_str(),
            viewport.width,
            viewport.height,
            seed
        );

        Ok(Self {
            spawner: Spawner::new(seed, catalog, tuning.obstacle_spawn_interval_ms),
            config,
            tuning,
            manifest,
            cache,
            viewport,
            background_scale,
            phase: GamePhase::Idle,
            paused: false,
            climb: false,
            dive: false,
            survival_time: 0.0,
            coins: 0,
            camera_x: 0.0,
            plane,
        })
    }

    fn reject(&self, action: &'static str) -> SimError {
        SimError::InvalidTransition {
            action,
            phase: self.phase,
            paused: self.paused,
        }
    }

    /// Take off from the start position
    pub fn launch(&mut self) -> Result<(), SimError> {
        if self.phase != GamePhase::Idle || self.paused {
            return Err(self.reject("launch"));
        }
        self.plane.launch(Vec2::new(LAUNCH_VX, LAUNCH_VY));
        self.spawner.reset_timers();
        self.phase = GamePhase::Flying;
        log::info!("Launched");
        Ok(())
    }

    /// Start over from the parked plane. Legal from any phase, paused or not.
    pub fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.paused = false;
        self.climb = false;
        self.dive = false;
        self.survival_time = 0.0;
        self.coins = 0;
        self.camera_x = 0.0;
        self.plane.reset(self.viewport.plane_start());
        self.spawner.reset();
        log::info!("Run reset");
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Paused ({})", self.phase.as_str());
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            log::info!("Resumed ({})", self.phase.as_str());
        }
    }

    /// Hold or release climb. Pressing climb releases dive.
    pub fn set_climb(&mut self, pressed: bool) {
        if self.phase != GamePhase::Flying {
            return;
        }
        self.climb = pressed;
        if pressed {
            self.dive = false;
        }
    }

    /// Hold or release dive. Pressing dive releases climb.
    pub fn set_dive(&mut self, pressed: bool) {
        if self.phase != GamePhase::Flying {
            return;
        }
        self.dive = pressed;
        if pressed {
            self.climb = false;
        }
    }

    /// Adopt a new screen size without touching the run
    pub fn on_resize(&mut self, width: f32, height: f32) -> Result<(), SimError> {
        let viewport = Viewport::new(width, height);
        viewport.validate()?;

        let background = self.config.map.background_sprite();
        self.viewport = viewport;
        self.plane.set_world_bounds(f32::MAX, height);
        self.cache = SpriteCache::build(self.spawner.catalog(), &self.manifest, background, height);
        self.background_scale = self.cache.background_scale(&self.manifest, background);
        log::info!("Resized to {}x{}", width, height);
        Ok(())
    }

    /// End the run on an obstacle hit
    pub(crate) fn finish_run(&mut self, obstacle_id: u32) -> GameOverEvent {
        self.phase = GamePhase::GameOver;
        self.climb = false;
        self.dive = false;
        let event = GameOverEvent {
            distance_m: self.distance_m(),
            coins_collected: self.coins,
        };
        log::info!(
            "Game over: hit obstacle #{} after {:.1}s, {} m, {} coins",
            obstacle_id,
            self.survival_time,
            event.distance_m,
            event.coins_collected
        );
        event
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn plane(&self) -> &PlanePhysics {
        &self.plane
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }

    pub fn survival_time(&self) -> f32 {
        self.survival_time
    }

    pub fn coins_collected(&self) -> u32 {
        self.coins
    }

    pub fn coins_enabled(&self) -> bool {
        self.cache.coin_size().is_some()
    }

    pub fn controls(&self) -> (bool, bool) {
        (self.climb, self.dive)
    }

    /// Whole meters flown
    pub fn distance_m(&self) -> u32 {
        (self.plane.x() / UNITS_PER_METER).floor().max(0.0) as u32
    }

    /// Background draw offset for the parallax scroll
    pub fn background_offset(&self) -> f32 {
        match self.cache.background_width() {
            Some(width) if width > 0.0 => {
                let wrapped = (-self.camera_x * BACKGROUND_PARALLAX).rem_euclid(width);
                if wrapped == 0.0 { 0.0 } else { wrapped - width }
            }
            _ => 0.0,
        }
    }

    pub fn run_state(&self) -> RunState {
        RunState {
            phase: self.phase,
            paused: self.paused,
            survival_time: self.survival_time,
            coins: self.coins,
            camera_x: self.camera_x,
            plane_pos: self.plane.position(),
            plane_vel: self.plane.velocity(),
            live_obstacles: self.spawner.obstacles().len(),
            live_coins: self.spawner.coins().len(),
        }
    }

    /// Snapshot for the renderer
    pub fn frame(&self) -> FrameState {
        FrameState {
            phase: self.phase,
            paused: self.paused,
            plane: PlaneFrame {
                pos: self.plane.position(),
                vel: self.plane.velocity(),
                angle_deg: self.plane.render_angle_degrees(),
                stalling: self.plane.is_stalling(),
                sprite: self.config.plane_color.sprite(),
            },
            camera_x: self.camera_x,
            background_offset: self.background_offset(),
            background_sprite: self.config.map.background_sprite(),
            background_scale: self.background_scale,
            obstacles: self.spawner.obstacles().iter().map(EntityFrame::from).collect(),
            coins: self.spawner.coins().iter().map(EntityFrame::from).collect(),
            survival_time: self.survival_time,
            coins_collected: self.coins,
            distance_m: self.distance_m(),
            coins_enabled: self.coins_enabled(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Difficulty, MapId, PlaneColor};

    fn session() -> SimulationState {
        let config = SessionConfig::new(MapId::City, PlaneColor::Blue, Difficulty::Normal);
        let viewport = Viewport::new(1920.0, 1080.0);
        SimulationState::new(config, AssetManifest::uniform(64), viewport, 42).unwrap()
    }

    #[test]
    fn test_new_session_is_idle() {
        let state = session();
        assert_eq!(state.phase(), GamePhase::Idle);
        assert_eq!(state.plane().position(), Vec2::new(100.0, 540.0));
        assert_eq!(state.plane().max_speed(), 1200.0);
        assert!(state.coins_enabled());
        assert_eq!(state.frame().plane.sprite, SpriteId::BluePlane);
        assert_eq!(state.config().plane_color, PlaneColor::Blue);
    }

    #[test]
    fn test_rejects_bad_viewport() {
        let config = SessionConfig::default();
        for (w, h) in [(0.0, 600.0), (800.0, -1.0), (f32::NAN, 600.0)] {
            let manifest = AssetManifest::uniform(64);
            let result = SimulationState::new(config, manifest, Viewport::new(w, h), 1);
            assert!(matches!(result, Err(SimError::InvalidViewport { .. })));
        }
    }

    #[test]
    fn test_launch_rules() {
        let mut state = session();

        state.pause();
        assert!(state.launch().is_err());
        state.resume();

        state.launch().unwrap();
        assert_eq!(state.phase(), GamePhase::Flying);
        assert_eq!(state.plane().velocity(), Vec2::new(300.0, -80.0));

        let err = state.launch().unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidTransition {
                action: "launch",
                phase: GamePhase::Flying,
                paused: false
            }
        ));

        state.finish_run(1);
        assert!(state.launch().is_err());
    }

    #[test]
    fn test_controls_are_exclusive_and_only_while_flying() {
        let mut state = session();
        state.set_climb(true);
        assert_eq!(state.controls(), (false, false));

        state.launch().unwrap();
        state.set_climb(true);
        assert_eq!(state.controls(), (true, false));
        state.set_dive(true);
        assert_eq!(state.controls(), (false, true));
        state.set_dive(false);
        assert_eq!(state.controls(), (false, false));

        state.set_climb(true);
        state.finish_run(1);
        assert_eq!(state.controls(), (false, false));
        state.set_dive(true);
        assert_eq!(state.controls(), (false, false));
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut state = session();
        state.pause();
        state.pause();
        assert!(state.is_paused());
        state.resume();
        state.resume();
        assert!(!state.is_paused());
    }

    #[test]
    fn test_reset_clears_pause_mid_run() {
        let mut state = session();
        state.launch().unwrap();
        state.pause();
        state.reset();
        assert_eq!(state.run_state(), session().run_state());
        assert!(state.launch().is_ok());
    }

    #[test]
    fn test_resize_keeps_run() {
        let mut state = session();
        state.launch().unwrap();
        state.coins = 3;
        state.on_resize(1280.0, 720.0).unwrap();
        assert_eq!(state.viewport(), Viewport::new(1280.0, 720.0));
        assert_eq!(state.plane().world_height(), 720.0);
        // Only the screen height bounds the plane
        assert_eq!(state.plane().world_width(), f32::MAX);
        assert_eq!(state.phase(), GamePhase::Flying);
        assert_eq!(state.coins_collected(), 3);
        assert!((state.frame().background_scale.unwrap() - 720.0 / 64.0).abs() < 1e-3);

        assert!(state.on_resize(0.0, 720.0).is_err());
        assert_eq!(state.viewport().width, 1280.0);
    }

    #[test]
    fn test_background_offset_wraps() {
        let mut state = session();
        // Uniform 64px sprites scale the background to 1080 wide
        assert_eq!(state.background_offset(), 0.0);
        state.camera_x = 1000.0;
        assert!((state.background_offset() + 500.0).abs() < 1e-3);
        state.camera_x = 2160.0;
        assert_eq!(state.background_offset(), 0.0);
        state.camera_x = 2500.0;
        assert!((state.background_offset() + 170.0).abs() < 1e-3);
    }

    #[test]
    fn test_distance_is_floored_meters() {
        let mut state = session();
        state.plane.set_position(Vec2::new(1239.9, 500.0));
        assert_eq!(state.distance_m(), 123);
    }

    #[test]
    fn test_missing_coin_sprite_reported_in_frame() {
        let config = SessionConfig::default();
        let manifest = AssetManifest::uniform(64).without(SpriteId::Coin);
        let state = SimulationState::new(config, manifest, Viewport::new(800.0, 600.0), 9).unwrap();
        assert!(!state.frame().coins_enabled);
    }
}
