//! Folded Flight - A side-scrolling paper plane arcade game
//!
//! Core modules:
//! - `sim`: Simulation (plane physics, spawning, collisions, game state)
//! - `game_loop`: Fixed-cadence simulation thread with input flags
//! - `assets`: Sprite dimensions and precomputed scaled sizes
//! - `settings`: Session configuration and difficulty tuning
//! - `highscores`: Leaderboard fed by game over events

pub mod assets;
pub mod error;
pub mod game_loop;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use game_loop::GameLoop;
pub use highscores::HighScores;
pub use settings::{Difficulty, DifficultyTuning, MapId, PlaneColor, SessionConfig};

/// Game configuration constants
pub mod consts {
    /// Target tick rate of the simulation thread
    pub const TARGET_FPS: u32 = 60;
    /// Nominal frame time at the target tick rate (seconds)
    pub const FRAME_DT: f32 = 1.0 / TARGET_FPS as f32;
    /// Largest delta a single tick may integrate (avoids blowups after a stall)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Plane defaults
    pub const PLANE_START_X: f32 = 100.0;
    pub const PLANE_RADIUS: f32 = 32.0;
    pub const PLANE_MASS: f32 = 1.0;
    /// Plane sprite is always scaled to this square size (pixels)
    pub const PLANE_SPRITE_SIZE: f32 = 192.0;
    /// Velocity applied once on takeoff
    pub const LAUNCH_VX: f32 = 300.0;
    pub const LAUNCH_VY: f32 = -80.0;
    /// Dive force as a fraction of lift
    pub const DIVE_FORCE_RATIO: f32 = 0.5;

    /// Aerodynamics
    pub const GRAVITY: f32 = 500.0;
    pub const STALL_ANGLE: f32 = 0.7;
    pub const STALL_SPEED: f32 = 350.0;
    pub const STALL_PENALTY: f32 = 150.0;
    pub const STALL_FORWARD_LOSS: f32 = 30.0;
    pub const DIVE_BOOST_ANGLE: f32 = 0.3;
    pub const DIVE_SPEED_BOOST: f32 = 100.0;
    pub const CLIMB_DRAG_MULTIPLIER: f32 = 1.8;
    pub const DIVE_DRAG_MULTIPLIER: f32 = 0.6;
    /// |aoa| below this leaves drag at its base value
    pub const DRAG_RAMP_THRESHOLD: f32 = 0.1;
    /// Speeds below this count as stationary for angle of attack
    pub const MIN_AOA_SPEED: f32 = 0.01;

    /// Ground effect band height above the ground (world units)
    pub const GROUND_EFFECT_HEIGHT: f32 = 60.0;
    pub const GROUND_EFFECT_STRENGTH: f32 = 0.08;

    /// World bounds response
    pub const BOUNCE_DAMPING: f32 = 0.6;
    pub const GROUND_FRICTION: f32 = 0.95;
    pub const MIN_FORWARD_VELOCITY: f32 = 100.0;

    /// Camera keeps the plane this far into the screen (fraction of width)
    pub const CAMERA_LEAD: f32 = 0.25;
    /// Background scrolls at this fraction of camera speed
    pub const BACKGROUND_PARALLAX: f32 = 0.5;
    /// World units per meter of distance score
    pub const UNITS_PER_METER: f32 = 10.0;

    /// Horizontal drift shared by obstacles and coins (units/s, negative = left)
    pub const ENTITY_SPEED: f32 = -300.0;
    /// Obstacle hitbox as a fraction of its sprite size
    pub const OBSTACLE_HITBOX_SCALE: f32 = 0.75;
    /// Plane hitbox as a fraction of its sprite size
    pub const PLANE_HITBOX_SCALE: f32 = 0.5;

    /// Airborne obstacles stay this far from the top edge and the screen midline
    pub const AIR_OBSTACLE_MARGIN: f32 = 50.0;

    /// Coins
    pub const COIN_SPAWN_INTERVAL_MS: f32 = 1500.0;
    pub const COIN_SIZE_RATIO: f32 = 0.06;
    pub const COIN_VERTICAL_MARGIN: f32 = 150.0;
    /// Clearance around obstacles, in coin sizes
    pub const COIN_SAFETY_MARGIN: f32 = 1.5;
    pub const COIN_PLACEMENT_ATTEMPTS: u32 = 10;
}
