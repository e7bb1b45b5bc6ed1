//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep, clamped per tick
//! - Seeded RNG only
//! - Entities kept in spawn order
//! - No rendering or platform dependencies

pub mod catalog;
pub mod collision;
pub mod entity;
pub mod plane;
pub mod spawner;
pub mod state;
pub mod tick;

pub use catalog::{ObstacleCatalog, ObstacleDef};
pub use collision::{collect_coins, first_obstacle_hit, plane_hitbox};
pub use entity::{Entity, EntityKind, Rect};
pub use plane::PlanePhysics;
pub use spawner::Spawner;
pub use state::{
    EntityFrame, FrameState, GameOverEvent, GamePhase, PlaneFrame, RunState, SimulationState,
    Viewport,
};
pub use tick::{TickInput, clamp_dt, tick};
