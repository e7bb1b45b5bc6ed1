//! Per-tick simulation driver
//!
//! Order inside a tick is fixed: forces, plane integration, camera, spawners,
//! then collisions. Collisions must see the post-integration plane and the
//! spawners must see the post-integration camera.

use glam::Vec2;

use super::collision::{collect_coins, first_obstacle_hit, plane_hitbox};
use super::state::{GameOverEvent, GamePhase, SimulationState};
use crate::consts::*;

/// Control changes to apply before this tick. `None` leaves a control as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub climb: Option<bool>,
    pub dive: Option<bool>,
}

impl TickInput {
    /// Held state of both controls
    pub fn held(climb: bool, dive: bool) -> Self {
        Self {
            climb: Some(climb),
            dive: Some(dive),
        }
    }
}

/// Clamp a frame delta into what one tick may integrate
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 }
}

/// Advance the session by `dt` seconds. Returns the game over event on the
/// tick that ends the run.
pub fn tick(state: &mut SimulationState, input: &TickInput, dt: f32) -> Option<GameOverEvent> {
    let dt = clamp_dt(dt);

    if let Some(climb) = input.climb {
        state.set_climb(climb);
    }
    if let Some(dive) = input.dive {
        state.set_dive(dive);
    }

    if state.phase != GamePhase::Flying || state.paused {
        return None;
    }

    state.survival_time += dt;

    // Forces
    let tuning = state.tuning;
    state.plane.apply_force(Vec2::new(tuning.forward_thrust, 0.0));
    if state.climb {
        state.plane.apply_force(Vec2::new(0.0, -tuning.lift_force));
    }
    if state.dive {
        state.plane.apply_force(Vec2::new(0.0, tuning.lift_force * DIVE_FORCE_RATIO));
    }

    state.plane.update(dt);

    // Camera keeps the plane a quarter of the way into the screen
    state.camera_x = (state.plane.x() - state.viewport.width * CAMERA_LEAD).max(0.0);

    let coins_enabled = state.coins_enabled();
    state
        .spawner
        .update_obstacles(dt, state.camera_x, &state.viewport, &state.cache);
    if coins_enabled {
        state
            .spawner
            .update_coins(dt, state.camera_x, &state.viewport, &state.cache);
    }

    let hitbox = plane_hitbox(state.plane.position());
    if let Some(obstacle_id) = first_obstacle_hit(&hitbox, state.spawner.obstacles()) {
        return Some(state.finish_run(obstacle_id));
    }

    if coins_enabled {
        let collected = collect_coins(&hitbox, state.spawner.coins_mut());
        if collected > 0 {
            state.coins += collected;
            log::debug!("Collected {} coin(s), total {}", collected, state.coins);
        }
    }

    None
}
