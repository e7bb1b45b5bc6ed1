//! Paper plane flight model
//!
//! Forces accumulate into `accel` during a tick and are consumed by
//! `update`, which always leaves the accumulator at zero. Per-tick order:
//! gravity, angle of attack (stall / dive boost), drag, ground effect,
//! integration with speed clamp, world bounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Plane rigid body with simplified aerodynamics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanePhysics {
    pos: Vec2,
    vel: Vec2,
    /// Force accumulator, zero between ticks
    accel: Vec2,
    /// Acceleration consumed by the most recent tick (diagnostics only)
    last_accel: Vec2,
    radius: f32,
    mass: f32,
    max_speed: f32,
    drag_coefficient: f32,
    world_width: f32,
    world_height: f32,
    angle_of_attack: f32,
    stalling: bool,
}

impl PlanePhysics {
    pub fn new(pos: Vec2, radius: f32, mass: f32) -> Self {
        debug_assert!(mass > 0.0, "plane mass must be positive");
        Self {
            pos,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            last_accel: Vec2::ZERO,
            radius,
            mass,
            max_speed: f32::MAX,
            drag_coefficient: 0.005,
            world_width: 800.0,
            world_height: 600.0,
            angle_of_attack: 0.0,
            stalling: false,
        }
    }

    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed;
    }

    pub fn set_drag_coefficient(&mut self, drag_coefficient: f32) {
        self.drag_coefficient = drag_coefficient;
    }

    pub fn set_world_bounds(&mut self, width: f32, height: f32) {
        self.world_width = width;
        self.world_height = height;
    }

    /// Advance one tick
    pub fn update(&mut self, dt: f32) {
        self.accel.y += GRAVITY;

        self.apply_angle_of_attack();
        self.apply_drag();
        self.apply_ground_effect();

        self.vel += self.accel * dt;

        let speed = self.vel.length();
        if speed > self.max_speed {
            self.vel *= self.max_speed / speed;
        }

        debug_assert!(self.vel.is_finite(), "plane velocity went non-finite");
        if !self.vel.is_finite() {
            self.vel = Vec2::ZERO;
        }

        self.pos += self.vel * dt;

        self.check_bounds();

        self.last_accel = self.accel;
        self.accel = Vec2::ZERO;
    }

    fn apply_angle_of_attack(&mut self) {
        let speed = self.speed();
        if speed < MIN_AOA_SPEED {
            self.angle_of_attack = 0.0;
            self.stalling = false;
            return;
        }

        // Negative = climbing, positive = diving (y grows downward)
        self.angle_of_attack = self.vel.y / speed;

        if self.angle_of_attack < -STALL_ANGLE && speed < STALL_SPEED {
            self.stalling = true;
            self.accel.y += STALL_PENALTY;
            self.accel.x -= STALL_FORWARD_LOSS;
        } else {
            self.stalling = false;
        }

        if self.angle_of_attack > DIVE_BOOST_ANGLE {
            self.accel.x += DIVE_SPEED_BOOST * self.angle_of_attack;
        }
    }

    fn apply_drag(&mut self) {
        if self.speed() < MIN_AOA_SPEED {
            return;
        }

        let aoa = self.angle_of_attack;
        let multiplier = if aoa < -DRAG_RAMP_THRESHOLD {
            let climb = (-aoa / STALL_ANGLE).min(1.0);
            1.0 + (CLIMB_DRAG_MULTIPLIER - 1.0) * climb
        } else if aoa > DRAG_RAMP_THRESHOLD {
            let dive = (aoa / STALL_ANGLE).min(1.0);
            1.0 - (1.0 - DIVE_DRAG_MULTIPLIER) * dive
        } else {
            1.0
        };

        self.accel -= self.vel * (self.drag_coefficient * multiplier);
    }

    fn apply_ground_effect(&mut self) {
        let height_above_ground = self.world_height - self.pos.y - self.radius;
        let near_ground = height_above_ground > 0.0 && height_above_ground < GROUND_EFFECT_HEIGHT;
        if near_ground && self.vel.y > 0.0 {
            let effect = 1.0 - height_above_ground / GROUND_EFFECT_HEIGHT;
            self.accel.y -= self.vel.y * effect * effect * GROUND_EFFECT_STRENGTH;
        }
    }

    fn check_bounds(&mut self) {
        // Ground
        if self.pos.y + self.radius >= self.world_height {
            self.pos.y = self.world_height - self.radius;
            self.vel.y *= -BOUNCE_DAMPING;
            self.vel.x *= GROUND_FRICTION;
            self.vel.x = self.vel.x.max(MIN_FORWARD_VELOCITY);
            self.stalling = false;
        }

        // Ceiling
        if self.pos.y - self.radius <= 0.0 {
            self.pos.y = self.radius;
            self.vel.y *= -BOUNCE_DAMPING;
        }

        // Left wall
        if self.pos.x - self.radius <= 0.0 {
            self.pos.x = self.radius;
            self.vel.x = self.vel.x.max(MIN_FORWARD_VELOCITY);
        }
    }

    /// Hard-set velocity (takeoff)
    pub fn launch(&mut self, vel: Vec2) {
        self.vel = vel;
    }

    /// Accumulate a force for the current tick only
    pub fn apply_force(&mut self, force: Vec2) {
        self.accel += force / self.mass;
    }

    /// Back to rest at `pos`
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
        self.accel = Vec2::ZERO;
        self.last_accel = Vec2::ZERO;
        self.angle_of_attack = 0.0;
        self.stalling = false;
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn velocity(&self) -> Vec2 {
        self.vel
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn angle_of_attack(&self) -> f32 {
        self.angle_of_attack
    }

    pub fn is_stalling(&self) -> bool {
        self.stalling
    }

    pub fn is_moving(&self) -> bool {
        self.vel.x.abs() > 0.1 || self.vel.y.abs() > 0.1
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    pub fn world_height(&self) -> f32 {
        self.world_height
    }

    pub fn world_width(&self) -> f32 {
        self.world_width
    }

    pub fn last_acceleration(&self) -> Vec2 {
        self.last_accel
    }

    /// Sprite rotation in degrees, nose follows velocity within +-30
    pub fn render_angle_degrees(&self) -> f32 {
        if self.vel.y.abs() > 10.0 {
            self.vel.y.atan2(self.vel.x).to_degrees().clamp(-30.0, 30.0)
        } else {
            0.0
        }
    }
}
