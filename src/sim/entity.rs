//! Obstacles and coins: kinematic boxes drifting through the world

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::SpriteId;
use crate::consts::*;

/// Axis-aligned rectangle in world coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Strict overlap; rectangles that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Grow by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    /// Same center, size multiplied by `factor`
    pub fn scaled_centered(&self, factor: f32) -> Self {
        Self::from_center_size(self.center(), self.size() * factor)
    }
}

/// What an entity does when the plane touches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Lethal. Grounded obstacles are bottom-aligned, the rest fly in the top half.
    Obstacle { grounded: bool },
    /// Collectible
    Coin,
}

/// An obstacle or a coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub sprite: SpriteId,
}

impl Entity {
    pub fn obstacle(id: u32, pos: Vec2, size: Vec2, sprite: SpriteId, grounded: bool) -> Self {
        Self {
            id,
            kind: EntityKind::Obstacle { grounded },
            pos,
            size,
            sprite,
        }
    }

    pub fn coin(id: u32, pos: Vec2, size: f32) -> Self {
        Self {
            id,
            kind: EntityKind::Coin,
            pos,
            size: Vec2::splat(size),
            sprite: SpriteId::Coin,
        }
    }

    /// Drift horizontally with the world
    pub fn advance(&mut self, dt: f32, speed: f32) {
        self.pos.x += speed * dt;
    }

    /// Entirely left of the camera
    pub fn is_behind(&self, camera_x: f32) -> bool {
        self.pos.x + self.size.x < camera_x
    }

    /// Sprite bounds
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Collision box: obstacles are shrunk around their center, coins use the full sprite
    pub fn hitbox(&self) -> Rect {
        match self.kind {
            EntityKind::Obstacle { .. } => self.bounds().scaled_centered(OBSTACLE_HITBOX_SCALE),
            EntityKind::Coin => self.bounds(),
        }
    }
}
