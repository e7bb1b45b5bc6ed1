//! Plane versus entity overlap tests
//!
//! Everything is axis-aligned: the plane uses a box half the size of its
//! sprite, obstacles a box three quarters the size of theirs, and coins the
//! full sprite.

use glam::Vec2;

use super::entity::{Entity, Rect};
use crate::consts::*;

/// Plane collision box centered on the plane position
pub fn plane_hitbox(pos: Vec2) -> Rect {
    Rect::from_center_size(pos, Vec2::splat(PLANE_SPRITE_SIZE * PLANE_HITBOX_SCALE))
}

/// Id of the first obstacle (in spawn order) overlapping `hitbox`
pub fn first_obstacle_hit(hitbox: &Rect, obstacles: &[Entity]) -> Option<u32> {
    obstacles
        .iter()
        .find(|o| hitbox.intersects(&o.hitbox()))
        .map(|o| o.id)
}

/// Remove every coin overlapping `hitbox`, returning how many were taken
pub fn collect_coins(hitbox: &Rect, coins: &mut Vec<Entity>) -> u32 {
    let before = coins.len();
    coins.retain(|c| !hitbox.intersects(&c.hitbox()));
    (before - coins.len()) as u32
}
