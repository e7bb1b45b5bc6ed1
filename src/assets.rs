//! Sprite dimensions and precomputed scaled sizes
//!
//! Asset decoding belongs to the embedding renderer. The simulation only
//! needs each sprite's native dimensions (for aspect ratios) and whether it
//! loaded at all. Scaled sizes are computed once per map/screen size and
//! looked up at spawn time.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::catalog::ObstacleCatalog;

/// Every sprite the simulation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteId {
    WhitePlane,
    RedPlane,
    BluePlane,
    YellowPlane,
    CityBackground,
    ForestBackground,
    Coin,
    Building,
    Lamppost,
    Jet,
    Alien,
    Bird,
    Tree,
    Zombie,
    Ghost1,
    Ghost2,
}

impl SpriteId {
    pub const ALL: [SpriteId; 16] = [
        SpriteId::WhitePlane,
        SpriteId::RedPlane,
        SpriteId::BluePlane,
        SpriteId::YellowPlane,
        SpriteId::CityBackground,
        SpriteId::ForestBackground,
        SpriteId::Coin,
        SpriteId::Building,
        SpriteId::Lamppost,
        SpriteId::Jet,
        SpriteId::Alien,
        SpriteId::Bird,
        SpriteId::Tree,
        SpriteId::Zombie,
        SpriteId::Ghost1,
        SpriteId::Ghost2,
    ];

    /// Asset name as shipped with the game
    pub fn asset_name(&self) -> &'static str {
        match self {
            SpriteId::WhitePlane => "white_plane",
            SpriteId::RedPlane => "red_plane",
            SpriteId::BluePlane => "blue_plane",
            SpriteId::YellowPlane => "yellow_plane",
            SpriteId::CityBackground => "city_map",
            SpriteId::ForestBackground => "forest_map",
            SpriteId::Coin => "coin",
            SpriteId::Building => "building",
            SpriteId::Lamppost => "lamp_post",
            SpriteId::Jet => "jet",
            SpriteId::Alien => "alien",
            SpriteId::Bird => "bird",
            SpriteId::Tree => "tree",
            SpriteId::Zombie => "zombie",
            SpriteId::Ghost1 => "ghost_1",
            SpriteId::Ghost2 => "ghost_2",
        }
    }
}

/// Native pixel dimensions of a decoded sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSize {
    pub width: u32,
    pub height: u32,
}

impl SpriteSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, `None` for an empty image
    pub fn aspect(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

/// Sprites that loaded successfully, with their native sizes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    sprites: HashMap<SpriteId, SpriteSize>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifest where every sprite loaded as a `size` x `size` square
    pub fn uniform(size: u32) -> Self {
        let mut manifest = Self::new();
        for id in SpriteId::ALL {
            manifest.insert(id, SpriteSize::new(size, size));
        }
        manifest
    }

    pub fn insert(&mut self, id: SpriteId, size: SpriteSize) {
        self.sprites.insert(id, size);
    }

    pub fn with_sprite(mut self, id: SpriteId, width: u32, height: u32) -> Self {
        self.insert(id, SpriteSize::new(width, height));
        self
    }

    /// Drop a sprite, as if it failed to load
    pub fn without(mut self, id: SpriteId) -> Self {
        self.sprites.remove(&id);
        self
    }

    pub fn get(&self, id: SpriteId) -> Option<SpriteSize> {
        self.sprites.get(&id).copied()
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.sprites.contains_key(&id)
    }
}

/// Scaled sprite sizes for the current map and screen height
#[derive(Debug, Clone, Default)]
pub struct SpriteCache {
    obstacle_sizes: HashMap<SpriteId, Vec2>,
    coin_size: Option<f32>,
    background_width: Option<f32>,
    screen_height: f32,
}

impl SpriteCache {
    /// Precompute sizes for every catalog entry. Called at session setup and
    /// again whenever the screen is resized.
    pub fn build(
        catalog: &ObstacleCatalog,
        manifest: &AssetManifest,
        background: SpriteId,
        screen_height: f32,
    ) -> Self {
        let mut obstacle_sizes = HashMap::new();
        for def in catalog.defs() {
            let Some(aspect) = manifest.get(def.sprite).and_then(|s| s.aspect()) else {
                continue;
            };
            let height = screen_height * def.height_ratio;
            obstacle_sizes.insert(def.sprite, Vec2::new(height * aspect, height));
        }

        let coin_size = manifest
            .contains(SpriteId::Coin)
            .then_some(screen_height * COIN_SIZE_RATIO);

        // Background is scaled to fill the screen height
        let background_width = manifest
            .get(background)
            .and_then(|s| s.aspect())
            .map(|aspect| screen_height * aspect);

        Self {
            obstacle_sizes,
            coin_size,
            background_width,
            screen_height,
        }
    }

    pub fn obstacle_size(&self, sprite: SpriteId) -> Option<Vec2> {
        self.obstacle_sizes.get(&sprite).copied()
    }

    /// Side length of the square coin, `None` when the coin sprite is missing
    pub fn coin_size(&self) -> Option<f32> {
        self.coin_size
    }

    pub fn background_width(&self) -> Option<f32> {
        self.background_width
    }

    /// Background scale factor relative to its native height
    pub fn background_scale(&self, manifest: &AssetManifest, background: SpriteId) -> Option<f32> {
        let native = manifest.get(background)?;
        (native.height > 0).then(|| self.screen_height / native.height as f32)
    }
}
