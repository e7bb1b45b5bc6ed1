//! Per-map obstacle tables

use serde::Serialize;

use crate::assets::{AssetManifest, SpriteId};
use crate::settings::MapId;

/// One kind of obstacle a map can spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleDef {
    pub name: &'static str,
    /// Sits on the ground (bottom-aligned) instead of flying in the top half
    pub grounded: bool,
    /// Height as a fraction of screen height
    pub height_ratio: f32,
    pub sprite: SpriteId,
}

impl ObstacleDef {
    const fn new(name: &'static str, grounded: bool, height_ratio: f32, sprite: SpriteId) -> Self {
        Self {
            name,
            grounded,
            height_ratio,
            sprite,
        }
    }
}

pub const CITY_OBSTACLES: [ObstacleDef; 5] = [
    ObstacleDef::new("building", true, 0.50, SpriteId::Building),
    ObstacleDef::new("lamppost", true, 0.30, SpriteId::Lamppost),
    ObstacleDef::new("jet", false, 0.30, SpriteId::Jet),
    ObstacleDef::new("alien", false, 0.30, SpriteId::Alien),
    ObstacleDef::new("bird", false, 0.20, SpriteId::Bird),
];

pub const FOREST_OBSTACLES: [ObstacleDef; 4] = [
    ObstacleDef::new("tree", true, 0.50, SpriteId::Tree),
    ObstacleDef::new("zombie", true, 0.30, SpriteId::Zombie),
    ObstacleDef::new("ghost_1", false, 0.30, SpriteId::Ghost1),
    ObstacleDef::new("ghost_2", false, 0.30, SpriteId::Ghost2),
];

/// Obstacles available for the selected map, immutable for the session
#[derive(Debug, Clone, Default)]
pub struct ObstacleCatalog {
    defs: Vec<ObstacleDef>,
}

impl ObstacleCatalog {
    /// Build the catalog for a map, keeping only entries whose sprite loaded
    pub fn for_map(map: MapId, manifest: &AssetManifest) -> Self {
        let table: &[ObstacleDef] = match map {
            MapId::City => &CITY_OBSTACLES,
            MapId::Forest => &FOREST_OBSTACLES,
        };

        let defs: Vec<ObstacleDef> = table
            .iter()
            .filter(|def| {
                let loaded = manifest.contains(def.sprite);
                if !loaded {
                    log::warn!("Obstacle '{}' disabled: sprite not loaded", def.name);
                }
                loaded
            })
            .copied()
            .collect();

        log::info!("{} catalog: {} obstacle kinds", map.as_str(), defs.len());
        Self { defs }
    }

    pub fn from_defs(defs: Vec<ObstacleDef>) -> Self {
        Self { defs }
    }

    pub fn defs(&self) -> &[ObstacleDef] {
        &self.defs
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn get(&self, index: usize) -> Option<&ObstacleDef> {
        self.defs.get(index)
    }
}
