//! Procedural obstacle and coin spawning
//!
//! Spawns are driven by simulated-time timers, so a paused simulation also
//! pauses spawning. Entities appear just past the right edge of the camera
//! and are culled once they fall behind its left edge.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::catalog::ObstacleCatalog;
use super::entity::{Entity, EntityKind};
use super::state::Viewport;
use crate::assets::SpriteCache;
use crate::consts::*;

/// Owns the live obstacle and coin lists
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    catalog: ObstacleCatalog,
    obstacle_interval_ms: f32,
    obstacle_timer_ms: f32,
    coin_timer_ms: f32,
    obstacles: Vec<Entity>,
    coins: Vec<Entity>,
    next_id: u32,
}

impl Spawner {
    pub fn new(seed: u64, catalog: ObstacleCatalog, obstacle_interval_ms: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            catalog,
            obstacle_interval_ms,
            obstacle_timer_ms: 0.0,
            coin_timer_ms: 0.0,
            obstacles: Vec::new(),
            coins: Vec::new(),
            next_id: 1,
        }
    }

    /// Restart both spawn timers from now
    pub fn reset_timers(&mut self) {
        self.obstacle_timer_ms = 0.0;
        self.coin_timer_ms = 0.0;
    }

    /// Drop every live entity and restart the timers
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.coins.clear();
        self.reset_timers();
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an entity directly to the matching live list
    pub(crate) fn insert(&mut self, mut entity: Entity) -> u32 {
        entity.id = self.next_entity_id();
        let id = entity.id;
        match entity.kind {
            EntityKind::Obstacle { .. } => self.obstacles.push(entity),
            EntityKind::Coin => self.coins.push(entity),
        }
        id
    }

    pub fn obstacles(&self) -> &[Entity] {
        &self.obstacles
    }

    pub fn coins(&self) -> &[Entity] {
        &self.coins
    }

    pub(crate) fn coins_mut(&mut self) -> &mut Vec<Entity> {
        &mut self.coins
    }

    pub fn catalog(&self) -> &ObstacleCatalog {
        &self.catalog
    }

    /// Advance the obstacle timer, spawn when due, then move and cull
    pub fn update_obstacles(
        &mut self,
        dt: f32,
        camera_x: f32,
        viewport: &Viewport,
        cache: &SpriteCache,
    ) {
        self.obstacle_timer_ms += dt * 1000.0;
        if self.obstacle_timer_ms > self.obstacle_interval_ms {
            self.spawn_obstacle(camera_x, viewport, cache);
            self.obstacle_timer_ms = 0.0;
        }

        advance_and_cull(&mut self.obstacles, dt, camera_x);
    }

    /// Advance the coin timer, spawn when due, then move and cull.
    /// Does nothing when the coin sprite is unavailable.
    pub fn update_coins(
        &mut self,
        dt: f32,
        camera_x: f32,
        viewport: &Viewport,
        cache: &SpriteCache,
    ) {
        if cache.coin_size().is_none() {
            return;
        }

        self.coin_timer_ms += dt * 1000.0;
        if self.coin_timer_ms > COIN_SPAWN_INTERVAL_MS {
            self.spawn_coin(camera_x, viewport, cache);
            self.coin_timer_ms = 0.0;
        }

        advance_and_cull(&mut self.coins, dt, camera_x);
    }

    /// Spawn one random obstacle from the catalog just off the right edge
    pub fn spawn_obstacle(
        &mut self,
        camera_x: f32,
        viewport: &Viewport,
        cache: &SpriteCache,
    ) -> Option<u32> {
        if self.catalog.is_empty() {
            return None;
        }

        let index = self.rng.random_range(0..self.catalog.len());
        let def = *self.catalog.get(index)?;
        let size = cache.obstacle_size(def.sprite)?;

        let x = camera_x + viewport.width + size.x;
        let y = if def.grounded {
            // Bottom edge on the bottom of the screen
            viewport.height - size.y
        } else {
            let min_y = AIR_OBSTACLE_MARGIN;
            let max_y = viewport.height / 2.0 - size.y - AIR_OBSTACLE_MARGIN;
            if max_y < min_y {
                log::warn!(
                    "Skipped {} spawn: {:.0}px tall does not fit the top half of a {:.0}px screen",
                    def.name,
                    size.y,
                    viewport.height
                );
                return None;
            }
            min_y + self.rng.random::<f32>() * (max_y - min_y)
        };

        let id = self.next_entity_id();
        self.obstacles
            .push(Entity::obstacle(id, Vec2::new(x, y), size, def.sprite, def.grounded));
        log::debug!(
            "Spawned {} #{} at ({:.0}, {:.0}) size {:.0}x{:.0}",
            def.name,
            id,
            x,
            y,
            size.x,
            size.y
        );
        Some(id)
    }

    /// Spawn a coin at a random height clear of every live obstacle.
    /// Gives up for this cycle after a fixed number of attempts.
    pub fn spawn_coin(
        &mut self,
        camera_x: f32,
        viewport: &Viewport,
        cache: &SpriteCache,
    ) -> Option<u32> {
        let size = cache.coin_size()?;
        let x = camera_x + viewport.width + size;
        let margin = size * COIN_SAFETY_MARGIN;

        let min_y = COIN_VERTICAL_MARGIN;
        let max_y = viewport.height - size - COIN_VERTICAL_MARGIN;
        if max_y < min_y {
            log::warn!("Skipped coin spawn: screen too short ({:.0}px)", viewport.height);
            return None;
        }

        for attempt in 1..=COIN_PLACEMENT_ATTEMPTS {
            let y = min_y + self.rng.random::<f32>() * (max_y - min_y);
            let candidate = Entity::coin(0, Vec2::new(x, y), size);
            let padded = candidate.bounds().expand(margin);

            if self.obstacles.iter().all(|o| !padded.intersects(&o.hitbox())) {
                let id = self.next_entity_id();
                self.coins.push(Entity { id, ..candidate });
                log::debug!("Spawned coin #{} at y={:.0} (attempt {})", id, y, attempt);
                return Some(id);
            }
        }

        log::debug!("Skipped coin spawn: obstacles blocked every position");
        None
    }
}

fn advance_and_cull(entities: &mut Vec<Entity>, dt: f32, camera_x: f32) {
    for entity in entities.iter_mut() {
        entity.advance(dt, ENTITY_SPEED);
    }
    entities.retain(|e| !e.is_behind(camera_x));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetManifest, SpriteId};
    use crate::settings::MapId;
    use proptest::prelude::*;

    fn setup(map: MapId, interval_ms: f32) -> (Spawner, Viewport, SpriteCache) {
        let manifest = AssetManifest::uniform(64);
        let catalog = ObstacleCatalog::for_map(map, &manifest);
        let viewport = Viewport::new(1920.0, 1080.0);
        let background = map.background_sprite();
        let cache = SpriteCache::build(&catalog, &manifest, background, viewport.height);
        (Spawner::new(7, catalog, interval_ms), viewport, cache)
    }

    /// Obstacle covering everything right of the camera
    fn wall(viewport: &Viewport, camera_x: f32) -> Entity {
        Entity::obstacle(
            0,
            Vec2::new(camera_x - viewport.width, -viewport.height * 2.0),
            Vec2::new(viewport.width * 8.0, viewport.height * 6.0),
            SpriteId::Building,
            true,
        )
    }

    #[test]
    fn test_one_obstacle_after_interval() {
        let (mut spawner, viewport, cache) = setup(MapId::City, 2500.0);
        let mut first_spawn_ms = None;
        for step in 1..=30 {
            spawner.update_obstacles(0.1, 0.0, &viewport, &cache);
            if first_spawn_ms.is_none() && !spawner.obstacles().is_empty() {
                first_spawn_ms = Some(step * 100);
            }
        }
        assert_eq!(spawner.obstacles().len(), 1);
        let at = first_spawn_ms.unwrap();
        assert!((2500..=2600).contains(&at), "spawned at {}ms", at);
    }

    #[test]
    fn test_obstacle_placement() {
        let (mut spawner, viewport, cache) = setup(MapId::City, 2500.0);
        for _ in 0..50 {
            spawner.spawn_obstacle(400.0, &viewport, &cache);
        }
        assert_eq!(spawner.obstacles().len(), 50);
        for o in spawner.obstacles() {
            assert_eq!(o.pos.x, 400.0 + viewport.width + o.size.x);
            match o.kind {
                EntityKind::Obstacle { grounded: true } => {
                    assert!((o.pos.y + o.size.y - viewport.height).abs() < 1e-3);
                }
                EntityKind::Obstacle { grounded: false } => {
                    assert!(o.pos.y >= AIR_OBSTACLE_MARGIN);
                    let limit = viewport.height / 2.0 - AIR_OBSTACLE_MARGIN;
                    assert!(o.pos.y + o.size.y <= limit + 1e-3);
                }
                EntityKind::Coin => unreachable!(),
            }
        }
    }

    #[test]
    fn test_degenerate_air_range_skips_spawn() {
        let manifest = AssetManifest::uniform(64);
        let catalog = ObstacleCatalog::from_defs(vec![crate::sim::catalog::CITY_OBSTACLES[2]]);
        // 0.3 * 300 = 90 tall; top half only leaves 150 - 90 - 50 = 10 < 50
        let viewport = Viewport::new(800.0, 300.0);
        let background = SpriteId::CityBackground;
        let cache = SpriteCache::build(&catalog, &manifest, background, viewport.height);
        let mut spawner = Spawner::new(1, catalog, 2500.0);
        assert!(spawner.spawn_obstacle(0.0, &viewport, &cache).is_none());
        assert!(spawner.obstacles().is_empty());
    }

    #[test]
    fn test_entities_behind_camera_are_culled() {
        let (mut spawner, viewport, cache) = setup(MapId::Forest, 2500.0);
        let size = Vec2::new(100.0, 100.0);
        spawner.insert(Entity::obstacle(0, Vec2::new(0.0, 0.0), size, SpriteId::Tree, true));
        spawner.insert(Entity::obstacle(0, Vec2::new(900.0, 0.0), size, SpriteId::Tree, true));
        spawner.insert(Entity::coin(0, Vec2::new(10.0, 300.0), 20.0));

        spawner.update_obstacles(FRAME_DT, 500.0, &viewport, &cache);
        spawner.update_coins(FRAME_DT, 500.0, &viewport, &cache);

        assert_eq!(spawner.obstacles().len(), 1);
        assert!(spawner.obstacles()[0].pos.x > 800.0);
        assert!(spawner.coins().is_empty());
    }

    #[test]
    fn test_blocked_coin_cycle_spawns_nothing() {
        let (mut spawner, viewport, cache) = setup(MapId::City, 2500.0);
        spawner.insert(wall(&viewport, 0.0));

        spawner.update_coins(1.6, 0.0, &viewport, &cache);
        assert!(spawner.coins().is_empty());

        // The timer restarted even though nothing spawned
        spawner.update_coins(1.0, 0.0, &viewport, &cache);
        assert!(spawner.coins().is_empty());
        assert!((spawner.coin_timer_ms - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_short_screen_skips_coin_cycle() {
        let manifest = AssetManifest::uniform(64);
        let catalog = ObstacleCatalog::for_map(MapId::City, &manifest);
        // Coin is 18 tall; 300 - 18 - 150 = 132 leaves no room below the top margin
        let viewport = Viewport::new(800.0, 300.0);
        let background = SpriteId::CityBackground;
        let cache = SpriteCache::build(&catalog, &manifest, background, viewport.height);
        let mut spawner = Spawner::new(5, catalog, 2500.0);
        assert!(spawner.spawn_coin(0.0, &viewport, &cache).is_none());

        spawner.update_coins(1.6, 0.0, &viewport, &cache);
        assert!(spawner.coins().is_empty());
        assert_eq!(spawner.coin_timer_ms, 0.0);

        spawner.update_coins(1.0, 0.0, &viewport, &cache);
        assert!(spawner.coins().is_empty());
        assert!((spawner.coin_timer_ms - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_coin_spawns_on_interval() {
        let (mut spawner, viewport, cache) = setup(MapId::City, 2500.0);
        for _ in 0..89 {
            spawner.update_coins(FRAME_DT, 0.0, &viewport, &cache);
        }
        assert!(spawner.coins().is_empty());
        for _ in 0..2 {
            spawner.update_coins(FRAME_DT, 0.0, &viewport, &cache);
        }
        assert_eq!(spawner.coins().len(), 1);
        let coin = &spawner.coins()[0];
        assert!((coin.size.x - viewport.height * COIN_SIZE_RATIO).abs() < 1e-3);
        assert!(coin.pos.y >= COIN_VERTICAL_MARGIN);
    }

    #[test]
    fn test_coins_disabled_without_sprite() {
        let manifest = AssetManifest::uniform(64).without(SpriteId::Coin);
        let catalog = ObstacleCatalog::for_map(MapId::City, &manifest);
        let viewport = Viewport::new(1920.0, 1080.0);
        let background = SpriteId::CityBackground;
        let cache = SpriteCache::build(&catalog, &manifest, background, viewport.height);
        let mut spawner = Spawner::new(3, catalog, 2500.0);
        for _ in 0..600 {
            spawner.update_coins(FRAME_DT, 0.0, &viewport, &cache);
        }
        assert!(spawner.coins().is_empty());
    }

    proptest! {
        #[test]
        fn prop_coins_clear_live_obstacles(
            seed in any::<u64>(),
            blockers in prop::collection::vec((0.0f32..1.0, 0.05f32..0.5, 0.05f32..0.6), 0..6),
        ) {
            let (mut spawner, viewport, cache) = setup(MapId::City, 2500.0);
            spawner.rng = Pcg32::seed_from_u64(seed);
            let coin_x = viewport.width + cache.coin_size().unwrap();
            for (fy, fw, fh) in blockers {
                let size = Vec2::new(viewport.width * fw, viewport.height * fh);
                let pos = Vec2::new(coin_x - size.x * 0.5, viewport.height * fy - size.y * 0.5);
                spawner.insert(Entity::obstacle(0, pos, size, SpriteId::Jet, false));
            }

            let before = spawner.coins().len();
            let spawned = spawner.spawn_coin(0.0, &viewport, &cache);
            match spawned {
                Some(id) => {
                    let coin = spawner.coins().iter().find(|c| c.id == id).unwrap();
                    let padded = coin.bounds().expand(coin.size.x * COIN_SAFETY_MARGIN);
                    for o in spawner.obstacles() {
                        prop_assert!(!padded.intersects(&o.hitbox()));
                    }
                    prop_assert_eq!(spawner.coins().len(), before + 1);
                }
                None => prop_assert_eq!(spawner.coins().len(), before),
            }
        }
    }
}
