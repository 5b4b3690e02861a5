use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tessera_common::{Collider, EntityId};
use tessera_kernel::{EntityData, World};
use tessera_spatial::{SpatialConfig, SpatialManager};

const TILE: f32 = 64.0;

/// A generated map: floor and wall tiles, scattered props, one player.
pub struct Scene {
    pub world: World,
    pub player: EntityId,
    /// Every entity the manager should know about.
    pub entities: Vec<EntityId>,
}

/// Deterministic scatter over the configured world extent.
pub fn generate(seed: u64, config: &SpatialConfig, props: usize) -> Scene {
    let mut world = World::with_seed(seed);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut entities = Vec::new();

    let cols = (config.world_width / TILE).ceil() as i32;
    let rows = (config.world_height / TILE).ceil() as i32;
    for row in 0..rows {
        for col in 0..cols {
            let (x, y) = (col as f32 * TILE, row as f32 * TILE);
            let border = row == 0 || col == 0 || row == rows - 1 || col == cols - 1;
            let tile = if border {
                EntityData::tile(x, y).with_collider(Collider::sized(TILE, TILE).solid())
            } else {
                EntityData::tile(x, y)
            };
            entities.push(world.spawn(tile));
        }
    }

    let inner = (Vec2::new(config.world_width, config.world_height) - 2.0 * TILE).max(Vec2::ZERO);
    for _ in 0..props {
        let x = TILE + rng.gen_range(0.0..=inner.x);
        let y = TILE + rng.gen_range(0.0..=inner.y);
        let roll: f32 = rng.gen_range(0.0..1.0);
        let prop = if roll < 0.4 {
            // Tree: trunk collider at the base of a 32x48 sprite.
            EntityData::actor(x, y)
                .with_anchor(Vec2::new(16.0, 48.0))
                .with_collider(
                    Collider::sized(12.0, 8.0)
                        .with_offset(Vec2::new(10.0, 40.0))
                        .solid(),
                )
        } else if roll < 0.7 {
            EntityData::actor(x, y).with_collider(Collider::circle(10.0).solid())
        } else if roll < 0.9 {
            EntityData::actor(x, y).with_collider(Collider::sized(8.0, 8.0))
        } else {
            EntityData::actor(x, y).hidden()
        };
        entities.push(world.spawn(prop));
    }

    let center = Vec2::new(config.world_width, config.world_height) * 0.5;
    let player = world.spawn(
        EntityData::actor(center.x, center.y)
            .with_anchor(Vec2::new(8.0, 8.0))
            .with_collider(Collider::sized(14.0, 14.0).with_offset(Vec2::new(1.0, 1.0))),
    );
    entities.push(player);

    Scene {
        world,
        player,
        entities,
    }
}

/// Register the scene with `manager` and make the player primary. Returns
/// how many entities are tracked.
pub fn populate(manager: &mut SpatialManager, scene: &Scene) -> usize {
    let tracked = scene
        .entities
        .iter()
        .filter(|&&id| manager.add_object(&scene.world, id))
        .count();
    manager.set_primary(Some(scene.player));
    tracked
}

/// Wandering direction, re-rolled every `interval` frames.
pub struct Walker {
    pub speed: f32,
    pub interval: u64,
    direction: Vec2,
    rng: Xoshiro256PlusPlus,
}

impl Walker {
    pub fn new(speed: f32, interval: u64, seed: u64) -> Self {
        Self {
            speed,
            interval: interval.max(1),
            direction: Vec2::ZERO,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Displacement for this frame.
    pub fn step(&mut self, world: &World) -> Vec2 {
        if world.tick() % self.interval == 0 {
            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
            self.direction = Vec2::from_angle(angle);
        }
        self.direction * self.speed
    }
}
