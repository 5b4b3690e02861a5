use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_common::{Collider, DEFAULT_FOOTPRINT, EntityId, EntityKind, Rect, Transform};

/// The authoritative world state.
///
/// The world owns entity placement; the grid, registry and spatial manager
/// only index it. Uses BTreeMap for deterministic iteration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    entities: BTreeMap<EntityId, EntityData>,
    next_id: u64,
    tick: u64,
    /// Seed the scene generator was built from.
    seed: u64,
}

/// Per-entity data stored in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub transform: Transform,
    pub collider: Option<Collider>,
    pub visible: bool,
    pub kind: EntityKind,
}

impl EntityData {
    /// Visible actor at `(x, y)` without a collider.
    pub fn actor(x: f32, y: f32) -> Self {
        Self {
            transform: Transform::at(x, y),
            collider: None,
            visible: true,
            kind: EntityKind::Actor,
        }
    }

    /// Background tile at `(x, y)`.
    pub fn tile(x: f32, y: f32) -> Self {
        Self {
            kind: EntityKind::Tile,
            ..Self::actor(x, y)
        }
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.transform.anchor = anchor;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn is_solid(&self) -> bool {
        self.collider.is_some_and(|c| c.solid)
    }

    /// World-space bounds: the collider footprint when present, otherwise a
    /// fixed visibility footprint at `position - anchor`.
    pub fn bounds(&self) -> Rect {
        let Transform { position, anchor } = self.transform;
        match &self.collider {
            Some(collider) => collider.bounds(position, anchor),
            None => {
                let origin = position - anchor;
                Rect::new(origin.x, origin.y, DEFAULT_FOOTPRINT, DEFAULT_FOOTPRINT)
            }
        }
    }
}

impl World {
    /// Create an empty world at tick 0 with seed 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world with a specific seed for deterministic scatter.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Current simulation tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seed the world was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of entities in the world.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Read-only access to all entities (BTreeMap for deterministic iteration).
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    /// Spawn a new entity. Returns its id.
    pub fn spawn(&mut self, data: EntityData) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        tracing::trace!(%id, kind = ?data.kind, "spawned entity");
        self.entities.insert(id, data);
        id
    }

    /// Remove an entity. Returns the data if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<EntityData> {
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityData> {
        self.entities.get_mut(&id)
    }

    /// Current bounds of an entity, if it exists.
    pub fn bounds(&self, id: EntityId) -> Option<Rect> {
        self.get(id).map(EntityData::bounds)
    }

    /// Move an entity to `position`. Returns false if it does not exist.
    pub fn set_position(&mut self, id: EntityId, position: Vec2) -> bool {
        if let Some(data) = self.entities.get_mut(&id) {
            data.transform.position = position;
            true
        } else {
            false
        }
    }

    /// Move an entity by `delta`. Returns false if it does not exist.
    pub fn translate(&mut self, id: EntityId, delta: Vec2) -> bool {
        if let Some(data) = self.entities.get_mut(&id) {
            data.transform.position += delta;
            true
        } else {
            false
        }
    }

    /// Advance the frame counter.
    pub fn step(&mut self) {
        self.tick += 1;
    }
}
