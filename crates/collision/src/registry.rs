use std::collections::{BTreeMap, BTreeSet, HashSet};

use glam::Vec2;
use tessera_common::{EntityId, Rect};
use tessera_grid::{GridError, SpatialHashGrid};
use tessera_kernel::World;

use crate::events::{CollisionEvent, CollisionListeners, ListenerId};
use crate::{query, resolve};

/// Registry-side state for one collidable entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Collidable {
    /// Bounds the entity is currently bucketed under in the grid.
    pub last_bounds: Rect,
    /// Snapshot of the collider's solid flag, refreshed by
    /// `update_positions`. Kept for inspection; push-out reads the world.
    pub solid: bool,
    touching: BTreeSet<EntityId>,
}

impl Collidable {
    /// Other collidables currently overlapping this one.
    pub fn touching(&self) -> &BTreeSet<EntityId> {
        &self.touching
    }
}

/// All-pairs collision tracking over a spatial grid.
///
/// Per frame, callers run [`update_positions`](Self::update_positions) and
/// then [`check_collisions`](Self::check_collisions). Gameplay code may
/// query [`potential_collisions`](Self::potential_collisions) or resolve
/// solid bodies at any point; bounds of entities not yet re-bucketed this
/// frame are one frame stale.
#[derive(Debug)]
pub struct CollisionRegistry {
    grid: SpatialHashGrid<EntityId>,
    collidables: BTreeMap<EntityId, Collidable>,
    listeners: CollisionListeners,
}

impl CollisionRegistry {
    /// Registry over a world of the given extent.
    pub fn new(cell_size: f32, world_width: f32, world_height: f32) -> Result<Self, GridError> {
        Ok(Self::with_grid(SpatialHashGrid::new(
            cell_size,
            world_width,
            world_height,
        )?))
    }

    /// Registry over an existing (normally empty) grid.
    pub fn with_grid(grid: SpatialHashGrid<EntityId>) -> Self {
        Self {
            grid,
            collidables: BTreeMap::new(),
            listeners: CollisionListeners::new(),
        }
    }

    pub fn grid(&self) -> &SpatialHashGrid<EntityId> {
        &self.grid
    }

    pub fn listeners_mut(&mut self) -> &mut CollisionListeners {
        &mut self.listeners
    }

    /// Register a callback for every enter/exit transition.
    pub fn subscribe(&mut self, listener: impl FnMut(&CollisionEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn len(&self) -> usize {
        self.collidables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collidables.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.collidables.contains_key(&id)
    }

    pub fn collidable(&self, id: EntityId) -> Option<&Collidable> {
        self.collidables.get(&id)
    }

    /// Touching set of a registered entity.
    pub fn touching(&self, id: EntityId) -> Option<&BTreeSet<EntityId>> {
        self.collidables.get(&id).map(|c| &c.touching)
    }

    pub fn is_touching(&self, a: EntityId, b: EntityId) -> bool {
        self.collidables
            .get(&a)
            .is_some_and(|c| c.touching.contains(&b))
    }

    /// Register an entity. No-op (returns false) when it is missing from the
    /// world, has no collider, or is already registered.
    pub fn add_object(&mut self, world: &World, id: EntityId) -> bool {
        let Some(data) = world.get(id) else {
            return false;
        };
        let Some(collider) = data.collider else {
            return false;
        };
        if self.collidables.contains_key(&id) {
            return false;
        }

        let bounds = data.bounds();
        self.grid.add(id, &bounds);
        self.collidables.insert(
            id,
            Collidable {
                last_bounds: bounds,
                solid: collider.solid,
                touching: BTreeSet::new(),
            },
        );
        tracing::debug!(%id, %bounds, "registered collidable");
        true
    }

    /// Deregister an entity, dropping it from the grid and from every other
    /// collidable's touching set. No exit events fire. Idempotent.
    pub fn remove_object(&mut self, id: EntityId) -> bool {
        let Some(record) = self.collidables.remove(&id) else {
            return false;
        };
        self.grid.remove(id, &record.last_bounds);
        for other in &record.touching {
            if let Some(partner) = self.collidables.get_mut(other) {
                partner.touching.remove(&id);
            }
        }
        tracing::debug!(%id, partners = record.touching.len(), "removed collidable");
        true
    }

    /// Drop every record and grid membership. Listeners stay registered.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.collidables.clear();
    }

    /// Re-bucket every collidable whose bounds changed since the last call.
    /// Records whose entity left the world or lost its collider are removed.
    /// Returns the number of re-bucketed entities.
    pub fn update_positions(&mut self, world: &World) -> usize {
        let mut moved = 0;
        let mut stale = Vec::new();

        for (&id, record) in &mut self.collidables {
            let Some((data, collider)) = world
                .get(id)
                .and_then(|data| data.collider.map(|c| (data, c)))
            else {
                stale.push(id);
                continue;
            };
            record.solid = collider.solid;
            let bounds = data.bounds();
            if self.grid.update(id, &record.last_bounds, &bounds) {
                record.last_bounds = bounds;
                moved += 1;
            }
        }

        for id in stale {
            self.remove_object(id);
        }
        tracing::trace!(moved, "collision positions updated");
        moved
    }

    /// Narrow phase over every collidable, firing enter/exit transitions.
    ///
    /// Candidates for each entity are its broad-phase neighbours plus its
    /// current touching set, so a partner that left every shared cell still
    /// produces its exit. Returns the number of unordered pairs evaluated.
    pub fn check_collisions(&mut self) -> usize {
        let ids: Vec<EntityId> = self.collidables.keys().copied().collect();
        let mut checked: HashSet<(EntityId, EntityId)> = HashSet::new();

        for a in ids {
            let Some(record) = self.collidables.get(&a) else {
                continue;
            };
            let bounds_a = record.last_bounds;
            let mut candidates = self.grid.query_overlap(&bounds_a);
            candidates.extend(record.touching.iter().copied());

            for b in candidates {
                if b == a || !checked.insert(EntityId::pair(a, b)) {
                    continue;
                }
                let Some(bounds_b) = self.collidables.get(&b).map(|c| c.last_bounds) else {
                    continue;
                };

                let is_touching = bounds_a.intersects(&bounds_b);
                let was_touching = self.is_touching(a, b);
                if is_touching && !was_touching {
                    self.link(a, b, true);
                    tracing::debug!(%a, %b, "collision enter");
                    self.listeners.emit(&CollisionEvent::enter(a, b));
                } else if !is_touching && was_touching {
                    self.link(a, b, false);
                    tracing::debug!(%a, %b, "collision exit");
                    self.listeners.emit(&CollisionEvent::exit(a, b));
                }
            }
        }

        tracing::trace!(pairs = checked.len(), "collision pass complete");
        checked.len()
    }

    fn link(&mut self, a: EntityId, b: EntityId, touching: bool) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(record) = self.collidables.get_mut(&from) {
                if touching {
                    record.touching.insert(to);
                } else {
                    record.touching.remove(&to);
                }
            }
        }
    }

    /// Run one frame: re-bucket, then check. Returns pairs evaluated.
    pub fn update(&mut self, world: &World) -> usize {
        let _span = tracing::info_span!("collision_update").entered();
        self.update_positions(world);
        self.check_collisions()
    }

    /// Entities whose current bounds overlap `id`'s current bounds, found
    /// through the grid. Stateless: touching sets are neither read nor written.
    pub fn potential_collisions(&self, world: &World, id: EntityId) -> Vec<EntityId> {
        query::potential_collisions(&self.grid, world, id)
    }

    /// Push `mover` out of `blocker` along the requested axes.
    pub fn resolve_solid_collision(
        &self,
        world: &mut World,
        mover: EntityId,
        blocker: EntityId,
        resolve_x: bool,
        resolve_y: bool,
    ) -> bool {
        resolve::resolve_solid_collision(world, mover, blocker, resolve_x, resolve_y)
    }

    /// Move `id` by `delta` one axis at a time, stopping at solid bodies.
    /// Returns the displacement actually applied.
    pub fn move_with_collisions(&self, world: &mut World, id: EntityId, delta: Vec2) -> Vec2 {
        resolve::move_axis_separated(world, id, delta, |world, id| {
            query::potential_collisions(&self.grid, world, id)
        })
    }
}
