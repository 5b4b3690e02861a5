use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use glam::Vec2;
use serde::Serialize;
use tessera_collision::{CollisionEvent, CollisionListeners, ListenerId};
use tessera_common::{EntityId, EntityKind, Rect};
use tessera_grid::SpatialHashGrid;
use tessera_kernel::World;

use crate::config::{ConfigError, SpatialConfig};
use crate::timer::UpdateTimer;

/// Counters for on-screen debug overlays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerformanceInfo {
    pub total_objects: usize,
    /// Result size of the last visibility query.
    pub visible_objects: usize,
    /// Pair tests performed by the last restricted collision pass.
    pub collision_checks: usize,
    /// Wall-clock time of the last re-bucketing pass.
    pub update_time_ms: f32,
    pub average_update_ms: f32,
    pub peak_update_ms: f32,
}

#[derive(Debug, Clone, Default)]
struct FrameStats {
    visible_objects: usize,
    collision_checks: usize,
    update_time: Duration,
}

/// Grid shared between visibility culling and a collision pass scoped to
/// one primary entity.
///
/// Every registered entity is tracked for visibility. Only pairs of the
/// form (primary, other) are tracked for enter/exit, and only for others
/// inside a square window of half-extent `collision_radius` around the
/// primary's position.
#[derive(Debug)]
pub struct SpatialManager {
    config: SpatialConfig,
    grid: SpatialHashGrid<EntityId>,
    /// Bounds each entity is bucketed under.
    tracked: BTreeMap<EntityId, Rect>,
    primary: Option<EntityId>,
    /// Entities currently overlapping the primary.
    touching: BTreeSet<EntityId>,
    listeners: CollisionListeners,
    stats: FrameStats,
    timer: UpdateTimer,
}

impl SpatialManager {
    pub fn new(config: SpatialConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = SpatialHashGrid::new(config.cell_size, config.world_width, config.world_height)?;
        let timer = UpdateTimer::new(config.timer_window);
        Ok(Self {
            config,
            grid,
            tracked: BTreeMap::new(),
            primary: None,
            touching: BTreeSet::new(),
            listeners: CollisionListeners::new(),
            stats: FrameStats::default(),
            timer,
        })
    }

    pub fn config(&self) -> &SpatialConfig {
        &self.config
    }

    pub fn grid(&self) -> &SpatialHashGrid<EntityId> {
        &self.grid
    }

    pub fn cell_size(&self) -> f32 {
        self.grid.cell_size()
    }

    /// Start over with a new configuration: empty grid, nothing tracked,
    /// no primary. Listeners stay registered. On error nothing changes.
    pub fn initialize(&mut self, config: SpatialConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.grid =
            SpatialHashGrid::new(config.cell_size, config.world_width, config.world_height)?;
        self.timer = UpdateTimer::new(config.timer_window);
        self.config = config;
        self.tracked.clear();
        self.primary = None;
        self.touching.clear();
        self.stats = FrameStats::default();
        tracing::debug!(
            cell_size = self.config.cell_size,
            width = self.config.world_width,
            height = self.config.world_height,
            "spatial manager initialized"
        );
        Ok(())
    }

    /// Rebuild the grid for a new world extent and re-insert every tracked
    /// entity under its current bounds. Entities that left the world are
    /// dropped. On error the old grid is kept.
    pub fn resize(&mut self, world: &World, width: f32, height: f32) -> Result<(), ConfigError> {
        let config = self.config.clone().with_world(width, height);
        let mut grid = SpatialHashGrid::new(config.cell_size, width, height)?;

        let mut tracked = BTreeMap::new();
        for &id in self.tracked.keys() {
            if let Some(data) = world.get(id) {
                let bounds = data.bounds();
                grid.add(id, &bounds);
                tracked.insert(id, bounds);
            }
        }
        self.touching.retain(|id| tracked.contains_key(id));

        tracing::debug!(width, height, entities = tracked.len(), "spatial grid resized");
        self.grid = grid;
        self.tracked = tracked;
        self.config = config;
        Ok(())
    }

    /// Forget every tracked entity. Configuration and listeners are kept.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.tracked.clear();
        self.primary = None;
        self.touching.clear();
    }

    /// Choose the entity the collision pass is centred on. Touching state
    /// of the previous primary is discarded without exit events.
    pub fn set_primary(&mut self, id: Option<EntityId>) {
        if self.primary != id {
            self.touching.clear();
            self.primary = id;
        }
    }

    pub fn primary(&self) -> Option<EntityId> {
        self.primary
    }

    /// Start tracking an entity. Tiles without a collider are terrain and
    /// are never tracked. Returns false when skipped, missing, or already
    /// tracked.
    pub fn add_object(&mut self, world: &World, id: EntityId) -> bool {
        let Some(data) = world.get(id) else {
            return false;
        };
        if data.kind == EntityKind::Tile && data.collider.is_none() {
            return false;
        }
        if self.tracked.contains_key(&id) {
            return false;
        }
        let bounds = data.bounds();
        self.grid.add(id, &bounds);
        self.tracked.insert(id, bounds);
        tracing::debug!(%id, %bounds, "tracking entity");
        true
    }

    /// Stop tracking an entity. No exit event fires for a removed partner.
    /// Removing the primary exits every partner, then clears the primary.
    /// Idempotent.
    pub fn remove_object(&mut self, id: EntityId) -> bool {
        let Some(bounds) = self.tracked.remove(&id) else {
            return false;
        };
        self.grid.remove(id, &bounds);
        self.touching.remove(&id);
        if self.primary == Some(id) {
            self.release_all();
            self.primary = None;
        }
        tracing::debug!(%id, "untracked entity");
        true
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.tracked.contains_key(&id)
    }

    /// Bounds `id` is currently bucketed under.
    pub fn tracked_bounds(&self, id: EntityId) -> Option<Rect> {
        self.tracked.get(&id).copied()
    }

    /// Entities currently overlapping the primary.
    pub fn touching(&self) -> &BTreeSet<EntityId> {
        &self.touching
    }

    pub fn is_touching(&self, id: EntityId) -> bool {
        self.touching.contains(&id)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&CollisionEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn on_enter(&mut self, listener: impl FnMut(EntityId, EntityId) + 'static) -> ListenerId {
        self.listeners.on_enter(listener)
    }

    pub fn on_exit(&mut self, listener: impl FnMut(EntityId, EntityId) + 'static) -> ListenerId {
        self.listeners.on_exit(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Re-bucket every tracked entity whose bounds changed. Entities that
    /// left the world are untracked. Returns the number re-bucketed.
    pub fn update_positions(&mut self, world: &World) -> usize {
        let start = Instant::now();
        let mut moved = 0;
        let mut stale = Vec::new();

        for (&id, last) in &mut self.tracked {
            let Some(data) = world.get(id) else {
                stale.push(id);
                continue;
            };
            let bounds = data.bounds();
            if self.grid.update(id, last, &bounds) {
                *last = bounds;
                moved += 1;
            }
        }
        for id in stale {
            self.remove_object(id);
        }

        let elapsed = start.elapsed();
        self.stats.update_time = elapsed;
        self.timer.record(elapsed);
        tracing::trace!(moved, elapsed_us = elapsed.as_micros() as u64, "positions updated");
        moved
    }

    /// Enter/exit bookkeeping between the primary and its neighbourhood.
    ///
    /// Candidates are the grid entries around the primary's position plus
    /// its current touching set. A candidate whose bounds centre lies
    /// farther than the radius, or whose bounds clearly miss, counts as
    /// separated without a check. Returns the number of pair checks.
    pub fn update_collisions(&mut self, world: &World) -> usize {
        let Some((primary, data)) = self
            .primary
            .and_then(|id| world.get(id).map(|data| (id, data)))
            .filter(|(_, data)| data.collider.is_some())
        else {
            self.release_all();
            self.stats.collision_checks = 0;
            return 0;
        };

        let center = data.position();
        let radius = self.config.collision_radius;
        let own = data.bounds();

        let mut candidates = self.grid.query_overlap(&Rect::around(center, radius));
        candidates.extend(self.touching.iter().copied());

        let mut checks = 0;
        for other in candidates {
            if other == primary {
                continue;
            }
            let is_touching = match world.get(other).filter(|d| d.collider.is_some()) {
                Some(candidate) => {
                    let bounds = candidate.bounds();
                    let near = within_radius(center, bounds.center(), radius);
                    if near && !clearly_apart(&own, &bounds) {
                        checks += 1;
                        own.intersects(&bounds)
                    } else {
                        false
                    }
                }
                None => false,
            };

            let was_touching = self.touching.contains(&other);
            if is_touching && !was_touching {
                self.touching.insert(other);
                tracing::debug!(%primary, %other, "collision enter");
                self.listeners.emit(&CollisionEvent::enter(primary, other));
            } else if !is_touching && was_touching {
                self.touching.remove(&other);
                tracing::debug!(%primary, %other, "collision exit");
                self.listeners.emit(&CollisionEvent::exit(primary, other));
            }
        }

        self.stats.collision_checks = checks;
        tracing::trace!(%primary, checks, touching = self.touching.len(), "collision pass");
        checks
    }

    /// Exit every partner of a primary that can no longer collide.
    fn release_all(&mut self) {
        let Some(primary) = self.primary else {
            self.touching.clear();
            return;
        };
        for other in std::mem::take(&mut self.touching) {
            tracing::debug!(%primary, %other, "collision exit");
            self.listeners.emit(&CollisionEvent::exit(primary, other));
        }
    }

    /// Re-bucket then run the collision pass. Returns the pair checks.
    pub fn update(&mut self, world: &World) -> usize {
        let _span = tracing::info_span!("spatial_update").entered();
        self.update_positions(world);
        self.update_collisions(world)
    }

    /// Visible tracked entities in the cells covered by the viewport,
    /// sorted by id. Updates the visible counter.
    pub fn visible_objects(
        &mut self,
        world: &World,
        top_left: Vec2,
        bottom_right: Vec2,
    ) -> Vec<EntityId> {
        let visible: Vec<EntityId> = self
            .grid
            .query_viewport(top_left, bottom_right, |id| {
                world.get(id).is_some_and(|data| data.visible)
            })
            .into_iter()
            .collect();
        self.stats.visible_objects = visible.len();
        visible
    }

    /// Entities to update this frame: the visible set plus every live
    /// entity of `always`, sorted and deduplicated.
    pub fn visible_or_always(
        &mut self,
        world: &World,
        top_left: Vec2,
        bottom_right: Vec2,
        always: &[EntityId],
    ) -> Vec<EntityId> {
        let mut set: BTreeSet<EntityId> = self
            .visible_objects(world, top_left, bottom_right)
            .into_iter()
            .collect();
        set.extend(always.iter().copied().filter(|&id| world.get(id).is_some()));
        set.into_iter().collect()
    }

    /// Exact overlaps with `id`, through the shared grid. Stateless.
    pub fn potential_collisions(&self, world: &World, id: EntityId) -> Vec<EntityId> {
        tessera_collision::potential_collisions(&self.grid, world, id)
    }

    pub fn resolve_solid_collision(
        &self,
        world: &mut World,
        mover: EntityId,
        blocker: EntityId,
        resolve_x: bool,
        resolve_y: bool,
    ) -> bool {
        tessera_collision::resolve_solid_collision(world, mover, blocker, resolve_x, resolve_y)
    }

    /// Move `id` by `delta` one axis at a time, stopping at solid bodies.
    /// Returns the displacement actually applied.
    pub fn move_with_collisions(&self, world: &mut World, id: EntityId, delta: Vec2) -> Vec2 {
        tessera_collision::move_axis_separated(world, id, delta, |world, id| {
            tessera_collision::potential_collisions(&self.grid, world, id)
        })
    }

    pub fn performance(&self) -> PerformanceInfo {
        PerformanceInfo {
            total_objects: self.tracked.len(),
            visible_objects: self.stats.visible_objects,
            collision_checks: self.stats.collision_checks,
            update_time_ms: self.stats.update_time.as_secs_f32() * 1000.0,
            average_update_ms: self.timer.average_ms(),
            peak_update_ms: self.timer.peak_ms(),
        }
    }

    pub fn timer(&self) -> &UpdateTimer {
        &self.timer
    }
}

fn within_radius(center: Vec2, point: Vec2, radius: f32) -> bool {
    center.distance_squared(point) <= radius * radius
}

fn clearly_apart(a: &Rect, b: &Rect) -> bool {
    a.right() < b.left() || b.right() < a.left() || a.bottom() < b.top() || b.bottom() < a.top()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use proptest::prelude::*;
    use tessera_collision::CollisionEventKind;
    use tessera_common::Collider;
    use tessera_kernel::EntityData;

    fn manager() -> SpatialManager {
        SpatialManager::new(SpatialConfig {
            world_width: 640.0,
            world_height: 640.0,
            ..SpatialConfig::default()
        })
        .unwrap()
    }

    fn body(x: f32, y: f32) -> EntityData {
        EntityData::actor(x, y).with_collider(Collider::sized(10.0, 10.0))
    }

    fn record(manager: &mut SpatialManager) -> Rc<RefCell<Vec<CollisionEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        manager.subscribe(move |event| sink.borrow_mut().push(*event));
        log
    }

    #[test]
    fn tiles_without_colliders_are_not_tracked() {
        let mut world = World::new();
        let floor = world.spawn(EntityData::tile(0.0, 0.0));
        let wall = world.spawn(
            EntityData::tile(16.0, 0.0).with_collider(Collider::sized(16.0, 16.0).solid()),
        );
        let npc = world.spawn(EntityData::actor(40.0, 0.0));

        let mut m = manager();
        assert!(!m.add_object(&world, floor));
        assert!(m.add_object(&world, wall));
        assert!(m.add_object(&world, npc));
        assert!(!m.add_object(&world, npc));
        assert!(!m.add_object(&world, EntityId(99)));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn primary_enter_then_exit() {
        let mut world = World::new();
        let player = world.spawn(body(100.0, 100.0));
        let crate_ = world.spawn(body(130.0, 100.0));

        let mut m = manager();
        m.add_object(&world, player);
        m.add_object(&world, crate_);
        m.set_primary(Some(player));
        let log = record(&mut m);

        m.update(&world);
        assert!(log.borrow().is_empty());

        world.set_position(crate_, Vec2::new(105.0, 100.0));
        m.update(&world);
        assert_eq!(*log.borrow(), vec![CollisionEvent::enter(player, crate_)]);
        assert!(m.is_touching(crate_));

        m.update(&world);
        assert_eq!(log.borrow().len(), 1);

        world.set_position(crate_, Vec2::new(130.0, 100.0));
        m.update(&world);
        assert_eq!(log.borrow()[1], CollisionEvent::exit(player, crate_));
        assert!(m.touching().is_empty());
    }

    #[test]
    fn only_window_candidates_are_checked() {
        let mut world = World::new();
        let player = world.spawn(body(300.0, 300.0));
        let near = world.spawn(body(305.0, 305.0));
        let beside = world.spawn(body(340.0, 300.0));
        let far = world.spawn(body(600.0, 600.0));
        let far_pair = world.spawn(body(602.0, 602.0));

        let mut m = manager();
        for id in [player, near, beside, far, far_pair] {
            m.add_object(&world, id);
        }
        m.set_primary(Some(player));
        let checks = m.update(&world);

        // `beside` is in the window but clearly apart; the far pair overlaps
        // each other but is never considered.
        assert_eq!(checks, 1);
        assert_eq!(m.touching().iter().copied().collect::<Vec<_>>(), vec![near]);
        assert_eq!(m.performance().collision_checks, 1);
    }

    #[test]
    fn partner_leaving_window_fires_exit() {
        let mut world = World::new();
        let player = world.spawn(body(100.0, 100.0));
        let other = world.spawn(body(104.0, 100.0));

        let mut m = manager();
        m.add_object(&world, player);
        m.add_object(&world, other);
        m.set_primary(Some(player));
        let log = record(&mut m);
        m.update(&world);
        assert!(m.is_touching(other));

        world.set_position(other, Vec2::new(500.0, 500.0));
        m.update(&world);
        let events = log.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, CollisionEventKind::Exit);
        assert!(m.touching().is_empty());
    }

    #[test]
    fn primary_without_collider_checks_nothing() {
        let mut world = World::new();
        let player = world.spawn(EntityData::actor(100.0, 100.0));
        let other = world.spawn(body(100.0, 100.0));
        let mut m = manager();
        m.add_object(&world, player);
        m.add_object(&world, other);

        assert_eq!(m.update(&world), 0);
        m.set_primary(Some(player));
        assert_eq!(m.update(&world), 0);
        assert!(m.touching().is_empty());
    }

    #[test]
    fn losing_collider_releases_partners() {
        let mut world = World::new();
        let player = world.spawn(body(100.0, 100.0));
        let other = world.spawn(body(102.0, 100.0));
        let mut m = manager();
        m.add_object(&world, player);
        m.add_object(&world, other);
        m.set_primary(Some(player));
        let log = record(&mut m);
        m.update(&world);

        world.get_mut(player).unwrap().collider = None;
        m.update(&world);
        assert_eq!(log.borrow().last(), Some(&CollisionEvent::exit(player, other)));
        assert!(m.touching().is_empty());
    }

    #[test]
    fn removal_scrubs_touching_without_exit() {
        let mut world = World::new();
        let player = world.spawn(body(100.0, 100.0));
        let other = world.spawn(body(102.0, 100.0));
        let mut m = manager();
        m.add_object(&world, player);
        m.add_object(&world, other);
        m.set_primary(Some(player));
        let log = record(&mut m);
        m.update(&world);
        assert_eq!(log.borrow().len(), 1);

        assert!(m.remove_object(other));
        assert!(!m.remove_object(other));
        world.despawn(other);
        m.update(&world);
        assert_eq!(log.borrow().len(), 1);
        assert!(m.touching().is_empty());
        let everyone = m.grid().query_overlap(&Rect::new(0.0, 0.0, 640.0, 640.0));
        assert_eq!(everyone.len(), 1);
        assert!(m.potential_collisions(&world, player).is_empty());
    }

    #[test]
    fn despawned_primary_exits_its_partners() {
        let mut world = World::new();
        let player = world.spawn(body(100.0, 100.0));
        let other = world.spawn(body(102.0, 100.0));
        let mut m = manager();
        m.add_object(&world, player);
        m.add_object(&world, other);
        m.set_primary(Some(player));
        let log = record(&mut m);
        m.update(&world);

        world.despawn(player);
        m.update(&world);
        assert_eq!(
            *log.borrow(),
            vec![
                CollisionEvent::enter(player, other),
                CollisionEvent::exit(player, other)
            ]
        );
        assert!(m.primary().is_none());
        assert!(m.touching().is_empty());
    }

    #[test]
    fn removed_primary_exits_its_partners() {
        let mut world = World::new();
        let player = world.spawn(body(100.0, 100.0));
        let other = world.spawn(body(102.0, 100.0));
        let mut m = manager();
        m.add_object(&world, player);
        m.add_object(&world, other);
        m.set_primary(Some(player));
        let log = record(&mut m);
        m.update(&world);

        assert!(m.remove_object(player));
        assert_eq!(log.borrow().last(), Some(&CollisionEvent::exit(player, other)));
        assert_eq!(log.borrow().len(), 2);
        m.update(&world);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn tile_with_collider_joins_restricted_pass() {
        let mut world = World::new();
        let player = world.spawn(body(100.0, 100.0));
        let wall = world.spawn(
            EntityData::tile(120.0, 100.0).with_collider(Collider::sized(16.0, 16.0).solid()),
        );
        let floor = world.spawn(EntityData::tile(100.0, 100.0));
        let mut m = manager();
        for id in [player, wall, floor] {
            m.add_object(&world, id);
        }
        m.set_primary(Some(player));
        let log = record(&mut m);

        assert_eq!(m.update(&world), 0);
        world.set_position(player, Vec2::new(115.0, 100.0));
        assert_eq!(m.update(&world), 1);
        assert!(m.is_touching(wall));
        world.set_position(player, Vec2::new(80.0, 100.0));
        m.update(&world);
        assert_eq!(
            *log.borrow(),
            vec![CollisionEvent::enter(player, wall), CollisionEvent::exit(player, wall)]
        );
        assert!(!m.contains(floor));
    }

    #[test]
    fn despawned_entities_are_untracked_on_update() {
        let mut world = World::new();
        let a = world.spawn(body(10.0, 10.0));
        let mut m = manager();
        m.add_object(&world, a);
        world.despawn(a);
        m.update_positions(&world);
        assert!(m.is_empty());
        assert!(m.grid().is_empty());
    }

    #[test]
    fn visibility_filters_hidden_and_counts() {
        let mut world = World::new();
        let shown = world.spawn(EntityData::actor(10.0, 10.0));
        let hidden = world.spawn(EntityData::actor(20.0, 20.0).hidden());
        let offscreen = world.spawn(EntityData::actor(500.0, 500.0));
        let mut m = manager();
        for id in [shown, hidden, offscreen] {
            m.add_object(&world, id);
        }

        let visible = m.visible_objects(&world, Vec2::ZERO, Vec2::new(100.0, 100.0));
        assert_eq!(visible, vec![shown]);
        assert_eq!(m.performance().visible_objects, 1);

        let always = [offscreen, EntityId(77)];
        let update = m.visible_or_always(&world, Vec2::ZERO, Vec2::new(100.0, 100.0), &always);
        assert_eq!(update, vec![shown, offscreen]);
    }

    #[test]
    fn resize_reinserts_current_bounds() {
        let mut world = World::new();
        let a = world.spawn(body(100.0, 100.0));
        let b = world.spawn(body(200.0, 200.0));
        let mut m = manager();
        m.add_object(&world, a);
        m.add_object(&world, b);

        world.set_position(a, Vec2::new(1500.0, 1500.0));
        world.despawn(b);
        m.resize(&world, 2000.0, 2000.0).unwrap();

        assert_eq!(m.config().world_width, 2000.0);
        assert_eq!(m.len(), 1);
        assert_eq!(m.tracked_bounds(a), Some(Rect::new(1500.0, 1500.0, 10.0, 10.0)));
        let found = m.grid().query_overlap(&Rect::new(1490.0, 1490.0, 30.0, 30.0));
        assert!(found.contains(&a));
    }

    #[test]
    fn failed_resize_keeps_old_grid() {
        let mut world = World::new();
        let a = world.spawn(body(100.0, 100.0));
        let mut m = manager();
        m.add_object(&world, a);
        assert!(m.resize(&world, -5.0, 100.0).is_err());
        assert_eq!(m.config().world_width, 640.0);
        assert!(m.contains(a));
        assert!(!m.grid().is_empty());
    }

    #[test]
    fn initialize_and_clear_forget_entities() {
        let mut world = World::new();
        let a = world.spawn(body(100.0, 100.0));
        let mut m = manager();
        m.add_object(&world, a);
        m.set_primary(Some(a));
        m.clear();
        assert!(m.is_empty() && m.primary().is_none());

        m.add_object(&world, a);
        let config = SpatialConfig {
            cell_size: 32.0,
            ..SpatialConfig::default()
        };
        m.initialize(config).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.cell_size(), 32.0);
        let broken = SpatialConfig {
            timer_window: 0,
            ..SpatialConfig::default()
        };
        assert!(m.initialize(broken).is_err());
        assert_eq!(m.cell_size(), 32.0);
    }

    #[test]
    fn performance_tracks_objects_and_time() {
        let mut world = World::new();
        let mut m = manager();
        for i in 0..5 {
            let id = world.spawn(body(i as f32 * 40.0, 0.0));
            m.add_object(&world, id);
        }
        m.update(&world);
        m.update(&world);
        let perf = m.performance();
        assert_eq!(perf.total_objects, 5);
        assert_eq!(m.timer().count(), 2);
        assert!(perf.update_time_ms >= 0.0);
        assert!(perf.peak_update_ms >= perf.average_update_ms);
    }

    #[test]
    fn move_with_collisions_uses_shared_grid() {
        let mut world = World::new();
        let player = world.spawn(body(0.0, 0.0));
        let wall = world.spawn(
            EntityData::actor(20.0, 0.0).with_collider(Collider::sized(10.0, 40.0).solid()),
        );
        let mut m = manager();
        m.add_object(&world, player);
        m.add_object(&world, wall);

        let moved = m.move_with_collisions(&mut world, player, Vec2::new(15.0, 5.0));
        assert_eq!(moved, Vec2::new(10.0, 5.0));
        assert_eq!(world.bounds(player).unwrap().right(), 20.0);
    }

    proptest! {
        #[test]
        fn touching_matches_exact_overlaps_near_primary(
            frames in proptest::collection::vec(
                proptest::collection::vec((0.0f32..60.0, 0.0f32..60.0), 6),
                1..5,
            )
        ) {
            let mut world = World::new();
            let player = world.spawn(body(100.0, 100.0));
            let others: Vec<EntityId> = (0..6).map(|_| world.spawn(body(0.0, 0.0))).collect();
            let mut m = manager();
            m.add_object(&world, player);
            for &id in &others {
                m.add_object(&world, id);
            }
            m.set_primary(Some(player));

            for positions in frames {
                for (&id, &(x, y)) in others.iter().zip(&positions) {
                    world.set_position(id, Vec2::new(70.0 + x, 70.0 + y));
                }
                m.update(&world);
                let expected: BTreeSet<EntityId> =
                    m.potential_collisions(&world, player).into_iter().collect();
                prop_assert_eq!(m.touching(), &expected);
            }
        }
    }
}
