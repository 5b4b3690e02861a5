//! Positional push-out for solid bodies.
//!
//! No velocity is involved: resolution only moves the mover so its bounds
//! stop overlapping the blocker along the requested axes.

use glam::Vec2;
use tessera_common::EntityId;
use tessera_kernel::{EntityData, World};

/// Push `mover` out of `blocker` along the requested axes.
///
/// Along X the mover ends flush with the blocker's left edge when it starts
/// to the left of it, otherwise flush with the right edge; Y works the same
/// with top and bottom. The new bounds origin is mapped back to a position
/// through the collider's inverse transform. Returns false (and moves
/// nothing) when either entity is missing or has no collider.
pub fn resolve_solid_collision(
    world: &mut World,
    mover: EntityId,
    blocker: EntityId,
    resolve_x: bool,
    resolve_y: bool,
) -> bool {
    let (Some(m), Some(b)) = (world.get(mover), world.get(blocker)) else {
        return false;
    };
    let (Some(collider), true) = (m.collider, b.collider.is_some()) else {
        return false;
    };

    let mover_bounds = m.bounds();
    let blocker_bounds = b.bounds();
    let anchor = m.transform.anchor;
    let mut origin = mover_bounds.origin();

    if resolve_x {
        origin.x = if mover_bounds.left() < blocker_bounds.left() {
            blocker_bounds.left() - mover_bounds.width
        } else {
            blocker_bounds.right()
        };
    }
    if resolve_y {
        origin.y = if mover_bounds.top() < blocker_bounds.top() {
            blocker_bounds.top() - mover_bounds.height
        } else {
            blocker_bounds.bottom()
        };
    }

    // Only the resolved components are written back, so the untouched axis
    // keeps its exact value.
    let solved = collider.position_for_origin(origin, anchor);
    let mut position = m.position();
    if resolve_x {
        position.x = solved.x;
    }
    if resolve_y {
        position.y = solved.y;
    }
    tracing::trace!(%mover, %blocker, resolve_x, resolve_y, ?position, "resolved solid collision");
    world.set_position(mover, position)
}

/// Exact overlap between two entities' current bounds. False if either is
/// missing or has no collider.
pub fn overlapping(world: &World, a: EntityId, b: EntityId) -> bool {
    match (world.get(a), world.get(b)) {
        (Some(da), Some(db)) if da.collider.is_some() && db.collider.is_some() => {
            da.bounds().intersects(&db.bounds())
        }
        _ => false,
    }
}

/// First solid entity among `candidates` (in order) that overlaps `id`.
pub fn first_solid_overlap(
    world: &World,
    id: EntityId,
    candidates: impl IntoIterator<Item = EntityId>,
) -> Option<EntityId> {
    candidates.into_iter().find(|other| {
        *other != id
            && world.get(*other).is_some_and(EntityData::is_solid)
            && overlapping(world, id, *other)
    })
}

/// Axis-separated movement: apply `delta.x` and resolve X against the first
/// solid overlap, then apply `delta.y` and resolve Y. `candidates` supplies
/// the broad phase for the mover's current bounds. Returns the displacement
/// actually applied.
pub fn move_axis_separated<F>(
    world: &mut World,
    id: EntityId,
    delta: Vec2,
    mut candidates: F,
) -> Vec2
where
    F: FnMut(&World, EntityId) -> Vec<EntityId>,
{
    let Some(start) = world.get(id).map(EntityData::position) else {
        return Vec2::ZERO;
    };

    world.translate(id, Vec2::new(delta.x, 0.0));
    let found = candidates(&*world, id);
    if let Some(blocker) = first_solid_overlap(world, id, found) {
        resolve_solid_collision(world, id, blocker, true, false);
    }

    world.translate(id, Vec2::new(0.0, delta.y));
    let found = candidates(&*world, id);
    if let Some(blocker) = first_solid_overlap(world, id, found) {
        resolve_solid_collision(world, id, blocker, false, true);
    }

    world
        .get(id)
        .map(|data| data.position() - start)
        .unwrap_or(Vec2::ZERO)
}
