use tessera_common::EntityId;
use tessera_grid::SpatialHashGrid;
use tessera_kernel::World;

/// Entities whose current bounds overlap `id`'s current bounds.
///
/// Broad phase through `grid`, then an exact rectangle test against the
/// world's current bounds. Excludes `id` itself and colliderless entities;
/// empty when `id` is missing or has no collider. Entities not re-bucketed
/// since they last moved are found under their old cells.
pub fn potential_collisions(
    grid: &SpatialHashGrid<EntityId>,
    world: &World,
    id: EntityId,
) -> Vec<EntityId> {
    let Some(bounds) = world
        .get(id)
        .filter(|data| data.collider.is_some())
        .map(|data| data.bounds())
    else {
        return Vec::new();
    };

    grid.query_overlap(&bounds)
        .into_iter()
        .filter(|&other| other != id)
        .filter(|&other| {
            world
                .get(other)
                .filter(|data| data.collider.is_some())
                .is_some_and(|data| data.bounds().intersects(&bounds))
        })
        .collect()
}
