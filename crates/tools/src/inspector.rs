use std::fmt;

use tessera_common::{EntityId, Rect};
use tessera_grid::CellCoord;
use tessera_kernel::World;
use tessera_spatial::SpatialManager;

/// Read-only queries against a spatial manager, for debug overlays.
pub struct SpatialInspector;

impl SpatialInspector {
    /// Counters plus grid occupancy, one line when displayed.
    pub fn summary(manager: &SpatialManager) -> SpatialSummary {
        let perf = manager.performance();
        SpatialSummary {
            objects: perf.total_objects,
            visible: perf.visible_objects,
            checks: perf.collision_checks,
            update_ms: perf.update_time_ms,
            average_ms: perf.average_update_ms,
            peak_ms: perf.peak_update_ms,
            cells: manager.grid().cell_count(),
            placements: manager.grid().total_placements(),
            touching: manager.touching().len(),
        }
    }

    /// Where the manager has `id` bucketed and what it is touching.
    pub fn inspect_entity(
        world: &World,
        manager: &SpatialManager,
        id: EntityId,
    ) -> Option<EntityInfo> {
        let bounds = manager.tracked_bounds(id)?;
        let data = world.get(id);
        Some(EntityInfo {
            id,
            bounds,
            cells: manager.grid().cells_for(&bounds),
            solid: data.is_some_and(|d| d.is_solid()),
            primary: manager.primary() == Some(id),
            touching: manager.primary() != Some(id) && manager.is_touching(id),
            overlaps: manager.potential_collisions(world, id),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpatialSummary {
    pub objects: usize,
    pub visible: usize,
    pub checks: usize,
    pub update_ms: f32,
    pub average_ms: f32,
    pub peak_ms: f32,
    /// Non-empty grid cells.
    pub cells: usize,
    pub placements: usize,
    /// Partners of the primary.
    pub touching: usize,
}

impl fmt::Display for SpatialSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "objects={} visible={} checks={} touching={} update={:.3}ms (avg {:.3}, peak {:.3}) cells={} placements={}",
            self.objects,
            self.visible,
            self.checks,
            self.touching,
            self.update_ms,
            self.average_ms,
            self.peak_ms,
            self.cells,
            self.placements,
        )
    }
}

/// One tracked entity as the manager sees it.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub bounds: Rect,
    pub cells: Vec<CellCoord>,
    pub solid: bool,
    pub primary: bool,
    /// Currently overlapping the primary.
    pub touching: bool,
    /// Exact overlaps found through the grid right now.
    pub overlaps: Vec<EntityId>,
}

impl fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} cells={}", self.id, self.bounds, self.cells.len())?;
        if self.primary {
            write!(f, " primary")?;
        }
        if self.solid {
            write!(f, " solid")?;
        }
        if self.touching {
            write!(f, " touching")?;
        }
        if !self.overlaps.is_empty() {
            let ids: Vec<String> = self.overlaps.iter().map(ToString::to_string).collect();
            write!(f, " overlaps=[{}]", ids.join(", "))?;
        }
        Ok(())
    }
}
