use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use glam::Vec2;
use tessera_common::Rect;

use crate::cell::{CellCoord, CellRange};

/// Errors from grid construction. Every per-frame operation is infallible.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(f32),
    #[error("world extent must be non-negative and finite, got {width}x{height}")]
    InvalidWorldExtent { width: f32, height: f32 },
    #[error("grid of {width}x{height} cells is too large to index")]
    TooManyCells { width: usize, height: usize },
}

/// Uniform spatial hash over a bounded world.
///
/// The world is cut into square cells of `cell_size`; a handle is a member
/// of every cell its rectangle overlaps. Coordinates outside the world clamp
/// to the edge cells, so edge cells absorb anything past the border.
///
/// Dimensions are fixed at construction (`world / cell_size + 1` cells per
/// axis). Resizing means building a new grid and re-adding every handle.
#[derive(Debug, Clone)]
pub struct SpatialHashGrid<H> {
    cell_size: f32,
    world_width: f32,
    world_height: f32,
    grid_width: i32,
    grid_height: i32,
    cells: HashMap<usize, HashSet<H>>,
}

impl<H> SpatialHashGrid<H>
where
    H: Copy + Eq + Hash + Ord,
{
    /// Create an empty grid covering `world_width` x `world_height`.
    pub fn new(cell_size: f32, world_width: f32, world_height: f32) -> Result<Self, GridError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        if !(world_width.is_finite() && world_height.is_finite())
            || world_width < 0.0
            || world_height < 0.0
        {
            return Err(GridError::InvalidWorldExtent {
                width: world_width,
                height: world_height,
            });
        }

        let width = ((world_width / cell_size) as usize).saturating_add(1);
        let height = ((world_height / cell_size) as usize).saturating_add(1);
        let fits = i32::try_from(width).is_ok()
            && i32::try_from(height).is_ok()
            && width.checked_mul(height).is_some();
        if !fits {
            return Err(GridError::TooManyCells { width, height });
        }

        tracing::debug!(cell_size, width, height, "created spatial grid");
        Ok(Self {
            cell_size,
            world_width,
            world_height,
            grid_width: width as i32,
            grid_height: height as i32,
            cells: HashMap::new(),
        })
    }

    /// Cell size used for this grid.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of cell columns.
    pub fn grid_width(&self) -> i32 {
        self.grid_width
    }

    /// Number of cell rows.
    pub fn grid_height(&self) -> i32 {
        self.grid_height
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    /// Convert a world position to a clamped cell coordinate.
    pub fn world_to_cell(&self, x: f32, y: f32) -> CellCoord {
        CellCoord {
            x: ((x / self.cell_size).floor() as i32).clamp(0, self.grid_width - 1),
            y: ((y / self.cell_size).floor() as i32).clamp(0, self.grid_height - 1),
        }
    }

    fn cell_key(&self, coord: CellCoord) -> usize {
        coord.y as usize * self.grid_width as usize + coord.x as usize
    }

    /// Inclusive range of cells overlapped by `bounds`.
    pub fn cell_range(&self, bounds: &Rect) -> CellRange {
        CellRange::new(
            self.world_to_cell(bounds.left(), bounds.top()),
            self.world_to_cell(bounds.right(), bounds.bottom()),
        )
    }

    /// Every cell overlapped by `bounds`, row-major.
    pub fn cells_for(&self, bounds: &Rect) -> Vec<CellCoord> {
        self.cell_range(bounds).iter().collect()
    }

    /// World-space extent of a cell.
    pub fn cell_extent(&self, coord: CellCoord) -> Rect {
        Rect::new(
            coord.x as f32 * self.cell_size,
            coord.y as f32 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// Insert `handle` into every cell overlapped by `bounds`.
    pub fn add(&mut self, handle: H, bounds: &Rect) {
        for coord in self.cell_range(bounds).iter() {
            let key = self.cell_key(coord);
            self.cells.entry(key).or_default().insert(handle);
        }
    }

    /// Remove `handle` from every cell overlapped by `bounds`, which must be
    /// the bounds it was added with. Empty cells are discarded.
    pub fn remove(&mut self, handle: H, bounds: &Rect) {
        for coord in self.cell_range(bounds).iter() {
            let key = self.cell_key(coord);
            if let Some(cell) = self.cells.get_mut(&key) {
                cell.remove(&handle);
                if cell.is_empty() {
                    self.cells.remove(&key);
                }
            }
        }
    }

    /// Move `handle` from `old` to `new` bounds. Returns false (and leaves
    /// membership untouched) when the bounds are identical.
    pub fn update(&mut self, handle: H, old: &Rect, new: &Rect) -> bool {
        if old == new {
            return false;
        }
        self.remove(handle, old);
        self.add(handle, new);
        true
    }

    fn collect_range(&self, range: CellRange, mut keep: impl FnMut(H) -> bool) -> BTreeSet<H> {
        let mut result = BTreeSet::new();
        for coord in range.iter() {
            if let Some(cell) = self.cells.get(&self.cell_key(coord)) {
                result.extend(cell.iter().copied().filter(|h| keep(*h)));
            }
        }
        result
    }

    /// Broad-phase candidates: every handle sharing a cell with `bounds`.
    /// May contain false positives, never false negatives.
    pub fn query_overlap(&self, bounds: &Rect) -> BTreeSet<H> {
        self.collect_range(self.cell_range(bounds), |_| true)
    }

    /// Clamped cell rectangle covered by a viewport.
    pub fn viewport_cell_range(&self, top_left: Vec2, bottom_right: Vec2) -> CellRange {
        CellRange::new(
            self.world_to_cell(top_left.x, top_left.y),
            self.world_to_cell(bottom_right.x, bottom_right.y),
        )
    }

    /// Handles in the cells covered by a viewport, keeping only those
    /// `is_visible` accepts.
    pub fn query_viewport(
        &self,
        top_left: Vec2,
        bottom_right: Vec2,
        is_visible: impl Fn(H) -> bool,
    ) -> BTreeSet<H> {
        let viewport = Rect::from_corners(top_left, bottom_right);
        self.collect_range(self.cell_range(&viewport), is_visible)
    }

    /// Handles in an explicit cell range, clamped to the grid.
    pub fn query_cell_range(&self, min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> BTreeSet<H> {
        let range = CellRange::new(
            CellCoord::new(min_x.max(0), min_y.max(0)),
            CellCoord::new(
                max_x.min(self.grid_width - 1),
                max_y.min(self.grid_height - 1),
            ),
        );
        self.collect_range(range, |_| true)
    }

    /// Handles registered in a single cell.
    pub fn entities_in_cell(&self, coord: CellCoord) -> BTreeSet<H> {
        let inside =
            (0..self.grid_width).contains(&coord.x) && (0..self.grid_height).contains(&coord.y);
        if !inside {
            return BTreeSet::new();
        }
        self.cells
            .get(&self.cell_key(coord))
            .map(|cell| cell.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Discard every membership.
    pub fn clear(&mut self) {
        tracing::debug!(cells = self.cells.len(), "cleared spatial grid");
        self.cells.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of handle placements across all cells.
    pub fn total_placements(&self) -> usize {
        self.cells.values().map(|s| s.len()).sum()
    }
}
