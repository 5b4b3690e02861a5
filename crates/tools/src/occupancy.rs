use std::fmt;

use tessera_grid::{CellCoord, SpatialHashGrid};

/// Per-cell membership counts, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyMap {
    pub width: usize,
    pub height: usize,
    pub counts: Vec<usize>,
}

/// Snapshot of how many handles each cell holds.
pub fn occupancy<H>(grid: &SpatialHashGrid<H>) -> OccupancyMap
where
    H: Copy + Eq + std::hash::Hash + Ord,
{
    let width = grid.grid_width().max(0) as usize;
    let height = grid.grid_height().max(0) as usize;
    let mut counts = Vec::with_capacity(width * height);
    for y in 0..grid.grid_height() {
        for x in 0..grid.grid_width() {
            counts.push(grid.entities_in_cell(CellCoord::new(x, y)).len());
        }
    }
    OccupancyMap {
        width,
        height,
        counts,
    }
}

impl OccupancyMap {
    pub fn get(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.counts.get(y * self.width + x).copied()
    }

    pub fn busiest(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn occupied(&self) -> usize {
        self.counts.iter().filter(|&&n| n > 0).count()
    }
}

/// `.` for empty cells, the count for 1..=9, `+` above that.
impl fmt::Display for OccupancyMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.counts.chunks(self.width.max(1)) {
            let line: String = row
                .iter()
                .map(|&n| match n {
                    0 => '.',
                    1..=9 => char::from(b'0' + n as u8),
                    _ => '+',
                })
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
