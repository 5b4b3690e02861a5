//! Spatial hash grid: the broad phase shared by collision and visibility.
//!
//! # Invariants
//! - A handle is registered in a cell iff its bounds overlap that cell.
//! - Cells with no members are dropped; an empty grid holds no cells.
//! - Cell coordinates are clamped into the grid, never indexed out of range.
//!
//! The grid knows nothing about entities beyond an opaque handle and the
//! rectangle the caller supplies with every operation.

mod cell;
mod grid;

pub use cell::{CellCoord, CellRange};
pub use grid::{GridError, SpatialHashGrid};

pub fn crate_info() -> &'static str {
    "tessera-grid v0.1.0"
}
