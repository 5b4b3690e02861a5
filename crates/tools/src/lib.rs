//! Developer tooling: read-only views over the spatial manager for debug
//! overlays and the CLI.

mod inspector;
mod occupancy;

pub use inspector::{EntityInfo, SpatialInspector, SpatialSummary};
pub use occupancy::{OccupancyMap, occupancy};
