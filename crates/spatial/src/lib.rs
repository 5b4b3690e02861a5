//! One grid shared by visibility culling and a collision pass restricted to
//! a window around a primary entity.
//!
//! Per frame: [`SpatialManager::update_positions`], then
//! [`SpatialManager::update_collisions`], then render-time
//! [`SpatialManager::visible_objects`]. [`SpatialManager::update`] runs the
//! first two.

mod config;
mod manager;
mod timer;

pub use config::{ConfigError, SpatialConfig};
pub use manager::{PerformanceInfo, SpatialManager};
pub use timer::UpdateTimer;
