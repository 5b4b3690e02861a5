//! Shared types for the tessera spatial engine.
//!
//! # Invariants
//! - Entity identity is a monotonically assigned integer, totally ordered.
//! - Bounds are derived from position through [`Collider::bounds`] only.

mod collider;
mod rect;
mod types;

pub use collider::{Collider, ColliderShape};
pub use rect::Rect;
pub use types::{EntityId, EntityKind, Transform};

/// Footprint used for entities that carry no collider (visibility only).
pub const DEFAULT_FOOTPRINT: f32 = 16.0;
