use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// Collision footprint shape. Circles are indexed and tested through their
/// enclosing square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ColliderShape {
    Box { size: Vec2 },
    Circle { radius: f32 },
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::Box { size: Vec2::ONE }
    }
}

/// Collider attached to an entity. Its presence opts the entity into
/// collision; `solid` additionally makes it block movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    #[serde(flatten)]
    pub shape: ColliderShape,
    #[serde(default)]
    pub offset: Vec2,
    #[serde(default)]
    pub solid: bool,
}

impl Collider {
    /// Box collider of the given size with no offset.
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            shape: ColliderShape::Box {
                size: Vec2::new(width, height),
            },
            ..Self::default()
        }
    }

    pub fn circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn solid(mut self) -> Self {
        self.solid = true;
        self
    }

    /// Extent of the collider's bounding rectangle.
    pub fn extent(&self) -> Vec2 {
        match self.shape {
            ColliderShape::Box { size } => size,
            ColliderShape::Circle { radius } => Vec2::splat(radius * 2.0),
        }
    }

    /// Offset from `position + offset - anchor` to the rectangle origin.
    fn shape_shift(&self) -> Vec2 {
        match self.shape {
            ColliderShape::Box { .. } => Vec2::ZERO,
            ColliderShape::Circle { radius } => Vec2::splat(-radius),
        }
    }

    /// World-space bounds for an entity at `position` drawn around `anchor`.
    ///
    /// This is the only place bounds are derived from position; every index
    /// and query goes through it.
    pub fn bounds(&self, position: Vec2, anchor: Vec2) -> Rect {
        let origin = position + self.offset - anchor + self.shape_shift();
        let extent = self.extent();
        Rect::new(origin.x, origin.y, extent.x, extent.y)
    }

    /// Inverse of [`Collider::bounds`]: the position that puts the bounds
    /// origin at `origin`.
    pub fn position_for_origin(&self, origin: Vec2, anchor: Vec2) -> Vec2 {
        origin - self.shape_shift() - self.offset + anchor
    }
}
