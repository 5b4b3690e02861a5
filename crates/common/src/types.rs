use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in the world.
///
/// Ids are handed out in increasing order by the world and never reused, so
/// the derived `Ord` is a stable total order (used to key unordered pairs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Order a pair so `(a, b)` and `(b, a)` produce the same key.
    pub fn pair(a: EntityId, b: EntityId) -> (EntityId, EntityId) {
        if a <= b { (a, b) } else { (b, a) }
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 2D placement: world position plus the anchor subtracted from it when
/// drawing and when deriving bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub anchor: Vec2,
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            anchor: Vec2::ZERO,
        }
    }
}

/// Coarse entity category. Background tiles are indexed for visibility but
/// are left out of the restricted collision pass unless they carry a collider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[default]
    Actor,
    Tile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_order_independent() {
        let a = EntityId(3);
        let b = EntityId(9);
        assert_eq!(EntityId::pair(a, b), EntityId::pair(b, a));
        assert_eq!(EntityId::pair(b, a), (a, b));
    }

    #[test]
    fn transform_default_is_origin() {
        let t = Transform::default();
        assert_eq!(t.position, Vec2::ZERO);
        assert_eq!(t.anchor, Vec2::ZERO);
    }

    #[test]
    fn display_entity_id() {
        assert_eq!(EntityId(42).to_string(), "#42");
    }
}
