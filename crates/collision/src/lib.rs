//! Collision registry: narrow phase, enter/exit transitions, push-out.
//!
//! # Invariants
//! - After `check_collisions`, every collidable's touching set equals the set
//!   of other collidables whose bounds overlap its bounds.
//! - Touching sets are symmetric; removal scrubs every reverse reference.
//! - A given unordered pair is evaluated at most once per pass.

mod events;
mod query;
mod registry;
mod resolve;

pub use events::{CollisionEvent, CollisionEventKind, CollisionListeners, ListenerId};
pub use query::potential_collisions;
pub use registry::{Collidable, CollisionRegistry};
pub use resolve::{first_solid_overlap, move_axis_separated, overlapping, resolve_solid_collision};
