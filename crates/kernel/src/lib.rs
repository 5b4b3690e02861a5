//! World Kernel: authoritative entity state consumed by the spatial engine.
//!
//! # Invariants
//! - Entity ids are assigned in increasing order and never reused.
//! - Bounds are always derived through [`EntityData::bounds`].

pub mod world;

pub use world::{EntityData, World};
