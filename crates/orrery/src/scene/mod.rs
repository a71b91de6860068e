//! Scene management
//!
//! The entity hierarchy (an arena of bodies keyed by [`EntityId`]) and the
//! per-frame composition of world transforms.
//!
//! ```text
//! Hierarchy (local state)
//!      ↓  compose, pre-order
//! WorldTransforms (derived, rebuilt every frame)
//!      ↓
//! Renderer / Picking
//! ```

pub mod hierarchy;
pub mod scene_graph;

pub use hierarchy::{Entity, EntityId, EntityKind, Hierarchy, HierarchyError, Orbit};
pub use scene_graph::{compose, orbit_guides, OrbitGuide, WorldTransforms};
