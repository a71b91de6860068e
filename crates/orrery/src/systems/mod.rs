//! Per-tick systems operating on the hierarchy

pub mod orbit_system;
pub mod picking_system;

pub use orbit_system::OrbitSystem;
pub use picking_system::PickingSystem;
