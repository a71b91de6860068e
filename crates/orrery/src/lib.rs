//! # Orrery
//!
//! An interactive, time-animated orbital scene: a star, its planets and
//! their satellites on circular orbits, with pointer picking and a camera
//! that flies between a system overview and a locked-on body view.
//!
//! ## Features
//!
//! - **Entity Hierarchy**: arena of bodies with pre-order traversal
//! - **Orbit Integration**: frame-rate independent, deterministic angles
//! - **Scene Graph**: world transforms recomposed every frame
//! - **Picking**: pointer rays against body bounding spheres
//! - **Camera Controller**: eased, interruptible overview/locked transitions
//! - **Renderer Boundary**: backend-agnostic per-frame submission
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orrery::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut view = OrreryView::new(OrreryConfig::default(), RecordingBackend::new())?;
//!     view.focus_by_name("earth")?;
//!
//!     let mut timer = Timer::new();
//!     for _ in 0..600 {
//!         view.tick(timer.update());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Shared configuration
pub mod core;
pub mod config;

pub mod foundation;
pub mod scene;
pub mod systems;
pub mod physics;
pub mod input;
pub mod render;
pub mod view;

#[cfg(test)]
mod tests;

/// Common imports for orrery users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{BodyConfig, BodyKind, OrreryConfig},
        foundation::{
            math::{Vec3, Mat4, Transform},
            time::{SimulationClock, Timer},
        },
        input::{KeyCode, ViewMessage},
        render::{Camera, FrameSubmission, RecordingBackend, RenderBackend},
        scene::{EntityId, Hierarchy, HierarchyError},
        view::{CameraMode, OrreryView, RequestError, ViewError, ViewMode, ViewStats},
    };
}
