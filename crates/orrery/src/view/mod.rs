//! The view layer
//!
//! [`OrreryView`] runs the per-frame procedure and is the only surface the
//! host UI talks to. The [`CameraController`] state machine lives beside it.

pub mod camera_controller;
pub mod facade;

pub use camera_controller::{CameraController, CameraMode, CameraTransition, ViewTarget};
pub use facade::{OrreryView, RequestError, ViewError, ViewMode, ViewStats};
