//! # Rendering Boundary
//!
//! The orrery does not draw anything itself. This module holds the camera
//! math and the types handed to an external rendering backend each frame.
//!
//! - **Camera**: perspective projection, view matrix and pointer unprojection
//! - **Backend**: the [`RenderBackend`] trait and the per-frame submission

pub mod backend;
pub mod camera;

pub use backend::{
    CameraSnapshot, FrameSubmission, HighlightFlags, InstanceData, MaterialHint, ProjectionParams,
    RecordingBackend, RenderBackend, RenderInstance, RingHint,
};
pub use camera::Camera;
