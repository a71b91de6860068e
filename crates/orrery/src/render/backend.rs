//! Renderer boundary
//!
//! The core hands a complete [`FrameSubmission`] to a [`RenderBackend`]
//! once per frame. Submission is fire-and-forget: backend failures are the
//! backend's own concern and never flow back into the simulation.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Vec3};
use crate::scene::{EntityId, OrbitGuide};

/// Static per-body material description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialHint {
    /// Base color as `0xRRGGBB`
    pub color: u32,
    /// Emissive color as `0xRRGGBB`, for self-lit bodies
    pub emissive: Option<u32>,
    /// Specular exponent
    pub shininess: f32,
    /// Flat ring system around the body's equator
    pub rings: Option<RingHint>,
}

/// Flat annulus drawn in the body's equatorial plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingHint {
    /// Inner radius in world units
    pub inner_radius: f32,
    /// Outer radius in world units
    pub outer_radius: f32,
    /// Color as `0xRRGGBB`
    pub color: u32,
}

impl MaterialHint {
    /// Base color as linear `[r, g, b, a]` in `[0, 1]`
    pub fn rgba(&self) -> [f32; 4] {
        let [_, r, g, b] = self.color.to_be_bytes();
        [
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            1.0,
        ]
    }

    /// Whether the body emits light
    pub fn is_emissive(&self) -> bool {
        self.emissive.is_some()
    }
}

impl Default for MaterialHint {
    fn default() -> Self {
        Self {
            color: 0x00ff_ffff,
            emissive: None,
            shininess: 10.0,
            rings: None,
        }
    }
}

bitflags! {
    /// Interaction feedback for one instance
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HighlightFlags: u32 {
        /// Under the pointer
        const HOVERED = 1 << 0;
        /// Currently selected
        const SELECTED = 1 << 1;
        /// Locked or transitioning camera target
        const FOCUSED = 1 << 2;
    }
}

/// One body to draw this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderInstance {
    /// Body identity
    pub entity: EntityId,
    /// Composed world matrix
    pub world_matrix: Mat4,
    /// Sphere radius
    pub visual_radius: f32,
    /// Static material
    pub material: MaterialHint,
    /// Hover and selection feedback
    pub highlight: HighlightFlags,
}

/// GPU-ready instance record
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// Column-major model matrix
    pub model: [[f32; 4]; 4],
    /// Linear rgba color
    pub color: [f32; 4],
    /// Sphere radius
    pub radius: f32,
    /// [`HighlightFlags`] bits
    pub flags: u32,
    /// Non-zero for emissive bodies
    pub emissive: u32,
    /// Padding to 16-byte alignment
    pub _padding: u32,
}

impl RenderInstance {
    /// Pack this instance for an instance buffer upload
    pub fn gpu_data(&self) -> InstanceData {
        InstanceData {
            model: self.world_matrix.into(),
            color: self.material.rgba(),
            radius: self.visual_radius,
            flags: self.highlight.bits(),
            emissive: u32::from(self.material.is_emissive()),
            _padding: 0,
        }
    }
}

/// Projection parameters of the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

/// Camera state handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSnapshot {
    /// Eye position
    pub position: Vec3,
    /// Look-at point
    pub look_at: Vec3,
    /// Projection
    pub projection: ProjectionParams,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSubmission {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Bodies in hierarchy pre-order
    pub instances: Vec<RenderInstance>,
    /// Camera for this frame
    pub camera: CameraSnapshot,
    /// Orbit polylines; empty when disabled
    pub orbit_guides: Vec<OrbitGuide>,
}

/// Rendering backend consumed by the view
pub trait RenderBackend {
    /// Draw one frame
    fn submit_frame(&mut self, frame: &FrameSubmission);

    /// The viewport changed size; scene state is unaffected
    fn resize(&mut self, width: u32, height: u32);
}

/// Backend that keeps the last submission, for headless hosts and tests
#[derive(Debug, Default)]
pub struct RecordingBackend {
    last_frame: Option<FrameSubmission>,
    frames_submitted: u64,
    viewport: Option<(u32, u32)>,
}

impl RecordingBackend {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent submission
    pub fn last_frame(&self) -> Option<&FrameSubmission> {
        self.last_frame.as_ref()
    }

    /// Number of frames received
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    /// Last size passed to [`RenderBackend::resize`]
    pub fn viewport(&self) -> Option<(u32, u32)> {
        self.viewport
    }
}

impl RenderBackend for RecordingBackend {
    fn submit_frame(&mut self, frame: &FrameSubmission) {
        self.frames_submitted += 1;
        self.last_frame = Some(frame.clone());
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Some((width, height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_material_rgba() {
        let material = MaterialHint {
            color: 0x00ff_8000,
            ..MaterialHint::default()
        };
        let rgba = material.rgba();
        assert_eq!(rgba[0], 1.0);
        assert!((rgba[1] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(rgba[2], 0.0);
        assert_eq!(rgba[3], 1.0);
    }

    #[test]
    fn test_gpu_data_packs_flags_and_matrix() {
        let mut keys: SlotMap<EntityId, ()> = SlotMap::with_key();
        let instance = RenderInstance {
            entity: keys.insert(()),
            world_matrix: Mat4::new_translation(&Vec3::new(1.0, 2.0, 3.0)),
            visual_radius: 4.0,
            material: MaterialHint {
                emissive: Some(0x00ff_aa00),
                ..MaterialHint::default()
            },
            highlight: HighlightFlags::HOVERED | HighlightFlags::FOCUSED,
        };

        let data = instance.gpu_data();
        assert_eq!(data.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(data.flags, 0b101);
        assert_eq!(data.emissive, 1);
        assert_eq!(bytemuck::bytes_of(&data).len(), 96);
    }
}
