//! # Perspective Camera
//!
//! Camera math for the orbital view: view and projection matrices, and the
//! conversions between world space and normalized device coordinates used
//! by pointer picking.
//!
//! # Coordinate System
//! Right-handed, Y-up world space. View space looks down -Z and clip depth
//! spans `[-1, 1]`. NDC x grows to the right and y grows upward.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Point3, Vec3, Vec4};
use crate::physics::collision::Ray;
use crate::render::backend::ProjectionParams;

/// 3D perspective camera
///
/// Matrices are computed on demand from the current parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Viewport width / height
    /// * `near` - Near clipping distance (must be > 0)
    /// * `far` - Far clipping distance (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera aspect ratio for viewport changes
    ///
    /// Idempotent; only logs when the change is significant.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Place the camera and aim it
    pub fn look_at(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
        log::trace!("Camera at {:?} looking at {:?}", position, target);
    }

    /// World to view space transform
    ///
    /// Falls back to +Z as the up reference when the view direction is
    /// parallel to `up`.
    pub fn view_matrix(&self) -> Mat4 {
        let forward = self.target - self.position;
        let up = if forward.cross(&self.up).norm_squared() > f32::EPSILON {
            self.up
        } else {
            Vec3::z()
        };
        Mat4::look_at(self.position, self.target, up)
    }

    /// View to clip space transform
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined `P × V`
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Parameters handed to the renderer
    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams {
            fov_y: self.fov,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
    }

    /// Convert a normalized device coordinate to a world-space ray
    ///
    /// Unprojects the pointer at the near and far planes through the inverse
    /// view-projection and casts from the camera position through the far
    /// point. `None` if the matrices are degenerate.
    pub fn screen_to_world_ray(&self, ndc_x: f32, ndc_y: f32) -> Option<Ray> {
        let inv_view_proj = self.view_projection_matrix().try_inverse()?;

        let near = unproject(&inv_view_proj, Vec4::new(ndc_x, ndc_y, -1.0, 1.0))?;
        let far = unproject(&inv_view_proj, Vec4::new(ndc_x, ndc_y, 1.0, 1.0))?;

        let direction = (far - near).try_normalize(f32::EPSILON)?;
        Some(Ray {
            origin: self.position,
            direction,
        })
    }

    /// Project a world point to normalized device coordinates
    ///
    /// `None` for points behind the camera.
    pub fn project_point(&self, point: Vec3) -> Option<(f32, f32)> {
        let clip = self.view_projection_matrix() * Point3::from(point).to_homogeneous();
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some((clip.x / clip.w, clip.y / clip.w))
    }
}

fn unproject(inverse: &Mat4, ndc: Vec4) -> Option<Vec3> {
    let world = inverse * ndc;
    if world.w.abs() <= f32::EPSILON {
        return None;
    }
    Some(world.xyz() / world.w)
}

impl Default for Camera {
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 50.0, 100.0), 75.0, 16.0 / 9.0, 0.1, 10_000.0)
    }
}
