//! Math utilities and types
//!
//! Provides the fundamental math types used by the orbital scene.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,
    
    /// Rotation quaternion
    pub rotation: Quat,
    
    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }
    
    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Translation by `position` followed by a spin of `angle` radians about +Y
    pub fn orbital(position: Vec3, angle: f32) -> Self {
        Self::from_position_rotation(position, Quat::from_axis_angle(&Vec3::y_axis(), angle))
    }
    
    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
    
    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        let matrix = self.to_matrix();
        matrix.transform_point(&point)
    }
    
    /// Combine this transform with another
    ///
    /// `self` is the outer (parent) frame, `other` is expressed inside it.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;
    
    /// 2 * Pi
    pub const TAU: f32 = std::f32::consts::TAU;
    
    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};
    
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
    
    /// Linear interpolation between two vectors
    pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
        a + (b - a) * t
    }

    /// Wrap an angle into `[0, 2π)`
    ///
    /// `rem_euclid` can round up to exactly `TAU` for tiny negative inputs,
    /// so that case folds back to zero.
    pub fn wrap_angle(angle: f32) -> f32 {
        let wrapped = angle.rem_euclid(constants::TAU);
        if wrapped >= constants::TAU || !wrapped.is_finite() {
            0.0
        } else {
            wrapped
        }
    }
}

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a perspective projection matrix
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;
    
    /// Create a look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        // Right-handed view space looking down -Z, clip depth in [-1, 1]
        let tan_half_fovy = (fov_y * 0.5).tan();
        
        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = (far + near) / (near - far);
        result[(2, 3)] = (2.0 * far * near) / (near - far);
        result[(3, 2)] = -1.0;
        
        result
    }
    
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);
        
        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );
        
        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        
        rotation * translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::constants::{PI, TAU};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_wrap_angle_range() {
        assert_relative_eq!(utils::wrap_angle(TAU + 0.5), 0.5, epsilon = EPSILON);
        assert_relative_eq!(utils::wrap_angle(-0.5), TAU - 0.5, epsilon = EPSILON);
        assert_eq!(utils::wrap_angle(TAU), 0.0);
        assert!(utils::wrap_angle(-1e-9) < TAU);
        assert!(utils::wrap_angle(1.0e7) < TAU);
    }

    #[test]
    fn test_combine_matches_matrix_product() {
        let parent = Transform::orbital(Vec3::new(10.0, 0.0, 0.0), PI / 2.0);
        let child = Transform::orbital(Vec3::new(2.0, 0.0, 0.0), 0.3);

        let combined = parent.combine(&child).to_matrix();
        let product = parent.to_matrix() * child.to_matrix();

        assert_relative_eq!(combined, product, epsilon = EPSILON);
    }

    #[test]
    fn test_orbital_rotation_is_about_y() {
        // Rotating +X by 90° about +Y lands on -Z in a right-handed frame
        let transform = Transform::orbital(Vec3::zeros(), PI / 2.0);
        let rotated = transform.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(rotated.coords, Vec3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_look_at_puts_target_on_negative_z() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::zeros(), Vec3::y());
        let target_in_view = view.transform_point(&Point3::origin());
        assert_relative_eq!(target_in_view.coords, Vec3::new(0.0, 0.0, -10.0), epsilon = EPSILON);
    }
}
