//! Ray casting primitives used by pointer picking

use crate::foundation::math::Vec3;
use crate::scene::EntityId;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// Unit direction of the ray
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalizing `direction`
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `origin` through `through`; `None` if the points coincide
    pub fn through(origin: Vec3, through: Vec3) -> Option<Self> {
        let direction = (through - origin).try_normalize(f32::EPSILON)?;
        Some(Self { origin, direction })
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The entity that was hit
    pub entity: EntityId,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
    /// The point of intersection in world space
    pub point: Vec3,
    /// The surface normal at the intersection point
    pub normal: Vec3,
}

/// A bounding sphere for picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Test ray intersection with this sphere
    ///
    /// Returns `(distance, hit_point, normal)` for the nearest intersection
    /// strictly in front of the origin. A ray starting inside the sphere
    /// reports the exit point.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        // Solve |origin + t*direction - center|^2 = radius^2
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant.is_nan() || discriminant < 0.0 || a <= 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        let t1 = (-b - sqrt_discriminant) / (2.0 * a);
        let t2 = (-b + sqrt_discriminant) / (2.0 * a);

        let t = if t1 > 0.0 {
            t1
        } else if t2 > 0.0 {
            t2
        } else {
            return None;
        };

        let hit_point = ray.point_at(t);
        let normal = (hit_point - self.center)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| -ray.direction);

        Some((t, hit_point, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_hits_sphere_front() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -3.0));
        let sphere = BoundingSphere::new(Vec3::zeros(), 2.0);

        let (t, point, normal) = sphere.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 8.0, epsilon = 1e-5);
        assert_relative_eq!(point, Vec3::new(0.0, 0.0, 2.0), epsilon = 1e-5);
        assert_relative_eq!(normal, Vec3::z(), epsilon = 1e-5);
    }

    #[test]
    fn test_ray_misses_and_points_away() {
        let sphere = BoundingSphere::new(Vec3::zeros(), 1.0);
        let miss = Ray::new(Vec3::new(5.0, 0.0, 10.0), -Vec3::z());
        assert!(sphere.intersect_ray(&miss).is_none());

        let away = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::z());
        assert!(sphere.intersect_ray(&away).is_none());
    }

    #[test]
    fn test_ray_from_inside_reports_exit() {
        let sphere = BoundingSphere::new(Vec3::zeros(), 3.0);
        let ray = Ray::new(Vec3::zeros(), Vec3::x());
        let (t, _, _) = sphere.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_through_rejects_coincident_points() {
        assert!(Ray::through(Vec3::x(), Vec3::x()).is_none());
        let ray = Ray::through(Vec3::zeros(), Vec3::new(0.0, 4.0, 0.0)).unwrap();
        assert_relative_eq!(ray.direction, Vec3::y(), epsilon = 1e-6);
    }
}
