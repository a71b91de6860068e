//! Pointer picking
//!
//! Orchestrates the picking pipeline: pointer NDC → camera ray → bounding
//! spheres of the composed bodies. Picking only reports; applying the result
//! to hover or selection state is the caller's job.

use crate::physics::collision::{BoundingSphere, Ray, RayHit};
use crate::render::Camera;
use crate::scene::{EntityId, Hierarchy, WorldTransforms};

/// Ray picking against body bounding spheres
pub struct PickingSystem;

impl PickingSystem {
    /// Entity under the pointer, if any
    pub fn pick(
        ndc: (f32, f32),
        camera: &Camera,
        hierarchy: &Hierarchy,
        world: &WorldTransforms,
    ) -> Option<EntityId> {
        Self::pick_hit(ndc, camera, hierarchy, world).map(|hit| hit.entity)
    }

    /// Nearest hit under the pointer, with hit point and normal
    pub fn pick_hit(
        ndc: (f32, f32),
        camera: &Camera,
        hierarchy: &Hierarchy,
        world: &WorldTransforms,
    ) -> Option<RayHit> {
        if !(ndc.0.is_finite() && ndc.1.is_finite()) {
            return None;
        }
        let ray = camera.screen_to_world_ray(ndc.0, ndc.1)?;
        let hit = Self::ray_cast(&ray, hierarchy, world);

        if let Some(hit) = &hit {
            log::trace!("Pick at ({:.3}, {:.3}) hit {:?} at {:.3}", ndc.0, ndc.1, hit.entity, hit.distance);
        }
        hit
    }

    /// Cast `ray` against every body
    ///
    /// The smallest positive distance wins. Equal distances keep the body
    /// earlier in hierarchy pre-order.
    pub fn ray_cast(ray: &Ray, hierarchy: &Hierarchy, world: &WorldTransforms) -> Option<RayHit> {
        let mut closest_hit: Option<RayHit> = None;

        for (id, entity) in hierarchy.iter() {
            let Some(center) = world.position(id) else {
                continue;
            };

            let sphere = BoundingSphere::new(center, entity.visual_radius());
            if let Some((distance, point, normal)) = sphere.intersect_ray(ray) {
                let nearer = closest_hit.map_or(true, |closest| distance < closest.distance);
                if nearer {
                    closest_hit = Some(RayHit {
                        entity: id,
                        distance,
                        point,
                        normal,
                    });
                }
            }
        }

        closest_hit
    }
}
