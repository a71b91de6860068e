//! World transform composition
//!
//! World transforms are derived data: they are rebuilt from the hierarchy
//! every frame and never patched in place.

use slotmap::SecondaryMap;

use crate::foundation::math::{constants, Transform, Vec3};
use crate::scene::hierarchy::{EntityId, Hierarchy};

/// World transform of every body for one frame
#[derive(Debug, Clone, Default)]
pub struct WorldTransforms {
    transforms: SecondaryMap<EntityId, Transform>,
}

impl WorldTransforms {
    /// World transform of `id`
    pub fn get(&self, id: EntityId) -> Option<&Transform> {
        self.transforms.get(id)
    }

    /// World-space position of `id`
    pub fn position(&self, id: EntityId) -> Option<Vec3> {
        self.transforms.get(id).map(|t| t.position)
    }

    /// Number of composed bodies
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// True before the first composition
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

/// Compose `world = parent_world ∘ local` for every body in pre-order
pub fn compose(hierarchy: &Hierarchy) -> WorldTransforms {
    let mut transforms = SecondaryMap::with_capacity(hierarchy.len());

    for (id, entity) in hierarchy.iter() {
        let local = entity.local_transform();
        let world = match entity.parent().and_then(|parent| transforms.get(parent)) {
            Some(parent_world) => Transform::combine(parent_world, &local),
            None => local,
        };
        transforms.insert(id, world);
    }

    WorldTransforms { transforms }
}

/// Closed polyline tracing one body's orbit
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitGuide {
    /// Body travelling along the guide
    pub entity: EntityId,
    /// Points in world space; the first point is repeated at the end
    pub points: Vec<Vec3>,
}

/// Orbit guides centered on each parent's current world position
pub fn orbit_guides(hierarchy: &Hierarchy, world: &WorldTransforms, segments: u32) -> Vec<OrbitGuide> {
    let segments = segments.max(3);

    hierarchy
        .iter()
        .filter_map(|(id, entity)| {
            let orbit = entity.orbit()?;
            let center = entity.parent().and_then(|parent| world.position(parent))?;
            let points = (0..=segments)
                .map(|i| {
                    let angle = constants::TAU * i as f32 / segments as f32;
                    center + orbit.point_at(angle)
                })
                .collect();
            Some(OrbitGuide { entity: id, points })
        })
        .collect()
}
