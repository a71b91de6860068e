//! Entity hierarchy
//!
//! Bodies live in an arena keyed by [`EntityId`]. Each entity stores its
//! parent key and child keys; traversal walks keys in pre-order instead of
//! following references, so the tree has no ownership cycles.

use std::collections::HashMap;

use slotmap::SlotMap;
use thiserror::Error;

use crate::core::config::{BodyConfig, BodyKind};
use crate::foundation::math::{utils, Transform, Vec3};
use crate::render::MaterialHint;

slotmap::new_key_type! {
    /// Stable identifier of a body for the lifetime of its hierarchy
    pub struct EntityId;
}

/// Circular orbit state of a non-root body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    radius: f32,
    angular_speed: f32,
    angle: f32,
    local_position: Vec3,
}

impl Orbit {
    /// Create an orbit starting at `angle` (wrapped into `[0, 2π)`)
    pub fn new(radius: f32, angular_speed: f32, angle: f32) -> Self {
        let mut orbit = Self {
            radius,
            angular_speed,
            angle: 0.0,
            local_position: Vec3::zeros(),
        };
        orbit.set_angle(angle);
        orbit
    }

    /// Orbit radius around the parent
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Angular speed in radians per simulated second
    pub fn angular_speed(&self) -> f32 {
        self.angular_speed
    }

    /// Current angle in `[0, 2π)`
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Position relative to the parent
    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    /// Set the angle and recompute the local position
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = utils::wrap_angle(angle);
        self.local_position = if self.radius == 0.0 {
            Vec3::zeros()
        } else {
            Vec3::new(self.angle.cos() * self.radius, 0.0, self.angle.sin() * self.radius)
        };
    }

    /// Point on the orbit at `angle`, relative to the parent
    pub fn point_at(&self, angle: f32) -> Vec3 {
        Vec3::new(angle.cos() * self.radius, 0.0, angle.sin() * self.radius)
    }
}

/// Kind of body, carrying only the state that kind needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    /// The root; sits at the origin of its own frame
    Star,
    /// Orbits the star
    Planet(Orbit),
    /// Orbits a planet
    Satellite(Orbit),
}

/// A body in the hierarchy
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    kind: EntityKind,
    visual_radius: f32,
    self_rotation_speed: f32,
    spin_angle: f32,
    material: MaterialHint,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

impl Entity {
    fn from_config(body: &BodyConfig) -> Self {
        let kind = match body.kind {
            BodyKind::Star => EntityKind::Star,
            BodyKind::Planet => {
                EntityKind::Planet(Orbit::new(body.orbit_radius, body.orbital_speed, body.initial_angle))
            }
            BodyKind::Satellite => {
                EntityKind::Satellite(Orbit::new(body.orbit_radius, body.orbital_speed, body.initial_angle))
            }
        };

        Self {
            name: body.name.clone(),
            kind,
            visual_radius: body.radius,
            self_rotation_speed: body.rotation_speed,
            spin_angle: 0.0,
            material: MaterialHint {
                color: body.color,
                emissive: body.emissive,
                shininess: body.shininess,
                rings: body.rings,
            },
            parent: None,
            children: Vec::new(),
        }
    }

    /// Unique body name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Star, planet or satellite
    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    /// Orbit state, if this body orbits something
    pub fn orbit(&self) -> Option<&Orbit> {
        match &self.kind {
            EntityKind::Star => None,
            EntityKind::Planet(orbit) | EntityKind::Satellite(orbit) => Some(orbit),
        }
    }

    pub(crate) fn orbit_mut(&mut self) -> Option<&mut Orbit> {
        match &mut self.kind {
            EntityKind::Star => None,
            EntityKind::Planet(orbit) | EntityKind::Satellite(orbit) => Some(orbit),
        }
    }

    /// Orbital angle in `[0, 2π)`; zero for the star
    pub fn current_angle(&self) -> f32 {
        self.orbit().map_or(0.0, Orbit::angle)
    }

    /// Position relative to the parent frame
    pub fn local_position(&self) -> Vec3 {
        self.orbit().map_or_else(Vec3::zeros, Orbit::local_position)
    }

    /// Translation by the local position, then the spin about +Y
    pub fn local_transform(&self) -> Transform {
        Transform::orbital(self.local_position(), self.spin_angle)
    }

    /// Radius used for drawing and picking
    pub fn visual_radius(&self) -> f32 {
        self.visual_radius
    }

    /// Spin speed in radians per simulated second
    pub fn self_rotation_speed(&self) -> f32 {
        self.self_rotation_speed
    }

    /// Spin angle in `[0, 2π)`
    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    pub(crate) fn set_spin_angle(&mut self, angle: f32) {
        self.spin_angle = utils::wrap_angle(angle);
    }

    /// Static material hint for the renderer
    pub fn material(&self) -> &MaterialHint {
        &self.material
    }

    /// Body this one orbits
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Bodies orbiting this one, in roster order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Whether this is a planet
    pub fn is_planet(&self) -> bool {
        matches!(self.kind, EntityKind::Planet(_))
    }
}

/// Roster problems detected while building the hierarchy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HierarchyError {
    /// No bodies at all
    #[error("body roster is empty")]
    EmptyRoster,

    /// Two bodies share a name
    #[error("duplicate body name '{0}'")]
    DuplicateName(String),

    /// A parent reference names no body
    #[error("body '{body}' references unknown parent '{parent}'")]
    UnknownParent {
        /// Referencing body
        body: String,
        /// Missing parent name
        parent: String,
    },

    /// Parent references loop back on themselves
    #[error("body '{0}' is part of a parent cycle")]
    Cycle(String),

    /// No star in the roster
    #[error("roster has no star")]
    NoRoot,

    /// More than one star in the roster
    #[error("roster has more than one star: '{first}' and '{second}'")]
    MultipleRoots {
        /// First star found
        first: String,
        /// Second star found
        second: String,
    },

    /// Parent presence does not match the kind
    #[error("body '{0}': a star must have no parent, planets and satellites must have one")]
    KindMismatch(String),

    /// Planets must orbit the star and satellites a planet
    #[error("body '{body}' cannot orbit '{parent}'")]
    ParentKindMismatch {
        /// Orbiting body
        body: String,
        /// Parent of the wrong kind
        parent: String,
    },

    /// A numeric parameter is negative or not finite
    #[error("body '{body}' has invalid {field}")]
    InvalidParameter {
        /// Offending body
        body: String,
        /// Offending field
        field: &'static str,
    },
}

/// Arena of bodies with a fixed pre-order traversal
#[derive(Debug, Clone)]
pub struct Hierarchy {
    entities: SlotMap<EntityId, Entity>,
    by_name: HashMap<String, EntityId>,
    traversal: Vec<EntityId>,
    root: EntityId,
}

impl Hierarchy {
    /// Build the hierarchy from a static roster
    ///
    /// Fails on an empty roster, duplicate names, unknown parents, parent
    /// cycles, a missing or duplicated star, or invalid numbers.
    pub fn from_roster(bodies: &[BodyConfig]) -> Result<Self, HierarchyError> {
        if bodies.is_empty() {
            return Err(HierarchyError::EmptyRoster);
        }

        let mut index_by_name: HashMap<&str, usize> = HashMap::with_capacity(bodies.len());
        for (index, body) in bodies.iter().enumerate() {
            validate_parameters(body)?;
            if index_by_name.insert(body.name.as_str(), index).is_some() {
                return Err(HierarchyError::DuplicateName(body.name.clone()));
            }
        }

        let mut root_index: Option<usize> = None;
        let mut parent_index: Vec<Option<usize>> = Vec::with_capacity(bodies.len());
        for (index, body) in bodies.iter().enumerate() {
            match (body.kind, body.parent.as_deref()) {
                (BodyKind::Star, None) => {
                    if let Some(first) = root_index {
                        return Err(HierarchyError::MultipleRoots {
                            first: bodies[first].name.clone(),
                            second: body.name.clone(),
                        });
                    }
                    root_index = Some(index);
                    parent_index.push(None);
                }
                (BodyKind::Star, Some(_)) | (BodyKind::Planet | BodyKind::Satellite, None) => {
                    return Err(HierarchyError::KindMismatch(body.name.clone()));
                }
                (_, Some(parent)) => {
                    let parent = index_by_name.get(parent).copied().ok_or_else(|| {
                        HierarchyError::UnknownParent {
                            body: body.name.clone(),
                            parent: parent.to_string(),
                        }
                    })?;
                    parent_index.push(Some(parent));
                }
            }
        }

        let root_index = root_index.ok_or(HierarchyError::NoRoot)?;

        // Every chain must reach the star within `len` steps
        for (index, body) in bodies.iter().enumerate() {
            let mut current = index;
            let mut steps = 0;
            while let Some(parent) = parent_index[current] {
                current = parent;
                steps += 1;
                if steps > bodies.len() {
                    return Err(HierarchyError::Cycle(body.name.clone()));
                }
            }
            if current != root_index {
                return Err(HierarchyError::Cycle(body.name.clone()));
            }
        }

        for (body, parent) in bodies.iter().zip(&parent_index) {
            let Some(parent) = parent.map(|index| &bodies[index]) else {
                continue;
            };
            let expected = match body.kind {
                BodyKind::Planet => BodyKind::Star,
                BodyKind::Satellite => BodyKind::Planet,
                BodyKind::Star => continue,
            };
            if parent.kind != expected {
                return Err(HierarchyError::ParentKindMismatch {
                    body: body.name.clone(),
                    parent: parent.name.clone(),
                });
            }
        }

        let mut entities = SlotMap::with_capacity_and_key(bodies.len());
        let ids: Vec<EntityId> = bodies
            .iter()
            .map(|body| entities.insert(Entity::from_config(body)))
            .collect();

        for (index, parent) in parent_index.iter().enumerate() {
            if let Some(parent) = *parent {
                entities[ids[index]].parent = Some(ids[parent]);
                entities[ids[parent]].children.push(ids[index]);
            }
        }

        let root = ids[root_index];
        let traversal = pre_order(&entities, root);
        let by_name = bodies
            .iter()
            .zip(&ids)
            .map(|(body, id)| (body.name.clone(), *id))
            .collect();

        log::info!("Built body hierarchy: {} bodies rooted at '{}'", traversal.len(), entities[root].name);

        Ok(Self {
            entities,
            by_name,
            traversal,
            root,
        })
    }

    /// The star
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Look up a body
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Whether `id` names a body of this hierarchy
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Find a body by name
    pub fn find(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    /// Keys in pre-order (parent before children, siblings in roster order)
    pub fn traversal(&self) -> &[EntityId] {
        &self.traversal
    }

    /// Bodies in pre-order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.traversal.iter().map(move |&id| (id, &self.entities[id]))
    }

    /// Planets in roster order
    pub fn planets(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter().filter(|(_, entity)| entity.is_planet()).map(|(id, _)| id)
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Always false for a built hierarchy
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

fn validate_parameters(body: &BodyConfig) -> Result<(), HierarchyError> {
    let invalid = |field| HierarchyError::InvalidParameter {
        body: body.name.clone(),
        field,
    };

    if !(body.radius.is_finite() && body.radius >= 0.0) {
        return Err(invalid("radius"));
    }
    if !(body.orbit_radius.is_finite() && body.orbit_radius >= 0.0) {
        return Err(invalid("orbit_radius"));
    }
    if !body.orbital_speed.is_finite() {
        return Err(invalid("orbital_speed"));
    }
    if !body.rotation_speed.is_finite() {
        return Err(invalid("rotation_speed"));
    }
    if !body.initial_angle.is_finite() {
        return Err(invalid("initial_angle"));
    }
    if let Some(rings) = &body.rings {
        let valid = rings.inner_radius.is_finite()
            && rings.outer_radius.is_finite()
            && rings.inner_radius >= 0.0
            && rings.outer_radius > rings.inner_radius;
        if !valid {
            return Err(invalid("rings"));
        }
    }
    Ok(())
}

fn pre_order(entities: &SlotMap<EntityId, Entity>, root: EntityId) -> Vec<EntityId> {
    let mut order = Vec::with_capacity(entities.len());
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        order.push(id);
        stack.extend(entities[id].children.iter().rev().copied());
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::default_solar_system;
    use approx::assert_relative_eq;

    fn body(name: &str, kind: BodyKind, parent: Option<&str>) -> BodyConfig {
        match parent {
            Some(parent) => BodyConfig::orbiting(name, kind, parent, 5.0, 1.0, 1.0),
            None => BodyConfig {
                kind,
                ..BodyConfig::star(name, 1.0)
            },
        }
    }

    #[test]
    fn test_default_roster_builds() {
        let hierarchy = Hierarchy::from_roster(&default_solar_system()).unwrap();
        assert_eq!(hierarchy.len(), 11);

        let names: Vec<&str> = hierarchy.iter().map(|(_, e)| e.name()).collect();
        assert_eq!(names[0], "sun");
        // Satellites follow their planet directly in pre-order
        let earth = names.iter().position(|n| *n == "earth").unwrap();
        assert_eq!(names[earth + 1], "moon");
        let mars = names.iter().position(|n| *n == "mars").unwrap();
        assert_eq!(names[mars + 1], "phobos");
    }

    #[test]
    fn test_parent_and_children_links() {
        let hierarchy = Hierarchy::from_roster(&default_solar_system()).unwrap();
        let earth = hierarchy.find("earth").unwrap();
        let moon = hierarchy.find("moon").unwrap();

        assert_eq!(hierarchy.get(moon).unwrap().parent(), Some(earth));
        assert_eq!(hierarchy.get(earth).unwrap().children(), &[moon]);
        assert_eq!(hierarchy.get(earth).unwrap().parent(), Some(hierarchy.root()));
        assert_eq!(hierarchy.planets().count(), 8);
    }

    #[test]
    fn test_local_position_follows_angle() {
        let orbit = Orbit::new(10.0, 1.0, std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(orbit.local_position(), Vec3::new(0.0, 0.0, 10.0), epsilon = 1e-5);

        let still = Orbit::new(0.0, 1.0, 1.0);
        assert_eq!(still.local_position(), Vec3::zeros());
    }

    #[test]
    fn test_initial_angle_is_wrapped() {
        let orbit = Orbit::new(1.0, 1.0, -0.5);
        assert!(orbit.angle() >= 0.0 && orbit.angle() < std::f32::consts::TAU);
    }

    #[test]
    fn test_empty_roster() {
        assert_eq!(Hierarchy::from_roster(&[]).unwrap_err(), HierarchyError::EmptyRoster);
    }

    #[test]
    fn test_unknown_parent() {
        let roster = vec![
            body("sun", BodyKind::Star, None),
            body("p", BodyKind::Planet, Some("nowhere")),
        ];
        assert!(matches!(
            Hierarchy::from_roster(&roster),
            Err(HierarchyError::UnknownParent { .. })
        ));
    }

    #[test]
    fn test_cycle_is_detected() {
        let roster = vec![
            body("sun", BodyKind::Star, None),
            body("a", BodyKind::Planet, Some("b")),
            body("b", BodyKind::Satellite, Some("a")),
        ];
        assert!(matches!(Hierarchy::from_roster(&roster), Err(HierarchyError::Cycle(_))));

        let self_loop = vec![
            body("sun", BodyKind::Star, None),
            body("a", BodyKind::Planet, Some("a")),
        ];
        assert_eq!(
            Hierarchy::from_roster(&self_loop).unwrap_err(),
            HierarchyError::Cycle("a".to_string())
        );
    }

    #[test]
    fn test_parent_kind_is_checked() {
        let satellite_of_star = vec![
            body("sun", BodyKind::Star, None),
            body("moon", BodyKind::Satellite, Some("sun")),
        ];
        assert_eq!(
            Hierarchy::from_roster(&satellite_of_star).unwrap_err(),
            HierarchyError::ParentKindMismatch {
                body: "moon".to_string(),
                parent: "sun".to_string(),
            }
        );

        let planet_of_planet = vec![
            body("sun", BodyKind::Star, None),
            body("a", BodyKind::Planet, Some("sun")),
            body("b", BodyKind::Planet, Some("a")),
        ];
        assert_eq!(
            Hierarchy::from_roster(&planet_of_planet).unwrap_err(),
            HierarchyError::ParentKindMismatch {
                body: "b".to_string(),
                parent: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_root_errors() {
        let no_star = vec![body("a", BodyKind::Planet, Some("b")), body("b", BodyKind::Planet, Some("a"))];
        assert_eq!(Hierarchy::from_roster(&no_star).unwrap_err(), HierarchyError::NoRoot);

        let two_stars = vec![body("a", BodyKind::Star, None), body("b", BodyKind::Star, None)];
        assert!(matches!(
            Hierarchy::from_roster(&two_stars),
            Err(HierarchyError::MultipleRoots { .. })
        ));

        let orphan = vec![body("sun", BodyKind::Star, None), body("p", BodyKind::Planet, None)];
        assert_eq!(
            Hierarchy::from_roster(&orphan).unwrap_err(),
            HierarchyError::KindMismatch("p".to_string())
        );
    }

    #[test]
    fn test_duplicate_and_invalid_values() {
        let duplicate = vec![body("sun", BodyKind::Star, None), body("sun", BodyKind::Planet, Some("sun"))];
        assert_eq!(
            Hierarchy::from_roster(&duplicate).unwrap_err(),
            HierarchyError::DuplicateName("sun".to_string())
        );

        let mut bad = body("p", BodyKind::Planet, Some("sun"));
        bad.orbital_speed = f32::NAN;
        let roster = vec![body("sun", BodyKind::Star, None), bad];
        assert!(matches!(
            Hierarchy::from_roster(&roster),
            Err(HierarchyError::InvalidParameter { field: "orbital_speed", .. })
        ));

        let inverted_rings = body("p", BodyKind::Planet, Some("sun")).with_rings(8.0, 5.0, 0x00c4_a484);
        let roster = vec![body("sun", BodyKind::Star, None), inverted_rings];
        assert!(matches!(
            Hierarchy::from_roster(&roster),
            Err(HierarchyError::InvalidParameter { field: "rings", .. })
        ));
    }
}
