//! Orbit integration
//!
//! Advances orbital and spin angles by a simulated delta. Deterministic:
//! identical angle and delta sequences give bit-identical results.

use crate::scene::hierarchy::{Entity, Hierarchy};

/// Advances every body's orbit and spin
pub struct OrbitSystem;

impl OrbitSystem {
    /// Advance one body by `sim_delta` simulated seconds
    ///
    /// The new angle wraps into `[0, 2π)` and the local position is
    /// recomputed from it. A step that would produce a non-finite angle
    /// leaves the body unchanged.
    pub fn advance(entity: &mut Entity, sim_delta: f32) {
        if let Some(orbit) = entity.orbit_mut() {
            let angle = orbit.angle() + orbit.angular_speed() * sim_delta;
            if angle.is_finite() {
                orbit.set_angle(angle);
            }
        }

        let spin = entity.spin_angle() + entity.self_rotation_speed() * sim_delta;
        if spin.is_finite() {
            entity.set_spin_angle(spin);
        }
    }

    /// Advance every body in pre-order
    pub fn advance_all(hierarchy: &mut Hierarchy, sim_delta: f32) {
        let order = hierarchy.traversal().to_vec();
        for id in order {
            if let Some(entity) = hierarchy.get_mut(id) {
                Self::advance(entity, sim_delta);
            }
        }
        log::trace!("Advanced {} bodies by {:.4}s", hierarchy.len(), sim_delta);
    }
}
