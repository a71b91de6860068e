//! Camera controller
//!
//! A state machine that owns the camera. Mode changes are eased
//! transitions advanced by wall time, so the camera keeps moving while the
//! simulation is paused.
//!
//! ```text
//! Overview ──focus(id)──▶ Transitioning(→ id) ──done──▶ Locked(id)
//!    ▲                        │  ▲    focus(id') │
//!    │                        │  └──────────────┘
//!    └──done── Transitioning(→ Overview) ◀──reset── any
//! ```
//!
//! A new request always starts from the camera's current position, so
//! redirecting a transition in flight never makes the camera jump.

use crate::core::config::CameraConfig;
use crate::foundation::math::{utils, Vec3};
use crate::render::{Camera, CameraSnapshot};
use crate::scene::{EntityId, Hierarchy, WorldTransforms};
use crate::view::RequestError;

/// Where a transition starts or ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTarget {
    /// The fixed system vantage
    Overview,
    /// Following a body
    Entity(EntityId),
}

/// An eased camera move in progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    /// Mode the camera was in or heading to when the move started
    pub from: ViewTarget,
    /// Mode entered on completion
    pub to: ViewTarget,
    /// Camera position when the move started
    pub start_position: Vec3,
    /// Wall seconds spent in this move so far
    pub elapsed: f32,
    /// Length of the move in seconds
    pub duration: f32,
}

impl CameraTransition {
    /// Linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }
}

/// Camera state machine mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    /// Fixed vantage over the whole system
    Overview,
    /// Tracking one body
    Locked(EntityId),
    /// Moving between the two
    Transitioning(CameraTransition),
}

impl CameraMode {
    /// Body the camera follows or is flying to
    pub fn focus_target(&self) -> Option<EntityId> {
        match self {
            Self::Overview => None,
            Self::Locked(id) => Some(*id),
            Self::Transitioning(transition) => match transition.to {
                ViewTarget::Entity(id) => Some(id),
                ViewTarget::Overview => None,
            },
        }
    }

    fn heading(&self) -> ViewTarget {
        match self {
            Self::Overview => ViewTarget::Overview,
            Self::Locked(id) => ViewTarget::Entity(*id),
            Self::Transitioning(transition) => transition.to,
        }
    }
}

/// Owns the camera and drives it between overview and locked views
#[derive(Debug, Clone)]
pub struct CameraController {
    camera: Camera,
    mode: CameraMode,
    settings: CameraConfig,
}

impl CameraController {
    /// Start in overview mode
    pub fn new(settings: CameraConfig, aspect: f32) -> Self {
        let mut camera = Camera::perspective(
            settings.overview_position,
            settings.fov_degrees,
            aspect,
            settings.near,
            settings.far,
        );
        camera.look_at(settings.overview_position, settings.overview_target);

        Self {
            camera,
            mode: CameraMode::Overview,
            settings,
        }
    }

    /// Current mode
    pub fn mode(&self) -> &CameraMode {
        &self.mode
    }

    /// The camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera state for the renderer
    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            position: self.camera.position,
            look_at: self.camera.target,
            projection: self.camera.projection_params(),
        }
    }

    /// Body followed or targeted
    pub fn focus_target(&self) -> Option<EntityId> {
        self.mode.focus_target()
    }

    /// Update the projection aspect ratio
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.camera.set_aspect_ratio(aspect);
    }

    /// Fly to `id` and lock onto it
    ///
    /// Focusing the body already followed or targeted changes nothing.
    pub fn focus(&mut self, id: EntityId, hierarchy: &Hierarchy) -> Result<(), RequestError> {
        if !hierarchy.contains(id) {
            log::warn!("Focus rejected: {:?} is not in the hierarchy", id);
            return Err(RequestError::EntityNotFound(id));
        }
        if self.mode.focus_target() == Some(id) {
            log::debug!("Focus on {:?} already active", id);
            return Ok(());
        }
        self.begin_transition(ViewTarget::Entity(id));
        Ok(())
    }

    /// Fly back to the overview vantage, from any mode
    pub fn reset(&mut self) {
        self.begin_transition(ViewTarget::Overview);
    }

    fn begin_transition(&mut self, to: ViewTarget) {
        let transition = CameraTransition {
            from: self.mode.heading(),
            to,
            start_position: self.camera.position,
            elapsed: 0.0,
            duration: self.settings.transition_duration,
        };
        log::debug!(
            "Camera transition {:?} -> {:?} from {:?}",
            transition.from,
            transition.to,
            transition.start_position
        );
        self.mode = CameraMode::Transitioning(transition);
    }

    /// Advance by `wall_delta` seconds using this frame's world transforms
    ///
    /// Each transition keeps its own clock starting at zero, so progress
    /// stays precise however long the controller has been running.
    pub fn update(&mut self, wall_delta: f32, world: &WorldTransforms) {
        let wall_delta = if wall_delta.is_finite() && wall_delta > 0.0 { wall_delta } else { 0.0 };

        match self.mode {
            CameraMode::Overview => {
                self.camera.look_at(self.settings.overview_position, self.settings.overview_target);
            }
            CameraMode::Locked(id) => {
                let Some(target) = world.position(id) else {
                    log::warn!("Locked target {:?} missing from world transforms", id);
                    return;
                };
                let desired = target + self.settings.follow_offset;
                let position = utils::lerp_vec3(self.camera.position, desired, self.settings.smoothing_factor);
                self.camera.look_at(position, target);
            }
            CameraMode::Transitioning(mut transition) => {
                transition.elapsed += wall_delta;
                self.mode = CameraMode::Transitioning(transition);

                let Some((end_position, look_at)) = self.endpoint(transition.to, world) else {
                    log::warn!("Transition target {:?} missing from world transforms", transition.to);
                    return;
                };

                let progress = transition.progress();
                if progress >= 1.0 {
                    self.camera.look_at(end_position, look_at);
                    self.mode = match transition.to {
                        ViewTarget::Overview => CameraMode::Overview,
                        ViewTarget::Entity(id) => CameraMode::Locked(id),
                    };
                    log::debug!("Camera transition to {:?} complete", transition.to);
                } else {
                    let eased = self.settings.easing.apply(progress);
                    let position = utils::lerp_vec3(transition.start_position, end_position, eased);
                    self.camera.look_at(position, look_at);
                }
            }
        }
    }

    /// Live end position and look-at point of a transition
    fn endpoint(&self, to: ViewTarget, world: &WorldTransforms) -> Option<(Vec3, Vec3)> {
        match to {
            ViewTarget::Overview => Some((self.settings.overview_position, self.settings.overview_target)),
            ViewTarget::Entity(id) => {
                let target = world.position(id)?;
                Some((target + self.settings.follow_offset, target))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{BodyConfig, BodyKind};
    use crate::scene::compose;
    use crate::systems::OrbitSystem;
    use approx::assert_relative_eq;

    fn setup() -> (Hierarchy, CameraController) {
        let hierarchy = Hierarchy::from_roster(&[
            BodyConfig::star("star", 2.0),
            BodyConfig::orbiting("a", BodyKind::Planet, "star", 10.0, 1.0, 1.0),
            BodyConfig::orbiting("b", BodyKind::Planet, "star", 25.0, 0.5, 1.0).with_initial_angle(2.0),
        ])
        .unwrap();
        (hierarchy, CameraController::new(CameraConfig::default(), 16.0 / 9.0))
    }

    #[test]
    fn test_starts_in_overview() {
        let (_, controller) = setup();
        let settings = CameraConfig::default();
        assert_eq!(*controller.mode(), CameraMode::Overview);
        assert_eq!(controller.camera().position, settings.overview_position);
        assert_eq!(controller.camera().target, settings.overview_target);
    }

    #[test]
    fn test_focus_completes_into_locked() {
        let (hierarchy, mut controller) = setup();
        let a = hierarchy.find("a").unwrap();
        let world = compose(&hierarchy);

        controller.focus(a, &hierarchy).unwrap();
        assert!(matches!(controller.mode(), CameraMode::Transitioning(_)));
        assert_eq!(controller.focus_target(), Some(a));

        controller.update(1.0, &world);
        assert!(matches!(controller.mode(), CameraMode::Transitioning(_)));
        // Look-at follows the target during the move
        assert_relative_eq!(controller.camera().target, world.position(a).unwrap(), epsilon = 1e-5);

        controller.update(1.0, &world);
        assert_eq!(*controller.mode(), CameraMode::Locked(a));
        let expected = world.position(a).unwrap() + CameraConfig::default().follow_offset;
        assert_relative_eq!(controller.camera().position, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_eased_midpoint() {
        let (hierarchy, mut controller) = setup();
        let a = hierarchy.find("a").unwrap();
        let world = compose(&hierarchy);
        let start = controller.camera().position;
        let end = world.position(a).unwrap() + CameraConfig::default().follow_offset;

        controller.focus(a, &hierarchy).unwrap();
        controller.update(1.0, &world);

        // Cubic ease-out at half time: 1 - 0.5^3
        let expected = start + (end - start) * 0.875;
        assert_relative_eq!(controller.camera().position, expected, epsilon = 1e-3);
    }

    #[test]
    fn test_retarget_is_continuous() {
        let (hierarchy, mut controller) = setup();
        let a = hierarchy.find("a").unwrap();
        let b = hierarchy.find("b").unwrap();
        let world = compose(&hierarchy);

        controller.focus(a, &hierarchy).unwrap();
        controller.update(0.7, &world);
        let before = controller.camera().position;

        controller.focus(b, &hierarchy).unwrap();
        let CameraMode::Transitioning(transition) = *controller.mode() else {
            panic!("expected a transition");
        };
        assert_eq!(transition.start_position, before);
        assert_eq!(transition.from, ViewTarget::Entity(a));
        assert_eq!(transition.to, ViewTarget::Entity(b));

        controller.update(0.0, &world);
        assert!((controller.camera().position - before).norm() < 1e-4);
    }

    #[test]
    fn test_unknown_entity_is_rejected() {
        let (hierarchy, mut controller) = setup();
        // A key from another arena, past this hierarchy's slots
        let mut foreign = slotmap::SlotMap::<EntityId, ()>::with_key();
        foreign.insert(());
        foreign.insert(());
        foreign.insert(());
        let stranger = foreign.insert(());

        assert_eq!(controller.focus(stranger, &hierarchy), Err(RequestError::EntityNotFound(stranger)));
        assert_eq!(*controller.mode(), CameraMode::Overview);
    }

    #[test]
    fn test_focus_same_target_is_noop() {
        let (hierarchy, mut controller) = setup();
        let a = hierarchy.find("a").unwrap();
        let world = compose(&hierarchy);

        controller.focus(a, &hierarchy).unwrap();
        controller.update(0.5, &world);
        let mode = *controller.mode();
        controller.focus(a, &hierarchy).unwrap();
        assert_eq!(*controller.mode(), mode);
    }

    #[test]
    fn test_reset_returns_to_overview() {
        let (mut hierarchy, mut controller) = setup();
        let b = hierarchy.find("b").unwrap();
        let settings = CameraConfig::default();

        controller.focus(b, &hierarchy).unwrap();
        for _ in 0..200 {
            OrbitSystem::advance_all(&mut hierarchy, 0.016);
            controller.update(0.016, &compose(&hierarchy));
        }
        assert_eq!(*controller.mode(), CameraMode::Locked(b));

        controller.reset();
        let world = compose(&hierarchy);
        let mut waited = 0.0;
        while waited < settings.transition_duration {
            controller.update(0.1, &world);
            waited += 0.1;
        }
        controller.update(0.1, &world);

        assert_eq!(*controller.mode(), CameraMode::Overview);
        assert_relative_eq!(controller.camera().position, settings.overview_position, epsilon = 1e-5);
        assert_relative_eq!(controller.camera().target, settings.overview_target, epsilon = 1e-5);
    }

    #[test]
    fn test_locked_smoothing_pulls_toward_target() {
        let (hierarchy, mut controller) = setup();
        let a = hierarchy.find("a").unwrap();
        let world = compose(&hierarchy);
        controller.focus(a, &hierarchy).unwrap();
        controller.update(5.0, &world);
        assert_eq!(*controller.mode(), CameraMode::Locked(a));

        // Target moves; the camera covers 5% of the gap per tick
        let mut moved = hierarchy.clone();
        OrbitSystem::advance_all(&mut moved, 0.5);
        let moved_world = compose(&moved);
        let before = controller.camera().position;
        let desired = moved_world.position(a).unwrap() + CameraConfig::default().follow_offset;

        controller.update(0.016, &moved_world);
        let expected = before + (desired - before) * 0.05;
        assert_relative_eq!(controller.camera().position, expected, epsilon = 1e-4);
        assert_relative_eq!(controller.camera().target, moved_world.position(a).unwrap(), epsilon = 1e-5);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let (hierarchy, _) = setup();
        let mut controller = CameraController::new(
            CameraConfig {
                transition_duration: 0.0,
                ..CameraConfig::default()
            },
            1.0,
        );
        let a = hierarchy.find("a").unwrap();
        let world = compose(&hierarchy);
        controller.focus(a, &hierarchy).unwrap();
        controller.update(0.0, &world);
        assert_eq!(*controller.mode(), CameraMode::Locked(a));
    }

    #[test]
    fn test_transition_completes_after_long_uptime() {
        let (hierarchy, mut controller) = setup();
        let a = hierarchy.find("a").unwrap();
        let world = compose(&hierarchy);

        // A week of wall time in overview before the request
        controller.update(604_800.0, &world);
        for _ in 0..60 {
            controller.update(1.0 / 60.0, &world);
        }

        controller.focus(a, &hierarchy).unwrap();
        for _ in 0..600 {
            controller.update(1.0 / 60.0, &world);
        }
        assert_eq!(*controller.mode(), CameraMode::Locked(a));
    }

    #[test]
    fn test_transition_clock_starts_at_zero() {
        let (hierarchy, mut controller) = setup();
        let a = hierarchy.find("a").unwrap();
        let world = compose(&hierarchy);

        controller.update(1000.0, &world);
        controller.focus(a, &hierarchy).unwrap();
        controller.update(0.5, &world);
        let CameraMode::Transitioning(transition) = *controller.mode() else {
            panic!("expected a transition");
        };
        assert_eq!(transition.elapsed, 0.5);
        assert_eq!(transition.progress(), 0.25);
    }
}
