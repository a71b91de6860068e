//! View facade
//!
//! Orchestrates the per-frame procedure and exposes the control surface
//! read and driven by external UI.
//!
//! Each [`OrreryView::tick`] runs to completion in a fixed order:
//!
//! 1. apply queued requests in arrival order
//! 2. clock: wall delta → simulation delta
//! 3. orbit integration (skipped when the simulation delta is zero)
//! 4. world transform composition
//! 5. camera update, driven by wall time even while paused
//! 6. submission to the render backend
//!
//! Requests never touch scene state directly; they are validated, queued
//! and applied at step 1 of the next tick. Two focus requests in the same
//! tick therefore resolve last-write-wins.

use thiserror::Error;

use crate::config::ConfigError;
use crate::core::config::{OrreryConfig, RenderConfig};
use crate::foundation::time::SimulationClock;
use crate::input::{InputQueue, KeyAction, KeyCode, PointerState, ViewMessage};
use crate::render::{Camera, FrameSubmission, HighlightFlags, RenderBackend, RenderInstance};
use crate::scene::{compose, orbit_guides, EntityId, Hierarchy, HierarchyError, WorldTransforms};
use crate::systems::{OrbitSystem, PickingSystem};
use crate::view::camera_controller::{CameraController, CameraMode};

/// Which view the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewMode {
    /// Whole system from the overview vantage
    System,
    /// Following the selected body
    Body,
}

/// Diagnostic snapshot of the view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewStats {
    /// Bodies in the hierarchy
    pub entity_count: usize,
    /// Ticks run so far
    pub frame_count: u64,
    /// Accumulated simulated seconds
    pub simulation_time: f64,
    /// Current speed multiplier
    pub speed: f32,
    /// Whether simulated time is running
    pub playing: bool,
    /// Selected body
    pub selected: Option<EntityId>,
    /// Body under the pointer
    pub hovered: Option<EntityId>,
    /// Current view mode
    pub view_mode: ViewMode,
}

/// The orbital view: hierarchy, clock, camera and selection state
pub struct OrreryView<B: RenderBackend> {
    hierarchy: Hierarchy,
    world: WorldTransforms,
    clock: SimulationClock,
    camera: CameraController,
    queue: InputQueue,
    pointer: PointerState,
    render_settings: RenderConfig,
    speed_step: f32,
    selected: Option<EntityId>,
    hovered: Option<EntityId>,
    hidden: bool,
    resume_on_show: bool,
    frame_count: u64,
    simulation_time: f64,
    backend: B,
}

impl<B: RenderBackend> OrreryView<B> {
    /// Build the hierarchy and initial scene from `config`
    ///
    /// Fails on invalid settings, an invalid roster or an unknown initial
    /// selection. World transforms are composed once here so pointer
    /// requests can be resolved before the first tick.
    pub fn new(config: OrreryConfig, mut backend: B) -> Result<Self, ViewError> {
        log::info!("Initializing orrery view...");

        config.validate()?;
        let hierarchy = Hierarchy::from_roster(&config.bodies)?;

        let selected = match config.initial_selection.as_deref() {
            Some(name) => Some(
                hierarchy
                    .find(name)
                    .ok_or_else(|| RequestError::UnknownBody(name.to_string()))?,
            ),
            None => None,
        };

        let world = compose(&hierarchy);
        let sim = &config.simulation;
        let clock = SimulationClock::new(sim.initial_speed, sim.max_speed, sim.start_playing);
        let camera = CameraController::new(config.camera.clone(), config.viewport.aspect_ratio());
        let pointer = PointerState::new(config.viewport.width, config.viewport.height);
        backend.resize(config.viewport.width, config.viewport.height);

        log::info!(
            "Orrery view ready: {} bodies, {}x{} viewport, speed {:.2}x{}",
            hierarchy.len(),
            config.viewport.width,
            config.viewport.height,
            clock.speed(),
            if clock.is_playing() { "" } else { " (paused)" }
        );

        Ok(Self {
            hierarchy,
            world,
            clock,
            camera,
            queue: InputQueue::new(),
            pointer,
            render_settings: config.render,
            speed_step: sim.speed_step,
            selected,
            hovered: None,
            hidden: false,
            resume_on_show: false,
            frame_count: 0,
            simulation_time: 0.0,
            backend,
        })
    }

    // ---------------------------------------------------------------------
    // Requests
    // ---------------------------------------------------------------------

    /// Validate and queue a message for the next tick
    pub fn send(&mut self, message: ViewMessage) -> Result<(), RequestError> {
        match message {
            ViewMessage::Focus(id) | ViewMessage::Select(Some(id)) if !self.hierarchy.contains(id) => {
                log::warn!("Rejected {:?}: unknown entity", message);
                return Err(RequestError::EntityNotFound(id));
            }
            ViewMessage::Resize { width, height } if width == 0 || height == 0 => {
                log::warn!("Rejected resize to {}x{}", width, height);
                return Err(RequestError::InvalidViewport { width, height });
            }
            _ => {}
        }
        log::trace!("Queued {:?}", message);
        self.queue.push(message);
        Ok(())
    }

    /// Set the speed multiplier, clamped into `[0, max]`
    pub fn set_speed(&mut self, speed: f32) {
        self.queue.push(ViewMessage::SetSpeed(speed));
    }

    /// Change speed by whole speed steps
    pub fn adjust_speed(&mut self, steps: i32) {
        self.queue.push(ViewMessage::AdjustSpeed(steps));
    }

    /// Flip play/pause
    pub fn toggle_play(&mut self) {
        self.queue.push(ViewMessage::TogglePlay);
    }

    /// Force play or pause
    pub fn set_playing(&mut self, playing: bool) {
        self.queue.push(ViewMessage::SetPlaying(playing));
    }

    /// Select `id` and fly the camera to it
    pub fn focus(&mut self, id: EntityId) -> Result<(), RequestError> {
        self.send(ViewMessage::Focus(id))
    }

    /// [`Self::focus`] by body name
    pub fn focus_by_name(&mut self, name: &str) -> Result<EntityId, RequestError> {
        let id = self.find(name)?;
        self.focus(id)?;
        Ok(id)
    }

    /// Select `id` without moving the camera
    pub fn select(&mut self, id: EntityId) -> Result<(), RequestError> {
        self.send(ViewMessage::Select(Some(id)))
    }

    /// Clear the selection
    pub fn clear_selection(&mut self) {
        self.queue.push(ViewMessage::Select(None));
    }

    /// Fly back to the overview
    pub fn reset_view(&mut self) {
        self.queue.push(ViewMessage::ResetView);
    }

    /// Switch between system and body view
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.queue.push(ViewMessage::SetViewMode(mode));
    }

    /// Pointer moved, in NDC
    pub fn on_pointer_move(&mut self, ndc_x: f32, ndc_y: f32) {
        self.queue.push(ViewMessage::PointerMove(ndc_x, ndc_y));
    }

    /// Pointer clicked, in NDC
    pub fn on_pointer_click(&mut self, ndc_x: f32, ndc_y: f32) {
        self.queue.push(ViewMessage::PointerClick(ndc_x, ndc_y));
    }

    /// Pointer moved, in viewport pixels from the top-left corner
    ///
    /// Converted to NDC when applied, against the viewport left by any
    /// resize queued before it.
    pub fn on_pointer_move_px(&mut self, x: f64, y: f64) {
        self.queue.push(ViewMessage::PointerMovePx(x, y));
    }

    /// Pointer clicked, in viewport pixels from the top-left corner
    pub fn on_pointer_click_px(&mut self, x: f64, y: f64) {
        self.queue.push(ViewMessage::PointerClickPx(x, y));
    }

    fn pointer_ndc(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        self.pointer.update_position(x, y);
        self.pointer.screen_to_ndc()
    }

    /// Viewport resized; rejected when either dimension is zero
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), RequestError> {
        self.send(ViewMessage::Resize { width, height })
    }

    /// Key pressed
    pub fn on_key(&mut self, key: KeyCode) {
        self.queue.push(ViewMessage::Key(key));
    }

    /// The view became hidden or visible again
    pub fn on_visibility_change(&mut self, hidden: bool) {
        self.queue.push(ViewMessage::VisibilityChanged { hidden });
    }

    // ---------------------------------------------------------------------
    // Frame
    // ---------------------------------------------------------------------

    /// Run one frame and return the simulation delta it applied
    ///
    /// Negative or non-finite wall deltas count as zero.
    pub fn tick(&mut self, wall_delta: f32) -> f32 {
        let wall_delta = if wall_delta.is_finite() && wall_delta > 0.0 { wall_delta } else { 0.0 };

        let messages: Vec<ViewMessage> = self.queue.drain().collect();
        for message in messages {
            self.apply(message);
        }

        let sim_delta = self.clock.tick(wall_delta);
        if sim_delta > 0.0 {
            OrbitSystem::advance_all(&mut self.hierarchy, sim_delta);
            self.simulation_time += f64::from(sim_delta);
        }

        self.world = compose(&self.hierarchy);
        self.camera.update(wall_delta, &self.world);

        self.frame_count += 1;
        let submission = self.build_submission();
        self.backend.submit_frame(&submission);

        log::trace!(
            "Frame {}: wall {:.4}s, sim {:.4}s, camera {:?}",
            self.frame_count,
            wall_delta,
            sim_delta,
            self.camera.mode()
        );
        sim_delta
    }

    fn apply(&mut self, message: ViewMessage) {
        match message {
            ViewMessage::SetSpeed(speed) => {
                self.clock.set_speed(speed);
                log::debug!("Speed set to {:.2}x", self.clock.speed());
            }
            ViewMessage::AdjustSpeed(steps) => {
                self.clock.set_speed(self.clock.speed() + steps as f32 * self.speed_step);
                log::debug!("Speed adjusted to {:.2}x", self.clock.speed());
            }
            ViewMessage::TogglePlay if self.hidden => self.apply_playing(!self.resume_on_show),
            ViewMessage::TogglePlay => {
                let playing = self.clock.toggle_play();
                log::debug!("Simulation {}", if playing { "playing" } else { "paused" });
            }
            ViewMessage::SetPlaying(playing) => self.apply_playing(playing),
            ViewMessage::Focus(id) => self.apply_focus(id),
            ViewMessage::Select(id) => {
                self.selected = id.filter(|id| self.hierarchy.contains(*id));
            }
            ViewMessage::ResetView => self.camera.reset(),
            ViewMessage::SetViewMode(ViewMode::System) => self.camera.reset(),
            ViewMessage::SetViewMode(ViewMode::Body) => match self.selected {
                Some(id) => self.apply_focus(id),
                None => log::debug!("Body view requested with nothing selected"),
            },
            ViewMessage::PointerMove(x, y) => {
                self.hovered = PickingSystem::pick((x, y), self.camera.camera(), &self.hierarchy, &self.world);
            }
            ViewMessage::PointerClick(x, y) => {
                if let Some(id) = PickingSystem::pick((x, y), self.camera.camera(), &self.hierarchy, &self.world) {
                    self.apply_focus(id);
                }
            }
            ViewMessage::PointerMovePx(x, y) => {
                if let Some((ndc_x, ndc_y)) = self.pointer_ndc(x, y) {
                    self.apply(ViewMessage::PointerMove(ndc_x, ndc_y));
                }
            }
            ViewMessage::PointerClickPx(x, y) => {
                if let Some((ndc_x, ndc_y)) = self.pointer_ndc(x, y) {
                    self.apply(ViewMessage::PointerClick(ndc_x, ndc_y));
                }
            }
            ViewMessage::Resize { width, height } => {
                self.camera.set_aspect_ratio(width as f32 / height as f32);
                self.pointer.update_viewport(width, height);
                self.backend.resize(width, height);
            }
            ViewMessage::Key(key) => self.apply_key(key),
            ViewMessage::VisibilityChanged { hidden } => self.apply_visibility(hidden),
        }
    }

    fn apply_focus(&mut self, id: EntityId) {
        match self.camera.focus(id, &self.hierarchy) {
            Ok(()) => {
                self.selected = Some(id);
                if let Some(entity) = self.hierarchy.get(id) {
                    log::debug!("Focusing '{}'", entity.name());
                }
            }
            Err(err) => log::warn!("Focus request dropped: {}", err),
        }
    }

    fn apply_key(&mut self, key: KeyCode) {
        match key.action() {
            Some(KeyAction::TogglePlay) => self.apply(ViewMessage::TogglePlay),
            Some(KeyAction::ResetView) => self.camera.reset(),
            Some(KeyAction::AdjustSpeed(steps)) => self.apply(ViewMessage::AdjustSpeed(steps)),
            Some(KeyAction::FocusPlanet(index)) => {
                let planet = self.hierarchy.planets().nth(index);
                match planet {
                    Some(id) => self.apply_focus(id),
                    None => log::debug!("No planet #{} to focus", index + 1),
                }
            }
            None => {}
        }
    }

    /// While hidden, play requests only change what happens on show
    fn apply_playing(&mut self, playing: bool) {
        if self.hidden {
            self.resume_on_show = playing;
            log::debug!("Simulation will {} when shown", if playing { "play" } else { "stay paused" });
        } else {
            self.clock.set_playing(playing);
            log::debug!("Simulation {}", if playing { "playing" } else { "paused" });
        }
    }

    fn apply_visibility(&mut self, hidden: bool) {
        if hidden == self.hidden {
            return;
        }
        self.hidden = hidden;
        if hidden {
            self.resume_on_show = self.clock.is_playing();
            self.clock.set_playing(false);
            log::debug!("View hidden; simulation paused");
        } else if self.resume_on_show {
            self.clock.set_playing(true);
            log::debug!("View visible; simulation resumed");
        }
    }

    fn build_submission(&self) -> FrameSubmission {
        let focused = self.camera.focus_target();

        let instances = self
            .hierarchy
            .iter()
            .filter_map(|(id, entity)| {
                let world = self.world.get(id)?;
                let mut highlight = HighlightFlags::empty();
                highlight.set(HighlightFlags::HOVERED, self.hovered == Some(id));
                highlight.set(HighlightFlags::SELECTED, self.selected == Some(id));
                highlight.set(HighlightFlags::FOCUSED, focused == Some(id));

                Some(RenderInstance {
                    entity: id,
                    world_matrix: world.to_matrix(),
                    visual_radius: entity.visual_radius(),
                    material: *entity.material(),
                    highlight,
                })
            })
            .collect();

        let orbit_guides = if self.render_settings.show_orbits {
            orbit_guides(&self.hierarchy, &self.world, self.render_settings.orbit_segments)
        } else {
            Vec::new()
        };

        FrameSubmission {
            frame: self.frame_count,
            instances,
            camera: self.camera.snapshot(),
            orbit_guides,
        }
    }

    // ---------------------------------------------------------------------
    // Observable state
    // ---------------------------------------------------------------------

    /// Current speed multiplier
    pub fn speed(&self) -> f32 {
        self.clock.speed()
    }

    /// Upper bound of the speed multiplier
    pub fn max_speed(&self) -> f32 {
        self.clock.max_speed()
    }

    /// Whether simulated time is running
    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Selected body
    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    /// Body under the pointer
    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    /// `Body` while the camera follows or flies to a body
    pub fn view_mode(&self) -> ViewMode {
        if self.camera.focus_target().is_some() {
            ViewMode::Body
        } else {
            ViewMode::System
        }
    }

    /// Camera state machine mode
    pub fn camera_mode(&self) -> &CameraMode {
        self.camera.mode()
    }

    /// The camera
    pub fn camera(&self) -> &Camera {
        self.camera.camera()
    }

    /// The body hierarchy
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// World transforms of the latest frame
    pub fn world_transforms(&self) -> &WorldTransforms {
        &self.world
    }

    /// Look up a body by name
    pub fn find(&self, name: &str) -> Result<EntityId, RequestError> {
        self.hierarchy
            .find(name)
            .ok_or_else(|| RequestError::UnknownBody(name.to_string()))
    }

    /// Requests waiting for the next tick
    pub fn pending_requests(&self) -> usize {
        self.queue.len()
    }

    /// Diagnostic snapshot
    pub fn stats(&self) -> ViewStats {
        ViewStats {
            entity_count: self.hierarchy.len(),
            frame_count: self.frame_count,
            simulation_time: self.simulation_time,
            speed: self.clock.speed(),
            playing: self.clock.is_playing(),
            selected: self.selected,
            hovered: self.hovered,
            view_mode: self.view_mode(),
        }
    }

    /// The render backend
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// A request that could not be accepted; state is unchanged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The id names no body of this hierarchy
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),

    /// No body has this name
    #[error("no body named '{0}'")]
    UnknownBody(String),

    /// Viewport with a zero dimension
    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// The view could not be constructed
#[derive(Error, Debug)]
pub enum ViewError {
    /// Invalid settings
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid body roster
    #[error("Hierarchy error: {0}")]
    Hierarchy(#[from] HierarchyError),

    /// Invalid startup request, such as an unknown initial selection
    #[error("Request error: {0}")]
    Request(#[from] RequestError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{BodyConfig, BodyKind};
    use crate::render::RecordingBackend;

    fn view() -> OrreryView<RecordingBackend> {
        OrreryView::new(OrreryConfig::default(), RecordingBackend::new()).unwrap()
    }

    #[test]
    fn test_construction_reports_viewport() {
        let view = view();
        assert_eq!(view.backend().viewport(), Some((1280, 720)));
        assert_eq!(view.world_transforms().len(), 11);
        assert_eq!(view.view_mode(), ViewMode::System);
    }

    #[test]
    fn test_invalid_roster_fails() {
        let config = OrreryConfig::with_bodies(vec![
            BodyConfig::star("sun", 1.0),
            BodyConfig::orbiting("p", BodyKind::Planet, "ghost", 1.0, 1.0, 1.0),
        ]);
        assert!(matches!(
            OrreryView::new(config, RecordingBackend::new()),
            Err(ViewError::Hierarchy(HierarchyError::UnknownParent { .. }))
        ));
    }

    #[test]
    fn test_unknown_initial_selection_fails() {
        let config = OrreryConfig {
            initial_selection: Some("vulcan".to_string()),
            ..OrreryConfig::default()
        };
        assert!(matches!(
            OrreryView::new(config, RecordingBackend::new()),
            Err(ViewError::Request(RequestError::UnknownBody(_)))
        ));
    }

    #[test]
    fn test_requests_apply_on_next_tick() {
        let mut view = view();
        view.set_speed(3.0);
        view.toggle_play();
        assert_eq!(view.speed(), 1.0);
        assert!(view.is_playing());
        assert_eq!(view.pending_requests(), 2);

        assert_eq!(view.tick(0.5), 0.0);
        assert_eq!(view.speed(), 3.0);
        assert!(!view.is_playing());
        assert_eq!(view.pending_requests(), 0);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut view = view();
        view.set_speed(50.0);
        view.tick(0.0);
        assert_eq!(view.speed(), view.max_speed());

        view.set_speed(-2.0);
        view.tick(0.0);
        assert_eq!(view.speed(), 0.0);
        assert_eq!(view.tick(1.0), 0.0);
    }

    #[test]
    fn test_resize_validation() {
        let mut view = view();
        assert_eq!(
            view.on_resize(0, 600),
            Err(RequestError::InvalidViewport { width: 0, height: 600 })
        );
        view.on_resize(600, 600).unwrap();
        view.on_resize(600, 600).unwrap();
        view.tick(0.016);
        assert_eq!(view.camera().aspect, 1.0);
        assert_eq!(view.backend().viewport(), Some((600, 600)));
    }

    #[test]
    fn test_focus_by_name_selects_and_locks() {
        let mut view = view();
        let earth = view.focus_by_name("earth").unwrap();
        assert!(view.focus_by_name("vulcan").is_err());

        view.tick(0.016);
        assert_eq!(view.selected(), Some(earth));
        assert_eq!(view.view_mode(), ViewMode::Body);

        for _ in 0..150 {
            view.tick(1.0 / 60.0);
        }
        assert_eq!(*view.camera_mode(), CameraMode::Locked(earth));
    }

    #[test]
    fn test_keyboard_shortcuts() {
        let mut view = view();
        view.on_key(KeyCode::ArrowUp);
        view.on_key(KeyCode::ArrowUp);
        view.on_key(KeyCode::Digit(3));
        view.on_key(KeyCode::Space);
        view.tick(0.016);

        assert!((view.speed() - 1.2).abs() < 1e-5);
        assert!(!view.is_playing());
        let earth = view.find("earth").unwrap();
        assert_eq!(view.camera_mode().focus_target(), Some(earth));

        view.on_key(KeyCode::R);
        view.on_key(KeyCode::Digit(9));
        view.tick(0.016);
        assert_eq!(view.view_mode(), ViewMode::System);
    }

    #[test]
    fn test_view_mode_body_needs_selection() {
        let mut view = view();
        view.set_view_mode(ViewMode::Body);
        view.tick(0.016);
        assert_eq!(view.view_mode(), ViewMode::System);

        let mars = view.find("mars").unwrap();
        view.select(mars).unwrap();
        view.set_view_mode(ViewMode::Body);
        view.tick(0.016);
        assert_eq!(view.camera_mode().focus_target(), Some(mars));

        view.set_view_mode(ViewMode::System);
        view.tick(0.016);
        assert_eq!(view.view_mode(), ViewMode::System);
        assert_eq!(view.selected(), Some(mars));
    }

    #[test]
    fn test_visibility_pauses_and_restores() {
        let mut view = view();
        view.on_visibility_change(true);
        view.tick(0.016);
        assert!(!view.is_playing());
        view.on_visibility_change(false);
        view.tick(0.016);
        assert!(view.is_playing());

        // Paused before hiding stays paused after showing
        view.set_playing(false);
        view.on_visibility_change(true);
        view.on_visibility_change(false);
        view.tick(0.016);
        assert!(!view.is_playing());
    }

    #[test]
    fn test_play_requests_while_hidden_apply_on_show() {
        let mut view = view();
        view.on_visibility_change(true);
        view.toggle_play();
        view.tick(0.016);
        assert!(!view.is_playing());
        assert_eq!(view.tick(1.0), 0.0);

        // The toggle cancelled the resume
        view.on_visibility_change(false);
        view.tick(0.016);
        assert!(!view.is_playing());

        view.on_visibility_change(true);
        view.on_key(KeyCode::Space);
        view.tick(0.016);
        assert!(!view.is_playing());
        view.on_visibility_change(false);
        view.tick(0.016);
        assert!(view.is_playing());
    }

    #[test]
    fn test_submission_carries_highlights() {
        let mut view = view();
        let saturn = view.find("saturn").unwrap();
        view.select(saturn).unwrap();
        view.tick(0.016);

        let frame = view.backend().last_frame().unwrap();
        assert_eq!(frame.frame, 1);
        assert_eq!(frame.instances.len(), 11);
        assert_eq!(frame.orbit_guides.len(), 10);
        let instance = frame.instances.iter().find(|i| i.entity == saturn).unwrap();
        assert_eq!(instance.highlight, HighlightFlags::SELECTED);
        let rings = instance.material.rings.unwrap();
        assert_eq!((rings.inner_radius, rings.outer_radius), (5.0, 8.0));

        view.clear_selection();
        view.tick(0.016);
        assert_eq!(view.selected(), None);
        assert_eq!(view.stats().frame_count, 2);
        assert_eq!(view.backend().frames_submitted(), 2);
    }
}
