//! # Orrery Configuration
//!
//! All tunables of the orbital scene in one serializable document:
//!
//! - **Simulation**: initial speed, speed cap, keyboard speed step, autoplay
//! - **Camera**: projection, overview vantage, follow offset, transition timing
//! - **Viewport**: initial pixel size
//! - **Render**: orbit guide generation
//! - **Bodies**: the static roster the entity hierarchy is built from
//!
//! Every section has `#[serde(default)]`, so a file only needs the values
//! it changes. Omitting `bodies` keeps the built-in solar system.

use serde::{Serialize, Deserialize};

use crate::foundation::easing::Easing;
use crate::foundation::math::Vec3;
use crate::foundation::time::DEFAULT_MAX_SPEED;
use crate::render::RingHint;

pub use crate::config::{Config, ConfigError};

/// Simulation clock settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Speed multiplier at startup
    pub initial_speed: f32,
    /// Upper bound of the speed multiplier
    pub max_speed: f32,
    /// Speed change per ArrowUp/ArrowDown press
    pub speed_step: f32,
    /// Whether simulation time runs at startup
    pub start_playing: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_speed: 1.0,
            max_speed: DEFAULT_MAX_SPEED,
            speed_step: 0.1,
            start_playing: true,
        }
    }
}

/// Camera projection and motion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
    /// Camera position in overview mode
    pub overview_position: Vec3,
    /// Look-at point in overview mode
    pub overview_target: Vec3,
    /// Offset from a locked target's world position
    pub follow_offset: Vec3,
    /// Length of a mode transition in seconds
    pub transition_duration: f32,
    /// Fraction of the remaining distance covered per tick while locked
    pub smoothing_factor: f32,
    /// Curve applied to transition progress
    pub easing: Easing,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 10_000.0,
            overview_position: Vec3::new(0.0, 50.0, 100.0),
            overview_target: Vec3::zeros(),
            follow_offset: Vec3::new(15.0, 8.0, 15.0),
            transition_duration: 2.0,
            smoothing_factor: 0.05,
            easing: Easing::CubicOut,
        }
    }
}

/// Initial viewport size in pixels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: 1280, height: 720 }
    }
}

impl ViewportConfig {
    /// Width over height
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Renderer submission settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Submit an orbit polyline for every orbiting body
    pub show_orbits: bool,
    /// Segments per orbit polyline
    pub orbit_segments: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            show_orbits: true,
            orbit_segments: 128,
        }
    }
}

/// Role of a body in the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    /// Root of the hierarchy, never orbits
    Star,
    /// Orbits the star
    Planet,
    /// Orbits a planet
    Satellite,
}

/// One entry of the static body roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Unique body name
    pub name: String,
    /// Star, planet or satellite
    pub kind: BodyKind,
    /// Name of the body this one orbits (none for the star)
    #[serde(default)]
    pub parent: Option<String>,
    /// Orbit radius around the parent
    #[serde(default)]
    pub orbit_radius: f32,
    /// Orbital angular speed in radians per simulated second
    #[serde(default)]
    pub orbital_speed: f32,
    /// Spin speed in radians per simulated second
    #[serde(default)]
    pub rotation_speed: f32,
    /// Radius used for drawing and picking
    pub radius: f32,
    /// Orbital angle at startup in radians
    #[serde(default)]
    pub initial_angle: f32,
    /// Base color as 0xRRGGBB
    #[serde(default = "default_color")]
    pub color: u32,
    /// Emissive color as 0xRRGGBB
    #[serde(default)]
    pub emissive: Option<u32>,
    /// Specular exponent hint
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    /// Ring system, if any
    #[serde(default)]
    pub rings: Option<RingHint>,
}

const fn default_color() -> u32 {
    0x00ff_ffff
}

const fn default_shininess() -> f32 {
    10.0
}

impl BodyConfig {
    /// The root body
    pub fn star(name: impl Into<String>, radius: f32) -> Self {
        Self {
            name: name.into(),
            kind: BodyKind::Star,
            parent: None,
            orbit_radius: 0.0,
            orbital_speed: 0.0,
            rotation_speed: 0.0,
            radius,
            initial_angle: 0.0,
            color: default_color(),
            emissive: None,
            shininess: default_shininess(),
            rings: None,
        }
    }

    /// A body orbiting `parent`
    pub fn orbiting(
        name: impl Into<String>,
        kind: BodyKind,
        parent: impl Into<String>,
        orbit_radius: f32,
        orbital_speed: f32,
        radius: f32,
    ) -> Self {
        Self {
            kind,
            parent: Some(parent.into()),
            orbit_radius,
            orbital_speed,
            ..Self::star(name, radius)
        }
    }

    /// Builder pattern: set spin speed
    pub fn with_rotation_speed(mut self, speed: f32) -> Self {
        self.rotation_speed = speed;
        self
    }

    /// Builder pattern: set base color
    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Builder pattern: set emissive color
    pub fn with_emissive(mut self, emissive: u32) -> Self {
        self.emissive = Some(emissive);
        self
    }

    /// Builder pattern: set shininess
    pub fn with_shininess(mut self, shininess: f32) -> Self {
        self.shininess = shininess;
        self
    }

    /// Builder pattern: add a ring system
    pub fn with_rings(mut self, inner_radius: f32, outer_radius: f32, color: u32) -> Self {
        self.rings = Some(RingHint {
            inner_radius,
            outer_radius,
            color,
        });
        self
    }

    /// Builder pattern: set starting angle
    pub fn with_initial_angle(mut self, angle: f32) -> Self {
        self.initial_angle = angle;
        self
    }
}

/// The sun, eight planets, the Moon and Phobos
pub fn default_solar_system() -> Vec<BodyConfig> {
    use BodyKind::{Planet, Satellite};

    // name, distance, speed, radius, color
    let planets: [(&str, f32, f32, f32, u32); 8] = [
        ("mercury", 15.0, 0.02, 0.8, 0x008c_7853),
        ("venus", 22.0, 0.015, 1.2, 0x00ff_c649),
        ("earth", 30.0, 0.01, 1.3, 0x006b_93d6),
        ("mars", 40.0, 0.008, 1.0, 0x00cd_5c5c),
        ("jupiter", 60.0, 0.005, 4.5, 0x00d8_ca9d),
        ("saturn", 80.0, 0.003, 3.8, 0x00fa_b27b),
        ("uranus", 100.0, 0.002, 2.5, 0x004f_d0e7),
        ("neptune", 120.0, 0.001, 2.4, 0x0041_69e1),
    ];

    let mut bodies = vec![BodyConfig::star("sun", 8.0)
        .with_rotation_speed(0.001)
        .with_color(0x00ff_d700)
        .with_emissive(0x00ff_aa00)];

    bodies.extend(planets.iter().map(|&(name, distance, speed, radius, color)| {
        let planet = BodyConfig::orbiting(name, Planet, "sun", distance, speed, radius)
            .with_rotation_speed(0.01)
            .with_color(color)
            .with_shininess(if name == "earth" { 30.0 } else { 10.0 });
        if name == "saturn" {
            planet.with_rings(5.0, 8.0, 0x00c4_a484)
        } else {
            planet
        }
    }));

    bodies.push(
        BodyConfig::orbiting("moon", Satellite, "earth", 3.0, 0.1, 0.35)
            .with_rotation_speed(0.02)
            .with_color(0x00cc_cccc),
    );
    bodies.push(
        BodyConfig::orbiting("phobos", Satellite, "mars", 2.5, 0.15, 0.2)
            .with_rotation_speed(0.02)
            .with_color(0x0088_8888),
    );

    bodies
}

/// # Complete Orrery Configuration
///
/// Top-level document handed to [`crate::view::OrreryView::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrreryConfig {
    /// Clock settings
    pub simulation: SimulationConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Initial viewport
    pub viewport: ViewportConfig,
    /// Renderer submission settings
    pub render: RenderConfig,
    /// Body selected at startup
    pub initial_selection: Option<String>,
    /// Static body roster
    pub bodies: Vec<BodyConfig>,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            camera: CameraConfig::default(),
            viewport: ViewportConfig::default(),
            render: RenderConfig::default(),
            initial_selection: None,
            bodies: default_solar_system(),
        }
    }
}

impl Config for OrreryConfig {}

impl OrreryConfig {
    /// A config with default settings and the given roster
    pub fn with_bodies(bodies: Vec<BodyConfig>) -> Self {
        Self {
            bodies,
            ..Self::default()
        }
    }

    /// Check every non-roster value
    ///
    /// The roster itself is validated when the hierarchy is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        ensure(sim.max_speed.is_finite() && sim.max_speed >= 0.0, "simulation.max_speed must be finite and >= 0")?;
        ensure(sim.speed_step.is_finite() && sim.speed_step >= 0.0, "simulation.speed_step must be finite and >= 0")?;
        ensure(sim.initial_speed.is_finite(), "simulation.initial_speed must be finite")?;

        let cam = &self.camera;
        ensure(cam.fov_degrees > 0.0 && cam.fov_degrees < 180.0, "camera.fov_degrees must be in (0, 180)")?;
        ensure(cam.near > 0.0 && cam.far > cam.near, "camera clip planes must satisfy 0 < near < far")?;
        ensure(
            cam.transition_duration.is_finite() && cam.transition_duration >= 0.0,
            "camera.transition_duration must be finite and >= 0",
        )?;
        ensure(
            cam.smoothing_factor > 0.0 && cam.smoothing_factor <= 1.0,
            "camera.smoothing_factor must be in (0, 1]",
        )?;
        ensure(cam.follow_offset.norm() > f32::EPSILON, "camera.follow_offset must be non-zero")?;
        ensure(
            (cam.overview_position - cam.overview_target).norm() > f32::EPSILON,
            "camera.overview_position must differ from camera.overview_target",
        )?;

        ensure(self.viewport.width > 0 && self.viewport.height > 0, "viewport must be non-empty")?;
        ensure(self.render.orbit_segments >= 3, "render.orbit_segments must be at least 3")?;
        Ok(())
    }
}

fn ensure(condition: bool, message: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid(message.to_string()))
    }
}
