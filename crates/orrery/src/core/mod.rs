//! # Core Module
//!
//! Shared configuration for every subsystem of the orrery.

pub mod config;

pub use config::{
    OrreryConfig,
    SimulationConfig,
    CameraConfig,
    ViewportConfig,
    RenderConfig,
    BodyConfig,
    BodyKind,
    Config,
    ConfigError,
};
