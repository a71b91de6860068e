//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and operations
//! - Easing curves
//! - Simulation clock and frame timing
//! - Logging utilities

pub mod math;
pub mod easing;
pub mod time;
pub mod logging;
