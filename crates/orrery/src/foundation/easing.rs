//! Easing curves for camera interpolation
//!
//! Pure functions of normalized time. No scene or camera dependencies.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Easing curve applied to transition progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant velocity
    Linear,
    /// Slow end
    QuadOut,
    /// Stronger slow end: `1 - (1 - t)^3`
    #[default]
    CubicOut,
    /// Slow start and end
    CubicInOut,
    /// Sine-shaped slow start and end
    SineInOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to `[0, 1]`
    ///
    /// Every curve maps 0 to 0 and 1 to 1.
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Easing; 5] = [
        Easing::Linear,
        Easing::QuadOut,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::SineInOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for easing in ALL {
            assert_relative_eq!(easing.apply(0.0), 0.0, epsilon = 1e-6);
            assert_relative_eq!(easing.apply(1.0), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn cubic_out_matches_formula() {
        assert_relative_eq!(Easing::CubicOut.apply(0.5), 0.875, epsilon = 1e-6);
        assert_relative_eq!(Easing::CubicOut.apply(0.25), 1.0 - 0.75_f32.powi(3), epsilon = 1e-6);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(Easing::CubicOut.apply(-3.0), 0.0);
        assert_eq!(Easing::CubicOut.apply(7.0), 1.0);
        assert_eq!(Easing::CubicOut.apply(f32::NAN), 0.0);
    }
}
