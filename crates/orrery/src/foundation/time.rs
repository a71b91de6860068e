//! Time management utilities
//!
//! [`SimulationClock`] turns wall-clock frame deltas into simulation deltas.
//! [`Timer`] measures the wall-clock deltas for hosts running in real time.

use std::time::Instant;

/// Default upper bound for the speed multiplier
pub const DEFAULT_MAX_SPEED: f32 = 5.0;

/// Play/pause state and speed multiplier driving the simulation
///
/// `tick` is a pure function of the control state and the wall delta, so
/// tests can feed synthetic deltas without a real clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    speed_multiplier: f32,
    max_speed: f32,
    is_playing: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(1.0, DEFAULT_MAX_SPEED, true)
    }
}

impl SimulationClock {
    /// Create a clock; `speed` is clamped into `[0, max_speed]`
    pub fn new(speed: f32, max_speed: f32, is_playing: bool) -> Self {
        let max_speed = if max_speed.is_finite() { max_speed.max(0.0) } else { DEFAULT_MAX_SPEED };
        let mut clock = Self {
            speed_multiplier: 0.0,
            max_speed,
            is_playing,
        };
        clock.set_speed(speed);
        clock
    }

    /// Convert a wall-clock delta into a simulation delta
    ///
    /// Returns exactly zero while paused, whatever the wall delta. Negative
    /// and non-finite wall deltas count as zero, as does a product that
    /// overflows.
    pub fn tick(&self, wall_delta_seconds: f32) -> f32 {
        if !self.is_playing || !wall_delta_seconds.is_finite() || wall_delta_seconds <= 0.0 {
            return 0.0;
        }
        let sim_delta = wall_delta_seconds * self.speed_multiplier;
        if sim_delta.is_finite() {
            sim_delta
        } else {
            0.0
        }
    }

    /// Set the speed multiplier, clamped into `[0, max_speed]`
    ///
    /// NaN is treated as zero and `+inf` as the cap.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed_multiplier = if speed.is_nan() { 0.0 } else { speed.clamp(0.0, self.max_speed) };
    }

    /// Current speed multiplier
    pub fn speed(&self) -> f32 {
        self.speed_multiplier
    }

    /// Upper bound of the speed multiplier
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Whether simulation time advances
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Start or stop simulation time
    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
    }

    /// Flip play/pause, returning the new state
    pub fn toggle_play(&mut self) -> bool {
        self.is_playing = !self.is_playing;
        self.is_playing
    }
}

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }
    
    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }
    
    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }
    
    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }
    
    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paused_clock_never_accumulates() {
        let clock = SimulationClock::new(3.0, 5.0, false);
        assert_eq!(clock.tick(0.016), 0.0);
        assert_eq!(clock.tick(1.0e6), 0.0);
        assert_eq!(clock.tick(f32::MAX), 0.0);
    }

    #[test]
    fn test_playing_clock_scales_by_speed() {
        let clock = SimulationClock::new(2.5, 5.0, true);
        assert_eq!(clock.tick(0.5), 1.25);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut clock = SimulationClock::default();
        clock.set_speed(50.0);
        assert_eq!(clock.speed(), DEFAULT_MAX_SPEED);
        clock.set_speed(-1.0);
        assert_eq!(clock.speed(), 0.0);
        clock.set_speed(f32::NAN);
        assert_eq!(clock.speed(), 0.0);
        clock.set_speed(f32::INFINITY);
        assert_eq!(clock.speed(), DEFAULT_MAX_SPEED);
    }

    #[test]
    fn test_zero_speed_yields_zero_delta() {
        let clock = SimulationClock::new(0.0, 5.0, true);
        assert_eq!(clock.tick(0.25), 0.0);
    }

    #[test]
    fn test_bad_wall_deltas_are_ignored() {
        let clock = SimulationClock::default();
        assert_eq!(clock.tick(-0.1), 0.0);
        assert_eq!(clock.tick(f32::NAN), 0.0);
        assert_eq!(clock.tick(f32::INFINITY), 0.0);
    }

    #[test]
    fn test_overflowing_delta_is_ignored() {
        let clock = SimulationClock::new(2.0, 5.0, true);
        assert_eq!(clock.tick(f32::MAX), 0.0);
        assert_eq!(clock.tick(1.0), 2.0);
    }

    #[test]
    fn test_toggle_play() {
        let mut clock = SimulationClock::default();
        assert!(!clock.toggle_play());
        assert!(clock.toggle_play());
    }

    #[test]
    fn test_timer_counts_frames() {
        let mut timer = Timer::new();
        timer.update();
        timer.update();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.total_time() >= timer.delta_time());
    }
}
