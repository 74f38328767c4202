//! Frame timing.
//!
//! The smoke animation is driven by wall-clock seconds since the viewer
//! started, so a slow frame skips ahead rather than slowing the plume down.

use std::time::Instant;

/// Seconds since start, never decreasing.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    elapsed_secs: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
        }
    }

    /// Sample the clock. Call once per frame; returns elapsed seconds.
    pub fn update(&mut self) -> f32 {
        self.update_at(Instant::now())
    }

    /// Sample the clock as if the current instant were `now`.
    pub fn update_at(&mut self, now: Instant) -> f32 {
        let now = now.max(self.last_frame);
        self.last_frame = now;
        self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
        self.elapsed_secs
    }

    /// Seconds since start, as of the last update.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_clock_starts_at_zero() {
        let clock = FrameClock::new();
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_clock_update() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let elapsed = clock.update();
        assert!(elapsed > 0.0);
        assert_eq!(clock.elapsed(), elapsed);
    }

    #[test]
    fn test_update_at_is_exact() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        clock.update_at(start + Duration::from_millis(250));
        let elapsed = clock.update_at(start + Duration::from_millis(1000));
        assert!((elapsed - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_time_never_runs_backwards() {
        let mut clock = FrameClock::new();
        let start = clock.start;
        clock.update_at(start + Duration::from_secs(2));
        let elapsed = clock.update_at(start + Duration::from_secs(1));
        assert!((elapsed - 2.0).abs() < 1e-6);
    }
}
