//! Frame clock for the render loop.
//!
//! The scene advances by fixed per-frame increments, so the clock is only used for
//! wall-clock cosmetics (the patrol craft wobble) and frame statistics.

use std::time::{Duration, Instant};

/// Tracks wall-clock time between redraws.
#[derive(Debug, Clone)]
pub struct FrameClock {
    started: Instant,
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Clock whose epoch is `start` (lets tests drive time explicitly).
    pub fn starting_at(start: Instant) -> Self {
        Self {
            started: start,
            last_frame: start,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Mark the start of a new frame at the current instant.
    pub fn tick(&mut self) {
        self.advance_to(Instant::now());
    }

    /// Mark the start of a new frame at `now`. Instants earlier than the previous
    /// frame yield a zero delta.
    pub fn advance_to(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = self.last_frame.max(now);
        self.frame_count += 1;
    }

    /// Seconds since the clock started, as of the last tick.
    pub fn elapsed_seconds(&self) -> f64 {
        self.last_frame.duration_since(self.started).as_secs_f64()
    }

    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Instantaneous frames per second from the last delta.
    pub fn fps(&self) -> f32 {
        let dt = self.delta.as_secs_f32();
        if dt > 0.0 {
            1.0 / dt
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_elapsed_and_frames() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.advance_to(start + Duration::from_millis(16));
        clock.advance_to(start + Duration::from_millis(32));
        assert_eq!(clock.frame_count(), 2);
        assert!((clock.elapsed_seconds() - 0.032).abs() < 1e-6);
        assert!((clock.delta_seconds() - 0.016).abs() < 1e-6);
    }

    #[test]
    fn going_backwards_is_a_zero_delta() {
        let start = Instant::now();
        let mut clock = FrameClock::starting_at(start);
        clock.advance_to(start + Duration::from_millis(50));
        clock.advance_to(start + Duration::from_millis(10));
        assert_eq!(clock.delta_seconds(), 0.0);
        assert_eq!(clock.fps(), 0.0);
        assert!((clock.elapsed_seconds() - 0.05).abs() < 1e-6);
    }
}
