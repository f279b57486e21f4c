//! Timestep module - fixed-rate step accumulator
//!
//! Converts host frame deltas into whole logic steps, clamping long stalls.

use std::time::Duration;

/// Fixed timestep accumulator.
///
/// Turns variable frame deltas into a whole number of fixed logic steps so the
/// simulation runs at the same rate whatever the display refresh is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimestep {
    /// Duration of one logic step.
    step: Duration,
    /// Upper bound on a single frame delta; longer stalls are cut to this.
    max_frame_delta: Duration,
    /// Time accumulated but not yet consumed by a step.
    accumulator: Duration,
}

impl FixedTimestep {
    pub fn new(step: Duration, max_frame_delta: Duration) -> Self {
        Self {
            step,
            max_frame_delta,
            accumulator: Duration::ZERO,
        }
    }

    /// Step of `1 / hz` seconds.
    pub fn from_hz(hz: u32, max_frame_delta: Duration) -> Self {
        Self::new(Duration::from_secs(1) / hz.max(1), max_frame_delta)
    }

    /// Add a frame delta. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: Duration) -> u32 {
        let frame_dt = if frame_dt > self.max_frame_delta {
            log::warn!(
                "frame delta {:?} clamped to {:?}",
                frame_dt,
                self.max_frame_delta
            );
            self.max_frame_delta
        } else {
            frame_dt
        };

        self.accumulator += frame_dt;
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    /// Interpolation alpha for rendering between steps (0.0 to 1.0).
    pub fn alpha(&self) -> f64 {
        self.accumulator.as_secs_f64() / self.step.as_secs_f64()
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn max_frame_delta(&self) -> Duration {
        self.max_frame_delta
    }

    /// Drop any partial step, e.g. after a pause.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}
