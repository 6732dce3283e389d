//! Fixed-timestep frame clock
//!
//! Turns variable host frame times into a whole number of simulation ticks.

use std::time::Duration;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// What one host frame asks of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStep {
    /// Fixed ticks to run
    pub ticks: u32,
    /// Real time since the previous frame, unclamped and never dropped
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    /// Host timestamp of the previous frame (ms)
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wall-clock time each tick stands for
    pub fn tick_duration() -> Duration {
        Duration::from_secs_f32(SIM_DT)
    }

    /// Feed a host timestamp in milliseconds (e.g. from `requestAnimationFrame`)
    /// and get the ticks to run this frame plus the real time that passed.
    ///
    /// Slow frames lose simulation ticks past the substep cap, but `elapsed`
    /// always carries the full delta so wall-clock timers stay accurate.
    pub fn advance_to(&mut self, now_ms: f64) -> FrameStep {
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0),
            None => SIM_DT as f64,
        };
        self.last_time = Some(now_ms);
        FrameStep {
            ticks: self.advance(dt as f32),
            elapsed: Duration::from_secs_f64(dt),
        }
    }

    /// Accumulate `dt` seconds and return the number of ticks due
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop time we could not catch up on instead of carrying it forward
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::debug!("Frame clock dropped {:.1} ms", self.accumulator * 1000.0);
            self.accumulator = 0.0;
        }

        substeps
    }

    /// Forget the previous timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_runs_one_tick() {
        let mut clock = FrameClock::new();
        let step = clock.advance_to(1000.0);
        assert_eq!(step.ticks, 1);
        assert_eq!(step.elapsed, Duration::from_secs_f64(SIM_DT as f64));
    }

    #[test]
    fn test_steady_60hz() {
        let mut clock = FrameClock::new();
        clock.advance_to(0.0);
        let mut total = 0;
        for i in 1..=60 {
            total += clock.advance_to(i as f64 * 1000.0 / 60.0).ticks;
        }
        assert!((59..=60).contains(&total));
    }

    #[test]
    fn test_slow_frame_capped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(0.5), MAX_SUBSTEPS);
        // Backlog is dropped, not replayed next frame
        assert_eq!(clock.advance(0.0), 0);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), 0);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.advance_to(0.0);
        clock.reset();
        // After a reset the next frame counts as a first frame
        assert_eq!(clock.advance_to(60_000.0).ticks, 1);
    }

    #[test]
    fn test_slow_frame_keeps_real_elapsed() {
        let mut clock = FrameClock::new();
        clock.advance_to(0.0);
        let step = clock.advance_to(500.0);
        assert_eq!(step.ticks, MAX_SUBSTEPS);
        assert_eq!(step.elapsed, Duration::from_millis(500));
    }

    #[test]
    fn test_fast_frame_may_run_no_ticks() {
        let mut clock = FrameClock::new();
        clock.advance_to(0.0);
        let step = clock.advance_to(4.0);
        assert_eq!(step.ticks, 0);
        assert_eq!(step.elapsed, Duration::from_millis(4));
    }

    #[test]
    fn test_backwards_timestamp_is_zero_elapsed() {
        let mut clock = FrameClock::new();
        clock.advance_to(100.0);
        assert_eq!(clock.advance_to(50.0).elapsed, Duration::ZERO);
    }

    #[test]
    fn test_tick_duration() {
        let d = FrameClock::tick_duration();
        assert!(d > Duration::from_millis(16) && d < Duration::from_millis(17));
    }
}
