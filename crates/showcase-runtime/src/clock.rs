#![forbid(unsafe_code)]

//! Frame clock: wall-clock frame timestamps to capped deltas.
//!
//! Uses `web_time::Instant` so the same code runs natively and on
//! `wasm32-unknown-unknown`, where `std::time::Instant` panics.

use std::time::Duration;
use web_time::Instant;

/// Default cap on a single frame delta.
pub const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Converts successive frame timestamps into deltas for `tick`.
///
/// The first frame after construction or [`reset`](Self::reset) yields zero.
/// Gaps longer than `max_delta` (a backgrounded tab, a debugger pause) are
/// capped, so a long stall advances virtual time by at most one cap.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: Duration,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_DELTA)
    }
}

impl FrameClock {
    /// Create a clock with the given delta cap.
    #[must_use]
    pub fn new(max_delta: Duration) -> Self {
        Self {
            last: None,
            max_delta,
        }
    }

    /// Delta cap.
    #[inline]
    pub fn max_delta(&self) -> Duration {
        self.max_delta
    }

    /// Record a frame at the current instant and return the capped delta.
    pub fn frame(&mut self) -> Duration {
        self.frame_at(Instant::now())
    }

    /// Record a frame at `now` and return the capped delta.
    pub fn frame_at(&mut self, now: Instant) -> Duration {
        let delta = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        if delta > self.max_delta {
            tracing::debug!(
                target: "showcase.runtime",
                gap_ms = delta.as_millis() as u64,
                cap_ms = self.max_delta.as_millis() as u64,
                "frame gap capped"
            );
            self.max_delta
        } else {
            delta
        }
    }

    /// Forget the previous frame; the next frame yields zero.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.frame_at(Instant::now()), Duration::ZERO);
    }

    #[test]
    fn successive_frames_yield_gap() {
        let mut clock = FrameClock::default();
        let t0 = Instant::now();
        clock.frame_at(t0);
        assert_eq!(
            clock.frame_at(t0 + Duration::from_millis(16)),
            Duration::from_millis(16)
        );
    }

    #[test]
    fn long_gap_is_capped() {
        let mut clock = FrameClock::new(Duration::from_millis(100));
        let t0 = Instant::now();
        clock.frame_at(t0);
        assert_eq!(
            clock.frame_at(t0 + Duration::from_secs(30)),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn out_of_order_instant_yields_zero() {
        let mut clock = FrameClock::default();
        let t0 = Instant::now() + Duration::from_secs(1);
        clock.frame_at(t0);
        assert_eq!(clock.frame_at(t0 - Duration::from_millis(5)), Duration::ZERO);
    }

    #[test]
    fn reset_restarts_from_zero() {
        let mut clock = FrameClock::default();
        let t0 = Instant::now();
        clock.frame_at(t0);
        clock.reset();
        assert_eq!(
            clock.frame_at(t0 + Duration::from_millis(40)),
            Duration::ZERO
        );
    }
}
