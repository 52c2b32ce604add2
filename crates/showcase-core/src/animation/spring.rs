#![forbid(unsafe_code)]

//! Damped springs for cursor motion.
//!
//! Each axis integrates `a = -k·(x - target) - c·v` with semi-implicit Euler.
//! With the cursor defaults (`k = 170`, `c = 26`) the motion is just under
//! critical damping: a fast glide with no visible overshoot.
//!
//! # Invariants
//!
//! 1. A resting spring stays put until its target changes.
//! 2. Retargeting keeps position and velocity, so a glide that is
//!    redirected mid-flight bends instead of jumping.
//! 3. [`Spring::snap_to`] is the only discontinuous move.
//! 4. Every `advance` is integrated in sub-steps of at most 4ms, so the
//!    result does not depend on how a span of time is split across calls
//!    by more than rounding.

use std::time::Duration;

use crate::geometry::Point;

const MAX_STEP_SECS: f64 = 0.004;
const MIN_STIFFNESS: f64 = 0.1;

/// One damped axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    /// Settle when both `|x - target|` is below this and `|v|` is below twice it.
    rest_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// A spring resting at `origin`.
    #[must_use]
    pub fn new(origin: f64, stiffness: f64, damping: f64, rest_threshold: f64) -> Self {
        Self {
            position: origin,
            velocity: 0.0,
            target: origin,
            stiffness: stiffness.max(MIN_STIFFNESS),
            damping: damping.max(0.0),
            rest_threshold: rest_threshold.abs(),
            at_rest: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Move the target. Targets within the rest threshold are ignored.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() > self.rest_threshold {
            self.target = target;
            self.at_rest = false;
        }
    }

    /// Jump to `position` and rest there.
    pub fn snap_to(&mut self, position: f64) {
        self.position = position;
        self.target = position;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }
        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP_SECS);
            let accel =
                -self.stiffness * (self.position - self.target) - self.damping * self.velocity;
            self.velocity += accel * h;
            self.position += self.velocity * h;
            remaining -= h;
        }
        let settled = (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.rest_threshold * 2.0;
        if settled {
            self.snap_to(self.target);
        }
    }
}

/// A pair of springs moving a point, one per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringPoint {
    x: Spring,
    y: Spring,
}

impl SpringPoint {
    /// A point resting at `origin`.
    #[must_use]
    pub fn new(origin: Point, stiffness: f64, damping: f64, rest_threshold: f64) -> Self {
        Self {
            x: Spring::new(origin.x, stiffness, damping, rest_threshold),
            y: Spring::new(origin.y, stiffness, damping, rest_threshold),
        }
    }

    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x.position(), self.y.position())
    }

    #[must_use]
    pub fn target(&self) -> Point {
        Point::new(self.x.target(), self.y.target())
    }

    pub fn set_target(&mut self, target: Point) {
        self.x.set_target(target.x);
        self.y.set_target(target.y);
    }

    pub fn snap_to(&mut self, point: Point) {
        self.x.snap_to(point.x);
        self.y.snap_to(point.y);
    }

    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.x.is_at_rest() && self.y.is_at_rest()
    }

    pub fn advance(&mut self, dt: Duration) {
        self.x.advance(dt);
        self.y.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn cursor_axis(origin: f64) -> Spring {
        Spring::new(origin, 170.0, 26.0, 0.5)
    }

    #[test]
    fn new_spring_rests_on_origin() {
        let spring = cursor_axis(5.0);
        assert!(spring.is_at_rest());
        assert_eq!(spring.target(), 5.0);
    }

    #[test]
    fn settles_exactly_on_target() {
        let mut spring = cursor_axis(0.0);
        spring.set_target(400.0);
        for _ in 0..200 {
            spring.advance(FRAME);
        }
        assert!(spring.is_at_rest());
        assert_eq!(spring.position(), 400.0);
    }

    #[test]
    fn tiny_retarget_is_ignored() {
        let mut spring = cursor_axis(10.0);
        spring.set_target(10.3);
        assert!(spring.is_at_rest());
        assert_eq!(spring.target(), 10.0);
    }

    #[test]
    fn retarget_mid_glide_is_continuous() {
        let mut spring = cursor_axis(0.0);
        spring.set_target(500.0);
        for _ in 0..5 {
            spring.advance(FRAME);
        }
        let before = spring.position();
        spring.set_target(-500.0);
        assert_eq!(spring.position(), before);
        spring.advance(FRAME);
        assert!((spring.position() - before).abs() < 100.0);
    }

    #[test]
    fn one_long_advance_matches_many_short_ones() {
        let mut whole = cursor_axis(0.0);
        let mut split = cursor_axis(0.0);
        whole.set_target(300.0);
        split.set_target(300.0);
        whole.advance(Duration::from_millis(200));
        for _ in 0..50 {
            split.advance(Duration::from_millis(4));
        }
        assert!((whole.position() - split.position()).abs() < 1e-6);
    }

    #[test]
    fn zero_stiffness_is_clamped() {
        let mut spring = Spring::new(0.0, 0.0, 0.0, 0.5);
        spring.set_target(10.0);
        spring.advance(FRAME);
        assert!(spring.position() > 0.0);
    }

    #[test]
    fn point_converges_on_both_axes() {
        let mut point = SpringPoint::new(Point::new(0.0, 0.0), 170.0, 26.0, 0.5);
        point.set_target(Point::new(300.0, -120.0));
        assert!(!point.is_at_rest());
        for _ in 0..300 {
            point.advance(FRAME);
        }
        assert!(point.is_at_rest());
        assert_eq!(point.position(), Point::new(300.0, -120.0));
    }

    #[test]
    fn point_never_teleports() {
        let mut point = SpringPoint::new(Point::new(0.0, 0.0), 170.0, 26.0, 0.5);
        point.set_target(Point::new(1000.0, 0.0));
        let mut last = point.position();
        for _ in 0..60 {
            point.advance(FRAME);
            let now = point.position();
            assert!(now.distance(last) < 200.0, "jumped from {last:?} to {now:?}");
            last = now;
        }
    }
}
