#![forbid(unsafe_code)]

//! Simulated pointer.
//!
//! The animator keeps a [`SpringPoint`] per cursor and publishes its position
//! through an [`Observable<CursorState>`]. [`CursorAnimator::move_to`] only
//! retargets the spring; the published position catches up as time is fed in
//! with [`CursorAnimator::advance`], so the pointer glides rather than
//! teleports. The click pulse is a flag the owner raises and lowers; the
//! sequencer schedules the lowering as a timer.

use std::time::Duration;

use showcase_core::{Point, Size, SpringPoint};
use showcase_runtime::{Observable, StateView};

use crate::config::CursorConfig;

/// Published pointer state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorState {
    pub x: f64,
    pub y: f64,
    /// Whether the pointer is drawn at all.
    pub active: bool,
    /// Short-lived press pulse.
    pub clicking: bool,
}

impl CursorState {
    /// Position as a point.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Drives the simulated pointer.
#[derive(Debug)]
pub struct CursorAnimator {
    spring: SpringPoint,
    config: CursorConfig,
    centered: bool,
    state: Observable<CursorState>,
}

impl CursorAnimator {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            spring: Self::spring_at(Point::default(), &config),
            config,
            centered: false,
            state: Observable::new(CursorState::default()),
        }
    }

    fn spring_at(origin: Point, config: &CursorConfig) -> SpringPoint {
        SpringPoint::new(
            origin,
            config.stiffness,
            config.damping,
            config.rest_threshold,
        )
    }

    /// Read-only view for renderers.
    pub fn view(&self) -> StateView<CursorState> {
        self.state.view()
    }

    /// Current published state.
    pub fn state(&self) -> CursorState {
        self.state.get()
    }

    /// Spring target.
    pub fn target(&self) -> Point {
        self.spring.target()
    }

    /// Place the pointer at the viewport center, once.
    ///
    /// Later calls are no-ops so a restarted tour continues from wherever
    /// the pointer last was.
    pub fn center_once(&mut self, viewport: Size) {
        if self.centered {
            return;
        }
        self.centered = true;
        let center = viewport.center();
        self.spring.snap_to(center);
        self.state.update(|s| {
            s.x = center.x;
            s.y = center.y;
        });
    }

    /// Start travelling toward `point`.
    ///
    /// Returns `true` when the pointer has to travel, i.e. it was hidden or
    /// it is further than the rest threshold from `point`.
    pub fn move_to(&mut self, point: Point) -> bool {
        let was_active = self.state.with(|s| s.active);
        let travels = !was_active || self.spring.position().distance(point) > self.config.rest_threshold;
        self.spring.set_target(point);
        self.set_active(true);
        travels
    }

    pub fn set_active(&mut self, active: bool) {
        self.state.update(|s| s.active = active);
    }

    /// Raise the press pulse.
    pub fn pulse_click(&mut self) {
        self.state.update(|s| s.clicking = true);
    }

    /// Lower the press pulse.
    pub fn release_click(&mut self) {
        self.state.update(|s| s.clicking = false);
    }

    /// Feed `dt` into the spring and publish the new position.
    pub fn advance(&mut self, dt: Duration) {
        if dt.is_zero() || self.spring.is_at_rest() {
            return;
        }
        self.spring.advance(dt);
        let pos = self.spring.position();
        self.state.update(|s| {
            s.x = pos.x;
            s.y = pos.y;
        });
    }

    /// Hide the pointer and drop any pulse. Position is kept.
    pub fn deactivate(&mut self) {
        self.state.update(|s| {
            s.active = false;
            s.clicking = false;
        });
    }
}
