#![forbid(unsafe_code)]

//! Tour sequencer.
//!
//! The [`Sequencer`] walks a snapshot of [`ShowcaseStep`]s, resolving each
//! target through the [`Locator`], spotlighting it through the
//! [`HighlightEffector`], placing the bubble, and moving the simulated
//! cursor. All waiting is done with timers in a [`TimerQueue`] that only
//! advances when the host calls [`Sequencer::tick`].
//!
//! # State machine
//!
//! ```text
//! Idle ──start──▶ Running(0) ─▶ Running(1) ─▶ … ─▶ Running(len) ──completion──▶ Idle
//!                     ▲                                   │
//!                     └──────────── start(force) ─────────┘  (from any Running)
//! ```
//!
//! Entering `Running(i)` for a present target schedules two timers: the
//! arrival timer (bubble shown, highlight applied, click pulse started) and
//! the advance timer at `duration` after entry. A missing target is skipped
//! on the spot with a warning; it adds no time to the run.
//!
//! # Invariants
//!
//! 1. At most one highlight is applied; the previous one is cleared before
//!    a new one is applied, and before returning to `Idle`.
//! 2. Within one run the step index only increases, and each step is entered
//!    at most once.
//! 3. A forced start cancels every timer of the preempted run before the new
//!    run's first step is entered. Timers also carry their run generation and
//!    are dropped if they outlive it.
//! 4. `start` and `tick` never fail.

use std::fmt;
use std::time::Duration;

use showcase_core::Size;
use showcase_runtime::{FrameClock, StateView, TimerId, TimerQueue};
use web_time::Instant;

use crate::bubble::{Bubble, BubbleState};
use crate::config::{PlacementConfig, ShowcaseConfig};
use crate::cursor::{CursorAnimator, CursorState};
use crate::highlight::{HighlightEffector, HighlightHandle, Styler};
use crate::locator::{ElementHandle, Locator};
use crate::placement::place;
use crate::step::{ShowcaseStep, Side, TargetKey};

/// Sequencer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Showing step `index`; `index == len` is the completion hold.
    Running(usize),
}

/// What [`Sequencer::start`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new run began from idle.
    Started,
    /// A running tour was cancelled and replaced.
    Preempted,
    /// A tour is already running and `force` was not set.
    Ignored,
    /// The step list was empty; nothing changed.
    Empty,
}

/// Lifecycle notifications, drained with [`Sequencer::drain_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum TourEvent {
    Started { run: u64, steps: usize },
    Preempted { run: u64, at_index: usize },
    StepEntered { index: usize },
    StepSkipped { index: usize, target: TargetKey },
    StepShown { index: usize, side: Side },
    Activated { index: usize },
    StepFinished { index: usize },
    Finished { run: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerKind {
    Arrive,
    Activate,
    ReleaseClick,
    Advance,
    Complete,
}

#[derive(Debug, Clone, Copy)]
struct StepTimer {
    run: u64,
    kind: TimerKind,
}

struct TourRun<H> {
    steps: Vec<ShowcaseStep>,
    index: usize,
    element: Option<H>,
    step_timers: Vec<TimerId>,
}

/// The guided tour state machine.
pub struct Sequencer<L: Locator, S: Styler<L::Handle>> {
    locator: L,
    highlight: HighlightEffector<S>,
    active_highlight: Option<HighlightHandle<L::Handle>>,
    cursor: CursorAnimator,
    bubble: Bubble,
    timers: TimerQueue<StepTimer>,
    clock: FrameClock,
    config: ShowcaseConfig,
    measured_bubble: Option<Size>,
    run: Option<TourRun<L::Handle>>,
    generation: u64,
    events: Vec<TourEvent>,
}

impl<L: Locator, S: Styler<L::Handle>> fmt::Debug for Sequencer<L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequencer")
            .field("phase", &self.phase())
            .field("generation", &self.generation)
            .field("pending_timers", &self.timers.len())
            .field("highlighting", &self.is_highlighting())
            .finish_non_exhaustive()
    }
}

impl<L: Locator, S: Styler<L::Handle>> Sequencer<L, S> {
    /// Create a sequencer with default configuration.
    pub fn new(locator: L, styler: S) -> Self {
        Self::with_config(locator, styler, ShowcaseConfig::default())
    }

    /// Create a sequencer with `config`.
    ///
    /// Problems reported by [`ShowcaseConfig::validate`] are logged at warn
    /// level; the configuration is used as given.
    pub fn with_config(locator: L, styler: S, config: ShowcaseConfig) -> Self {
        for problem in config.validate() {
            tracing::warn!(target: "showcase.sequencer", %problem, "invalid showcase config");
        }
        Self {
            locator,
            highlight: HighlightEffector::new(styler, config.highlight.clone()),
            active_highlight: None,
            cursor: CursorAnimator::new(config.cursor),
            bubble: Bubble::default(),
            timers: TimerQueue::new(),
            clock: FrameClock::new(config.timing.max_frame_delta()),
            config,
            measured_bubble: None,
            run: None,
            generation: 0,
            events: Vec::new(),
        }
    }

    // ── Control surface ──────────────────────────────────────────────

    /// Begin a run over `steps`, or preempt the current one if `force`.
    pub fn start(&mut self, steps: Vec<ShowcaseStep>, force: bool) -> StartOutcome {
        if steps.is_empty() {
            tracing::debug!(target: "showcase.sequencer", force, "start with empty step list ignored");
            return StartOutcome::Empty;
        }
        let outcome = match self.index() {
            Some(index) if !force => {
                tracing::debug!(
                    target: "showcase.sequencer",
                    run = self.generation,
                    index,
                    "start ignored; tour already running"
                );
                return StartOutcome::Ignored;
            }
            Some(at_index) => {
                self.teardown();
                self.events.push(TourEvent::Preempted {
                    run: self.generation,
                    at_index,
                });
                tracing::debug!(
                    target: "showcase.sequencer",
                    run = self.generation,
                    at_index,
                    "tour preempted"
                );
                StartOutcome::Preempted
            }
            None => StartOutcome::Started,
        };

        self.generation += 1;
        let count = steps.len();
        self.run = Some(TourRun {
            steps,
            index: 0,
            element: None,
            step_timers: Vec::new(),
        });
        self.cursor.center_once(self.locator.viewport());
        self.events.push(TourEvent::Started {
            run: self.generation,
            steps: count,
        });
        tracing::debug!(target: "showcase.sequencer", run = self.generation, steps = count, "tour started");
        self.enter_step(0);
        outcome
    }

    /// Whether a run is in progress (including the completion hold).
    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn phase(&self) -> Phase {
        match &self.run {
            Some(run) => Phase::Running(run.index),
            None => Phase::Idle,
        }
    }

    /// Current step index, if running.
    pub fn index(&self) -> Option<usize> {
        self.run.as_ref().map(|run| run.index)
    }

    /// Advance the orchestrator clock by `dt`.
    ///
    /// Fires every timer due within the window in deadline order. Each
    /// timer's handler observes the exact virtual time it was due at, so
    /// follow-up timers it schedules are not shifted by frame granularity.
    pub fn tick(&mut self, dt: Duration) {
        let horizon = self.timers.now().saturating_add(dt);
        let mut last = self.timers.now();
        while let Some(fired) = self.timers.pop_due(horizon) {
            self.cursor.advance(fired.at.saturating_sub(last));
            last = fired.at;
            if fired.payload.run != self.generation {
                tracing::trace!(
                    target: "showcase.sequencer",
                    timer = fired.id.raw(),
                    run = fired.payload.run,
                    "stale timer dropped"
                );
                continue;
            }
            tracing::trace!(
                target: "showcase.sequencer",
                timer = fired.id.raw(),
                kind = ?fired.payload.kind,
                at_ms = fired.at.as_millis() as u64,
                "timer fired"
            );
            self.on_timer(fired.id, fired.payload.kind);
        }
        self.cursor.advance(horizon.saturating_sub(last));
        self.timers.advance_to(horizon);
    }

    /// Tick by the wall-clock time since the previous frame (capped).
    pub fn frame(&mut self) {
        let dt = self.clock.frame();
        self.tick(dt);
    }

    /// Tick by the time between the previous frame and `now` (capped).
    pub fn frame_at(&mut self, now: Instant) {
        let dt = self.clock.frame_at(now);
        self.tick(dt);
    }

    /// Cancel any run and return everything to idle.
    ///
    /// Also performed on drop, so an unmounted orchestrator never leaves a
    /// spotlighted element behind.
    pub fn shutdown(&mut self) {
        if self.run.is_none() && self.active_highlight.is_none() && self.timers.is_empty() {
            return;
        }
        self.teardown();
        self.run = None;
        self.cursor.deactivate();
        self.bubble.reset();
        self.clock.reset();
        tracing::debug!(target: "showcase.sequencer", run = self.generation, "sequencer shut down");
    }

    /// Replace the estimated bubble size with a measured one, or restore the
    /// estimate with `None`. Applies to placements computed from now on.
    pub fn report_bubble_size(&mut self, size: Option<Size>) {
        self.measured_bubble = size.filter(|s| !s.is_empty());
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn cursor_state(&self) -> StateView<CursorState> {
        self.cursor.view()
    }

    pub fn bubble_state(&self) -> StateView<BubbleState> {
        self.bubble.view()
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<TourEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether a target is currently spotlighted.
    pub fn is_highlighting(&self) -> bool {
        self.active_highlight.is_some()
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn styler(&self) -> &S {
        self.highlight.styler()
    }

    /// Virtual time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.timers.now()
    }

    /// Placement parameters in effect, including any measured bubble size.
    pub fn placement_config(&self) -> PlacementConfig {
        match self.measured_bubble {
            Some(size) => self.config.placement.with_bubble_size(size),
            None => self.config.placement,
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Cancel all timers and restore any highlighted element.
    fn teardown(&mut self) {
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            tracing::trace!(target: "showcase.sequencer", cancelled, "run timers cancelled");
        }
        self.clear_highlight();
        self.bubble.hide();
        self.cursor.release_click();
    }

    fn clear_highlight(&mut self) {
        if let Some(handle) = self.active_highlight.take() {
            self.highlight.clear(handle);
        }
    }

    fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        self.timers.schedule(
            delay,
            StepTimer {
                run: self.generation,
                kind,
            },
        )
    }

    fn schedule_step(&mut self, delay: Duration, kind: TimerKind) {
        let id = self.schedule(delay, kind);
        if let Some(run) = self.run.as_mut() {
            run.step_timers.push(id);
        }
    }

    fn enter_step(&mut self, mut index: usize) {
        self.clear_highlight();
        loop {
            let Some(run) = self.run.as_mut() else {
                return;
            };
            run.index = index;
            run.element = None;
            run.step_timers.clear();

            let Some(step) = run.steps.get(index) else {
                let delay = self.config.timing.completion_delay();
                tracing::debug!(
                    target: "showcase.sequencer",
                    run = self.generation,
                    delay_ms = delay.as_millis() as u64,
                    "all steps done; completion hold"
                );
                self.schedule(delay, TimerKind::Complete);
                return;
            };

            self.events.push(TourEvent::StepEntered { index });
            let Some(element) = self.locator.resolve(&step.target) else {
                tracing::warn!(
                    target: "showcase.sequencer",
                    run = self.generation,
                    index,
                    target = %step.target,
                    "tour target not found; skipping step"
                );
                self.events.push(TourEvent::StepSkipped {
                    index,
                    target: step.target.clone(),
                });
                index += 1;
                continue;
            };

            let travelled = if step.show_cursor {
                self.cursor.move_to(element.bounding_box().center())
            } else {
                self.cursor.deactivate();
                false
            };
            let arrival = self.config.timing.arrival(travelled);
            let duration = step.duration_or(self.config.timing.default_step_duration_ms);
            run.element = Some(element);
            tracing::debug!(
                target: "showcase.sequencer",
                run = self.generation,
                index,
                travelled,
                delay_ms = arrival.as_millis() as u64,
                "step entered"
            );

            self.schedule_step(arrival, TimerKind::Arrive);
            self.schedule_step(duration, TimerKind::Advance);
            return;
        }
    }

    fn on_timer(&mut self, id: TimerId, kind: TimerKind) {
        if let Some(run) = self.run.as_mut() {
            run.step_timers.retain(|t| *t != id);
        }
        match kind {
            TimerKind::Arrive => self.on_arrive(),
            TimerKind::Activate => self.on_activate(),
            TimerKind::ReleaseClick => self.cursor.release_click(),
            TimerKind::Advance => self.on_advance(),
            TimerKind::Complete => self.on_complete(),
        }
    }

    fn on_arrive(&mut self) {
        let placement_config = self.placement_config();
        let Some(run) = self.run.as_ref() else {
            return;
        };
        let index = run.index;
        let (Some(step), Some(element)) = (run.steps.get(index), run.element.as_ref()) else {
            return;
        };

        if step.highlight {
            if let Some(handle) = self.active_highlight.take() {
                self.highlight.clear(handle);
            }
            match self.highlight.apply(element) {
                Ok(handle) => self.active_highlight = Some(handle),
                Err(err) => {
                    tracing::warn!(target: "showcase.sequencer", index, %err, "highlight not applied");
                }
            }
        }

        let placement = place(
            element.bounding_box(),
            self.locator.viewport(),
            step.placement,
            &placement_config,
        );
        self.bubble.show(step, placement, index, run.steps.len());
        self.events.push(TourEvent::StepShown {
            index,
            side: placement.side,
        });

        if step.clicks() {
            self.cursor.pulse_click();
            let lead = self.config.timing.click_lead();
            let pulse = self.config.timing.click_pulse();
            self.schedule_step(lead, TimerKind::Activate);
            self.schedule_step(pulse, TimerKind::ReleaseClick);
        }
    }

    fn on_activate(&mut self) {
        let Some(run) = self.run.as_ref() else {
            return;
        };
        if let Some(element) = run.element.as_ref() {
            element.activate();
            let index = run.index;
            self.events.push(TourEvent::Activated { index });
            tracing::debug!(target: "showcase.sequencer", run = self.generation, index, "target activated");
        }
    }

    fn on_advance(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let index = run.index;
        for id in std::mem::take(&mut run.step_timers) {
            self.timers.cancel(id);
        }
        self.bubble.hide();
        self.cursor.release_click();
        self.events.push(TourEvent::StepFinished { index });
        self.enter_step(index + 1);
    }

    fn on_complete(&mut self) {
        self.clear_highlight();
        self.cursor.deactivate();
        self.bubble.reset();
        self.run = None;
        self.events.push(TourEvent::Finished {
            run: self.generation,
        });
        tracing::debug!(target: "showcase.sequencer", run = self.generation, "tour finished");
    }
}

impl<L: Locator, S: Styler<L::Handle>> Drop for Sequencer<L, S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
