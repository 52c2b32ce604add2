#![forbid(unsafe_code)]

//! Virtual-time queue of cancellable one-shot timers.
//!
//! Every wait a tour run performs is an entry here, identified by a
//! [`TimerId`] that the owner can cancel. The queue never reads a wall clock; time only
//! moves when the owner pops due entries up to a horizon.
//!
//! # Firing model
//!
//! The owner calls [`TimerQueue::pop_due`] in a loop with the horizon
//! `now + dt`. Each popped entry moves `now` to that entry's deadline before
//! it is returned, so a handler that schedules a follow-up timer schedules it
//! relative to the exact moment its own timer fired, not to the frame
//! boundary. Follow-ups that fall inside the same horizon fire in the same
//! loop. After the loop, [`TimerQueue::advance_to`] moves `now` to the
//! horizon.
//!
//! # Invariants
//!
//! 1. Entries fire in `(deadline, scheduling order)` order.
//! 2. `now` never decreases.
//! 3. A cancelled entry never fires; cancelling twice is a no-op.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Identifier for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw numeric id (for logging).
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// A timer popped from the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    /// Id the timer was scheduled under.
    pub id: TimerId,
    /// Virtual time at which it fired.
    pub at: Duration,
    /// Payload supplied at scheduling time.
    pub payload: T,
}

/// A queue of one-shot timers over virtual time.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    entries: BTreeMap<(Duration, u64), T>,
    deadlines: HashMap<u64, Duration>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Create an empty queue at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of pending timers.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no timers are pending.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deadline of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id.0)
    }

    /// Schedule `payload` to fire `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        let deadline = self.now.saturating_add(delay);
        self.entries.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        tracing::trace!(
            target: "showcase.runtime",
            timer = id,
            delay_ms = delay.as_millis() as u64,
            "timer scheduled"
        );
        TimerId(id)
    }

    /// Cancel a pending timer, returning its payload if it had not fired.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id.0)?;
        tracing::trace!(target: "showcase.runtime", timer = id.0, "timer cancelled");
        self.entries.remove(&(deadline, id.0))
    }

    /// Cancel every pending timer. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.deadlines.clear();
        if dropped > 0 {
            tracing::trace!(target: "showcase.runtime", dropped, "all timers cancelled");
        }
        dropped
    }

    /// Pop the earliest timer whose deadline is at or before `horizon`.
    ///
    /// Moves `now` to the popped timer's deadline.
    pub fn pop_due(&mut self, horizon: Duration) -> Option<Fired<T>> {
        let (&(deadline, id), _) = self.entries.first_key_value()?;
        if deadline > horizon {
            return None;
        }
        let payload = self.entries.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        tracing::trace!(
            target: "showcase.runtime",
            timer = id,
            at_ms = deadline.as_millis() as u64,
            "timer fired"
        );
        Some(Fired {
            id: TimerId(id),
            at: deadline,
            payload,
        })
    }

    /// Move virtual time forward to `horizon` (never backward).
    pub fn advance_to(&mut self, horizon: Duration) {
        self.now = self.now.max(horizon);
    }
}
