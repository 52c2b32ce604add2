#![forbid(unsafe_code)]

//! Showcase runtime
//!
//! Cooperative, single-threaded plumbing for the showcase orchestrator.
//!
//! # Key Components
//!
//! - [`TimerQueue`] - virtual-time queue of cancellable, one-shot timers
//! - [`FrameClock`] - turns wall-clock frame timestamps into capped deltas
//! - [`Observable`] / [`StateView`] - shared state with change notification
//! - [`Signal`] - fire-and-forget event bus for host notifications
//!
//! # Role in the workspace
//! Nothing here blocks or spawns. The host's frame loop owns time: it asks
//! the [`FrameClock`] for a delta and hands it to whoever owns a
//! [`TimerQueue`]. Rendering code subscribes to [`StateView`]s and never
//! mutates them.

pub mod clock;
pub mod reactive;
pub mod timer;

pub use clock::FrameClock;
pub use reactive::{Observable, Signal, StateView, Subscription};
pub use timer::{Fired, TimerId, TimerQueue};
