#![forbid(unsafe_code)]

//! Core: viewport geometry and animation primitives.
//!
//! # Role in the showcase workspace
//! `showcase-core` is the leaf layer. It owns the pixel-space geometry the
//! placement calculator works in and the damped spring that moves the
//! simulated cursor. Nothing here knows about tours, timers, or elements.
//!
//! # How it fits in the system
//! `showcase-runtime` builds the timer queue and reactive state on top of
//! plain `std`, and `showcase` combines both layers into the orchestrator.

pub mod animation;
pub mod geometry;

pub use animation::spring::{Spring, SpringPoint};
pub use geometry::{Point, Rect, Size};
