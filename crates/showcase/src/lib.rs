#![forbid(unsafe_code)]

//! Guided product tour orchestrator.
//!
//! A tour is an ordered list of [`ShowcaseStep`]s. The [`Sequencer`] walks
//! them one at a time: it resolves the step's target through a host
//! [`Locator`], spotlights it through a [`Styler`], places a tooltip bubble
//! next to it with [`placement::place`], and optionally glides a simulated
//! cursor over and clicks it. Renderers subscribe to
//! [`Sequencer::cursor_state`] and [`Sequencer::bubble_state`].
//!
//! # Driving a tour
//!
//! ```rust,ignore
//! let mut seq = Sequencer::new(locator, styler);
//! seq.start(definition.steps.clone(), false);
//! // every animation frame:
//! seq.frame();
//! ```
//!
//! Nothing blocks and nothing spawns. Time moves only when the host ticks.
//!
//! # Host-side collaborators
//!
//! - [`TourFlags`]: per-user "seen" and "pending" markers.
//! - [`PendingTours`]: starts a pending tour once the route matches.
//! - [`TourDefinition`]: step lists loaded from JSON or TOML.
//! - [`ShowcaseConfig`]: timings, geometry, styling, and cursor tuning.

pub mod bubble;
pub mod config;
pub mod cursor;
pub mod definition;
pub mod error;
pub mod flags;
pub mod highlight;
pub mod locator;
#[cfg(feature = "logging")]
pub mod logging;
pub mod placement;
pub mod sequencer;
pub mod step;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod trigger;

pub use bubble::BubbleState;
pub use config::{CursorConfig, HighlightStyle, PlacementConfig, ShowcaseConfig, TimingConfig};
pub use cursor::CursorState;
pub use definition::TourDefinition;
pub use error::{
    ConfigError, DefinitionError, HighlightError, Result, ShowcaseError, StorageError,
};
#[cfg(feature = "state-persistence")]
pub use flags::FileStorage;
pub use flags::{MemoryStorage, StorageBackend, TourFlags};
pub use highlight::{HighlightEffector, HighlightHandle, StyleProperty, StyleSnapshot, Styler};
pub use locator::{ElementHandle, Locator};
pub use placement::{Placement, place};
pub use sequencer::{Phase, Sequencer, StartOutcome, TourEvent};
pub use step::{ShowcaseStep, Side, StepAction, TargetKey};
pub use trigger::PendingTours;

pub use showcase_core::{Point, Rect, Size};
pub use showcase_runtime::{Signal, StateView, Subscription};
