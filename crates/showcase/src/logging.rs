#![forbid(unsafe_code)]

//! Subscriber setup for hosts without their own.
//!
//! Events are emitted under these targets:
//!
//! | Target               | What                                         |
//! |----------------------|----------------------------------------------|
//! | `showcase.sequencer` | run lifecycle, skipped steps (warn), timers  |
//! | `showcase.highlight` | spotlight apply/clear                        |
//! | `showcase.flags`     | tour flag changes, pending tour starts       |
//! | `showcase.runtime`   | timer queue and frame clock internals        |

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{Result, ShowcaseError};

/// Every target this workspace logs under.
pub const TARGETS: [&str; 4] = [
    "showcase.sequencer",
    "showcase.highlight",
    "showcase.flags",
    "showcase.runtime",
];

/// Filter directive setting `level` for every showcase target.
#[must_use]
pub fn level_directive(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install a global JSON subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` is used
/// (e.g. `"showcase.sequencer=debug"` or the output of [`level_directive`]).
pub fn init(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| ShowcaseError::Logging(format!("invalid filter directive: {e}")))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json().with_target(true))
        .try_init()
        .map_err(|e| ShowcaseError::Logging(e.to_string()))
}
