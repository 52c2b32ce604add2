#![forbid(unsafe_code)]

//! Tour step description.
//!
//! A [`ShowcaseStep`] is immutable data: the sequencer snapshots the whole
//! list on `start` and never mutates it. Field names accept the camelCase
//! spellings used by front-end tour files (`durationMs`, `showCursor`).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Opaque, stable identifier of a UI element (e.g. a `data-tour` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetKey(String);

impl TargetKey {
    /// Wrap a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TargetKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for TargetKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Side of the target the bubble is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// Auto-placement priority order.
    pub const PRIORITY: [Side; 4] = [Side::Right, Side::Left, Side::Bottom, Side::Top];

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the step does to its target besides highlighting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    /// Pulse the cursor and synthetically activate the target.
    Click,
    /// Hold without interaction.
    Wait,
    /// Hold while the user reads the copy.
    Read,
}

/// One step of a guided tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowcaseStep {
    /// Element the step points at.
    pub target: TargetKey,
    /// Bubble title.
    #[serde(default)]
    pub title: String,
    /// Bubble body.
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<StepAction>,
    /// Visible time before auto-advance. `None` uses the configured default.
    #[serde(
        default,
        alias = "durationMs",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_ms: Option<u64>,
    /// Whether the simulated cursor travels to the target.
    #[serde(default, alias = "showCursor")]
    pub show_cursor: bool,
    /// Whether the target gets the spotlight treatment.
    #[serde(default = "default_highlight")]
    pub highlight: bool,
    /// Preferred bubble side; `None` auto-places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<Side>,
}

fn default_highlight() -> bool {
    true
}

impl ShowcaseStep {
    /// Create a highlighted step with no cursor, no action, and the default duration.
    pub fn new(
        target: impl Into<TargetKey>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            title: title.into(),
            description: description.into(),
            action: None,
            duration_ms: None,
            show_cursor: false,
            highlight: true,
            placement: None,
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: StepAction) -> Self {
        self.action = Some(action);
        self
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }

    #[must_use]
    pub fn with_cursor(mut self, show: bool) -> Self {
        self.show_cursor = show;
        self
    }

    #[must_use]
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = highlight;
        self
    }

    #[must_use]
    pub fn with_placement(mut self, side: Side) -> Self {
        self.placement = Some(side);
        self
    }

    /// Step duration, falling back to `default_ms`.
    #[must_use]
    pub fn duration_or(&self, default_ms: u64) -> Duration {
        Duration::from_millis(self.duration_ms.unwrap_or(default_ms))
    }

    /// Whether the step synthetically activates its target.
    #[must_use]
    pub fn clicks(&self) -> bool {
        self.action == Some(StepAction::Click)
    }
}
