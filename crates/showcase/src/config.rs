#![forbid(unsafe_code)]

//! Tunable parameters for the showcase orchestrator.
//!
//! Everything the sequencer, placement calculator, highlight effector, and
//! cursor animator treat as a constant lives in [`ShowcaseConfig`], loadable
//! from TOML or JSON:
//!
//! ```toml
//! [timing]
//! arrival_travel_ms = 800
//! completion_delay_ms = 500
//!
//! [placement]
//! gap = 24.0
//! bubble_width = 340.0
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the value the orchestrator was tuned with, so
//! `ShowcaseConfig::default()` reproduces the fixed-size tooltip heuristic
//! and the stock timings exactly. Missing sections and fields in a file fall
//! back to those defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use showcase_core::Size;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Top-level ShowcaseConfig
// ---------------------------------------------------------------------------

/// All orchestrator parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    /// Step and run timings.
    pub timing: TimingConfig,
    /// Tooltip geometry.
    pub placement: PlacementConfig,
    /// Spotlight styling.
    pub highlight: HighlightStyle,
    /// Simulated pointer motion.
    pub cursor: CursorConfig,
}

impl ShowcaseConfig {
    /// Load from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk and validate.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check every parameter is within its acceptable range.
    ///
    /// Returns a list of problems; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.timing.max_frame_delta_ms == 0 {
            errors.push("timing.max_frame_delta_ms must be > 0".into());
        }
        if self.timing.click_pulse_ms == 0 {
            errors.push("timing.click_pulse_ms must be > 0".into());
        }

        let p = &self.placement;
        for (name, value) in [
            ("gap", p.gap),
            ("padding", p.padding),
            ("bubble_width", p.bubble_width),
            ("bubble_height", p.bubble_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("placement.{name} must be finite and >= 0, got {value}"));
            }
        }

        if !(self.highlight.scale.is_finite() && self.highlight.scale > 0.0) {
            errors.push(format!(
                "highlight.scale must be > 0, got {}",
                self.highlight.scale
            ));
        }

        let c = &self.cursor;
        if !(c.stiffness.is_finite() && c.stiffness > 0.0) {
            errors.push(format!("cursor.stiffness must be finite and > 0, got {}", c.stiffness));
        }
        if !(c.damping.is_finite() && c.damping >= 0.0) {
            errors.push(format!("cursor.damping must be finite and >= 0, got {}", c.damping));
        }
        if !(c.rest_threshold.is_finite() && c.rest_threshold > 0.0) {
            errors.push(format!(
                "cursor.rest_threshold must be finite and > 0, got {}",
                c.rest_threshold
            ));
        }

        errors
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Step and run timings, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Wait before showing the bubble when the cursor travelled to the target.
    pub arrival_travel_ms: u64,
    /// Wait before showing the bubble when the cursor did not move.
    pub arrival_static_ms: u64,
    /// Delay between the click pulse starting and `activate()`.
    pub click_lead_ms: u64,
    /// How long `clicking` stays raised.
    pub click_pulse_ms: u64,
    /// Hold after the last step before returning to idle.
    pub completion_delay_ms: u64,
    /// Step duration used when a definition omits one.
    pub default_step_duration_ms: u64,
    /// Upper bound on a single frame delta from the frame clock.
    pub max_frame_delta_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            arrival_travel_ms: 800,
            arrival_static_ms: 300,
            click_lead_ms: 300,
            click_pulse_ms: 400,
            completion_delay_ms: 500,
            default_step_duration_ms: 4000,
            max_frame_delta_ms: 250,
        }
    }
}

impl TimingConfig {
    /// Arrival delay for a step, depending on whether the cursor moved.
    #[must_use]
    pub fn arrival(&self, travelled: bool) -> Duration {
        if travelled {
            Duration::from_millis(self.arrival_travel_ms)
        } else {
            Duration::from_millis(self.arrival_static_ms)
        }
    }

    #[must_use]
    pub fn click_lead(&self) -> Duration {
        Duration::from_millis(self.click_lead_ms)
    }

    #[must_use]
    pub fn click_pulse(&self) -> Duration {
        Duration::from_millis(self.click_pulse_ms)
    }

    #[must_use]
    pub fn completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_ms)
    }

    #[must_use]
    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms)
    }
}

/// Tooltip geometry, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Space between the target and the bubble.
    pub gap: f64,
    /// Minimum distance between the bubble and the viewport edge.
    pub padding: f64,
    /// Bubble width used for fit checks and clamping.
    pub bubble_width: f64,
    /// Bubble height used for fit checks and clamping.
    pub bubble_height: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            gap: 24.0,
            padding: 20.0,
            bubble_width: 340.0,
            bubble_height: 180.0,
        }
    }
}

impl PlacementConfig {
    /// Bubble dimensions.
    #[must_use]
    pub fn bubble_size(&self) -> Size {
        Size::new(self.bubble_width, self.bubble_height)
    }

    /// Copy with a different bubble size.
    #[must_use]
    pub fn with_bubble_size(mut self, size: Size) -> Self {
        self.bubble_width = size.width;
        self.bubble_height = size.height;
        self
    }
}

/// Spotlight styling written onto a highlighted element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    /// Stacking order raised above page content.
    pub z_index: i32,
    /// Emphasis shadow.
    pub box_shadow: String,
    /// Uniform scale factor.
    pub scale: f64,
    /// Transition applied so the emphasis eases in.
    pub transition: String,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            z_index: 9999,
            box_shadow: "0 0 0 4px rgba(59, 130, 246, 0.5), 0 0 24px rgba(59, 130, 246, 0.35)"
                .into(),
            scale: 1.02,
            transition: "all 0.3s ease".into(),
        }
    }
}

impl HighlightStyle {
    /// CSS transform value for [`scale`](Self::scale).
    #[must_use]
    pub fn transform(&self) -> String {
        format!("scale({})", self.scale)
    }
}

/// Spring parameters for the simulated pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Spring stiffness.
    pub stiffness: f64,
    /// Spring damping.
    pub damping: f64,
    /// Distance in pixels under which the pointer counts as arrived.
    pub rest_threshold: f64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            stiffness: 170.0,
            damping: 26.0,
            rest_threshold: 0.5,
        }
    }
}
