#![forbid(unsafe_code)]

//! Showcase error model.
//!
//! # Design Principles
//!
//! 1. **Tours never fail.** `start` and `tick` have no error path. A missing
//!    target is a skipped step, not an error, so nothing here is produced by
//!    the sequencer itself.
//! 2. **Domain-specific errors.** Configuration, persistence, definitions,
//!    and the highlight effector each have their own enum so callers can match
//!    on what matters and let the rest propagate as [`ShowcaseError`].

use std::fmt;

// ── Domain-Specific Error Types ─────────────────────────────────────────

/// Configuration loading errors.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Values parsed but failed range checks.
    Validation(Vec<String>),
}

/// Tour flag storage errors.
#[derive(Debug)]
pub enum StorageError {
    /// I/O failure reading or writing the backing file.
    Io(std::io::Error),
    /// The backing file exists but is not a JSON object of flags.
    Corrupt(String),
}

/// Highlight effector errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    /// A handle from a previous `apply` has not been cleared yet.
    AlreadyActive,
}

/// Tour definition errors.
#[derive(Debug)]
pub enum DefinitionError {
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// The definition has an empty id.
    EmptyId,
    /// Two definitions share an id.
    DuplicateId(String),
    /// The definition has no steps to show.
    NoSteps(String),
}

// ── Unified Error ───────────────────────────────────────────────────────

/// Top-level error type for the showcase crate.
#[derive(Debug)]
pub enum ShowcaseError {
    /// Configuration could not be loaded or validated.
    Config(ConfigError),
    /// Tour flag storage failed.
    Storage(StorageError),
    /// Highlight effector refused an operation.
    Highlight(HighlightError),
    /// A tour definition was malformed.
    Definition(DefinitionError),
    /// The logging subscriber could not be installed.
    Logging(String),
}

/// Standard result type for showcase APIs.
pub type Result<T> = std::result::Result<T, ShowcaseError>;

// ── Display ─────────────────────────────────────────────────────────────

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "flag storage I/O error: {e}"),
            Self::Corrupt(detail) => write!(f, "flag storage is corrupt: {detail}"),
        }
    }
}

impl fmt::Display for HighlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyActive => write!(f, "a highlight is already applied"),
        }
    }
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::EmptyId => write!(f, "tour definition has an empty id"),
            Self::DuplicateId(id) => write!(f, "tour '{id}' is defined twice"),
            Self::NoSteps(id) => write!(f, "tour '{id}' has no steps"),
        }
    }
}

impl fmt::Display for ShowcaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Highlight(e) => write!(f, "highlight: {e}"),
            Self::Definition(e) => write!(f, "definition: {e}"),
            Self::Logging(msg) => write!(f, "logging: {msg}"),
        }
    }
}

// ── std::error::Error ───────────────────────────────────────────────────

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Corrupt(_) => None,
        }
    }
}

impl std::error::Error for HighlightError {}

impl std::error::Error for DefinitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::EmptyId | Self::DuplicateId(_) | Self::NoSteps(_) => None,
        }
    }
}

impl std::error::Error for ShowcaseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::Highlight(e) => Some(e),
            Self::Definition(e) => Some(e),
            Self::Logging(_) => None,
        }
    }
}

// ── From conversions ────────────────────────────────────────────────────

impl From<ConfigError> for ShowcaseError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<StorageError> for ShowcaseError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<HighlightError> for ShowcaseError {
    fn from(e: HighlightError) -> Self {
        Self::Highlight(e)
    }
}

impl From<DefinitionError> for ShowcaseError {
    fn from(e: DefinitionError) -> Self {
        Self::Definition(e)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
