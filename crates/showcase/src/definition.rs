#![forbid(unsafe_code)]

//! Tour definitions loaded from data files.
//!
//! ```toml
//! [[tours]]
//! id = "welcome"
//! route = "/dashboard"
//!
//! [[tours.steps]]
//! target = "nav-members"
//! title = "Members"
//! description = "Everyone in your congregation."
//! showCursor = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DefinitionError;
use crate::step::ShowcaseStep;

/// A named step list with an optional route precondition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourDefinition {
    pub id: String,
    /// Route prefix the host must be on for the tour to start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    pub steps: Vec<ShowcaseStep>,
}

#[derive(Debug, Deserialize)]
struct Catalog {
    #[serde(default)]
    tours: Vec<TourDefinition>,
}

impl TourDefinition {
    pub fn new(id: impl Into<String>, steps: Vec<ShowcaseStep>) -> Self {
        Self {
            id: id.into(),
            route: None,
            steps,
        }
    }

    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Whether the host being on `route` satisfies the precondition.
    #[must_use]
    pub fn matches_route(&self, route: &str) -> bool {
        match self.route.as_deref() {
            None => true,
            Some(prefix) => route.starts_with(prefix),
        }
    }

    /// Reject definitions that cannot be addressed or have nothing to show.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.id.trim().is_empty() {
            return Err(DefinitionError::EmptyId);
        }
        if self.steps.is_empty() {
            return Err(DefinitionError::NoSteps(self.id.clone()));
        }
        Ok(())
    }

    /// Parse a single definition from JSON.
    pub fn from_json_str(s: &str) -> Result<Self, DefinitionError> {
        let def: Self = serde_json::from_str(s).map_err(DefinitionError::Json)?;
        def.validate()?;
        Ok(def)
    }

    /// Parse a single definition from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, DefinitionError> {
        let def: Self = toml::from_str(s).map_err(DefinitionError::Toml)?;
        def.validate()?;
        Ok(def)
    }

    /// Parse a `[[tours]]` catalog from TOML.
    pub fn catalog_from_toml_str(s: &str) -> Result<Vec<Self>, DefinitionError> {
        let catalog: Catalog = toml::from_str(s).map_err(DefinitionError::Toml)?;
        check_catalog(catalog.tours)
    }

    /// Parse a `{"tours": [...]}` catalog from JSON.
    pub fn catalog_from_json_str(s: &str) -> Result<Vec<Self>, DefinitionError> {
        let catalog: Catalog = serde_json::from_str(s).map_err(DefinitionError::Json)?;
        check_catalog(catalog.tours)
    }
}

fn check_catalog(tours: Vec<TourDefinition>) -> Result<Vec<TourDefinition>, DefinitionError> {
    for (i, tour) in tours.iter().enumerate() {
        tour.validate()?;
        if tours[..i].iter().any(|t| t.id == tour.id) {
            return Err(DefinitionError::DuplicateId(tour.id.clone()));
        }
    }
    Ok(tours)
}
