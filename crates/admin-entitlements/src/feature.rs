//! Feature Data Model

use crate::error::CatalogError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Feature identifier (Value Object)
///
/// # Invariants
/// - Must be non-empty
/// - Max 64 characters
/// - Alphanumeric with underscores or hyphens only
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureId(String);

impl FeatureId {
    /// Create new feature ID with validation
    pub fn new(id: impl Into<String>) -> Result<Self, CatalogError> {
        let id = id.into();

        let reason = if id.is_empty() {
            Some("cannot be empty")
        } else if id.len() > 64 {
            Some("max 64 characters")
        } else if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            Some("alphanumeric, '_' or '-' only")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(CatalogError::InvalidFeatureId { id, reason }),
            None => Ok(Self(id)),
        }
    }

    /// Get inner value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for FeatureId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FeatureId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FeatureId {
    type Error = CatalogError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeatureId> for String {
    fn from(id: FeatureId) -> Self {
        id.0
    }
}

/// Feature category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureCategory {
    /// Standalone product engine (CMS, Booking, E-commerce)
    Engine,
    /// Add-on module layered on an engine (Forms, Legal)
    Module,
}

impl FeatureCategory {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Engine => "Engine",
            Self::Module => "Module",
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Stable identifier
    pub id: FeatureId,
    /// Display name
    pub name: String,
    /// Display description
    #[serde(default)]
    pub description: String,
    /// Engine or module
    pub category: FeatureCategory,
    /// Monthly price
    #[serde(default)]
    pub pricing: Decimal,
    /// Features that must be enabled first
    #[serde(default)]
    pub dependencies: Vec<FeatureId>,
    /// Always-on baseline feature
    #[serde(default)]
    pub required: bool,
}

impl Feature {
    /// Start building a feature with zero price and no dependencies
    pub fn builder(id: FeatureId, name: impl Into<String>, category: FeatureCategory) -> FeatureBuilder {
        FeatureBuilder {
            feature: Feature {
                id,
                name: name.into(),
                description: String::new(),
                category,
                pricing: Decimal::ZERO,
                dependencies: Vec::new(),
                required: false,
            },
        }
    }

    /// Check whether this feature lists `id` as a direct dependency
    pub fn depends_on(&self, id: &str) -> bool {
        self.dependencies.iter().any(|d| d.as_str() == id)
    }
}

/// Fluent constructor for [`Feature`]
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    feature: Feature,
}

impl FeatureBuilder {
    /// Set the display description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.feature.description = description.into();
        self
    }

    /// Set the monthly price
    pub fn pricing(mut self, pricing: Decimal) -> Self {
        self.feature.pricing = pricing;
        self
    }

    /// Append a prerequisite
    pub fn depends_on(mut self, dependency: FeatureId) -> Self {
        self.feature.dependencies.push(dependency);
        self
    }

    /// Mark as the always-on baseline feature
    pub fn required(mut self) -> Self {
        self.feature.required = true;
        self
    }

    /// Finish; validation happens when the catalog is built
    pub fn build(self) -> Feature {
        self.feature
    }
}
