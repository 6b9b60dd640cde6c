//! Access Guard
//!
//! The one predicate every navigation entry, route and feature-gated panel
//! goes through. It answers yes/no only; what a consumer renders on "no" is
//! the consumer's business.

use crate::entitlement::EntitlementSet;
use serde::{Deserialize, Serialize};

/// How a list of required features is combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// Every listed feature must be enabled
    #[default]
    All,
    /// At least one listed feature must be enabled
    Any,
}

/// Check a tenant's entitlement against a requirement list.
///
/// An empty requirement list always grants access.
pub fn has_access<S: AsRef<str>>(entitlement: &EntitlementSet, required: &[S], mode: AccessMode) -> bool {
    if required.is_empty() {
        return true;
    }
    match mode {
        AccessMode::All => required.iter().all(|id| entitlement.contains(id.as_ref())),
        AccessMode::Any => required.iter().any(|id| entitlement.contains(id.as_ref())),
    }
}

/// Serializable gate attached to a navigation entry, route or panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRequirement {
    /// Feature ids
    #[serde(default)]
    pub features: Vec<String>,
    /// Combination mode
    #[serde(default)]
    pub mode: AccessMode,
}

impl FeatureRequirement {
    /// Require every listed feature
    pub fn all<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            features: features.into_iter().map(Into::into).collect(),
            mode: AccessMode::All,
        }
    }

    /// Require any of the listed features
    pub fn any<I, S>(features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            features: features.into_iter().map(Into::into).collect(),
            mode: AccessMode::Any,
        }
    }

    /// Apply [`has_access`] to this requirement
    pub fn is_satisfied_by(&self, entitlement: &EntitlementSet) -> bool {
        has_access(entitlement, &self.features, self.mode)
    }

    /// Listed features the tenant does not have, for upgrade prompts
    pub fn missing(&self, entitlement: &EntitlementSet) -> Vec<String> {
        self.features
            .iter()
            .filter(|id| !entitlement.contains(id.as_str()))
            .cloned()
            .collect()
    }
}
