//! Tenant Entitlement Set

use crate::catalog::FeatureCatalog;
use crate::error::EntitlementError;
use crate::feature::FeatureId;
use serde::Serialize;
use std::collections::BTreeSet;

/// Feature ids enabled for one tenant.
///
/// A set obtained from [`EntitlementSet::baseline`], [`EntitlementSet::from_persisted`]
/// or the resolver always contains the catalog's required feature and the
/// dependencies of every member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EntitlementSet {
    features: BTreeSet<FeatureId>,
}

impl EntitlementSet {
    /// Set for a freshly provisioned tenant: only the baseline feature
    pub fn baseline(catalog: &FeatureCatalog) -> Self {
        let mut features = BTreeSet::new();
        features.insert(catalog.required_feature().clone());
        Self { features }
    }

    /// Rebuild a stored set, checking it against the catalog
    pub fn from_persisted<I, S>(catalog: &FeatureCatalog, ids: I) -> Result<Self, EntitlementError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut features = BTreeSet::new();
        for id in ids {
            let id = id.as_ref();
            let feature = catalog
                .get_by_id(id)
                .ok_or_else(|| EntitlementError::UnknownFeature(id.to_string()))?;
            features.insert(feature.id.clone());
        }

        let set = Self { features };
        set.validate(catalog)?;
        Ok(set)
    }

    /// Check subset, closure and baseline rules
    pub fn validate(&self, catalog: &FeatureCatalog) -> Result<(), EntitlementError> {
        let required = catalog.required_feature();
        if !self.features.contains(required) {
            return Err(EntitlementError::MissingBaseline(required.clone()));
        }

        for id in &self.features {
            let feature = catalog
                .get_by_id(id.as_str())
                .ok_or_else(|| EntitlementError::UnknownFeature(id.to_string()))?;
            if let Some(missing) = feature.dependencies.iter().find(|d| !self.features.contains(*d)) {
                return Err(EntitlementError::MissingDependency {
                    feature: id.clone(),
                    dependency: missing.clone(),
                });
            }
        }
        Ok(())
    }

    /// Whether the feature is enabled
    pub fn contains(&self, id: &str) -> bool {
        self.features.contains(id)
    }

    /// Iterate ids in lexical order
    pub fn iter(&self) -> impl Iterator<Item = &FeatureId> {
        self.features.iter()
    }

    /// Number of enabled features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Only true for a set that skipped validation
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Every feature here is also in `other`
    pub fn is_subset(&self, other: &EntitlementSet) -> bool {
        self.features.is_subset(&other.features)
    }

    /// Ids as plain strings, the shape stored on the tenant record
    pub fn to_ids(&self) -> Vec<String> {
        self.features.iter().map(|id| id.to_string()).collect()
    }

    pub(crate) fn with(&self, ids: impl IntoIterator<Item = FeatureId>) -> Self {
        let mut features = self.features.clone();
        features.extend(ids);
        Self { features }
    }

    pub(crate) fn without(&self, id: &str) -> Self {
        let mut features = self.features.clone();
        features.remove(id);
        Self { features }
    }
}

impl<'a> IntoIterator for &'a EntitlementSet {
    type Item = &'a FeatureId;
    type IntoIter = std::collections::btree_set::Iter<'a, FeatureId>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
