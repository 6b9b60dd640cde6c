//! Entitlement Engine facade

use crate::catalog::FeatureCatalog;
use crate::cost::{CostBreakdown, CostCalculator};
use crate::entitlement::EntitlementSet;
use crate::error::{EntitlementError, ResolveError};
use crate::guard::{self, AccessMode, FeatureRequirement};
use crate::resolver::{EntitlementDecision, Resolver};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Shared handle to a validated catalog plus the operations over it.
///
/// Cloning is cheap; every clone reads the same immutable catalog, so the
/// engine can be handed to any number of request handlers.
#[derive(Debug, Clone)]
pub struct EntitlementEngine {
    catalog: Arc<FeatureCatalog>,
}

impl EntitlementEngine {
    /// Take ownership of a validated catalog
    pub fn new(catalog: FeatureCatalog) -> Self {
        Self { catalog: Arc::new(catalog) }
    }

    /// Share a catalog already behind an `Arc`
    pub fn from_shared(catalog: Arc<FeatureCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog every operation runs against
    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    /// Resolver bound to this catalog
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.catalog)
    }

    /// Cost calculator bound to this catalog
    pub fn costs(&self) -> CostCalculator<'_> {
        CostCalculator::new(&self.catalog)
    }

    /// Starting set for a new tenant
    pub fn baseline(&self) -> EntitlementSet {
        EntitlementSet::baseline(&self.catalog)
    }

    /// Rebuild a set loaded from storage
    pub fn restore<I, S>(&self, ids: I) -> Result<EntitlementSet, EntitlementError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        EntitlementSet::from_persisted(&self.catalog, ids)
    }

    /// See [`Resolver::add_feature`]
    pub fn add_feature(&self, set: &EntitlementSet, id: &str) -> EntitlementDecision {
        self.resolver().add_feature(set, id)
    }

    /// See [`Resolver::remove_feature`]
    pub fn remove_feature(&self, set: &EntitlementSet, id: &str) -> EntitlementDecision {
        self.resolver().remove_feature(set, id)
    }

    /// See [`Resolver::seed`]
    pub fn seed<S: AsRef<str>>(&self, set: &EntitlementSet, ids: &[S]) -> EntitlementDecision {
        self.resolver().seed(set, ids)
    }

    /// See [`CostCalculator::compute`]
    pub fn monthly_cost(&self, set: &EntitlementSet) -> Decimal {
        self.costs().compute(set)
    }

    /// See [`CostCalculator::breakdown`]
    pub fn cost_breakdown(&self, set: &EntitlementSet) -> CostBreakdown {
        self.costs().breakdown(set)
    }

    /// See [`CostCalculator::quote_addition`]
    pub fn quote_addition(&self, set: &EntitlementSet, id: &str) -> Result<Decimal, ResolveError> {
        self.costs().quote_addition(set, id)
    }

    /// See [`guard::has_access`]
    pub fn has_access<S: AsRef<str>>(&self, set: &EntitlementSet, required: &[S], mode: AccessMode) -> bool {
        guard::has_access(set, required, mode)
    }

    /// Evaluate a stored requirement
    pub fn check(&self, set: &EntitlementSet, requirement: &FeatureRequirement) -> bool {
        requirement.is_satisfied_by(set)
    }
}
