//! Tenant Provisioning
//!
//! Backs the tenant-creation flow: a draft starts from the baseline, the
//! operator toggles engines while watching the running monthly total, and
//! the draft is committed only once its set passes the closure and baseline
//! checks.

use crate::error::TenantResult;
use crate::model::TenantRecord;
use crate::store::TenantStore;
use admin_entitlements::{
    CostBreakdown, EntitlementEngine, EntitlementSet, FeatureId, ResolveError,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Tenant being configured, not yet persisted
#[derive(Debug, Clone)]
pub struct TenantDraft {
    engine: EntitlementEngine,
    name: String,
    features: EntitlementSet,
    auto_added: Vec<FeatureId>,
}

impl TenantDraft {
    /// Draft holding only the baseline feature
    pub fn new(engine: EntitlementEngine, name: impl Into<String>) -> Self {
        let features = engine.baseline();
        Self {
            engine,
            name: name.into(),
            features,
            auto_added: Vec::new(),
        }
    }

    /// Toggle a feature on. Returns the user-facing notices for any
    /// prerequisites that came along with it.
    pub fn add(&mut self, id: &str) -> Result<Vec<String>, ResolveError> {
        let change = self.engine.add_feature(&self.features, id)?;
        let notices = change.explain(self.engine.catalog());
        // Asked for explicitly now, so no longer on the operator's behalf
        self.auto_added.retain(|f| f.as_str() != id);
        self.auto_added.extend(change.added);
        self.features = change.set;
        Ok(notices)
    }

    /// Toggle a feature off
    pub fn remove(&mut self, id: &str) -> Result<(), ResolveError> {
        let change = self.engine.remove_feature(&self.features, id)?;
        self.features = change.set;
        self.auto_added.retain(|f| self.features.contains(f.as_str()));
        Ok(())
    }

    /// Current draft set
    pub fn features(&self) -> &EntitlementSet {
        &self.features
    }

    /// Tenant display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Running total for the summary panel
    pub fn monthly_cost(&self) -> Decimal {
        self.engine.monthly_cost(&self.features)
    }

    /// Line items for the summary panel
    pub fn cost_breakdown(&self) -> CostBreakdown {
        self.engine.cost_breakdown(&self.features)
    }
}

/// Result of a committed draft
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionedTenant {
    /// Stored record
    pub record: TenantRecord,
    /// Prerequisites enabled on the operator's behalf
    pub auto_added: Vec<FeatureId>,
    /// Monthly total at creation
    pub monthly_cost: Decimal,
}

/// Creates tenants in the store
pub struct TenantProvisioner {
    engine: EntitlementEngine,
    store: Arc<dyn TenantStore>,
}

impl TenantProvisioner {
    /// Provisioner writing to `store`
    pub fn new(engine: EntitlementEngine, store: Arc<dyn TenantStore>) -> Self {
        Self { engine, store }
    }

    /// Start an interactive draft
    pub fn draft(&self, name: impl Into<String>) -> TenantDraft {
        TenantDraft::new(self.engine.clone(), name)
    }

    /// Create a tenant from a seeded feature list in one step.
    /// Any rejected id aborts the whole provisioning.
    pub async fn provision<S: AsRef<str>>(&self, name: &str, seed: &[S]) -> TenantResult<ProvisionedTenant> {
        let change = self.engine.seed(&self.engine.baseline(), seed)?;
        let draft = TenantDraft {
            engine: self.engine.clone(),
            name: name.to_string(),
            features: change.set,
            auto_added: change.added,
        };
        self.commit(draft).await
    }

    /// Persist a draft
    pub async fn commit(&self, draft: TenantDraft) -> TenantResult<ProvisionedTenant> {
        draft.features.validate(self.engine.catalog())?;

        let monthly_cost = draft.monthly_cost();
        let record = TenantRecord::new(draft.name, draft.features);
        self.store.insert(record.clone()).await?;

        info!(
            tenant = %record.tenant_id,
            name = %record.name,
            features = record.features.len(),
            %monthly_cost,
            "tenant provisioned"
        );

        Ok(ProvisionedTenant {
            record,
            auto_added: draft.auto_added,
            monthly_cost,
        })
    }
}
