//! Entitlement Service
//!
//! Fetch, resolve, persist. The resolver decides; the store serializes. On a
//! revision conflict the edit is recomputed from the fresh record rather than
//! blindly re-applied, so a concurrent change can turn a valid edit into a
//! rejection (e.g. a dependent was enabled in the meantime).

use crate::error::{StoreError, TenantError, TenantResult};
use crate::model::{TenantId, TenantRecord};
use crate::store::TenantStore;
use admin_entitlements::{
    DependencyNotice, EntitlementDecision, EntitlementEngine, EntitlementSet, FeatureId, FeatureRequirement,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitlementServiceConfig {
    /// Recompute-and-retry attempts after a revision conflict
    pub max_retries: u32,
}

impl Default for EntitlementServiceConfig {
    fn default() -> Self {
        Self { max_retries: 3 }
    }
}

/// Committed edit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureUpdate {
    /// Record after the write (unchanged for no-ops)
    pub record: TenantRecord,
    /// Dependencies that were enabled automatically
    pub added: Vec<FeatureId>,
    /// Why each entry of `added` was enabled
    pub notices: Vec<DependencyNotice>,
}

/// Tenant entitlement service
pub struct EntitlementService {
    engine: EntitlementEngine,
    store: Arc<dyn TenantStore>,
    config: EntitlementServiceConfig,
}

impl EntitlementService {
    /// Service with default retry settings
    pub fn new(engine: EntitlementEngine, store: Arc<dyn TenantStore>) -> Self {
        Self::with_config(engine, store, EntitlementServiceConfig::default())
    }

    /// Service with explicit settings
    pub fn with_config(
        engine: EntitlementEngine,
        store: Arc<dyn TenantStore>,
        config: EntitlementServiceConfig,
    ) -> Self {
        Self { engine, store, config }
    }

    /// Engine the service resolves with
    pub fn engine(&self) -> &EntitlementEngine {
        &self.engine
    }

    /// Enable a feature (and its prerequisites) for a tenant
    pub async fn enable_feature(&self, tenant_id: &TenantId, feature: &str) -> TenantResult<FeatureUpdate> {
        let update = self
            .apply(tenant_id, |engine, set| engine.add_feature(set, feature))
            .await?;
        if !update.added.is_empty() {
            info!(
                tenant = %tenant_id,
                feature,
                auto_added = ?update.added,
                "feature enabled with dependencies"
            );
        }
        Ok(update)
    }

    /// Disable a single feature for a tenant
    pub async fn disable_feature(&self, tenant_id: &TenantId, feature: &str) -> TenantResult<FeatureUpdate> {
        self.apply(tenant_id, |engine, set| engine.remove_feature(set, feature))
            .await
    }

    /// Evaluate a guard requirement against the stored set
    pub async fn has_access(&self, tenant_id: &TenantId, requirement: &FeatureRequirement) -> TenantResult<bool> {
        let record = self.store.get(tenant_id).await?;
        Ok(self.engine.check(&record.features, requirement))
    }

    /// Current monthly total for a tenant
    pub async fn monthly_cost(&self, tenant_id: &TenantId) -> TenantResult<Decimal> {
        let record = self.store.get(tenant_id).await?;
        Ok(self.engine.monthly_cost(&record.features))
    }

    async fn apply<F>(&self, tenant_id: &TenantId, resolve: F) -> TenantResult<FeatureUpdate>
    where
        F: Fn(&EntitlementEngine, &EntitlementSet) -> EntitlementDecision + Send + Sync,
    {
        let attempts = self.config.max_retries.saturating_add(1);

        for attempt in 1..=attempts {
            let record = self.store.get(tenant_id).await?;
            let change = resolve(&self.engine, &record.features)?;

            if change.set == record.features {
                return Ok(FeatureUpdate {
                    record,
                    added: Vec::new(),
                    notices: Vec::new(),
                });
            }

            match self
                .store
                .compare_and_swap(tenant_id, record.revision, change.set)
                .await
            {
                Ok(record) => {
                    return Ok(FeatureUpdate {
                        record,
                        added: change.added,
                        notices: change.notices,
                    })
                }
                Err(StoreError::RevisionConflict { .. }) => {
                    warn!(tenant = %tenant_id, attempt, "entitlement write conflicted, recomputing");
                    tokio::task::yield_now().await;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TenantError::RetriesExhausted {
            tenant_id: *tenant_id,
            attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreResult;
    use crate::store::InMemoryTenantStore;
    use admin_entitlements::{FeatureCatalog, ResolveError};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn engine() -> EntitlementEngine {
        EntitlementEngine::new(FeatureCatalog::builtin().unwrap())
    }

    async fn seeded(engine: &EntitlementEngine) -> (Arc<InMemoryTenantStore>, TenantId) {
        let store = Arc::new(InMemoryTenantStore::new());
        let record = TenantRecord::new("Acme", engine.baseline());
        let id = record.tenant_id;
        store.insert(record).await.unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn test_enable_and_disable() {
        let engine = engine();
        let (store, id) = seeded(&engine).await;
        let service = EntitlementService::new(engine, store.clone());

        let update = service.enable_feature(&id, "ECOMMERCE_ENGINE").await.unwrap();
        assert_eq!(update.added, vec![FeatureId::new("BOOKING_ENGINE").unwrap()]);
        assert_eq!(update.record.revision, 1);
        assert_eq!(service.monthly_cost(&id).await.unwrap(), dec!(298));

        let err = service.disable_feature(&id, "BOOKING_ENGINE").await.unwrap_err();
        assert!(matches!(err, TenantError::Rejected(ResolveError::DependencyConflict { .. })));
        // Rejection leaves the stored record untouched
        assert_eq!(store.get(&id).await.unwrap().revision, 1);

        service.disable_feature(&id, "ECOMMERCE_ENGINE").await.unwrap();
        let update = service.disable_feature(&id, "BOOKING_ENGINE").await.unwrap();
        assert_eq!(update.record.features, service.engine().baseline());
        assert_eq!(update.record.revision, 3);
    }

    #[tokio::test]
    async fn test_noop_does_not_write() {
        let engine = engine();
        let (store, id) = seeded(&engine).await;
        let service = EntitlementService::new(engine, store.clone());

        service.disable_feature(&id, "HRMS_ENGINE").await.unwrap();
        assert_eq!(store.get(&id).await.unwrap().revision, 0);
    }

    #[tokio::test]
    async fn test_access_check() {
        let engine = engine();
        let (store, id) = seeded(&engine).await;
        let service = EntitlementService::new(engine, store);

        let shop = FeatureRequirement::all(["ECOMMERCE_ENGINE"]);
        assert!(!service.has_access(&id, &shop).await.unwrap());

        service.enable_feature(&id, "ECOMMERCE_ENGINE").await.unwrap();
        assert!(service.has_access(&id, &shop).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_tenant() {
        let engine = engine();
        let service = EntitlementService::new(engine, Arc::new(InMemoryTenantStore::new()));

        let missing = TenantId::new_v4();
        assert!(matches!(
            service.enable_feature(&missing, "FORMS_MODULE").await,
            Err(TenantError::Store(StoreError::NotFound(_)))
        ));
    }

    /// Store whose first `conflicts` CAS calls lose to a phantom writer
    struct ContendedStore {
        inner: InMemoryTenantStore,
        conflicts: AtomicU32,
    }

    #[async_trait]
    impl TenantStore for ContendedStore {
        async fn get(&self, tenant_id: &TenantId) -> StoreResult<TenantRecord> {
            self.inner.get(tenant_id).await
        }

        async fn insert(&self, record: TenantRecord) -> StoreResult<()> {
            self.inner.insert(record).await
        }

        async fn compare_and_swap(
            &self,
            tenant_id: &TenantId,
            expected_revision: u64,
            features: EntitlementSet,
        ) -> StoreResult<TenantRecord> {
            if self.conflicts.load(Ordering::SeqCst) > 0 {
                self.conflicts.fetch_sub(1, Ordering::SeqCst);
                return Err(StoreError::RevisionConflict {
                    tenant_id: *tenant_id,
                    expected: expected_revision,
                    actual: expected_revision + 1,
                });
            }
            self.inner.compare_and_swap(tenant_id, expected_revision, features).await
        }

        async fn delete(&self, tenant_id: &TenantId) -> StoreResult<()> {
            self.inner.delete(tenant_id).await
        }

        async fn list(&self) -> StoreResult<Vec<TenantRecord>> {
            self.inner.list().await
        }
    }

    #[tokio::test]
    async fn test_conflict_is_retried() {
        let engine = engine();
        let record = TenantRecord::new("Acme", engine.baseline());
        let id = record.tenant_id;
        let store = Arc::new(ContendedStore {
            inner: InMemoryTenantStore::new(),
            conflicts: AtomicU32::new(2),
        });
        store.insert(record).await.unwrap();

        let service = EntitlementService::new(engine, store);
        let update = service.enable_feature(&id, "LEGAL_MODULE").await.unwrap();
        assert!(update.record.features.contains("LEGAL_MODULE"));
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let engine = engine();
        let record = TenantRecord::new("Acme", engine.baseline());
        let id = record.tenant_id;
        let store = Arc::new(ContendedStore {
            inner: InMemoryTenantStore::new(),
            conflicts: AtomicU32::new(10),
        });
        store.insert(record).await.unwrap();

        let service = EntitlementService::with_config(engine, store, EntitlementServiceConfig { max_retries: 1 });
        assert!(matches!(
            service.enable_feature(&id, "LEGAL_MODULE").await,
            Err(TenantError::RetriesExhausted { attempts: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_unbounded_retry_budget() {
        let engine = engine();
        let (store, id) = seeded(&engine).await;

        let config = EntitlementServiceConfig { max_retries: u32::MAX };
        let service = EntitlementService::with_config(engine, store, config);
        let update = service.enable_feature(&id, "FORMS_MODULE").await.unwrap();
        assert_eq!(update.record.revision, 1);
    }
}
