//! Tenant Store - Persistence abstraction for tenant entitlements
//!
//! Concurrent plan edits are serialized here, not in the engine: every write
//! names the revision it was computed from, and a write against a stale
//! revision is refused without storing anything.

use crate::error::{StoreError, StoreResult};
use crate::model::{TenantId, TenantRecord};
use admin_entitlements::EntitlementSet;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Tenant repository
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Get tenant by ID
    async fn get(&self, tenant_id: &TenantId) -> StoreResult<TenantRecord>;

    /// Insert a new tenant
    async fn insert(&self, record: TenantRecord) -> StoreResult<()>;

    /// Replace the feature set if the stored revision still equals `expected_revision`.
    /// Returns the committed record.
    async fn compare_and_swap(
        &self,
        tenant_id: &TenantId,
        expected_revision: u64,
        features: EntitlementSet,
    ) -> StoreResult<TenantRecord>;

    /// Delete tenant
    async fn delete(&self, tenant_id: &TenantId) -> StoreResult<()>;

    /// List all tenants
    async fn list(&self) -> StoreResult<Vec<TenantRecord>>;
}

/// In-memory tenant store (for testing and development)
pub struct InMemoryTenantStore {
    tenants: RwLock<HashMap<TenantId, TenantRecord>>,
}

impl InMemoryTenantStore {
    /// Empty store
    pub fn new() -> Self {
        Self {
            tenants: RwLock::new(HashMap::new()),
        }
    }

    /// Get tenant count
    pub fn count(&self) -> usize {
        self.tenants.read().len()
    }
}

impl Default for InMemoryTenantStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TenantStore for InMemoryTenantStore {
    async fn get(&self, tenant_id: &TenantId) -> StoreResult<TenantRecord> {
        self.tenants
            .read()
            .get(tenant_id)
            .cloned()
            .ok_or(StoreError::NotFound(*tenant_id))
    }

    async fn insert(&self, record: TenantRecord) -> StoreResult<()> {
        let mut tenants = self.tenants.write();
        if tenants.contains_key(&record.tenant_id) {
            return Err(StoreError::AlreadyExists(record.tenant_id));
        }
        debug!(tenant = %record.tenant_id, features = record.features.len(), "tenant inserted");
        tenants.insert(record.tenant_id, record);
        Ok(())
    }

    async fn compare_and_swap(
        &self,
        tenant_id: &TenantId,
        expected_revision: u64,
        features: EntitlementSet,
    ) -> StoreResult<TenantRecord> {
        let mut tenants = self.tenants.write();
        let record = tenants
            .get_mut(tenant_id)
            .ok_or(StoreError::NotFound(*tenant_id))?;

        if record.revision != expected_revision {
            warn!(
                tenant = %tenant_id,
                expected = expected_revision,
                actual = record.revision,
                "stale entitlement write refused"
            );
            return Err(StoreError::RevisionConflict {
                tenant_id: *tenant_id,
                expected: expected_revision,
                actual: record.revision,
            });
        }

        record.features = features;
        record.revision += 1;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, tenant_id: &TenantId) -> StoreResult<()> {
        self.tenants
            .write()
            .remove(tenant_id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(*tenant_id))
    }

    async fn list(&self) -> StoreResult<Vec<TenantRecord>> {
        Ok(self.tenants.read().values().cloned().collect())
    }
}
