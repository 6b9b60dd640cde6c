//! Tenant Data Model

use admin_entitlements::{EntitlementEngine, EntitlementError, EntitlementSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tenant ID
pub type TenantId = Uuid;

/// Tenant record as held by the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantRecord {
    /// Unique tenant ID
    pub tenant_id: TenantId,
    /// Display name
    pub name: String,
    /// Enabled features
    pub features: EntitlementSet,
    /// Bumped on every committed write
    pub revision: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last committed write
    pub updated_at: DateTime<Utc>,
}

impl TenantRecord {
    /// Create new tenant record at revision 0
    pub fn new(name: impl Into<String>, features: EntitlementSet) -> Self {
        let now = Utc::now();
        Self {
            tenant_id: Uuid::new_v4(),
            name: name.into(),
            features,
            revision: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Flatten for an external database row or API payload
    pub fn snapshot(&self) -> TenantSnapshot {
        TenantSnapshot {
            tenant_id: self.tenant_id,
            name: self.name.clone(),
            features: self.features.to_ids(),
            revision: self.revision,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Rebuild from an external row, validating the feature list
    pub fn restore(engine: &EntitlementEngine, snapshot: TenantSnapshot) -> Result<Self, EntitlementError> {
        let features = engine.restore(&snapshot.features)?;
        Ok(Self {
            tenant_id: snapshot.tenant_id,
            name: snapshot.name,
            features,
            revision: snapshot.revision,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        })
    }
}

/// Persisted shape: features as plain ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantSnapshot {
    /// Unique tenant ID
    pub tenant_id: TenantId,
    /// Display name
    pub name: String,
    /// Enabled feature ids
    pub features: Vec<String>,
    /// Bumped on every committed write
    pub revision: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last committed write
    pub updated_at: DateTime<Utc>,
}
