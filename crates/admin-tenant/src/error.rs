//! Tenant error types

use crate::model::TenantId;
use admin_entitlements::{EntitlementError, ResolveError};
use thiserror::Error;

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No tenant with this id
    #[error("tenant not found: {0}")]
    NotFound(TenantId),

    /// Insert collided with an existing id
    #[error("tenant already exists: {0}")]
    AlreadyExists(TenantId),

    /// Another writer committed first
    #[error("revision conflict on tenant {tenant_id}: expected {expected}, found {actual}")]
    RevisionConflict {
        /// Tenant being written
        tenant_id: TenantId,
        /// Revision the write was computed from
        expected: u64,
        /// Revision currently stored
        actual: u64,
    },

    /// Backend failure
    #[error("storage error: {0}")]
    Storage(String),
}

/// Tenant workflow errors
#[derive(Debug, Error)]
pub enum TenantError {
    /// Persistence failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The resolver refused the edit; nothing was written
    #[error("entitlement rejected: {0}")]
    Rejected(#[from] ResolveError),

    /// Stored or drafted set breaks the closure or baseline rule
    #[error("invalid entitlement: {0}")]
    Entitlement(#[from] EntitlementError),

    /// Every attempt lost a revision race
    #[error("gave up on tenant {tenant_id} after {attempts} conflicting writes")]
    RetriesExhausted {
        /// Tenant being written
        tenant_id: TenantId,
        /// Attempts made, including the first
        attempts: u32,
    },
}

/// Store result type
pub type StoreResult<T> = Result<T, StoreError>;

/// Tenant result type
pub type TenantResult<T> = Result<T, TenantError>;
