//! Tenant Entitlement Management
//!
//! The boundary between the pure entitlement engine and the rest of the
//! admin platform.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        TENANT ENTITLEMENTS                              │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌────────────────────────┐   │
//! │  │ Provisioner  │   │ EntitlementSvc   │   │ Navigation / Gates     │   │
//! │  │ draft+commit │   │ fetch→resolve→CAS│   │ filter sidebar, routes │   │
//! │  └──────┬───────┘   └────────┬─────────┘   └───────────┬────────────┘   │
//! │         │                    │                         │                │
//! │  ┌──────▼────────────────────▼─────────────────────────▼────────────┐   │
//! │  │                 admin-entitlements (pure engine)                 │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │         │                    │                                          │
//! │  ┌──────▼────────────────────▼──────────────────────────────────────┐   │
//! │  │        TenantStore: revision-checked writes per tenant           │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod navigation;
pub mod provisioning;
pub mod service;
pub mod store;

pub use error::{StoreError, StoreResult, TenantError, TenantResult};
pub use model::{TenantId, TenantRecord, TenantSnapshot};
pub use navigation::{filter_navigation, gate_route, GateDecision, GateFallback, NavItem};
pub use provisioning::{ProvisionedTenant, TenantDraft, TenantProvisioner};
pub use service::{EntitlementService, EntitlementServiceConfig, FeatureUpdate};
pub use store::{InMemoryTenantStore, TenantStore};
