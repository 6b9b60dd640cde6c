//! Tenant Feature Entitlement Engine
//!
//! Decides which optional engines and modules a tenant has enabled, keeps
//! that set closed under declared dependencies, prices it, and answers the
//! access checks every navigation entry, route and panel performs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ENTITLEMENT ENGINE                                 │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    FEATURE CATALOG (immutable)                   │  │
//! │  │   CMS* ◄── FORMS   CMS* ◄── LEGAL   BOOKING ◄── ECOMMERCE   HRMS │  │
//! │  │   validated once: unique ids | known deps | one baseline | DAG  │  │
//! │  └───────────────┬──────────────────────┬───────────────────────────┘  │
//! │                  │                      │                              │
//! │  ┌───────────────▼──────────┐  ┌────────▼─────────┐  ┌──────────────┐  │
//! │  │        RESOLVER          │  │ COST CALCULATOR  │  │ ACCESS GUARD │  │
//! │  │  add: BFS closure        │  │ Σ pricing, 2dp   │  │  All | Any   │  │
//! │  │  remove: no cascade      │  └──────────────────┘  └──────┬───────┘  │
//! │  └───────────────┬──────────┘                               │          │
//! │                  ▼                                          │          │
//! │          EntitlementSet ────────────────────────────────────┘          │
//! │       (per tenant, persisted by the tenant store)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything in this crate is synchronous and free of shared mutable state.

#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod cost;
pub mod engine;
pub mod entitlement;
pub mod error;
pub mod feature;
pub mod guard;
pub mod resolver;

#[cfg(test)]
mod properties;

pub use catalog::FeatureCatalog;
pub use config::CatalogConfig;
pub use cost::{CostBreakdown, CostCalculator, LineItem};
pub use engine::EntitlementEngine;
pub use entitlement::EntitlementSet;
pub use error::{CatalogError, CatalogResult, EntitlementError, ResolveError};
pub use feature::{Feature, FeatureCategory, FeatureId};
pub use guard::{has_access, AccessMode, FeatureRequirement};
pub use resolver::{DependencyNotice, EntitlementChange, EntitlementDecision, Resolver};
