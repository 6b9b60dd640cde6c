//! Error types for the entitlement engine

use crate::feature::FeatureId;
use std::path::PathBuf;
use thiserror::Error;

/// Catalog construction and loading errors.
///
/// Every variant is fatal: a catalog that fails to build must never be served.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two catalog entries share an id
    #[error("duplicate feature id: {0}")]
    DuplicateFeature(FeatureId),

    /// A dependency edge points outside the catalog
    #[error("feature {feature} depends on unknown feature {dependency}")]
    UnknownDependency {
        /// Feature declaring the edge
        feature: FeatureId,
        /// Missing target
        dependency: FeatureId,
    },

    /// A feature lists itself as a dependency
    #[error("feature {0} depends on itself")]
    SelfDependency(FeatureId),

    /// Monthly price below zero
    #[error("feature {0} has a negative price")]
    NegativePrice(FeatureId),

    /// Not exactly one baseline feature
    #[error("catalog must mark exactly one feature as required, found {found}")]
    RequiredFeatureCount {
        /// Number of features marked required
        found: usize,
    },

    /// The baseline feature must be the closure root
    #[error("required feature {0} must not declare dependencies")]
    RequiredFeatureHasDependencies(FeatureId),

    /// Dependency graph contains a cycle
    #[error("cyclic dependency: {}", format_path(.path))]
    CyclicDependency {
        /// Loop, starting and ending on the same feature
        path: Vec<FeatureId>,
    },

    /// Malformed feature identifier
    #[error("invalid feature id {id:?}: {reason}")]
    InvalidFeatureId {
        /// Rejected input
        id: String,
        /// Rule it broke
        reason: &'static str,
    },

    /// Config file could not be decoded
    #[error("catalog parse error: {0}")]
    Parse(String),

    /// Config file extension not recognised
    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    /// Catalog file could not be read
    #[error("cannot read catalog file {}", .path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },
}

/// Rejections returned by the resolver.
///
/// These are values, not failures: callers inspect them and decide what to
/// tell the user. The input set is never modified when one is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Caller referenced an id absent from the catalog
    #[error("unknown feature: {id}")]
    UnknownFeature {
        /// Id as given by the caller
        id: String,
    },

    /// Attempt to disable the baseline feature
    #[error("{id} is the baseline feature and cannot be disabled")]
    RequiredFeatureViolation {
        /// The baseline feature
        id: FeatureId,
    },

    /// Removal blocked by enabled dependents
    #[error("cannot disable {id}: still required by {}", format_path_list(.blockers))]
    DependencyConflict {
        /// Feature the caller tried to disable
        id: FeatureId,
        /// Enabled features that depend on it, in catalog order
        blockers: Vec<FeatureId>,
    },
}

impl ResolveError {
    /// Features that must be disabled first, empty for other rejections
    pub fn blockers(&self) -> &[FeatureId] {
        match self {
            Self::DependencyConflict { blockers, .. } => blockers,
            _ => &[],
        }
    }
}

/// Errors raised when rebuilding a persisted entitlement set
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// Stored id is not in the catalog
    #[error("stored entitlement references unknown feature {0}")]
    UnknownFeature(String),

    /// Stored set violates the closure rule
    #[error("{feature} is enabled but its dependency {dependency} is not")]
    MissingDependency {
        /// Enabled feature
        feature: FeatureId,
        /// Its prerequisite absent from the set
        dependency: FeatureId,
    },

    /// Stored set lacks the baseline feature
    #[error("baseline feature {0} is missing")]
    MissingBaseline(FeatureId),
}

fn format_path(path: &[FeatureId]) -> String {
    path.iter()
        .map(FeatureId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn format_path_list(ids: &[FeatureId]) -> String {
    ids.iter()
        .map(FeatureId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
