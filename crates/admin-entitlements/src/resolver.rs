//! Dependency Resolver
//!
//! Pure add/remove transitions over an [`EntitlementSet`]. Every operation
//! takes the current set by reference and returns either a complete new set
//! or a typed rejection; the input is never touched, so a rejected edit can
//! never leave a half-applied set behind.
//!
//! ```text
//!   add(ECOMMERCE)                       remove(BOOKING)
//!   ┌─────────┐    BFS over deps         ┌─────────┐   dependents in set?
//!   │ {CMS}   │ ─────────────────►       │ {CMS,   │ ──────────────────► reject
//!   └─────────┘  {CMS,BOOKING,ECOM}      │ BOOKING,│   blockers=[ECOM]
//!                added=[BOOKING]         │ ECOM}   │
//!                                        └─────────┘
//! ```

use crate::catalog::FeatureCatalog;
use crate::entitlement::EntitlementSet;
use crate::error::ResolveError;
use crate::feature::{Feature, FeatureId};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// Outcome of a resolver call: a new consistent set, or why the edit was refused
pub type EntitlementDecision = Result<EntitlementChange, ResolveError>;

/// A feature pulled in only because something else needs it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyNotice {
    /// Auto-added feature
    pub feature: FeatureId,
    /// Feature whose dependency list named it
    pub required_by: FeatureId,
}

/// Successful resolver transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitlementChange {
    /// Resulting set
    pub set: EntitlementSet,
    /// Dependencies introduced automatically, in discovery order
    pub added: Vec<FeatureId>,
    /// Why each entry of `added` was introduced
    pub notices: Vec<DependencyNotice>,
}

impl EntitlementChange {
    fn unchanged(set: &EntitlementSet) -> Self {
        Self {
            set: set.clone(),
            added: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Messages suitable for showing to the person who made the edit
    pub fn explain(&self, catalog: &FeatureCatalog) -> Vec<String> {
        let name = |id: &FeatureId| {
            catalog
                .get_by_id(id.as_str())
                .map(|f| f.name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        self.notices
            .iter()
            .map(|n| format!("added {} because {} requires it", name(&n.feature), name(&n.required_by)))
            .collect()
    }
}

/// Entitlement resolver bound to one catalog
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    catalog: &'a FeatureCatalog,
}

impl<'a> Resolver<'a> {
    /// Resolver over `catalog`
    pub fn new(catalog: &'a FeatureCatalog) -> Self {
        Self { catalog }
    }

    /// Enable a feature together with its transitive dependencies
    pub fn add_feature(&self, set: &EntitlementSet, id: &str) -> EntitlementDecision {
        let feature = self.catalog.lookup(id)?;

        // Members already carry their closure
        if set.contains(id) {
            return Ok(EntitlementChange::unchanged(set));
        }

        let notices = self.walk(feature, |dep| set.contains(dep));
        let added: Vec<FeatureId> = notices.iter().map(|n| n.feature.clone()).collect();

        let next = set.with(std::iter::once(feature.id.clone()).chain(added.iter().cloned()));

        debug!(feature = %feature.id, auto_added = added.len(), "feature enabled");
        Ok(EntitlementChange { set: next, added, notices })
    }

    /// Disable a single feature. Never cascades.
    pub fn remove_feature(&self, set: &EntitlementSet, id: &str) -> EntitlementDecision {
        let feature = self.catalog.lookup(id)?;

        if feature.required {
            warn!(feature = %feature.id, "refused to disable baseline feature");
            return Err(ResolveError::RequiredFeatureViolation { id: feature.id.clone() });
        }

        if !set.contains(id) {
            return Ok(EntitlementChange::unchanged(set));
        }

        let blockers = self.dependents(set, id);
        if !blockers.is_empty() {
            warn!(feature = %feature.id, blockers = ?blockers, "removal blocked by dependents");
            return Err(ResolveError::DependencyConflict {
                id: feature.id.clone(),
                blockers,
            });
        }

        debug!(feature = %feature.id, "feature disabled");
        Ok(EntitlementChange {
            set: set.without(id),
            added: Vec::new(),
            notices: Vec::new(),
        })
    }

    /// Enable several features as one edit.
    ///
    /// Either every id is applied or the first rejection is returned and
    /// nothing is. Features requested explicitly are not reported as
    /// auto-added even if an earlier entry pulled them in.
    pub fn seed<S: AsRef<str>>(&self, set: &EntitlementSet, ids: &[S]) -> EntitlementDecision {
        let requested: HashSet<&str> = ids.iter().map(|s| s.as_ref()).collect();
        let mut current = set.clone();
        let mut notices = Vec::new();

        for id in ids {
            let change = self.add_feature(&current, id.as_ref())?;
            notices.extend(
                change
                    .notices
                    .into_iter()
                    .filter(|n| !requested.contains(n.feature.as_str())),
            );
            current = change.set;
        }

        let added = notices.iter().map(|n| n.feature.clone()).collect();
        Ok(EntitlementChange { set: current, added, notices })
    }

    /// Transitive prerequisites of a feature in breadth-first order, excluding itself
    pub fn dependency_closure(&self, id: &str) -> Result<Vec<FeatureId>, ResolveError> {
        let feature = self.catalog.lookup(id)?;
        Ok(self
            .walk(feature, |_| false)
            .into_iter()
            .map(|n| n.feature)
            .collect())
    }

    /// Enabled features that list `id` as a direct dependency, in catalog order
    pub fn dependents(&self, set: &EntitlementSet, id: &str) -> Vec<FeatureId> {
        self.catalog
            .all_features()
            .iter()
            .filter(|f| set.contains(f.id.as_str()) && f.depends_on(id))
            .map(|f| f.id.clone())
            .collect()
    }

    /// Breadth-first traversal of dependency edges starting at `root`.
    /// Ids for which `present` holds are neither reported nor expanded.
    fn walk(&self, root: &Feature, present: impl Fn(&str) -> bool) -> Vec<DependencyNotice> {
        let mut discovered: HashSet<&FeatureId> = HashSet::new();
        let mut queue: VecDeque<&Feature> = VecDeque::from([root]);
        let mut notices = Vec::new();

        while let Some(current) = queue.pop_front() {
            for dep in &current.dependencies {
                if present(dep.as_str()) || !discovered.insert(dep) {
                    continue;
                }
                notices.push(DependencyNotice {
                    feature: dep.clone(),
                    required_by: current.id.clone(),
                });
                if let Some(next) = self.catalog.get_by_id(dep.as_str()) {
                    queue.push_back(next);
                }
            }
        }
        notices
    }
}
