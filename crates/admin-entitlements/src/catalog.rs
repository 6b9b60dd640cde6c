//! Feature Catalog
//!
//! Immutable registry of every purchasable engine and module. The catalog is
//! validated once at construction: ids are unique, dependency edges resolve,
//! prices are non-negative, exactly one feature is the required baseline and
//! the dependency graph is acyclic. Resolution never re-checks any of this.

use crate::error::{CatalogError, CatalogResult, ResolveError};
use crate::feature::{Feature, FeatureCategory, FeatureId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

/// Feature catalog
#[derive(Debug, Clone)]
pub struct FeatureCatalog {
    /// Features in insertion order
    features: Vec<Feature>,
    /// Id -> position in `features`
    index: HashMap<FeatureId, usize>,
    /// The single always-on feature
    required: FeatureId,
}

impl FeatureCatalog {
    /// Build and validate a catalog
    pub fn from_features(features: Vec<Feature>) -> CatalogResult<Self> {
        let mut features = features;
        let mut index = HashMap::with_capacity(features.len());

        for (pos, feature) in features.iter_mut().enumerate() {
            // Dependencies are a set; keep first occurrence order
            let mut seen = HashSet::new();
            feature.dependencies.retain(|d| seen.insert(d.clone()));

            if index.insert(feature.id.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateFeature(feature.id.clone()));
            }
        }

        for feature in &features {
            if feature.pricing < Decimal::ZERO {
                return Err(CatalogError::NegativePrice(feature.id.clone()));
            }
            for dependency in &feature.dependencies {
                if dependency == &feature.id {
                    return Err(CatalogError::SelfDependency(feature.id.clone()));
                }
                if !index.contains_key(dependency) {
                    return Err(CatalogError::UnknownDependency {
                        feature: feature.id.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        let required: Vec<&Feature> = features.iter().filter(|f| f.required).collect();
        if required.len() != 1 {
            return Err(CatalogError::RequiredFeatureCount { found: required.len() });
        }
        let baseline = required[0];
        if !baseline.dependencies.is_empty() {
            return Err(CatalogError::RequiredFeatureHasDependencies(baseline.id.clone()));
        }
        let required = baseline.id.clone();

        let catalog = Self { features, index, required };
        catalog.validate_acyclic()?;

        info!(
            features = catalog.features.len(),
            required = %catalog.required,
            "feature catalog loaded"
        );
        Ok(catalog)
    }

    /// Platform default catalog
    pub fn builtin() -> CatalogResult<Self> {
        let cms = FeatureId::new("CMS_ENGINE")?;
        let booking = FeatureId::new("BOOKING_ENGINE")?;

        Self::from_features(vec![
            Feature::builder(cms.clone(), "CMS Engine", FeatureCategory::Engine)
                .description("Pages, sections and content management")
                .pricing(dec!(0))
                .required()
                .build(),
            Feature::builder(booking.clone(), "Booking Engine", FeatureCategory::Engine)
                .description("Appointments, resources and availability calendars")
                .pricing(dec!(99))
                .build(),
            Feature::builder(FeatureId::new("ECOMMERCE_ENGINE")?, "E-commerce Engine", FeatureCategory::Engine)
                .description("Products, carts, orders and checkout")
                .pricing(dec!(199))
                .depends_on(booking)
                .build(),
            Feature::builder(FeatureId::new("FORMS_MODULE")?, "Forms Module", FeatureCategory::Module)
                .description("Form builder and submission inbox")
                .pricing(dec!(49))
                .depends_on(cms.clone())
                .build(),
            Feature::builder(FeatureId::new("LEGAL_MODULE")?, "Legal Module", FeatureCategory::Module)
                .description("Terms, privacy policy and consent pages")
                .pricing(dec!(29))
                .depends_on(cms)
                .build(),
            Feature::builder(FeatureId::new("HRMS_ENGINE")?, "HRMS Engine", FeatureCategory::Engine)
                .description("Employees, leave and payroll records")
                .pricing(dec!(149))
                .build(),
        ])
    }

    /// Depth-first search for a back-edge in the dependency graph.
    ///
    /// Returns the offending cycle as a path that starts and ends on the same
    /// feature, e.g. `A -> B -> C -> A`.
    pub fn validate_acyclic(&self) -> CatalogResult<()> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }

        let mut marks = vec![Mark::Unvisited; self.features.len()];

        for root in 0..self.features.len() {
            if marks[root] != Mark::Unvisited {
                continue;
            }

            // (feature position, next dependency to visit)
            let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
            marks[root] = Mark::OnStack;

            while let Some(frame) = stack.last_mut() {
                let (node, next) = *frame;
                let deps = &self.features[node].dependencies;

                if next == deps.len() {
                    marks[node] = Mark::Done;
                    stack.pop();
                    continue;
                }
                frame.1 += 1;

                let child = self.index[&deps[next]];
                match marks[child] {
                    Mark::Unvisited => {
                        marks[child] = Mark::OnStack;
                        stack.push((child, 0));
                    }
                    Mark::OnStack => {
                        let start = stack.iter().position(|(n, _)| *n == child).unwrap_or(0);
                        let mut path: Vec<FeatureId> = stack[start..]
                            .iter()
                            .map(|(n, _)| self.features[*n].id.clone())
                            .collect();
                        path.push(self.features[child].id.clone());
                        return Err(CatalogError::CyclicDependency { path });
                    }
                    Mark::Done => {}
                }
            }
        }

        debug!(features = self.features.len(), "dependency graph is acyclic");
        Ok(())
    }

    /// Get feature by id
    pub fn get_by_id(&self, id: &str) -> Option<&Feature> {
        self.index.get(id).map(|&pos| &self.features[pos])
    }

    /// Get feature by id, rejecting unknown ids
    pub fn lookup(&self, id: &str) -> Result<&Feature, ResolveError> {
        self.get_by_id(id)
            .ok_or_else(|| ResolveError::UnknownFeature { id: id.to_string() })
    }

    /// All features in insertion order
    pub fn all_features(&self) -> &[Feature] {
        &self.features
    }

    /// Ids of features marked required
    pub fn required_feature_ids(&self) -> BTreeSet<FeatureId> {
        self.features
            .iter()
            .filter(|f| f.required)
            .map(|f| f.id.clone())
            .collect()
    }

    /// The baseline feature id
    pub fn required_feature(&self) -> &FeatureId {
        &self.required
    }

    /// Whether `id` names a catalog feature
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Catalog position, used for stable ordering of reports
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Always false for a validated catalog
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> FeatureId {
        FeatureId::new(s).unwrap()
    }

    fn engine(s: &str) -> Feature {
        Feature::builder(id(s), s, FeatureCategory::Engine).build()
    }

    fn baseline() -> Feature {
        Feature::builder(id("CMS_ENGINE"), "CMS", FeatureCategory::Engine).required().build()
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = FeatureCatalog::builtin().unwrap();

        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.required_feature().as_str(), "CMS_ENGINE");
        assert_eq!(catalog.required_feature_ids().len(), 1);
        assert!(catalog.get_by_id("ECOMMERCE_ENGINE").unwrap().depends_on("BOOKING_ENGINE"));
        assert!(catalog.get_by_id("NOPE").is_none());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let catalog = FeatureCatalog::from_features(vec![
            engine("ZETA"),
            baseline(),
            engine("ALPHA"),
        ])
        .unwrap();

        let ids: Vec<&str> = catalog.all_features().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["ZETA", "CMS_ENGINE", "ALPHA"]);
        assert_eq!(catalog.position("ALPHA"), Some(2));
    }

    #[test]
    fn test_lookup_unknown() {
        let catalog = FeatureCatalog::builtin().unwrap();
        let err = catalog.lookup("GHOST").unwrap_err();
        assert_eq!(err, ResolveError::UnknownFeature { id: "GHOST".into() });
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = FeatureCatalog::from_features(vec![baseline(), engine("A"), engine("A")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateFeature(ref f) if f.as_str() == "A"));
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let a = Feature::builder(id("A"), "A", FeatureCategory::Module).depends_on(id("MISSING")).build();
        let err = FeatureCatalog::from_features(vec![baseline(), a]).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownDependency { .. }));
    }

    #[test]
    fn test_self_dependency_rejected() {
        let a = Feature::builder(id("A"), "A", FeatureCategory::Module).depends_on(id("A")).build();
        let err = FeatureCatalog::from_features(vec![baseline(), a]).unwrap_err();
        assert!(matches!(err, CatalogError::SelfDependency(_)));
    }

    #[test]
    fn test_negative_price_rejected() {
        let a = Feature::builder(id("A"), "A", FeatureCategory::Engine).pricing(dec!(-1)).build();
        let err = FeatureCatalog::from_features(vec![baseline(), a]).unwrap_err();
        assert!(matches!(err, CatalogError::NegativePrice(_)));
    }

    #[test]
    fn test_required_count() {
        let err = FeatureCatalog::from_features(vec![engine("A")]).unwrap_err();
        assert!(matches!(err, CatalogError::RequiredFeatureCount { found: 0 }));

        let second = Feature::builder(id("B"), "B", FeatureCategory::Engine).required().build();
        let err = FeatureCatalog::from_features(vec![baseline(), second]).unwrap_err();
        assert!(matches!(err, CatalogError::RequiredFeatureCount { found: 2 }));
    }

    #[test]
    fn test_required_with_dependencies_rejected() {
        let cms = Feature::builder(id("CMS_ENGINE"), "CMS", FeatureCategory::Engine)
            .required()
            .depends_on(id("A"))
            .build();
        let err = FeatureCatalog::from_features(vec![cms, engine("A")]).unwrap_err();
        assert!(matches!(err, CatalogError::RequiredFeatureHasDependencies(_)));
    }

    #[test]
    fn test_cycle_detected_with_path() {
        let a = Feature::builder(id("A"), "A", FeatureCategory::Module).depends_on(id("B")).build();
        let b = Feature::builder(id("B"), "B", FeatureCategory::Module).depends_on(id("C")).build();
        let c = Feature::builder(id("C"), "C", FeatureCategory::Module).depends_on(id("A")).build();

        let err = FeatureCatalog::from_features(vec![baseline(), a, b, c]).unwrap_err();
        match err {
            CatalogError::CyclicDependency { path } => {
                let path: Vec<&str> = path.iter().map(FeatureId::as_str).collect();
                assert_eq!(path, vec!["A", "B", "C", "A"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_below_root_reports_only_the_loop() {
        let x = Feature::builder(id("X"), "X", FeatureCategory::Module).depends_on(id("A")).build();
        let a = Feature::builder(id("A"), "A", FeatureCategory::Module).depends_on(id("B")).build();
        let b = Feature::builder(id("B"), "B", FeatureCategory::Module).depends_on(id("A")).build();

        // X is visited first but is not part of the loop
        let err = FeatureCatalog::from_features(vec![x, baseline(), a, b]).unwrap_err();
        match err {
            CatalogError::CyclicDependency { path } => {
                let path: Vec<&str> = path.iter().map(FeatureId::as_str).collect();
                assert_eq!(path, vec!["A", "B", "A"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let top = Feature::builder(id("TOP"), "Top", FeatureCategory::Module)
            .depends_on(id("LEFT"))
            .depends_on(id("RIGHT"))
            .build();
        let left = Feature::builder(id("LEFT"), "Left", FeatureCategory::Module).depends_on(id("BASE")).build();
        let right = Feature::builder(id("RIGHT"), "Right", FeatureCategory::Module).depends_on(id("BASE")).build();

        let catalog = FeatureCatalog::from_features(vec![baseline(), top, left, right, engine("BASE")]);
        assert!(catalog.is_ok());
    }

    #[test]
    fn test_duplicate_dependency_edges_collapsed() {
        let a = Feature::builder(id("A"), "A", FeatureCategory::Module)
            .depends_on(id("CMS_ENGINE"))
            .depends_on(id("CMS_ENGINE"))
            .build();
        let catalog = FeatureCatalog::from_features(vec![baseline(), a]).unwrap();
        assert_eq!(catalog.get_by_id("A").unwrap().dependencies.len(), 1);
    }
}
