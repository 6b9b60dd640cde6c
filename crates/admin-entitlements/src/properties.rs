//! Property tests over randomly generated acyclic catalogs

use crate::catalog::FeatureCatalog;
use crate::cost::CostCalculator;
use crate::entitlement::EntitlementSet;
use crate::error::ResolveError;
use crate::feature::{Feature, FeatureCategory, FeatureId};
use crate::guard::{has_access, AccessMode};
use crate::resolver::Resolver;
use proptest::prelude::*;
use proptest::sample::Index;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
enum Op {
    Add(Index),
    Remove(Index),
}

/// Feature `i` may only depend on features `< i`, so the graph is a DAG by
/// construction. Feature 0 is the baseline.
fn build_catalog(prices: Vec<u32>, deps: Vec<Vec<Index>>) -> FeatureCatalog {
    let features = prices
        .iter()
        .enumerate()
        .map(|(i, price)| {
            let mut builder = Feature::builder(
                FeatureId::new(format!("F{i}")).unwrap(),
                format!("Feature {i}"),
                if i % 2 == 0 { FeatureCategory::Engine } else { FeatureCategory::Module },
            )
            .pricing(Decimal::from(*price));
            if i == 0 {
                builder = builder.required();
            } else {
                for dep in &deps[i] {
                    builder = builder.depends_on(FeatureId::new(format!("F{}", dep.index(i))).unwrap());
                }
            }
            builder.build()
        })
        .collect();

    FeatureCatalog::from_features(features).unwrap()
}

fn catalog_strategy() -> impl Strategy<Value = FeatureCatalog> {
    (2usize..10)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(0u32..500, n),
                prop::collection::vec(prop::collection::vec(any::<Index>(), 0..3), n),
            )
        })
        .prop_map(|(prices, deps)| build_catalog(prices, deps))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<Index>().prop_map(Op::Add),
        any::<Index>().prop_map(Op::Remove),
    ]
}

fn pick<'c>(catalog: &'c FeatureCatalog, index: &Index) -> &'c str {
    catalog.all_features()[index.index(catalog.len())].id.as_str()
}

/// Replay operations, keeping only successful transitions
fn replay(catalog: &FeatureCatalog, ops: &[Op]) -> EntitlementSet {
    let resolver = Resolver::new(catalog);
    let mut set = EntitlementSet::baseline(catalog);
    for op in ops {
        let result = match op {
            Op::Add(i) => resolver.add_feature(&set, pick(catalog, i)),
            Op::Remove(i) => resolver.remove_feature(&set, pick(catalog, i)),
        };
        if let Ok(change) = result {
            set = change.set;
        }
    }
    set
}

proptest! {
    #[test]
    fn closure_holds_after_every_add(
        catalog in catalog_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..20),
        target in any::<Index>(),
    ) {
        let set = replay(&catalog, &ops);
        prop_assert!(set.validate(&catalog).is_ok());

        let change = Resolver::new(&catalog).add_feature(&set, pick(&catalog, &target)).unwrap();
        prop_assert!(change.set.validate(&catalog).is_ok());
        prop_assert!(set.is_subset(&change.set));
    }

    #[test]
    fn add_is_idempotent(
        catalog in catalog_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..20),
        target in any::<Index>(),
    ) {
        let resolver = Resolver::new(&catalog);
        let set = replay(&catalog, &ops);
        let id = pick(&catalog, &target);

        let once = resolver.add_feature(&set, id).unwrap();
        let twice = resolver.add_feature(&once.set, id).unwrap();
        prop_assert_eq!(&once.set, &twice.set);
        prop_assert!(twice.added.is_empty());
    }

    #[test]
    fn baseline_is_permanent(
        catalog in catalog_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..30),
    ) {
        let set = replay(&catalog, &ops);
        let required = catalog.required_feature().clone();
        prop_assert!(set.contains(required.as_str()));

        let before = set.clone();
        let result = Resolver::new(&catalog).remove_feature(&set, required.as_str());
        prop_assert_eq!(result, Err(ResolveError::RequiredFeatureViolation { id: required }));
        prop_assert_eq!(set, before);
    }

    #[test]
    fn removal_is_atomic(
        catalog in catalog_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..20),
        target in any::<Index>(),
    ) {
        let set = replay(&catalog, &ops);
        let id = pick(&catalog, &target);

        match Resolver::new(&catalog).remove_feature(&set, id) {
            Ok(change) => {
                let expected_len = if set.contains(id) { set.len() - 1 } else { set.len() };
                prop_assert_eq!(change.set.len(), expected_len);
                prop_assert!(change.set.is_subset(&set));
                prop_assert!(!change.set.contains(id));
                prop_assert!(change.set.validate(&catalog).is_ok());
            }
            Err(ResolveError::DependencyConflict { blockers, .. }) => {
                prop_assert!(!blockers.is_empty());
                for blocker in &blockers {
                    prop_assert!(set.contains(blocker.as_str()));
                }
            }
            Err(ResolveError::RequiredFeatureViolation { id: rejected }) => {
                prop_assert_eq!(&rejected, catalog.required_feature());
            }
            Err(other) => prop_assert!(false, "unexpected rejection {:?}", other),
        }
    }

    #[test]
    fn cost_is_monotonic(
        catalog in catalog_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..20),
        target in any::<Index>(),
    ) {
        let small = replay(&catalog, &ops);
        let large = Resolver::new(&catalog).add_feature(&small, pick(&catalog, &target)).unwrap().set;
        let calc = CostCalculator::new(&catalog);

        prop_assert!(small.is_subset(&large));
        prop_assert!(calc.compute(&small) <= calc.compute(&large));
    }

    #[test]
    fn guard_is_total(
        catalog in catalog_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..20),
        required in prop::collection::vec("[A-Z0-9_]{0,12}", 0..5),
    ) {
        let set = replay(&catalog, &ops);

        let all = has_access(&set, &required, AccessMode::All);
        let any = has_access(&set, &required, AccessMode::Any);
        if required.is_empty() {
            prop_assert!(all && any);
        } else {
            // All implies Any for non-empty lists
            prop_assert!(!all || any);
        }
    }
}
