//! Cost Calculator
//!
//! Flat monthly sum of catalog prices. Zero-priced features are still line
//! items; there is no tiering, proration or discounting here.

use crate::catalog::FeatureCatalog;
use crate::entitlement::EntitlementSet;
use crate::error::ResolveError;
use crate::feature::FeatureId;
use crate::resolver::Resolver;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency minor-unit precision
const PRICE_SCALE: u32 = 2;

/// Cost calculator
#[derive(Debug, Clone, Copy)]
pub struct CostCalculator<'a> {
    catalog: &'a FeatureCatalog,
}

impl<'a> CostCalculator<'a> {
    /// Calculator over `catalog` prices
    pub fn new(catalog: &'a FeatureCatalog) -> Self {
        Self { catalog }
    }

    /// Monthly total for a set
    pub fn compute(&self, set: &EntitlementSet) -> Decimal {
        let total: Decimal = set
            .iter()
            .filter_map(|id| self.catalog.get_by_id(id.as_str()))
            .map(|f| f.pricing)
            .sum();
        total.round_dp(PRICE_SCALE)
    }

    /// Per-feature line items in catalog order
    pub fn breakdown(&self, set: &EntitlementSet) -> CostBreakdown {
        let line_items: Vec<LineItem> = self
            .catalog
            .all_features()
            .iter()
            .filter(|f| set.contains(f.id.as_str()))
            .map(|f| LineItem {
                feature: f.id.clone(),
                description: f.name.clone(),
                amount: f.pricing.round_dp(PRICE_SCALE),
            })
            .collect();

        CostBreakdown {
            total: self.compute(set),
            line_items,
        }
    }

    /// Extra monthly cost of enabling `id`, counting prerequisites it pulls in
    pub fn quote_addition(&self, set: &EntitlementSet, id: &str) -> Result<Decimal, ResolveError> {
        let change = Resolver::new(self.catalog).add_feature(set, id)?;
        Ok(self.compute(&change.set) - self.compute(set))
    }
}

/// Invoice-style line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Priced feature
    pub feature: FeatureId,
    /// Feature display name
    pub description: String,
    /// Monthly price, rounded to minor units
    pub amount: Decimal,
}

/// Cost calculation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// One entry per enabled feature, in catalog order
    pub line_items: Vec<LineItem>,
    /// Monthly total
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Feature, FeatureCategory};
    use rust_decimal_macros::dec;

    #[test]
    fn test_compute_total() {
        let catalog = FeatureCatalog::builtin().unwrap();
        let set = EntitlementSet::from_persisted(
            &catalog,
            ["CMS_ENGINE", "BOOKING_ENGINE", "ECOMMERCE_ENGINE"],
        )
        .unwrap();

        assert_eq!(CostCalculator::new(&catalog).compute(&set), dec!(298));
    }

    #[test]
    fn test_breakdown_includes_zero_priced() {
        let catalog = FeatureCatalog::builtin().unwrap();
        let set = EntitlementSet::from_persisted(&catalog, ["CMS_ENGINE", "FORMS_MODULE"]).unwrap();

        let breakdown = CostCalculator::new(&catalog).breakdown(&set);
        assert_eq!(breakdown.line_items.len(), 2);
        assert_eq!(breakdown.line_items[0].feature.as_str(), "CMS_ENGINE");
        assert_eq!(breakdown.line_items[0].amount, dec!(0));
        assert_eq!(breakdown.total, dec!(49));
    }

    #[test]
    fn test_quote_counts_prerequisites() {
        let catalog = FeatureCatalog::builtin().unwrap();
        let set = EntitlementSet::baseline(&catalog);
        let calc = CostCalculator::new(&catalog);

        assert_eq!(calc.quote_addition(&set, "ECOMMERCE_ENGINE").unwrap(), dec!(298));
        assert!(calc.quote_addition(&set, "MISSING").is_err());
    }

    #[test]
    fn test_rounds_to_minor_units() {
        let cms = Feature::builder(FeatureId::new("CMS_ENGINE").unwrap(), "CMS", FeatureCategory::Engine)
            .required()
            .pricing(dec!(0.004))
            .build();
        let extra = Feature::builder(FeatureId::new("EXTRA").unwrap(), "Extra", FeatureCategory::Module)
            .pricing(dec!(10.333))
            .build();
        let catalog = FeatureCatalog::from_features(vec![cms, extra]).unwrap();
        let set = EntitlementSet::from_persisted(&catalog, ["CMS_ENGINE", "EXTRA"]).unwrap();

        assert_eq!(CostCalculator::new(&catalog).compute(&set), dec!(10.34));
    }
}
