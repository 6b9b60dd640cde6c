//! Catalog commands

use super::Session;
use crate::CatalogCommands;
use admin_entitlements::{Feature, FeatureId};
use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Tabled)]
pub struct FeatureRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Monthly")]
    pub pricing: String,
    #[tabled(rename = "Requires")]
    pub dependencies: String,
    #[tabled(rename = "Baseline")]
    pub required: String,
}

impl From<&Feature> for FeatureRow {
    fn from(f: &Feature) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            category: f.category.to_string(),
            pricing: format!("{:.2}", f.pricing),
            dependencies: f
                .dependencies
                .iter()
                .map(FeatureId::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            required: if f.required { "yes".into() } else { String::new() },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogSummary {
    pub valid: bool,
    pub features: usize,
    pub required: FeatureId,
}

#[derive(Debug, Serialize)]
pub struct FeatureDetail<'a> {
    pub feature: &'a Feature,
    /// Everything enabling this feature pulls in
    pub closure: Vec<FeatureId>,
    /// Catalog features that list this one as a dependency
    pub dependents: Vec<FeatureId>,
    /// Cost of enabling it on a baseline tenant
    pub quote_from_baseline: Decimal,
}

pub fn handle(action: CatalogCommands, session: &Session) -> Result<()> {
    let catalog = session.engine.catalog();

    match action {
        CatalogCommands::List => {
            let rows: Vec<FeatureRow> = catalog.all_features().iter().map(FeatureRow::from).collect();
            session.format.print(&catalog.all_features(), rows)?;
        }
        CatalogCommands::Validate => {
            // Loading already ran every check; reaching here means it passed
            let summary = CatalogSummary {
                valid: true,
                features: catalog.len(),
                required: catalog.required_feature().clone(),
            };
            if session.format.is_table() {
                println!(
                    "{} {} features, baseline {}",
                    "catalog OK:".green().bold(),
                    summary.features,
                    summary.required
                );
            } else {
                session.format.print_value(&summary)?;
            }
        }
        CatalogCommands::Show { id } => {
            let feature = catalog.lookup(&id)?;
            let detail = FeatureDetail {
                feature,
                closure: session.engine.resolver().dependency_closure(&id)?,
                dependents: catalog
                    .all_features()
                    .iter()
                    .filter(|f| f.depends_on(&id))
                    .map(|f| f.id.clone())
                    .collect(),
                quote_from_baseline: session.engine.quote_addition(&session.engine.baseline(), &id)?,
            };
            session.format.print_value(&detail)?;
        }
    }
    Ok(())
}
