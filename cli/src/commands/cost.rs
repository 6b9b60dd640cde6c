//! Cost commands

use super::Session;
use admin_entitlements::LineItem;
use anyhow::Result;
use tabled::Tabled;

#[derive(Debug, Tabled)]
pub struct LineItemRow {
    #[tabled(rename = "Feature")]
    pub feature: String,
    #[tabled(rename = "Description")]
    pub description: String,
    #[tabled(rename = "Monthly")]
    pub amount: String,
}

impl From<&LineItem> for LineItemRow {
    fn from(item: &LineItem) -> Self {
        Self {
            feature: item.feature.to_string(),
            description: item.description.clone(),
            amount: format!("{:.2}", item.amount),
        }
    }
}

pub fn handle(features: &[String], session: &Session) -> Result<()> {
    let set = session.current_set(features)?;
    let breakdown = session.engine.cost_breakdown(&set);

    let mut rows: Vec<LineItemRow> = breakdown.line_items.iter().map(LineItemRow::from).collect();
    rows.push(LineItemRow {
        feature: "TOTAL".into(),
        description: String::new(),
        amount: format!("{:.2}", breakdown.total),
    });

    session.format.print(&breakdown, rows)
}
