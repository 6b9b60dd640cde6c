//! Plan commands: preview an add or remove against a feature set

use super::Session;
use crate::PlanCommands;
use admin_entitlements::{EntitlementDecision, EntitlementSet, FeatureId};
use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub action: &'static str,
    pub feature: String,
    pub accepted: bool,
    /// Resulting set, or the unchanged input on rejection
    pub features: EntitlementSet,
    pub added: Vec<FeatureId>,
    pub notices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blockers: Vec<FeatureId>,
    pub monthly_cost: Decimal,
    pub cost_delta: Decimal,
}

/// Returns whether the edit was accepted
pub fn handle(action: PlanCommands, session: &Session) -> Result<bool> {
    let (name, feature, features) = match action {
        PlanCommands::Add { feature, features } => ("add", feature, features),
        PlanCommands::Remove { feature, features } => ("remove", feature, features),
    };

    let current = session.current_set(&features)?;
    let decision = match name {
        "add" => session.engine.add_feature(&current, &feature),
        _ => session.engine.remove_feature(&current, &feature),
    };

    let report = build_report(session, name, feature, &current, decision);
    if session.format.is_table() {
        print_report(&report);
    } else {
        session.format.print_value(&report)?;
    }
    Ok(report.accepted)
}

fn build_report(
    session: &Session,
    action: &'static str,
    feature: String,
    current: &EntitlementSet,
    decision: EntitlementDecision,
) -> PlanReport {
    let before = session.engine.monthly_cost(current);

    match decision {
        Ok(change) => {
            let monthly_cost = session.engine.monthly_cost(&change.set);
            PlanReport {
                action,
                feature,
                accepted: true,
                notices: change.explain(session.engine.catalog()),
                features: change.set,
                added: change.added,
                reason: None,
                blockers: Vec::new(),
                monthly_cost,
                cost_delta: monthly_cost - before,
            }
        }
        Err(err) => PlanReport {
            action,
            feature,
            accepted: false,
            features: current.clone(),
            added: Vec::new(),
            notices: Vec::new(),
            reason: Some(err.to_string()),
            blockers: err.blockers().to_vec(),
            monthly_cost: before,
            cost_delta: Decimal::ZERO,
        },
    }
}

fn print_report(report: &PlanReport) {
    if !report.accepted {
        println!("{} {}", "✘".red().bold(), report.reason.as_deref().unwrap_or("rejected"));
        if !report.blockers.is_empty() {
            let blockers: Vec<&str> = report.blockers.iter().map(FeatureId::as_str).collect();
            println!("  disable first: {}", blockers.join(", ").yellow());
        }
        return;
    }

    let verb = if report.action == "add" { "enabled" } else { "disabled" };
    println!("{} {} {}", "✔".green().bold(), report.feature.bold(), verb);
    for notice in &report.notices {
        println!("  {} {}", "notice:".yellow(), notice);
    }
    let ids: Vec<&str> = report.features.iter().map(FeatureId::as_str).collect();
    println!("  features: {}", ids.join(", "));
    println!("  monthly:  {:.2} ({:+.2})", report.monthly_cost, report.cost_delta);
}
