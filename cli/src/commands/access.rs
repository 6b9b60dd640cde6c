//! Access check command

use super::Session;
use admin_entitlements::{AccessMode, FeatureRequirement};
use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    All,
    Any,
}

impl From<ModeArg> for AccessMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::All => AccessMode::All,
            ModeArg::Any => AccessMode::Any,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccessReport {
    pub granted: bool,
    pub requirement: FeatureRequirement,
    pub missing: Vec<String>,
}

/// Returns whether access was granted
pub fn handle(features: &[String], require: Vec<String>, mode: ModeArg, session: &Session) -> Result<bool> {
    let set = session.current_set(features)?;
    let requirement = FeatureRequirement {
        features: require,
        mode: mode.into(),
    };

    let report = AccessReport {
        granted: session.engine.check(&set, &requirement),
        missing: requirement.missing(&set),
        requirement,
    };

    if session.format.is_table() {
        if report.granted {
            println!("{}", "access granted".green().bold());
        } else {
            println!("{} missing: {}", "access denied".red().bold(), report.missing.join(", "));
        }
    } else {
        session.format.print_value(&report)?;
    }
    Ok(report.granted)
}
