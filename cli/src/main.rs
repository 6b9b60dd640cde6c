//! OpenAdmin CLI
//!
//! Offline tooling for the feature catalog and tenant entitlements.
//!
//! # Usage
//!
//! ```bash
//! openadmin catalog list
//! openadmin catalog show ECOMMERCE_ENGINE --format json
//! openadmin plan add ECOMMERCE_ENGINE --features FORMS_MODULE
//! openadmin plan remove BOOKING_ENGINE --features BOOKING_ENGINE,ECOMMERCE_ENGINE
//! openadmin cost --features BOOKING_ENGINE,ECOMMERCE_ENGINE
//! openadmin access --features FORMS_MODULE --require LEGAL_MODULE,FORMS_MODULE --mode any
//! ```
//!
//! Exit status is 0 on success, 1 on error and 2 when an edit is rejected
//! or access is denied.

use admin_entitlements::{EntitlementEngine, FeatureCatalog};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod output;

use commands::access::ModeArg;
use commands::Session;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "openadmin")]
#[command(author = "OpenAdmin")]
#[command(version = "0.1.0")]
#[command(about = "OpenAdmin entitlement command line interface", long_about = None)]
struct Cli {
    /// Feature catalog file (.toml, .json, .yaml); built-in catalog when unset
    #[arg(long, env = "OPENADMIN_CATALOG")]
    catalog: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the feature catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogCommands,
    },
    /// Preview enabling or disabling a feature
    Plan {
        #[command(subcommand)]
        action: PlanCommands,
    },
    /// Monthly cost of a feature set
    Cost {
        /// Enabled features besides the baseline
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,
    },
    /// Check a feature requirement against a feature set
    Access {
        /// Enabled features besides the baseline
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,
        /// Features the page or action requires
        #[arg(long, value_delimiter = ',', required = true)]
        require: Vec<String>,
        #[arg(long, value_enum, default_value = "all")]
        mode: ModeArg,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// List all features
    List,
    /// Check the catalog loads cleanly
    Validate,
    /// Feature details with its dependency closure
    Show { id: String },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Enable a feature and its prerequisites
    Add {
        feature: String,
        /// Enabled features besides the baseline
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,
    },
    /// Disable a feature
    Remove {
        feature: String,
        /// Enabled features besides the baseline
        #[arg(long, value_delimiter = ',')]
        features: Vec<String>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Returns `false` when the engine refused the request
fn run(cli: Cli) -> Result<bool> {
    let profile = cli.profile.as_deref();

    if let Commands::Config { action } = cli.command {
        commands::config::handle(action, profile)?;
        return Ok(true);
    }

    let config = config::Config::load(profile)?;

    let format = match cli.format {
        Some(format) => format,
        None => config
            .default_format
            .as_deref()
            .map(str::parse::<OutputFormat>)
            .transpose()
            .map_err(anyhow::Error::msg)?
            .unwrap_or(OutputFormat::Table),
    };

    let catalog = match cli.catalog.or(config.catalog_path) {
        Some(path) => {
            debug!(%path, "using catalog file");
            FeatureCatalog::load(&path).with_context(|| format!("loading catalog {path}"))?
        }
        None => FeatureCatalog::builtin().context("built-in catalog")?,
    };
    let session = Session::new(EntitlementEngine::new(catalog), format);

    match cli.command {
        Commands::Catalog { action } => commands::catalog::handle(action, &session).map(|_| true),
        Commands::Plan { action } => commands::plan::handle(action, &session),
        Commands::Cost { features } => commands::cost::handle(&features, &session).map(|_| true),
        Commands::Access { features, require, mode } => {
            commands::access::handle(&features, require, mode, &session)
        }
        Commands::Config { .. } => Ok(true),
    }
}
