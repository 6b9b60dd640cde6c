//! CLI Commands

pub mod access;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod plan;

use crate::output::OutputFormat;
use admin_entitlements::{EntitlementEngine, EntitlementSet};
use anyhow::Result;

/// Shared state handed to every command
pub struct Session {
    pub engine: EntitlementEngine,
    pub format: OutputFormat,
}

impl Session {
    pub fn new(engine: EntitlementEngine, format: OutputFormat) -> Self {
        Self { engine, format }
    }

    /// Build the tenant's current set from `--features`. The baseline
    /// feature is implied; everything else must already be closed.
    pub fn current_set(&self, features: &[String]) -> Result<EntitlementSet> {
        let required = self.engine.catalog().required_feature().to_string();
        let ids = std::iter::once(required).chain(features.iter().cloned());
        Ok(self.engine.restore(ids)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_entitlements::FeatureCatalog;

    fn session() -> Session {
        Session::new(EntitlementEngine::new(FeatureCatalog::builtin().unwrap()), OutputFormat::Json)
    }

    #[test]
    fn test_current_set_implies_baseline() {
        let set = session().current_set(&["FORMS_MODULE".into()]).unwrap();
        assert!(set.contains("CMS_ENGINE"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_current_set_must_be_closed() {
        assert!(session().current_set(&["ECOMMERCE_ENGINE".into()]).is_err());
    }
}
