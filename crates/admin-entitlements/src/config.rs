//! Catalog Configuration
//!
//! Catalog files are a list of feature records, in TOML, JSON or YAML:
//!
//! ```toml
//! [[features]]
//! id = "CMS_ENGINE"
//! name = "CMS Engine"
//! category = "Engine"
//! pricing = 0
//! required = true
//!
//! [[features]]
//! id = "FORMS_MODULE"
//! name = "Forms Module"
//! category = "Module"
//! pricing = "49.00"
//! dependencies = ["CMS_ENGINE"]
//! ```

use crate::catalog::FeatureCatalog;
use crate::error::{CatalogError, CatalogResult};
use crate::feature::Feature;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// On-disk catalog definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Feature records in catalog order
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl CatalogConfig {
    /// Decode a TOML catalog
    pub fn from_toml_str(content: &str) -> CatalogResult<Self> {
        toml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Decode a JSON catalog
    pub fn from_json_str(content: &str) -> CatalogResult<Self> {
        serde_json::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Decode a YAML catalog
    pub fn from_yaml_str(content: &str) -> CatalogResult<Self> {
        serde_yaml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Read a config file, picking the decoder from its extension
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        info!(path = %path.display(), "loading feature catalog");
        match extension.as_str() {
            "toml" => Self::from_toml_str(&content),
            "json" => Self::from_json_str(&content),
            "yaml" | "yml" => Self::from_yaml_str(&content),
            other => Err(CatalogError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Validate and freeze into a catalog
    pub fn into_catalog(self) -> CatalogResult<FeatureCatalog> {
        FeatureCatalog::from_features(self.features)
    }
}

impl From<&FeatureCatalog> for CatalogConfig {
    fn from(catalog: &FeatureCatalog) -> Self {
        Self {
            features: catalog.all_features().to_vec(),
        }
    }
}

impl FeatureCatalog {
    /// Load and validate a catalog file
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        CatalogConfig::load(path)?.into_catalog()
    }
}
