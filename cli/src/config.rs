//! CLI Configuration

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Catalog file used when `--catalog` is not given
    pub catalog_path: Option<String>,
    pub default_format: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::config_path(profile)?)
    }

    /// A missing file is an empty config; an unreadable or malformed one is an error
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("loading {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid CLI config")
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "catalog_path" => Ok(self.catalog_path.clone()),
            "default_format" => Ok(self.default_format.clone()),
            _ => Err(anyhow!("unknown config key: {key}")),
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "catalog_path" => self.catalog_path = Some(value),
            "default_format" => self.default_format = Some(value),
            _ => return Err(anyhow!("unknown config key: {key}")),
        }
        Ok(())
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot find home directory"))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".openadmin").join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_keys() {
        let mut config = Config::from_toml_str("catalog_path = \"/etc/openadmin/catalog.toml\"").unwrap();
        assert_eq!(config.get("catalog_path").unwrap().as_deref(), Some("/etc/openadmin/catalog.toml"));
        assert_eq!(config.get("default_format").unwrap(), None);

        config.set("default_format", "json".into()).unwrap();
        assert_eq!(config.default_format.as_deref(), Some("json"));
        assert!(config.set("api_key", "x".into()).is_err());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("openadmin-config-{}.toml", std::process::id()));
        fs::write(&path, "catalog_path = \"/etc/custom.toml\"\ndefault_format = json\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        // Outer path context, the config label, then the TOML detail
        assert!(err.chain().count() >= 3);
        assert!(format!("{err:#}").contains("invalid CLI config"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join(format!("openadmin-config-absent-{}.toml", std::process::id()));
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
