//! Out-of-band assembly configuration.
//!
//! The templates directory holds two optional resources: `description.md`,
//! whose text becomes the document's top-level description, and `config.yml`,
//! whose `categories` list fixes the order of the document's tags.

use crate::error::{Error, Result};
use crate::i18n::Catalog;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_API_VERSION: &str = "v2";
pub const DESCRIPTION_FILE: &str = "description.md";
pub const TAG_CONFIG_FILE: &str = "config.yml";

/// Settings driving the assembly stage
#[derive(Debug, Clone)]
pub struct AssemblySettings {
    /// Substituted for `{version}` in path templates
    pub default_version: String,
    pub description_file: Option<PathBuf>,
    pub tag_config_file: Option<PathBuf>,
    /// Wraps configured tag descriptions as lazily translated strings
    pub catalog: Option<Arc<Catalog>>,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            default_version: DEFAULT_API_VERSION.to_string(),
            description_file: None,
            tag_config_file: None,
            catalog: None,
        }
    }
}

impl AssemblySettings {
    /// Points both optional resources at their conventional names under `dir`.
    pub fn from_templates_dir(dir: &Path) -> Self {
        Self {
            description_file: Some(dir.join(DESCRIPTION_FILE)),
            tag_config_file: Some(dir.join(TAG_CONFIG_FILE)),
            ..Self::default()
        }
    }

    pub fn with_default_version(mut self, version: impl Into<String>) -> Self {
        self.default_version = version.into();
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Full text of the description resource, if it exists.
    pub fn load_description(&self) -> Result<Option<String>> {
        let Some(path) = existing(self.description_file.as_deref()) else {
            return Ok(None);
        };
        debug!("Reading description from {}", path.display());
        fs::read_to_string(path).map(Some).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Parsed tag configuration, if the resource exists.
    pub fn load_tag_config(&self) -> Result<Option<TagConfig>> {
        let Some(path) = existing(self.tag_config_file.as_deref()) else {
            return Ok(None);
        };
        TagConfig::load(path).map(Some)
    }
}

fn existing(path: Option<&Path>) -> Option<&Path> {
    match path {
        Some(p) if p.exists() => Some(p),
        Some(p) => {
            debug!("Optional resource not found, skipping: {}", p.display());
            None
        }
        None => None,
    }
}

/// The `categories` list of `config.yml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TagConfig {
    #[serde(default)]
    pub categories: Vec<TagCategory>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TagCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TagConfig {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Reading tag configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        // An empty file is a valid, empty configuration.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_categories_in_order() {
        let config = TagConfig::parse(
            "categories:\n  - name: Authentication\n    description: Log in and out\n  - name: Instance\n",
        )
        .unwrap();

        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[0].name, "Authentication");
        assert_eq!(config.categories[0].description.as_deref(), Some("Log in and out"));
        assert_eq!(config.categories[1].name, "Instance");
        assert!(config.categories[1].description.is_none());
    }

    #[test]
    fn test_parse_without_categories_key() {
        let config = TagConfig::parse("other: 1\n").unwrap();
        assert!(config.categories.is_empty());
        assert!(TagConfig::parse("").unwrap().categories.is_empty());
    }

    #[test]
    fn test_missing_resources_are_none() {
        let temp_dir = TempDir::new().unwrap();
        let settings = AssemblySettings::from_templates_dir(temp_dir.path());

        assert!(settings.load_description().unwrap().is_none());
        assert!(settings.load_tag_config().unwrap().is_none());
    }

    #[test]
    fn test_templates_dir_resources_are_read() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(DESCRIPTION_FILE), "# Welcome\n").unwrap();
        fs::write(
            temp_dir.path().join(TAG_CONFIG_FILE),
            "categories:\n  - name: Jobs\n",
        )
        .unwrap();

        let settings = AssemblySettings::from_templates_dir(temp_dir.path());
        assert_eq!(settings.load_description().unwrap().as_deref(), Some("# Welcome\n"));
        assert_eq!(settings.load_tag_config().unwrap().unwrap().categories[0].name, "Jobs");
        assert_eq!(settings.default_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_broken_tag_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(TAG_CONFIG_FILE), "categories: [name: {").unwrap();

        let settings = AssemblySettings::from_templates_dir(temp_dir.path());
        assert!(matches!(settings.load_tag_config(), Err(Error::Config { .. })));
    }
}
