//! Raw schema sources.
//!
//! The raw schema comes from introspecting a running API. The pipeline only
//! sees it through [`RawSchemaSource`]: the schema body itself, an optional
//! out-of-band list of deprecated path templates, and optional top-level
//! customizations that the renderer would otherwise apply.

use crate::error::{Error, Result};
use log::{debug, info};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Path templates whose operations must be flagged deprecated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeprecationSet {
    templates: BTreeSet<String>,
}

impl DeprecationSet {
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            templates: templates.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses the value of the deprecation header: a JSON array of path templates.
    pub fn from_header_value(value: &str) -> Result<Self> {
        let templates: Vec<String> = serde_json::from_str(value).map_err(|e| {
            Error::MalformedRawSchema(format!("deprecated paths are not a JSON array of strings: {}", e))
        })?;
        Ok(Self::new(templates))
    }

    pub fn contains(&self, template: &str) -> bool {
        self.templates.contains(template)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Supplier of the raw, template-parameterized schema.
pub trait RawSchemaSource {
    /// Returns the raw schema object.
    fn fetch(&self) -> Result<Value>;

    /// Returns the deprecation side channel. Absent means nothing is deprecated.
    fn deprecated_paths(&self) -> Result<DeprecationSet> {
        Ok(DeprecationSet::default())
    }

    /// Top-level keys to merge over the raw schema before normalization.
    fn customizations(&self) -> Result<Option<Map<String, Value>>> {
        Ok(None)
    }
}

/// Reads a raw schema previously dumped to disk.
///
/// The deprecation file holds the header value verbatim; the customizations
/// file holds a JSON object. Both are optional, and a configured file that
/// does not exist is treated the same as one that was never configured.
#[derive(Debug, Clone)]
pub struct FileSchemaSource {
    schema_path: PathBuf,
    deprecated_path: Option<PathBuf>,
    customizations_path: Option<PathBuf>,
}

impl FileSchemaSource {
    pub fn new(schema_path: PathBuf) -> Self {
        Self {
            schema_path,
            deprecated_path: None,
            customizations_path: None,
        }
    }

    pub fn with_deprecated_paths(mut self, path: PathBuf) -> Self {
        self.deprecated_path = Some(path);
        self
    }

    pub fn with_customizations(mut self, path: PathBuf) -> Self {
        self.customizations_path = Some(path);
        self
    }

    fn read_optional(path: Option<&Path>) -> Result<Option<String>> {
        let Some(path) = path else {
            return Ok(None);
        };
        if !path.exists() {
            debug!("Optional resource not found, skipping: {}", path.display());
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }
}

impl RawSchemaSource for FileSchemaSource {
    fn fetch(&self) -> Result<Value> {
        info!("Reading raw schema from {}", self.schema_path.display());
        let content = fs::read_to_string(&self.schema_path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::MalformedRawSchema(format!("{}: {}", self.schema_path.display(), e))
        })
    }

    fn deprecated_paths(&self) -> Result<DeprecationSet> {
        match Self::read_optional(self.deprecated_path.as_deref())? {
            Some(content) => {
                let set = DeprecationSet::from_header_value(&content)?;
                debug!("Loaded {} deprecated path templates", set.len());
                Ok(set)
            }
            None => Ok(DeprecationSet::default()),
        }
    }

    fn customizations(&self) -> Result<Option<Map<String, Value>>> {
        let Some(content) = Self::read_optional(self.customizations_path.as_deref())? else {
            return Ok(None);
        };
        match serde_json::from_str(&content) {
            Ok(Value::Object(map)) => Ok(Some(map)),
            Ok(_) => Err(Error::MalformedRawSchema(
                "customizations must be a JSON object".to_string(),
            )),
            Err(e) => Err(Error::MalformedRawSchema(format!("customizations: {}", e))),
        }
    }
}

/// An in-memory source, for embedding the pipeline behind another schema producer.
#[derive(Debug, Clone)]
pub struct StaticSchemaSource {
    schema: Value,
    deprecated: DeprecationSet,
    customizations: Option<Map<String, Value>>,
}

impl StaticSchemaSource {
    pub fn new(schema: Value) -> Self {
        Self {
            schema,
            deprecated: DeprecationSet::default(),
            customizations: None,
        }
    }

    pub fn with_deprecated(mut self, deprecated: DeprecationSet) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn with_customizations(mut self, customizations: Map<String, Value>) -> Self {
        self.customizations = Some(customizations);
        self
    }
}

impl RawSchemaSource for StaticSchemaSource {
    fn fetch(&self) -> Result<Value> {
        Ok(self.schema.clone())
    }

    fn deprecated_paths(&self) -> Result<DeprecationSet> {
        Ok(self.deprecated.clone())
    }

    fn customizations(&self) -> Result<Option<Map<String, Value>>> {
        Ok(self.customizations.clone())
    }
}
