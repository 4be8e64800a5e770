//! The Swagger document model shared by every pipeline stage.
//!
//! Only the fields the pipeline reads or rewrites are typed. Everything else
//! found in the raw schema (`swagger`, `basePath`, `definitions`,
//! `operationId`, parameter `type`/`required`, response `schema`, ...) is kept
//! in the `extra` maps and written back out untouched.

use crate::error::{Error, Result};
use crate::i18n::Text;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Raw keys the pipeline carries through without interpreting them.
pub type Extra = Map<String, Value>;

/// HTTP method name (lowercase, as Swagger writes it) to operation.
pub type PathEntry = BTreeMap<String, OperationEntry>;

/// Complete Swagger document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// API info
    #[serde(default)]
    pub info: Info,
    /// `None` serializes as `null`: the document is host-relative
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub schemes: Vec<String>,
    #[serde(default)]
    pub consumes: Vec<String>,
    /// Presentation order of operation categories
    pub tags: Vec<Tag>,
    /// Path (template) to operations
    pub paths: BTreeMap<String, PathEntry>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Swagger Info object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: Text,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A named operation category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Text>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A single operation under a path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Text>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub responses: BTreeMap<String, ResponseSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Swagger Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
    FormData,
}

/// Swagger Response object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpec {
    #[serde(default)]
    pub description: Text,
    /// Media type to example payload
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub examples: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Document {
    /// Decodes a raw schema object.
    ///
    /// The raw input must carry a `paths` object and a `tags` array; anything
    /// else is an input-contract violation the pipeline cannot recover from.
    pub fn from_raw(raw: Value) -> Result<Self> {
        let object = raw
            .as_object()
            .ok_or_else(|| Error::MalformedRawSchema("top level is not an object".to_string()))?;

        match object.get("paths") {
            Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(Error::MalformedRawSchema("`paths` is not an object".to_string()))
            }
            None => return Err(Error::MalformedRawSchema("missing `paths`".to_string())),
        }
        match object.get("tags") {
            Some(Value::Array(_)) => {}
            Some(_) => return Err(Error::MalformedRawSchema("`tags` is not an array".to_string())),
            None => return Err(Error::MalformedRawSchema("missing `tags`".to_string())),
        }

        let document: Document = serde_json::from_value(raw)
            .map_err(|e| Error::MalformedRawSchema(e.to_string()))?;
        debug!(
            "Decoded raw schema with {} paths and {} tags",
            document.paths.len(),
            document.tags.len()
        );
        Ok(document)
    }

    pub fn operation(&self, path: &str, method: &str) -> Option<&OperationEntry> {
        self.paths.get(path).and_then(|entry| entry.get(method))
    }

    pub fn operations_mut(&mut self) -> impl Iterator<Item = &mut OperationEntry> {
        self.paths.values_mut().flat_map(|entry| entry.values_mut())
    }
}

impl Parameter {
    /// The synthetic body parameter carrying an observed request payload.
    pub fn body_example(example: Value) -> Self {
        let mut schema = Map::new();
        schema.insert("example".to_string(), example);
        Self {
            name: "data".to_string(),
            location: ParameterLocation::Body,
            schema: Some(Value::Object(schema)),
            extra: Extra::new(),
        }
    }

    /// The `{version}` routing parameter, which has no place in the published contract.
    pub fn is_version_path_param(&self) -> bool {
        self.location == ParameterLocation::Path && self.name == "version"
    }
}
