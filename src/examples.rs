//! Captured runtime examples.
//!
//! A harness exercising the API records, per concrete request path, one
//! example per `(method, status code)` pair. A batch is loaded from JSON of
//! the form:
//!
//! ```json
//! {
//!   "/api/v2/ping/": [
//!     {"method": "get", "status_code": 200, "content_type": "application/json",
//!      "response_body": "{\"ha\": false}", "request_body": null}
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// One recorded request/response pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedExample {
    /// Lowercase HTTP method
    pub method: String,
    pub status_code: u16,
    #[serde(default)]
    pub content_type: String,
    /// Raw response text, empty when the response had no body
    #[serde(default)]
    pub response_body: String,
    /// Request payload as sent, either raw text or structured data
    #[serde(default)]
    pub request_body: Option<Value>,
}

impl CapturedExample {
    pub fn new(method: &str, status_code: u16, content_type: &str) -> Self {
        Self {
            method: method.to_lowercase(),
            status_code,
            content_type: content_type.to_string(),
            response_body: String::new(),
            request_body: None,
        }
    }

    pub fn with_response(mut self, body: impl Into<String>) -> Self {
        self.response_body = body.into();
        self
    }

    pub fn with_request(mut self, body: Value) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn status(&self) -> String {
        self.status_code.to_string()
    }

    pub fn is_success(&self) -> bool {
        self.status().starts_with('2')
    }

    /// The request payload, if one was actually sent.
    ///
    /// `null`, empty strings and empty containers count as no payload.
    pub fn request_payload(&self) -> Option<&Value> {
        match self.request_body.as_ref()? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::Array(a) if a.is_empty() => None,
            Value::Object(o) if o.is_empty() => None,
            other => Some(other),
        }
    }
}

/// Examples keyed by concrete request path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExampleBatch {
    by_path: BTreeMap<String, Vec<CapturedExample>>,
}

impl ExampleBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an example, replacing any earlier one for the same method and status.
    pub fn record(&mut self, path: impl Into<String>, example: CapturedExample) {
        let examples = self.by_path.entry(path.into()).or_default();
        examples.retain(|e| !(e.method == example.method && e.status_code == example.status_code));
        examples.push(example);
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading captured examples from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let raw: BTreeMap<String, Vec<CapturedExample>> =
            serde_json::from_str(&content).map_err(|e| Error::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let mut batch = Self::new();
        for (request_path, examples) in raw {
            for mut example in examples {
                example.method = example.method.to_lowercase();
                batch.record(request_path.clone(), example);
            }
        }
        debug!("Loaded {} captured examples", batch.len());
        Ok(batch)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CapturedExample)> {
        self.by_path
            .iter()
            .flat_map(|(path, examples)| examples.iter().map(move |e| (path.as_str(), e)))
    }

    pub fn len(&self) -> usize {
        self.by_path.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
