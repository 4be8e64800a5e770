//! Lazily translated strings.
//!
//! User-facing text in the document (titles, tag descriptions, operation
//! descriptions) may be produced by a translation layer that only resolves the
//! final wording when it is asked for. [`TranslatableString`] carries the
//! message id together with a deferred resolver, and [`Text`] lets the document
//! model hold either plain or translatable text. Both serialize as plain
//! strings: serialization forces resolution.

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

type Resolver = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A message id whose text is produced on demand.
#[derive(Clone)]
pub struct TranslatableString {
    msgid: String,
    resolver: Resolver,
}

impl TranslatableString {
    /// Wraps `msgid` with a resolver that is called every time the text is needed.
    pub fn new<F>(msgid: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            msgid: msgid.into(),
            resolver: Arc::new(resolver),
        }
    }

    /// Forces the deferred resolution.
    pub fn resolve(&self) -> String {
        (self.resolver)(&self.msgid)
    }
}

impl fmt::Debug for TranslatableString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatableString")
            .field("msgid", &self.msgid)
            .finish_non_exhaustive()
    }
}

impl Serialize for TranslatableString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.resolve())
    }
}

/// Text held by the document model.
#[derive(Debug, Clone)]
pub enum Text {
    Plain(String),
    Lazy(TranslatableString),
}

impl Text {
    pub fn resolve(&self) -> String {
        match self {
            Text::Plain(s) => s.clone(),
            Text::Lazy(t) => t.resolve(),
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Text::Plain(String::new())
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.resolve() == other.resolve()
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Text::Plain(s)
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::Plain(s.to_string())
    }
}

impl From<TranslatableString> for Text {
    fn from(t: TranslatableString) -> Self {
        Text::Lazy(t)
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve())
    }
}

impl Serialize for Text {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Text::Plain(s) => serializer.serialize_str(s),
            Text::Lazy(t) => t.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(Text::Plain)
    }
}

/// Translations keyed by message id, loaded from a YAML mapping.
///
/// Ids without a translation resolve to themselves.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading message catalog: {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let messages: HashMap<String, String> =
            serde_yaml::from_str(&content).map_err(|e| Error::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        debug!("Catalog holds {} messages", messages.len());
        Ok(Self { messages })
    }

    pub fn translate(&self, msgid: &str) -> String {
        self.messages
            .get(msgid)
            .cloned()
            .unwrap_or_else(|| msgid.to_string())
    }

    /// Defers the lookup of `msgid` until the text is serialized.
    pub fn lazy(catalog: &Arc<Self>, msgid: impl Into<String>) -> TranslatableString {
        let catalog = Arc::clone(catalog);
        TranslatableString::new(msgid, move |id| catalog.translate(id))
    }
}
