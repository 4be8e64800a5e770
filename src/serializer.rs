//! Finalization and persistence of the merged document.
//!
//! The document is rendered into memory in full before anything touches the
//! disk, and the rendered text replaces the target through a rename, so a
//! failed run never leaves a partial `swagger.json` behind.

use crate::document::Document;
use crate::error::{Error, Result};
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Conventional artifact name, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "swagger.json";

/// Checks the document is complete and stamps the release into `info.version`.
///
/// # Arguments
///
/// * `document` - The assembled and merged document
/// * `release` - The product release string
///
/// # Returns
///
/// Returns the document with `info.version` set to `release`.
///
/// # Errors
///
/// Returns [`Error::IncompleteDocument`] if the document has no tags or no paths.
pub fn finalize(mut document: Document, release: &str) -> Result<Document> {
    if document.tags.is_empty() {
        return Err(Error::IncompleteDocument("document has no tags".to_string()));
    }
    if document.paths.is_empty() {
        return Err(Error::IncompleteDocument("document has no paths".to_string()));
    }
    document.info.version = release.to_string();
    Ok(document)
}

/// Serializes a document to pretty-printed JSON.
///
/// Lazily translated strings are resolved to their text as they are written.
pub fn serialize_json(doc: &Document) -> Result<String> {
    debug!("Serializing document to JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Serializes a document to YAML.
pub fn serialize_yaml(doc: &Document) -> Result<String> {
    debug!("Serializing document to YAML");
    Ok(serde_yaml::to_string(doc)?)
}

/// Replaces the file at `path` with `content` in a single rename.
///
/// Creates the parent directory if needed. The temporary file lives next to
/// the target so the rename never crosses filesystems.
///
/// # Arguments
///
/// * `content` - The rendered document
/// * `path` - The output file path
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the temporary file
/// cannot be written or renamed. The previous file at `path` is then left as
/// it was.
pub fn write_atomically(content: &str, path: &Path) -> Result<()> {
    debug!("Writing {} bytes to {}", content.len(), path.display());

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|e| Error::IoError(e.error))?;

    info!("Wrote {}", path.display());
    Ok(())
}
