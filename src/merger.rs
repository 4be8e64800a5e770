//! Overlays captured runtime examples onto an assembled document.
//!
//! Observed requests and responses are more useful to a reader than shapes
//! inferred from serializer fields, so every captured example whose concrete
//! path matches a documented template enriches that operation's `produces`
//! list, request body parameter and response examples. The method set of a
//! path is never changed.

use crate::assembler::JSON_MEDIA_TYPE;
use crate::document::{Document, OperationEntry, Parameter, ParameterLocation};
use crate::error::{Error, Result};
use crate::examples::{CapturedExample, ExampleBatch};
use crate::path_matcher::PathMatcher;
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::HashSet;

/// Counts of what a merge did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Examples applied to an operation (an example matching several templates counts once per template)
    pub applied: usize,
    /// Examples no template and method accepted
    pub unmatched: usize,
}

/// Merges every example in `batch` into `document`.
///
/// Running the same batch again leaves the document unchanged; a later batch
/// overwrites examples stored under the same status and content type.
///
/// # Arguments
///
/// * `document` - The assembled document to enrich
/// * `batch` - Captured examples keyed by concrete request path
///
/// # Returns
///
/// Returns a [`MergeReport`] counting applied and unmatched examples.
///
/// # Errors
///
/// Returns [`Error::InvalidExampleBody`] if an example declares a JSON
/// response that does not parse. The merge is all or nothing: on error the
/// document is left exactly as it was.
pub fn merge_examples(document: &mut Document, batch: &ExampleBatch) -> Result<MergeReport> {
    let mut report = MergeReport::default();
    if batch.is_empty() {
        debug!("No captured examples to merge");
        return Ok(report);
    }
    info!("Merging {} captured examples", batch.len());
    let mut matched: HashSet<(&str, &str, u16)> = HashSet::new();
    let mut paths = document.paths.clone();

    for (template, entry) in paths.iter_mut() {
        let matcher = match PathMatcher::compile(template) {
            Ok(m) => m,
            Err(e) => {
                warn!("Skipping {}: cannot compile path matcher: {}", template, e);
                continue;
            }
        };

        for (path, example) in batch.iter() {
            if !matcher.is_match(path) {
                continue;
            }
            let Some(operation) = entry.get_mut(&example.method) else {
                continue;
            };
            debug!(
                "Applying {} {} ({}) to {}",
                example.method, path, example.status_code, template
            );
            apply_example(operation, path, example)?;
            matched.insert((path, example.method.as_str(), example.status_code));
            report.applied += 1;
        }
    }
    document.paths = paths;

    for (path, example) in batch.iter() {
        if !matched.contains(&(path, example.method.as_str(), example.status_code)) {
            debug!(
                "No documented operation for {} {}",
                example.method.to_uppercase(),
                path
            );
            report.unmatched += 1;
        }
    }

    info!(
        "Merged examples: {} applied, {} unmatched",
        report.applied, report.unmatched
    );
    Ok(report)
}

/// Applies one example to the operation it matched.
///
/// The response body is decoded before anything is written, so a failure
/// leaves `operation` untouched.
pub fn apply_example(
    operation: &mut OperationEntry,
    path: &str,
    example: &CapturedExample,
) -> Result<()> {
    let content_type = example.content_type.as_str();
    let status = example.status();
    let response = response_example(path, example)?;

    if !content_type.is_empty() && !operation.produces.iter().any(|p| p == content_type) {
        operation.produces.push(content_type.to_string());
    }

    if let Some(payload) = example.request_payload() {
        if example.is_success() {
            operation
                .parameters
                .retain(|param| param.location != ParameterLocation::Body);
            operation
                .parameters
                .push(Parameter::body_example(payload.clone()));
        }
    }

    if let Some(value) = response {
        operation
            .responses
            .entry(status)
            .or_default()
            .examples
            .insert(content_type.to_string(), value);
    }
    Ok(())
}

/// The value to store as a response example, if the example has one worth storing.
fn response_example(path: &str, example: &CapturedExample) -> Result<Option<Value>> {
    let content_type = example.content_type.as_str();
    if example.response_body.is_empty() || content_type.starts_with("text/html") {
        return Ok(None);
    }

    if content_type == JSON_MEDIA_TYPE {
        serde_json::from_str(&example.response_body)
            .map(Some)
            .map_err(|e| Error::InvalidExampleBody {
                path: path.to_string(),
                method: example.method.clone(),
                status: example.status(),
                message: e.to_string(),
            })
    } else {
        Ok(Some(Value::String(example.response_body.clone())))
    }
}
