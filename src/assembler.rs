//! Normalization of the raw schema into a publishable document.
//!
//! [`assemble`] runs every step in order. The steps are also public on their
//! own so callers can re-apply a single normalization to an existing document.

use crate::config::{AssemblySettings, TagConfig};
use crate::document::{Document, Extra, OperationEntry, PathEntry, Tag};
use crate::error::Result;
use crate::i18n::{Catalog, Text};
use crate::source::{DeprecationSet, RawSchemaSource};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::BTreeMap;

/// Placeholder segment for the API version in raw path templates.
pub const VERSION_PLACEHOLDER: &str = "{version}";
pub const SECURE_SCHEME: &str = "https";
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Fetches the raw schema and normalizes it.
///
/// Top-level customizations are laid over the raw schema before it is decoded.
/// The static fields, description and configured tags are then applied, and
/// every path is rewritten to the default API version with its operations
/// summarized and flagged for deprecation.
///
/// # Arguments
///
/// * `source` - Supplies the raw schema and its side channels
/// * `settings` - Templates directory, default version and message catalog
///
/// # Returns
///
/// Returns the assembled document, ready for example merging.
///
/// # Errors
///
/// Returns an error if the raw schema cannot be fetched or lacks `paths` or
/// `tags`, or if a configuration file exists but cannot be parsed.
pub fn assemble(source: &dyn RawSchemaSource, settings: &AssemblySettings) -> Result<Document> {
    info!("Assembling document from raw schema...");
    let mut raw = source.fetch()?;
    let deprecated = source.deprecated_paths()?;

    if let Some(customizations) = source.customizations()? {
        if let Value::Object(object) = &mut raw {
            debug!("Applying {} top-level customizations", customizations.len());
            object.extend(customizations);
        }
    }

    let mut document = Document::from_raw(raw)?;

    apply_static_fields(&mut document);

    if let Some(description) = settings.load_description()? {
        inject_description(&mut document, description);
    }

    if let Some(config) = settings.load_tag_config()? {
        append_configured_tags(&mut document, &config, settings.catalog.as_ref());
    }

    document.paths = resolve_paths(
        std::mem::take(&mut document.paths),
        &settings.default_version,
        &deprecated,
    );

    for operation in document.operations_mut() {
        extract_summary(operation);
        strip_version_parameter(operation);
    }

    info!(
        "Assembled {} paths and {} tags",
        document.paths.len(),
        document.tags.len()
    );
    Ok(document)
}

/// Host-relative, HTTPS only, JSON request bodies.
pub fn apply_static_fields(document: &mut Document) {
    document.host = None;
    document.schemes = vec![SECURE_SCHEME.to_string()];
    document.consumes = vec![JSON_MEDIA_TYPE.to_string()];
}

pub fn inject_description(document: &mut Document, description: String) {
    document.info.description = Some(Text::Plain(description));
}

/// Appends one tag per configured category, in configuration order.
pub fn append_configured_tags(
    document: &mut Document,
    config: &TagConfig,
    catalog: Option<&std::sync::Arc<Catalog>>,
) {
    for category in &config.categories {
        let description = category.description.as_ref().map(|text| match catalog {
            Some(catalog) => Text::Lazy(Catalog::lazy(catalog, text.as_str())),
            None => Text::Plain(text.clone()),
        });
        document.tags.push(Tag {
            name: category.name.clone(),
            description,
            extra: Extra::new(),
        });
    }
    debug!("Appended {} configured tags", config.categories.len());
}

/// Rewrites `{version}` in every path key and flags deprecated operations.
///
/// Deprecation is matched against the key as it arrives, before substitution,
/// since the deprecation list names templates. The result is a fresh mapping;
/// running this again over its own output changes nothing.
pub fn resolve_paths(
    paths: BTreeMap<String, PathEntry>,
    default_version: &str,
    deprecated: &DeprecationSet,
) -> BTreeMap<String, PathEntry> {
    let mut revised = BTreeMap::new();

    for (template, mut entry) in paths {
        if deprecated.contains(&template) {
            debug!("Flagging {} as deprecated", template);
            for operation in entry.values_mut() {
                operation.deprecated = true;
            }
        }

        let path = template.replace(VERSION_PLACEHOLDER, default_version);
        if revised.insert(path.clone(), entry).is_some() {
            warn!("{} resolves to an existing path {}, replacing it", template, path);
        }
    }

    revised
}

/// Moves the first description line into `summary`.
///
/// Leading `#`/`:` markers and whitespace are stripped from the summary; the
/// remaining lines become the description.
pub fn extract_summary(operation: &mut OperationEntry) {
    let Some(description) = operation.description.as_ref().map(Text::resolve) else {
        return;
    };
    if description.is_empty() {
        return;
    }

    let mut lines = description.lines();
    let first = lines.next().unwrap_or_default();
    let summary = first
        .trim_start_matches(|c: char| c == '#' || c == ':' || c.is_whitespace())
        .trim_end();

    operation.summary = Some(summary.to_string());
    operation.description = Some(Text::Plain(lines.collect::<Vec<_>>().join("\n")));
}

pub fn strip_version_parameter(operation: &mut OperationEntry) {
    operation
        .parameters
        .retain(|param| !param.is_version_path_param());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TagCategory;
    use crate::document::{Parameter, ParameterLocation};
    use crate::source::StaticSchemaSource;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn widget_schema() -> Value {
        json!({
            "swagger": "2.0",
            "info": {"title": "Widgets", "version": "", "description": "raw"},
            "host": "localhost:8013",
            "schemes": ["http"],
            "tags": [{"name": "raw"}],
            "paths": {
                "/api/": {"get": {"description": "", "parameters": [], "responses": {}}},
                "/api/{version}/widgets/": {
                    "get": {
                        "description": "# List widgets",
                        "parameters": [
                            {"name": "version", "in": "path", "required": true, "type": "string"},
                            {"name": "page", "in": "query", "type": "integer"}
                        ],
                        "responses": {"200": {"description": ""}}
                    },
                    "post": {
                        "parameters": [
                            {"name": "version", "in": "path", "required": true, "type": "string"},
                            {"name": "data", "in": "body", "schema": {"type": "object"}}
                        ],
                        "responses": {"201": {"description": ""}}
                    }
                },
                "/api/{version}/widgets/{id}/": {
                    "get": {
                        "description": "#: Retrieve\nDetails here",
                        "parameters": [
                            {"name": "version", "in": "path", "required": true, "type": "string"},
                            {"name": "id", "in": "path", "required": true, "type": "string"}
                        ],
                        "responses": {"200": {"description": ""}}
                    }
                }
            }
        })
    }

    fn operation_with_description(description: &str) -> OperationEntry {
        OperationEntry {
            description: Some(Text::from(description)),
            ..OperationEntry::default()
        }
    }

    #[test]
    fn test_widget_scenario() {
        let source = StaticSchemaSource::new(widget_schema())
            .with_deprecated(DeprecationSet::new(["/api/{version}/widgets/{id}/"]));

        let document = assemble(&source, &AssemblySettings::default()).unwrap();

        let op = document.operation("/api/v2/widgets/{id}/", "get").unwrap();
        assert_eq!(op.summary.as_deref(), Some("Retrieve"));
        assert_eq!(op.description, Some(Text::from("Details here")));
        assert!(op.deprecated);
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].name, "id");
        assert!(op.parameters.iter().all(|p| !p.is_version_path_param()));
    }

    #[test]
    fn test_no_path_keeps_the_version_placeholder() {
        let source = StaticSchemaSource::new(widget_schema());
        let document = assemble(&source, &AssemblySettings::default()).unwrap();

        let keys: Vec<_> = document.paths.keys().cloned().collect();
        assert_eq!(keys, vec!["/api/", "/api/v2/widgets/", "/api/v2/widgets/{id}/"]);
        assert!(keys.iter().all(|k| !k.contains(VERSION_PLACEHOLDER)));
    }

    #[test]
    fn test_only_listed_templates_are_deprecated() {
        let source = StaticSchemaSource::new(widget_schema())
            .with_deprecated(DeprecationSet::new(["/api/{version}/widgets/"]));
        let document = assemble(&source, &AssemblySettings::default()).unwrap();

        assert!(document.operation("/api/v2/widgets/", "get").unwrap().deprecated);
        assert!(document.operation("/api/v2/widgets/", "post").unwrap().deprecated);
        assert!(!document.operation("/api/v2/widgets/{id}/", "get").unwrap().deprecated);
        assert!(!document.operation("/api/", "get").unwrap().deprecated);
    }

    #[test]
    fn test_deprecation_listed_by_concrete_path_does_not_match() {
        let source = StaticSchemaSource::new(widget_schema())
            .with_deprecated(DeprecationSet::new(["/api/v2/widgets/"]));
        let document = assemble(&source, &AssemblySettings::default()).unwrap();

        assert!(!document.operation("/api/v2/widgets/", "get").unwrap().deprecated);
    }

    #[test]
    fn test_static_fields() {
        let source = StaticSchemaSource::new(widget_schema());
        let document = assemble(&source, &AssemblySettings::default()).unwrap();

        assert_eq!(document.host, None);
        assert_eq!(document.schemes, vec!["https"]);
        assert_eq!(document.consumes, vec!["application/json"]);
        assert_eq!(document.extra["swagger"], "2.0");
    }

    #[test]
    fn test_customizations_override_raw_keys() {
        let mut custom = serde_json::Map::new();
        custom.insert("basePath".to_string(), json!("/api"));
        let source = StaticSchemaSource::new(widget_schema()).with_customizations(custom);

        let document = assemble(&source, &AssemblySettings::default()).unwrap();
        assert_eq!(document.extra["basePath"], "/api");
    }

    #[test]
    fn test_description_and_tags_from_templates_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("description.md"), "The widget API.\n").unwrap();
        fs::write(
            temp_dir.path().join("config.yml"),
            "categories:\n  - name: Widgets\n    description: Widget things\n  - name: Gadgets\n",
        )
        .unwrap();

        let source = StaticSchemaSource::new(widget_schema());
        let settings = AssemblySettings::from_templates_dir(temp_dir.path());
        let document = assemble(&source, &settings).unwrap();

        assert_eq!(document.info.description, Some(Text::from("The widget API.\n")));
        let names: Vec<_> = document.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["raw", "Widgets", "Gadgets"]);
        assert_eq!(document.tags[1].description, Some(Text::from("Widget things")));
        assert_eq!(document.tags[2].description, None);
    }

    #[test]
    fn test_missing_templates_keep_raw_values() {
        let temp_dir = TempDir::new().unwrap();
        let source = StaticSchemaSource::new(widget_schema());
        let settings = AssemblySettings::from_templates_dir(temp_dir.path());
        let document = assemble(&source, &settings).unwrap();

        assert_eq!(document.info.description, Some(Text::from("raw")));
        assert_eq!(document.tags.len(), 1);
    }

    #[test]
    fn test_configured_tags_use_catalog() {
        let mut document = Document::default();
        let config = TagConfig {
            categories: vec![TagCategory {
                name: "Jobs".to_string(),
                description: Some("Run things".to_string()),
            }],
        };
        let mut messages = HashMap::new();
        messages.insert("Run things".to_string(), "Exécuter".to_string());
        let catalog = Arc::new(Catalog::new(messages));

        append_configured_tags(&mut document, &config, Some(&catalog));

        let description = document.tags[0].description.as_ref().unwrap();
        assert!(matches!(description, Text::Lazy(_)));
        assert_eq!(description.resolve(), "Exécuter");
    }

    #[test]
    fn test_missing_paths_is_fatal() {
        let source = StaticSchemaSource::new(json!({"tags": [], "info": {"title": "x"}}));
        assert!(assemble(&source, &AssemblySettings::default()).is_err());
    }

    #[test]
    fn test_summary_strips_markers() {
        let mut op = operation_with_description("## Create a widget:\n\nMore text\nand more");
        extract_summary(&mut op);

        assert_eq!(op.summary.as_deref(), Some("Create a widget:"));
        assert_eq!(op.description, Some(Text::from("\nMore text\nand more")));
    }

    #[test]
    fn test_summary_single_line() {
        let mut op = operation_with_description("# Ping");
        extract_summary(&mut op);

        assert_eq!(op.summary.as_deref(), Some("Ping"));
        assert_eq!(op.description, Some(Text::from("")));
    }

    #[test]
    fn test_summary_reconstructs_description() {
        let original = "#: Retrieve a widget\nfirst body line\n\nlast body line";
        let mut op = operation_with_description(original);
        extract_summary(&mut op);

        let rebuilt = format!(
            "#: {}\n{}",
            op.summary.as_deref().unwrap(),
            op.description.as_ref().unwrap()
        );
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn test_empty_description_gets_no_summary() {
        let mut op = operation_with_description("");
        extract_summary(&mut op);
        assert!(op.summary.is_none());

        let mut op = OperationEntry::default();
        extract_summary(&mut op);
        assert!(op.summary.is_none());
        assert!(op.description.is_none());
    }

    #[test]
    fn test_strip_version_parameter_keeps_others() {
        let mut op = OperationEntry {
            parameters: vec![
                Parameter {
                    name: "version".to_string(),
                    location: ParameterLocation::Query,
                    schema: None,
                    extra: Default::default(),
                },
                Parameter {
                    name: "version".to_string(),
                    location: ParameterLocation::Path,
                    schema: None,
                    extra: Default::default(),
                },
            ],
            ..OperationEntry::default()
        };

        strip_version_parameter(&mut op);

        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].location, ParameterLocation::Query);
    }

    #[test]
    fn test_resolve_paths_is_a_fixed_point() {
        let deprecated = DeprecationSet::new(["/api/{version}/widgets/{id}/"]);
        let source = StaticSchemaSource::new(widget_schema()).with_deprecated(deprecated.clone());
        let document = assemble(&source, &AssemblySettings::default()).unwrap();

        let again = resolve_paths(document.paths.clone(), "v2", &deprecated);
        assert_eq!(again, document.paths);
    }

    #[test]
    fn test_resolve_paths_collision_last_wins() {
        let mut paths = BTreeMap::new();
        let mut first = PathEntry::new();
        first.insert("get".to_string(), OperationEntry::default());
        let mut second = PathEntry::new();
        second.insert("post".to_string(), OperationEntry::default());
        paths.insert("/api/v2/".to_string(), first);
        paths.insert("/api/{version}/".to_string(), second);

        let revised = resolve_paths(paths, "v2", &DeprecationSet::default());

        assert_eq!(revised.len(), 1);
        assert!(revised["/api/v2/"].contains_key("post"));
    }
}
