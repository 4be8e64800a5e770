//! Swagger Assembler - A single normalized Swagger document from introspection and observation.
//!
//! The raw schema derived from an API's routes and serializers is templated and
//! incomplete. This library normalizes it with out-of-band configuration and
//! enriches it with request/response examples captured while exercising the API.
//!
//! # Architecture
//!
//! Data flows strictly downward through four stages:
//!
//! 1. [`source`] - Supplies the raw schema and the deprecated-path side channel
//! 2. [`assembler`] - Normalizes paths, summaries, tags, deprecation and parameters
//! 3. [`merger`] - Overlays captured [`examples`] using [`path_matcher`]
//! 4. [`serializer`] - Stamps the release and writes the document atomically
//!
//! [`context::PipelineContext`] owns the one document shared by every stage.
//!
//! # Example Usage
//!
//! ```no_run
//! use swagger_assembler::{
//!     config::AssemblySettings,
//!     context::PipelineContext,
//!     examples::ExampleBatch,
//!     serializer::{serialize_json, write_atomically, DEFAULT_OUTPUT},
//!     source::FileSchemaSource,
//! };
//! use std::path::{Path, PathBuf};
//!
//! let source = FileSchemaSource::new(PathBuf::from("raw.json"))
//!     .with_deprecated_paths(PathBuf::from("deprecated.json"));
//! let settings = AssemblySettings::from_templates_dir(Path::new("templates/swagger"));
//! let mut context = PipelineContext::new(Box::new(source), settings);
//!
//! let batch = ExampleBatch::load(Path::new("captured.json")).unwrap();
//! context.merge(&batch).unwrap();
//!
//! let document = context.finalize("3.3.0").unwrap();
//! let json = serialize_json(&document).unwrap();
//! write_atomically(&json, Path::new(DEFAULT_OUTPUT)).unwrap();
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod config;
pub mod source;
pub mod document;
pub mod i18n;
pub mod assembler;
pub mod path_matcher;
pub mod examples;
pub mod merger;
pub mod context;
pub mod serializer;
pub mod error;
