use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Swagger Assembler - Build a normalized Swagger document from a raw API schema and captured examples
#[derive(Parser, Debug)]
#[command(name = "swagger-assembler")]
#[command(author, about, long_about = None, disable_version_flag = true)]
pub struct CliArgs {
    /// Path to the raw schema JSON produced by introspecting the API
    #[arg(value_name = "RAW_SCHEMA")]
    pub raw_schema: PathBuf,

    /// Release identifier written to info.version
    #[arg(long = "version", value_name = "RELEASE")]
    pub release: String,

    /// JSON array of deprecated path templates (the X-Deprecated-Paths header value)
    #[arg(short = 'd', long = "deprecated", value_name = "FILE")]
    pub deprecated_paths: Option<PathBuf>,

    /// JSON object of top-level keys merged over the raw schema
    #[arg(long = "customizations", value_name = "FILE")]
    pub customizations: Option<PathBuf>,

    /// Directory holding description.md and config.yml
    #[arg(short = 't', long = "templates", value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// API version substituted for {version} in path templates
    #[arg(long = "default-version", value_name = "VER", default_value = crate::config::DEFAULT_API_VERSION)]
    pub default_version: String,

    /// Captured examples to merge (may be repeated)
    #[arg(short = 'e', long = "examples", value_name = "FILE")]
    pub examples: Vec<PathBuf>,

    /// YAML message catalog used to translate configured tag descriptions
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Output file path
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = crate::serializer::DEFAULT_OUTPUT)]
    pub output_path: PathBuf,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.raw_schema.is_file() {
        anyhow::bail!("Raw schema file does not exist: {}", args.raw_schema.display());
    }

    if let Some(ref dir) = args.templates_dir {
        if !dir.is_dir() {
            anyhow::bail!("Templates path is not a directory: {}", dir.display());
        }
    }

    if args.release.trim().is_empty() {
        anyhow::bail!("Release identifier must not be empty");
    }

    info!("Raw schema: {}", args.raw_schema.display());
    info!("Release: {}", args.release);
    info!("Default API version: {}", args.default_version);
    match args.templates_dir {
        Some(ref dir) => info!("Templates: {}", dir.display()),
        None => info!("Templates: none"),
    }
    info!("Example files: {}", args.examples.len());
    info!("Output: {} ({:?})", args.output_path.display(), args.output_format);

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::config::AssemblySettings;
    use crate::context::PipelineContext;
    use crate::examples::ExampleBatch;
    use crate::i18n::Catalog;
    use crate::serializer::{serialize_json, serialize_yaml, write_atomically};
    use crate::source::FileSchemaSource;
    use std::sync::Arc;

    info!("Starting Swagger document assembly...");

    // Step 1: Wire the raw schema source and its side channels
    let mut source = FileSchemaSource::new(args.raw_schema.clone());
    if let Some(path) = &args.deprecated_paths {
        source = source.with_deprecated_paths(path.clone());
    }
    if let Some(path) = &args.customizations {
        source = source.with_customizations(path.clone());
    }

    // Step 2: Assembly settings
    let mut settings = match &args.templates_dir {
        Some(dir) => AssemblySettings::from_templates_dir(dir),
        None => AssemblySettings::default(),
    }
    .with_default_version(args.default_version.clone());
    if let Some(path) = &args.catalog {
        let catalog = Catalog::load(path).context("Failed to load message catalog")?;
        settings = settings.with_catalog(Arc::new(catalog));
    }

    // Step 3: Assemble
    let mut context = PipelineContext::new(Box::new(source), settings);
    let document = context.document().context("Failed to assemble document")?;
    info!("Document has {} paths", document.paths.len());

    // Step 4: Merge each example batch in order
    let mut applied = 0;
    let mut unmatched = 0;
    for path in &args.examples {
        let batch = ExampleBatch::load(path)
            .with_context(|| format!("Failed to load examples from {}", path.display()))?;
        let report = context
            .merge(&batch)
            .with_context(|| format!("Failed to merge examples from {}", path.display()))?;
        applied += report.applied;
        unmatched += report.unmatched;
    }

    // Step 5: Finalize and serialize in full before writing
    let document = context
        .finalize(&args.release)
        .context("Document is not ready to be written")?;
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Json => serialize_json(&document)?,
        OutputFormat::Yaml => serialize_yaml(&document)?,
    };

    // Step 6: Persist
    write_atomically(&content, &args.output_path)
        .with_context(|| format!("Failed to write {}", args.output_path.display()))?;

    info!("Assembly complete!");
    info!("Summary:");
    info!("  - Paths: {}", document.paths.len());
    info!("  - Tags: {}", document.tags.len());
    info!("  - Examples applied: {}", applied);
    info!("  - Examples unmatched: {}", unmatched);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_uses_version_flag() {
        let args = CliArgs::try_parse_from([
            "swagger-assembler",
            "raw.json",
            "--version",
            "3.3.0",
            "-e",
            "a.json",
            "-e",
            "b.json",
        ])
        .unwrap();

        assert_eq!(args.release, "3.3.0");
        assert_eq!(args.examples.len(), 2);
        assert_eq!(args.default_version, "v2");
        assert_eq!(args.output_path, PathBuf::from("swagger.json"));
        assert!(matches!(args.output_format, OutputFormat::Json));
    }

    #[test]
    fn test_release_is_required() {
        assert!(CliArgs::try_parse_from(["swagger-assembler", "raw.json"]).is_err());
    }

    #[test]
    fn test_missing_raw_schema_is_rejected() {
        let args = CliArgs::try_parse_from([
            "swagger-assembler",
            "/definitely/not/here.json",
            "--version",
            "1.0",
        ])
        .unwrap();

        assert!(parse_args_from_parsed(args).is_err());
    }
}
