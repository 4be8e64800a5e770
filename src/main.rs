//! Swagger Assembler - Command-line tool for publishing a normalized Swagger document.
//!
//! Reads the raw schema dumped from a running API, normalizes it, merges the
//! runtime examples captured while exercising the API, and writes the result.
//!
//! # Usage
//!
//! ```bash
//! swagger-assembler [OPTIONS] --version <RELEASE> <RAW_SCHEMA>
//! ```
//!
//! # Examples
//!
//! ```bash
//! swagger-assembler raw.json --version 3.3.0 -t templates/swagger -e captured.json
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! swagger-assembler raw.json --version 3.3.0 -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use swagger_assembler::cli;

fn main() -> Result<()> {
    // The verbose flag decides the log level, so parse before initializing the logger
    // and validate afterwards so validation messages are logged.
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Swagger Assembler starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Swagger document written successfully");

    Ok(())
}
