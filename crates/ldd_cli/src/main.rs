//! ldd CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Validation failure
//! - 4: Mapping failure

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ldd_design::{DesignError, ValidationError};

mod commands;

use commands::{Cli, Commands, MapFailed};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const VALIDATION_FAILURE: u8 = 3;
    pub const MAP_FAILURE: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "ldd_cli=debug,ldd_design=debug"
    } else if cli.quiet {
        "error"
    } else {
        "ldd_cli=info,ldd_design=info,warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let project = cli.project;
    let result = match cli.command {
        Commands::Map(args) => commands::map::execute(project, args).await,
        Commands::Validate(args) => commands::validate::execute(project, args).await,
        Commands::Build(args) => commands::build::execute(project, args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if e.downcast_ref::<ValidationError>().is_some()
        || matches!(e.downcast_ref::<DesignError>(), Some(DesignError::Validation(_)))
    {
        ExitCodes::VALIDATION_FAILURE
    } else if e.downcast_ref::<MapFailed>().is_some() {
        ExitCodes::MAP_FAILURE
    } else if e.to_string().to_lowercase().contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_categorize_validation_error_through_context() {
        let err: Result<(), ValidationError> = Err(ValidationError::DuplicateGroupLabels(vec!["Text".into()]));
        let err = err.context("Design validation failed").unwrap_err();
        assert_eq!(categorize_error(&err), ExitCodes::VALIDATION_FAILURE);
    }

    #[test]
    fn test_categorize_map_failure() {
        let err: anyhow::Error = MapFailed(2).into();
        assert_eq!(categorize_error(&err), ExitCodes::MAP_FAILURE);
    }

    #[test]
    fn test_categorize_missing_project() {
        let err = anyhow::anyhow!("Project directory not found: \"/nope\"");
        assert_eq!(categorize_error(&err), ExitCodes::INVALID_ARGS);
    }
}
