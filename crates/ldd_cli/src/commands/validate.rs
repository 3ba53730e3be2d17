//! Validate command - Check the design document for referential integrity.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use ldd_design::{DesignDocument, DesignStore, DesignValidator, UndeclaredDirectivePolicy};

use super::load_config;
use super::map::run_mapper;

#[derive(Args)]
pub struct ValidateArgs {
    /// Design document to validate (defaults to the configured design file)
    #[arg(short, long)]
    design: Option<PathBuf>,

    /// Validate the persisted document without mapping first
    #[arg(long)]
    no_map: bool,

    /// Override the configured undeclared directive policy
    #[arg(long, value_name = "allow|warn|deny")]
    undeclared_directives: Option<UndeclaredDirectivePolicy>,
}

pub async fn execute(project: Option<PathBuf>, args: ValidateArgs) -> Result<()> {
    let (_root, mut config) = load_config(project)?;
    if let Some(policy) = args.undeclared_directives {
        config.undeclared_directives = policy;
    }
    let policy = config.undeclared_directives;

    let map_first = !args.no_map && args.design.is_none();
    let design_path = args.design.unwrap_or_else(|| config.design_file.clone());
    if map_first {
        run_mapper(config)?;
    }

    info!("Validating design {:?}", design_path);
    let design = DesignStore::new(&design_path)
        .load()
        .with_context(|| format!("Failed to read design {}", design_path.display()))?;

    check_design(&design, policy)?;

    println!();
    println!("✅ Design validation passed!");
    Ok(())
}

/// Validate a design, printing warnings and the outcome.
pub fn check_design(design: &DesignDocument, policy: UndeclaredDirectivePolicy) -> Result<()> {
    println!("📋 Validating design...");

    let result = DesignValidator::new(design)
        .with_undeclared_directives(policy)
        .validate();

    match result {
        Ok(report) => {
            println!(
                "   ✅ {} components in {} groups are consistent",
                design.components.len(),
                design.groups.len()
            );
            for warning in &report.warnings {
                println!("   ⚠️  {}", warning);
            }
            Ok(())
        }
        Err(e) => {
            println!("   ❌ {}", e);
            Err(e).context("Design validation failed")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_undeclared_directives_flag_uses_policy_names() {
        let cli = Cli::try_parse_from(["ldd", "validate", "--undeclared-directives", "deny"]).unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.undeclared_directives, Some(UndeclaredDirectivePolicy::Deny));

        assert!(Cli::try_parse_from(["ldd", "validate", "--undeclared-directives", "strict"]).is_err());
    }
}
