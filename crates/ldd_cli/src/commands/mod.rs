//! CLI command definitions.
//!
//! Each subcommand is a thin wrapper over the `ldd_design` mapper and
//! validator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use thiserror::Error;

use ldd_design::LddConfig;

pub mod build;
pub mod map;
pub mod validate;

/// ldd - living-documentation design toolchain
#[derive(Parser)]
#[command(name = "ldd")]
#[command(version, about = "Map and validate living-documentation designs")]
#[command(long_about = r#"
ldd aggregates a tree of living-documentation components into a single design
document and validates it for referential integrity before it ships.

WORKFLOWS:
  map       → Rebuild the design document and async loader from the tree
  validate  → Check the design document (maps first unless --no-map)
  build     → Map, stamp name/version, validate and export design.json

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Mapping failure
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project root (defaults to current directory)
    #[arg(short, long, global = true, env = "LDD_PROJECT")]
    pub project: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Map the component tree into the design document
    Map(map::MapArgs),

    /// Validate the design document
    Validate(validate::ValidateArgs),

    /// Map, validate and export the design for shipping
    Build(build::BuildArgs),
}

/// Some part of the component tree could not be mapped.
#[derive(Debug, Error)]
#[error("mapping failed for {0} part(s) of the component tree")]
pub struct MapFailed(pub usize);

/// Resolve the project root and load its configuration.
pub fn load_config(project: Option<PathBuf>) -> Result<(PathBuf, LddConfig)> {
    let root = match project {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    if !root.is_dir() {
        anyhow::bail!("Project directory not found: {:?}", root);
    }

    let config = LddConfig::load(&root)
        .with_context(|| format!("Failed to load {}", LddConfig::FILE_NAME))?
        .resolve(&root);
    Ok((root, config))
}
