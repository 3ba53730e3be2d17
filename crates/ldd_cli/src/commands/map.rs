//! Map command - Rebuild the design document from the component tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use ldd_design::{DesignMapper, LddConfig, MapReport};

use super::{load_config, MapFailed};

#[derive(Args)]
pub struct MapArgs {
    /// Leave stray files in the components directory untouched
    #[arg(long)]
    no_repair: bool,
}

pub async fn execute(project: Option<PathBuf>, args: MapArgs) -> Result<()> {
    let (root, mut config) = load_config(project)?;
    if args.no_repair {
        config.repair_stray_entries = false;
    }

    info!("Mapping design at {:?}", root);
    let report = run_mapper(config)?;

    if !report.is_success() {
        return Err(MapFailed(report.failures.len()).into());
    }

    println!("✅ Design mapped successfully!");
    Ok(())
}

/// Run the mapper and print what it did.
pub fn run_mapper(config: LddConfig) -> Result<MapReport> {
    let design_file = config.design_file.clone();
    let report = DesignMapper::new(config)
        .run()
        .context("Failed to map design")?;

    println!("🗺️  Mapped design into {}", design_file.display());
    println!(
        "   {} groups, {} components, {} properties, {} async components",
        report.document.groups.len(),
        report.document.components.len(),
        report.document.component_properties.len(),
        report.async_components.len()
    );

    for path in &report.repaired {
        println!("   🧹 Removed stray file {}", path.display());
    }

    if !report.is_success() {
        println!("   ❌ Not mapped:");
        for failure in &report.failures {
            println!("      - {}: {}", failure.scope, failure.message);
        }
    }

    Ok(report)
}
