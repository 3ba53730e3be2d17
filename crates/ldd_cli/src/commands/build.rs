//! Build command - Map, stamp, validate and export the design.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use ldd_design::{DesignStore, PackageInfo};

use super::map::run_mapper;
use super::validate::check_design;
use super::{load_config, MapFailed};

#[derive(Args)]
pub struct BuildArgs {
    /// Skip writing design.json into the output directory
    #[arg(long)]
    skip_export: bool,
}

pub async fn execute(project: Option<PathBuf>, args: BuildArgs) -> Result<()> {
    let (root, config) = load_config(project)?;
    let policy = config.undeclared_directives;
    let design_file = config.design_file.clone();
    let export_path = config.output_dir.join("ldd").join("design.json");

    info!("Building design at {:?}", root);

    let report = run_mapper(config)?;
    if !report.is_success() {
        return Err(MapFailed(report.failures.len()).into());
    }

    let package = PackageInfo::read(&root).context("Failed to read package.json")?;
    let mut design = report.document;
    design.stamp(&package.name, &package.version);
    DesignStore::new(&design_file)
        .save(&design)
        .context("Failed to save design")?;
    println!("🏷️  Stamped design as {}@{}", package.name, package.version);

    check_design(&design, policy)?;

    if !args.skip_export {
        DesignStore::export(&design, &export_path).context("Failed to export design")?;
        println!("📦 Exported {}", export_path.display());
    }

    println!();
    println!("✅ Design v{} built successfully!", package.version);
    Ok(())
}
