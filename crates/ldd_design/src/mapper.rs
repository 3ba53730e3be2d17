//! One complete mapping pass: load, aggregate, persist, generate.

use tracing::{info, warn};

use crate::aggregator::{DesignAggregator, MapReport};
use crate::codegen::write_async_loader;
use crate::config::LddConfig;
use crate::error::DesignResult;
use crate::properties::{NodeEvaluator, PropertyLoader, ScriptEvaluator};
use crate::scanner::{ComponentScanner, ScanOptions};
use crate::store::DesignStore;

/// Runs the mapping pipeline described by a resolved [`LddConfig`].
pub struct DesignMapper {
    config: LddConfig,
    aggregator: DesignAggregator,
    store: DesignStore,
}

impl DesignMapper {
    /// Build a mapper that evaluates script property modules with the
    /// configured runner.
    pub fn new(config: LddConfig) -> Self {
        let evaluator = NodeEvaluator::new(config.script_runner.clone());
        Self::with_evaluator(config, Box::new(evaluator))
    }

    pub fn with_evaluator(config: LddConfig, evaluator: Box<dyn ScriptEvaluator>) -> Self {
        let scanner = ComponentScanner::new(
            config.components_dir.clone(),
            ScanOptions {
                declaration_file: config.declaration_file.clone(),
                template_extension: config.template_extension.clone(),
                repair_stray_entries: config.repair_stray_entries,
            },
        );
        let aggregator = DesignAggregator::new(scanner, PropertyLoader::new(evaluator));
        let store = DesignStore::new(config.design_file.clone());

        Self {
            config,
            aggregator,
            store,
        }
    }

    pub fn store(&self) -> &DesignStore {
        &self.store
    }

    /// Rebuild the design document and the async loader from the tree.
    ///
    /// The document is saved even when some groups failed to scan; the
    /// report's success flag tells the caller.
    pub fn run(&self) -> DesignResult<MapReport> {
        info!("Mapping design from {:?}", self.config.components_dir);

        let previous = self.store.load()?;
        let report = self.aggregator.aggregate(&previous)?;

        self.store.save(&report.document)?;
        write_async_loader(&self.config.async_loader_file, &report.async_components)?;

        for failure in &report.failures {
            warn!("Not mapped: {}: {}", failure.scope, failure.message);
        }
        Ok(report)
    }
}
