//! # ldd_design
//!
//! Mapping and validation of living-documentation designs.
//!
//! A design is described on disk as a tree of groups and components: every
//! group folder holds component folders, each with a markup template and an
//! `ld-conf.json` declaration. This crate aggregates that tree into a single
//! [`DesignDocument`] and checks it for referential integrity before it is
//! shipped.
//!
//! ## Features
//!
//! - **Scanning**: qualifying component folders, stray file repair
//! - **Aggregation**: stable group ordering across runs, property schema merge
//! - **Codegen**: async registration module for single-file UI components
//! - **Validation**: names, labels, properties, parents, groups and directives
//!
//! ## Example
//!
//! ```rust,no_run
//! use ldd_design::{DesignMapper, DesignValidator, LddConfig};
//!
//! let config = LddConfig::load(".").unwrap().resolve(".");
//! let report = DesignMapper::new(config).run().unwrap();
//!
//! match DesignValidator::new(&report.document).validate() {
//!     Ok(result) => {
//!         for warning in &result.warnings {
//!             eprintln!("Warning: {}", warning);
//!         }
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

pub mod aggregator;
pub mod codegen;
pub mod config;
pub mod directive;
pub mod error;
pub mod mapper;
pub mod markup;
pub mod models;
pub mod properties;
pub mod scanner;
pub mod store;
pub mod validator;

pub use aggregator::{DesignAggregator, MapReport};
pub use config::LddConfig;
pub use directive::{scan_directives, DirectiveKind, DirectiveOccurrence, DirectiveScanner};
pub use error::{DesignError, DesignResult, ValidationError};
pub use mapper::DesignMapper;
pub use models::*;
pub use properties::{NodeEvaluator, PropertyDiscovery, PropertyLoader, PropertySource, ScriptEvaluator};
pub use scanner::{ComponentScanner, ScanFailure, ScanOptions};
pub use store::{DesignStore, PackageInfo};
pub use validator::{DesignValidator, UndeclaredDirectivePolicy, ValidationReport};
