//! # Viewforge - JSON-Column Discovery and SQL View Synthesis
//!
//! A library for discovering the latent key structure of JSON-valued text
//! columns in a relational schema and synthesizing SQL view definitions that
//! flatten those keys into aliased columns.
//!
//! ## Modules
//!
//! - **discover**: recursive key-path and form-id extraction over sampled rows
//! - **source**: traits for the relational source, catalog, and execution services
//! - **synth**: alias policy, view assembly, and artifact rendering
//! - **pipeline**: the sequential discovery + synthesis run loop
//!
//! ## Quick Start
//!
//! ```rust
//! use viewforge::{PipelineConfig, run_discovery, run_synthesis};
//! use viewforge::source::{MemorySource, StaticCatalog};
//! use std::collections::BTreeMap;
//!
//! # fn main() -> anyhow::Result<()> {
//! // Sampled rows for one text column, keyed by "schema.table"
//! let source: MemorySource = serde_json::from_value(serde_json::json!({
//!     "app.orders": {
//!         "payload": ["{\"status\":\"ok\",\"meta\":{\"region\":\"eu\"}}"]
//!     }
//! }))?;
//!
//! let mut tables = BTreeMap::new();
//! tables.insert("orders".to_string(), vec!["id".to_string(), "payload".to_string()]);
//! let catalog = StaticCatalog::new(tables);
//!
//! let config = PipelineConfig {
//!     schema: "app".to_string(),
//!     schema_prefix: "app.".to_string(),
//!     tenant_id: "7".to_string(),
//!     ..PipelineConfig::default()
//! };
//!
//! let (keys, forms) = run_discovery(source, &config)?;
//! let outcome = run_synthesis(&catalog, None, &keys, &forms, &config);
//!
//! assert!(outcome.queries[0].query.contains("status_payload_orders"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod discover;
pub mod source;
pub mod synth;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use config::{EmptyTablePolicy, PipelineConfig};
pub use discover::{KeyExtractor, KeyInventory, NestedFormExtractor, NestedFormInventory};
pub use pipeline::{run_discovery, run_synthesis, SynthesisOutcome};
pub use source::{Catalog, SchemaSampler, SourceError, ViewExecutor};
pub use synth::{AliasPolicy, GeneratedQuery, QuerySynthesizer, ViewSpec};
