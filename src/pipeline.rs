//! The sequential run loop
//!
//! Discovery and synthesis are separate passes joined by the inventories, so
//! a stored inventory can replace re-sampling. Processing is single-threaded
//! and sequential over tables; every per-table failure is logged and the run
//! continues.

use crate::config::{EmptyTablePolicy, PipelineConfig};
use crate::discover::{KeyInventory, NestedFormInventory};
use crate::source::{Catalog, SchemaSampler, SourceConnector, ViewExecutor};
use crate::synth::{GeneratedQuery, QuerySynthesizer};
use anyhow::{Context, Result};
use std::collections::BTreeSet;

/// Tally of one synthesis pass
#[derive(Debug, Default)]
pub struct SynthesisOutcome {
    /// One record per emitted view, in table order
    pub queries: Vec<GeneratedQuery>,
    /// Tables skipped because no columns resolved
    pub skipped: usize,
    /// Statements accepted by the execution service
    pub created: usize,
    /// Statements rejected by the execution service
    pub failed: usize,
}

/// Discovery pass: sample every text column and build both inventories
pub fn run_discovery<C: SourceConnector>(
    connector: C,
    config: &PipelineConfig,
) -> Result<(KeyInventory, NestedFormInventory)> {
    let mut sampler = SchemaSampler::new(connector, config.clone());
    let (keys, forms) = sampler.discover().context("discovery pass failed")?;
    log::info!(
        "discovery complete: {} tables with keys, {} tables with form ids",
        keys.len(),
        forms.len()
    );
    Ok((keys, forms))
}

/// Synthesis pass: one view statement per inventoried table
///
/// Catalog failures and executor rejections are logged per table and never
/// abort the pass; previously created views are not rolled back.
pub fn run_synthesis(
    catalog: &dyn Catalog,
    mut executor: Option<&mut dyn ViewExecutor>,
    keys: &KeyInventory,
    forms: &NestedFormInventory,
    config: &PipelineConfig,
) -> SynthesisOutcome {
    let synthesizer = QuerySynthesizer::new(config.clone());
    let mut outcome = SynthesisOutcome::default();

    let mut tables: BTreeSet<String> = keys.tables().cloned().chain(forms.tables().cloned()).collect();

    // Under the placeholder policy every catalog table gets a view, with or
    // without an inventory entry
    if config.empty_table_policy == EmptyTablePolicy::Placeholder {
        match catalog.list_tables() {
            Ok(listed) => {
                for table in listed {
                    tables.insert(format!("{}{}", config.schema_prefix, table));
                }
            }
            Err(err) => log::error!("failed to list catalog tables: {}", err),
        }
    }

    for full_table_name in &tables {
        let short_name = config.short_table_name(full_table_name);

        let raw_columns = match catalog.table_columns(short_name) {
            Ok(columns) => columns,
            Err(err) => {
                log::error!("failed to fetch columns for `{}`: {}", short_name, err);
                Vec::new()
            }
        };

        let spec = match synthesizer.build_view(
            full_table_name,
            &raw_columns,
            keys.columns_for(full_table_name),
            forms.forms_for(full_table_name),
        ) {
            Some(spec) => spec,
            None => {
                outcome.skipped += 1;
                continue;
            }
        };

        if let Some(executor) = executor.as_mut() {
            match executor.execute(&spec.create_view_sql()) {
                Ok(()) => {
                    log::info!("created/updated view for table `{}`", full_table_name);
                    outcome.created += 1;
                }
                Err(err) => {
                    log::error!("failed to create view for `{}`: {}", full_table_name, err);
                    outcome.failed += 1;
                }
            }
        }

        outcome.queries.push(GeneratedQuery {
            table: full_table_name.clone(),
            query: spec.select_sql(),
        });
    }

    outcome
}
