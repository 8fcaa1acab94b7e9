//! viewforge-synth: Turn stored inventories into view statements
//!
//! Reads the key inventory (and optionally the form inventory) written by
//! viewforge-discover plus a table -> columns map, synthesizes one SELECT per
//! table, and writes the query artifacts. No re-sampling happens here, so a
//! stored inventory replays to byte-identical output.
//!
//! Usage:
//!   viewforge-synth --keys extracted_json_keys.json \
//!       --forms extracted_json_array_data.json \
//!       --columns tables_columns.json \
//!       --schema-prefix app. --source-prefix '"main-db".app.' \
//!       --view-space analytics.views. --tenant-id 7

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use viewforge::source::StaticCatalog;
use viewforge::synth::artifact;
use viewforge::{run_synthesis, EmptyTablePolicy, NestedFormInventory, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "viewforge-synth")]
#[command(about = "Synthesize SQL views from a discovered key inventory", long_about = None)]
struct Args {
    /// Key inventory file from a discovery run
    #[arg(long, value_name = "FILE")]
    keys: String,

    /// Form inventory file from a discovery run
    #[arg(long, value_name = "FILE")]
    forms: Option<String>,

    /// Table -> columns map (catalog snapshot)
    #[arg(long, value_name = "FILE")]
    columns: String,

    /// Schema qualifier stripped from full table names, e.g. `app.`
    #[arg(long, default_value = "")]
    schema_prefix: String,

    /// Path prefix for FROM clauses
    #[arg(long, default_value = "")]
    source_prefix: String,

    /// Path prefix for created views
    #[arg(long, default_value = "")]
    view_space: String,

    /// Table-name prefix stripped when forming alias suffixes (repeatable)
    #[arg(long = "strip-prefix")]
    strip_prefixes: Vec<String>,

    /// Tenant column name
    #[arg(long, default_value = "company_id")]
    tenant_column: String,

    /// Tenant identifier every view filters on
    #[arg(long, default_value = "0")]
    tenant_id: String,

    /// Emit a NULL placeholder column for empty tables instead of skipping
    #[arg(long)]
    placeholder: bool,

    /// Directory for the query artifacts
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let keys = artifact::read_key_inventory(&args.keys)?;
    let forms = match &args.forms {
        Some(path) => artifact::read_form_inventory(path)?,
        None => NestedFormInventory::new(),
    };

    let columns_text = std::fs::read_to_string(&args.columns)
        .with_context(|| format!("Failed to read {}", args.columns))?;
    let tables: BTreeMap<String, Vec<String>> =
        serde_json::from_str(&columns_text).context("Failed to parse column map")?;
    let catalog = StaticCatalog::new(tables);

    let config = PipelineConfig {
        schema_prefix: args.schema_prefix,
        source_prefix: args.source_prefix,
        view_space: args.view_space,
        strip_prefixes: args.strip_prefixes,
        tenant_column: args.tenant_column,
        tenant_id: args.tenant_id,
        empty_table_policy: if args.placeholder {
            EmptyTablePolicy::Placeholder
        } else {
            EmptyTablePolicy::Skip
        },
        ..PipelineConfig::default()
    };

    let outcome = run_synthesis(&catalog, None, &keys, &forms, &config);
    artifact::write_query_artifacts(&args.output_dir, &outcome.queries)?;

    println!(
        "Wrote {} queries to {} ({} tables skipped)",
        outcome.queries.len(),
        args.output_dir,
        outcome.skipped
    );

    Ok(())
}
