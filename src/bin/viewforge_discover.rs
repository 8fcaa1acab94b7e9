//! viewforge-discover: Sample stored JSON text and build the key inventories
//!
//! Reads a row dump (one JSON object mapping "schema.table" to columns to
//! sampled row texts), runs both extractors over every column, and writes the
//! two inventory artifacts consumed by viewforge-synth.
//!
//! Usage:
//!   # Read a dump file, write inventories to the current directory
//!   viewforge-discover rows.json --schema app --tenant-id 7
//!
//!   # Read from stdin, write elsewhere
//!   cat rows.json | viewforge-discover --schema app --tenant-id 7 -o ./out

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use viewforge::source::MemorySource;
use viewforge::synth::artifact;
use viewforge::{run_discovery, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "viewforge-discover")]
#[command(about = "Discover JSON key structure from sampled rows", long_about = None)]
struct Args {
    /// Row dump file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Source schema the dump was sampled from
    #[arg(long, default_value = "app")]
    schema: String,

    /// Tenant identifier the sampling was scoped to
    #[arg(long, default_value = "0")]
    tenant_id: String,

    /// Tenant column name
    #[arg(long, default_value = "company_id")]
    tenant_column: String,

    /// Directory for the inventory artifacts
    #[arg(long, short = 'o', default_value = ".")]
    output_dir: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = if let Some(path) = &args.input {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?
    } else {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    };
    let source: MemorySource = serde_json::from_str(&text).context("Failed to parse row dump")?;

    let config = PipelineConfig {
        schema: args.schema,
        tenant_id: args.tenant_id,
        tenant_column: args.tenant_column,
        ..PipelineConfig::default()
    };

    let (keys, forms) = run_discovery(source, &config)?;
    artifact::write_inventories(&args.output_dir, &keys, &forms)?;

    println!(
        "Wrote {} and {} to {} ({} tables with keys, {} with form ids)",
        artifact::KEYS_JSON,
        artifact::FORMS_JSON,
        args.output_dir,
        keys.len(),
        forms.len()
    );

    Ok(())
}
