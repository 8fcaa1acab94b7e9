//! Artifact rendering and file IO
//!
//! Four files survive a run: the machine-readable query list, the flat SQL
//! text, and the two discovery inventories. The inventories are read back by
//! synthesis-only runs instead of re-sampling.

use crate::discover::{KeyInventory, NestedFormInventory};
use crate::synth::query::GeneratedQuery;
use anyhow::{Context, Result};
use std::path::Path;

pub const QUERIES_JSON: &str = "generated_queries.json";
pub const QUERIES_SQL: &str = "generated_queries.sql";
pub const KEYS_JSON: &str = "extracted_json_keys.json";
pub const FORMS_JSON: &str = "extracted_json_array_data.json";

/// Pretty-printed JSON array of `{table, query}` records
pub fn render_queries_json(queries: &[GeneratedQuery]) -> Result<String> {
    serde_json::to_string_pretty(queries).context("Failed to serialize query list")
}

/// Flat SQL text, statements separated by a blank line
pub fn render_sql_text(queries: &[GeneratedQuery]) -> String {
    queries
        .iter()
        .map(|q| q.query.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Write both query artifacts into a directory
pub fn write_query_artifacts<P: AsRef<Path>>(dir: P, queries: &[GeneratedQuery]) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).context("Failed to create output directory")?;

    let json_path = dir.join(QUERIES_JSON);
    std::fs::write(&json_path, render_queries_json(queries)?)
        .with_context(|| format!("Failed to write {}", json_path.display()))?;

    let sql_path = dir.join(QUERIES_SQL);
    std::fs::write(&sql_path, render_sql_text(queries))
        .with_context(|| format!("Failed to write {}", sql_path.display()))?;

    Ok(())
}

/// Write both discovery inventories into a directory
pub fn write_inventories<P: AsRef<Path>>(
    dir: P,
    keys: &KeyInventory,
    forms: &NestedFormInventory,
) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).context("Failed to create output directory")?;

    let keys_path = dir.join(KEYS_JSON);
    std::fs::write(
        &keys_path,
        serde_json::to_string_pretty(keys).context("Failed to serialize key inventory")?,
    )
    .with_context(|| format!("Failed to write {}", keys_path.display()))?;

    let forms_path = dir.join(FORMS_JSON);
    std::fs::write(
        &forms_path,
        serde_json::to_string_pretty(forms).context("Failed to serialize form inventory")?,
    )
    .with_context(|| format!("Failed to write {}", forms_path.display()))?;

    Ok(())
}

/// Load a key inventory written by a previous discovery run
pub fn read_key_inventory<P: AsRef<Path>>(path: P) -> Result<KeyInventory> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    serde_json::from_str(&text).context("Failed to parse key inventory")
}

/// Load a form inventory written by a previous discovery run
pub fn read_form_inventory<P: AsRef<Path>>(path: P) -> Result<NestedFormInventory> {
    let text = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    serde_json::from_str(&text).context("Failed to parse form inventory")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queries() -> Vec<GeneratedQuery> {
        vec![
            GeneratedQuery {
                table: String::from("app.orders"),
                query: String::from("SELECT\n    id AS id_orders\nFROM \"orders\" WHERE company_id = 7;"),
            },
            GeneratedQuery {
                table: String::from("app.users"),
                query: String::from("SELECT\n    id AS id_users\nFROM \"users\" WHERE company_id = 7;"),
            },
        ]
    }

    #[test]
    fn test_sql_text_blank_line_separated() {
        let text = render_sql_text(&queries());
        assert_eq!(text.matches("\n\n").count(), 1);
        assert!(text.starts_with("SELECT"));
        assert!(text.ends_with("company_id = 7;"));
    }

    #[test]
    fn test_queries_json_round_trip() {
        let rendered = render_queries_json(&queries()).unwrap();
        let back: Vec<GeneratedQuery> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(back, queries());
    }
}
