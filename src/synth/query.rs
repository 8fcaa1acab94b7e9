//! SQL view synthesis
//!
//! Turns one table's raw column list plus its discovered key inventory into a
//! single `SELECT` projection and the `CREATE OR REPLACE VIEW` statement that
//! wraps it. Key extraction over the stored text is pattern-based: a quoted
//! string match coalesced with an integer/decimal match, so it tolerates
//! rows that never parsed as JSON.

use crate::config::{EmptyTablePolicy, PipelineConfig};
use crate::discover::FormsEntry;
use crate::synth::alias::AliasPolicy;
use crate::synth::sql;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One emitted (table, query) record, the machine-readable artifact row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuery {
    pub table: String,
    pub query: String,
}

/// A fully assembled view definition for one table
#[derive(Debug, Clone)]
pub struct ViewSpec {
    /// Full table name, e.g. `app.app_orders`
    pub table: String,
    /// Ordered (expression, alias) pairs: raw, then derived, then forms
    pub columns: Vec<(String, String)>,
    pub from_path: String,
    pub predicate: String,
    pub view_path: String,
}

impl ViewSpec {
    /// The bare SELECT statement, also what lands in the artifacts
    pub fn select_sql(&self) -> String {
        let column_list: Vec<String> = self
            .columns
            .iter()
            .map(|(expr, alias)| format!("{} AS {}", expr, alias))
            .collect();
        format!(
            "SELECT\n    {}\nFROM {} WHERE {};",
            column_list.join(",\n    "),
            self.from_path,
            self.predicate
        )
    }

    /// The idempotent view-replacement statement submitted for execution
    pub fn create_view_sql(&self) -> String {
        format!(
            "CREATE OR REPLACE VIEW {} AS\n{}",
            self.view_path,
            self.select_sql()
        )
    }
}

/// Composes AliasPolicy, discovered keys, and raw columns into view specs
pub struct QuerySynthesizer {
    config: PipelineConfig,
    aliases: AliasPolicy,
}

impl QuerySynthesizer {
    pub fn new(config: PipelineConfig) -> Self {
        let aliases = AliasPolicy::new(&config);
        QuerySynthesizer { config, aliases }
    }

    /// Build the view spec for one table
    ///
    /// `raw_columns` comes from the catalog in its original order; the
    /// exclusion set is applied here. Returns None when the column list ends
    /// up empty under the `Skip` policy.
    pub fn build_view(
        &self,
        full_table_name: &str,
        raw_columns: &[String],
        keys: Option<&BTreeMap<String, BTreeSet<String>>>,
        forms: Option<&FormsEntry>,
    ) -> Option<ViewSpec> {
        let short_name = self.config.short_table_name(full_table_name);

        let projected: Vec<&String> = raw_columns
            .iter()
            .filter(|c| !self.config.excluded_columns.iter().any(|e| e == *c))
            .collect();

        let mut columns: Vec<(String, String)> = Vec::new();

        if projected.is_empty() {
            match self.config.empty_table_policy {
                EmptyTablePolicy::Skip => {
                    log::warn!("no columns resolved for table `{}`, skipping", full_table_name);
                    return None;
                }
                EmptyTablePolicy::Placeholder => {
                    columns.push((
                        String::from("CAST(NULL AS VARCHAR)"),
                        String::from("empty_table_placeholder"),
                    ));
                }
            }
        } else {
            for column in &projected {
                columns.push((
                    (*column).clone(),
                    self.aliases.alias(column, None, full_table_name),
                ));
            }

            if let Some(keys) = keys {
                for (json_column, column_keys) in keys {
                    for key in column_keys {
                        columns.push((
                            Self::key_extraction_expr(json_column, key.trim()),
                            self.aliases.alias(key, Some(json_column), full_table_name),
                        ));
                    }
                }
            }

            if let Some(forms) = forms {
                for id in &forms.nested_keys {
                    columns.push((
                        Self::form_extraction_expr(&forms.column, id),
                        self.aliases.alias(id, Some("forms"), full_table_name),
                    ));
                }
            }
        }

        // duplicates are emitted as-is for output compatibility, but no
        // longer silently
        for alias in Self::colliding_aliases(&columns) {
            log::warn!(
                "alias collision in view for `{}`: `{}` appears more than once",
                full_table_name,
                alias
            );
        }

        Some(ViewSpec {
            table: full_table_name.to_string(),
            columns,
            from_path: format!("{}{}", self.config.source_prefix, sql::quote_ident(short_name)),
            predicate: format!(
                "{} = {}",
                self.config.tenant_column,
                sql::literal(&self.config.tenant_id)
            ),
            view_path: format!("{}{}", self.config.view_space, sql::quote_ident(short_name)),
        })
    }

    /// Best-effort value extraction for one key: quoted string first, then
    /// integer/decimal, coalesced. The key is sampled row data and may carry
    /// quotes, so it is escaped before splicing into the pattern literal.
    fn key_extraction_expr(json_column: &str, key: &str) -> String {
        format!(
            r#"COALESCE(NULLIF(REGEXP_EXTRACT({col}, '"{key}":\s*("[^"]*")', 1), ''), NULLIF(REGEXP_EXTRACT({col}, '"{key}":\s*(\d+(\.\d+)?)', 1), ''))"#,
            col = json_column,
            key = sql::escape_in_literal(key)
        )
    }

    /// Extraction anchored on the `{key, id, value}` triple serialization
    fn form_extraction_expr(json_column: &str, id: &str) -> String {
        format!(
            r#"COALESCE(NULLIF(REGEXP_EXTRACT({col}, '"id":"{id}","value":("[^"]*")', 1), ''), NULLIF(REGEXP_EXTRACT({col}, '"id":"{id}","value":(\d+(\.\d+)?)', 1), ''))"#,
            col = json_column,
            id = sql::escape_in_literal(id)
        )
    }

    /// Aliases appearing more than once in a projection, one entry per
    /// repeated occurrence
    fn colliding_aliases(columns: &[(String, String)]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut collisions = Vec::new();
        for (_, alias) in columns {
            if !seen.insert(alias.as_str()) {
                collisions.push(alias.clone());
            }
        }
        collisions
    }
}
