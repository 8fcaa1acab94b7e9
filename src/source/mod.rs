//! External collaborators - relational source, catalog, view execution
//!
//! The pipeline talks to three opaque services: the relational source it
//! samples rows from, the catalog service it asks for table/column listings,
//! and the execution service it submits view statements to. Each is a trait
//! here; the in-memory implementations back the test suite and the
//! file-driven binaries.

pub mod sampler;

pub use sampler::SchemaSampler;

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors at the external-service boundary
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("connection lost and not reestablished after {attempts} attempts")]
    ConnectionExhausted { attempts: u32 },

    #[error("query failed on `{table}` ({column}): {message}")]
    Query {
        table: String,
        column: String,
        message: String,
    },

    #[error("catalog request failed for `{path}`: {message}")]
    Catalog { path: String, message: String },

    #[error("view execution failed: {0}")]
    Execution(String),
}

/// A text-typed column found by schema introspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub schema: String,
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    /// `schema.table`, the table identity used throughout the inventories
    pub fn full_table_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

/// Catalog service: table and column listings for the view layer
pub trait Catalog {
    fn list_tables(&self) -> Result<Vec<String>, SourceError>;
    fn table_columns(&self, table: &str) -> Result<Vec<String>, SourceError>;
}

/// View-execution service: submits one statement at a time
pub trait ViewExecutor {
    fn execute(&mut self, sql: &str) -> Result<(), SourceError>;
}

/// One live connection to the relational source
pub trait SourceConnection {
    fn is_connected(&self) -> bool;

    /// Enumerate text-typed columns in a schema (information-schema scan)
    fn text_columns(&mut self, schema: &str) -> Result<Vec<ColumnRef>, SourceError>;

    /// Non-null values of one column, scoped to the tenant
    fn sample_rows(
        &mut self,
        table: &ColumnRef,
        tenant_column: &str,
        tenant_id: &str,
    ) -> Result<Vec<String>, SourceError>;
}

/// Factory for source connections, consulted again on reconnect
pub trait SourceConnector {
    type Conn: SourceConnection;

    fn connect(&self) -> Result<Self::Conn, SourceError>;
}

/// In-memory relational source backed by a row dump
///
/// Dump shape (also the file format the discover binary reads):
/// `{ "schema.table": { "column": ["raw row text", ...] } }`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MemorySource {
    tables: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl MemorySource {
    pub fn new(tables: BTreeMap<String, BTreeMap<String, Vec<String>>>) -> Self {
        MemorySource { tables }
    }
}

impl SourceConnection for MemorySource {
    fn is_connected(&self) -> bool {
        true
    }

    fn text_columns(&mut self, schema: &str) -> Result<Vec<ColumnRef>, SourceError> {
        let prefix = format!("{}.", schema);
        let mut columns = Vec::new();
        for (full_table_name, cols) in &self.tables {
            if let Some(table) = full_table_name.strip_prefix(&prefix) {
                for column in cols.keys() {
                    columns.push(ColumnRef {
                        schema: schema.to_string(),
                        table: table.to_string(),
                        column: column.clone(),
                    });
                }
            }
        }
        Ok(columns)
    }

    fn sample_rows(
        &mut self,
        table: &ColumnRef,
        _tenant_column: &str,
        _tenant_id: &str,
    ) -> Result<Vec<String>, SourceError> {
        let rows = self
            .tables
            .get(&table.full_table_name())
            .and_then(|cols| cols.get(&table.column))
            .cloned()
            .unwrap_or_default();
        Ok(rows)
    }
}

impl SourceConnector for MemorySource {
    type Conn = MemorySource;

    fn connect(&self) -> Result<MemorySource, SourceError> {
        Ok(self.clone())
    }
}

/// In-memory catalog backed by a table -> columns map
///
/// Map shape matches the `tables_columns.json` artifact, so a stored copy
/// can stand in for the live service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    tables: BTreeMap<String, Vec<String>>,
}

impl StaticCatalog {
    pub fn new(tables: BTreeMap<String, Vec<String>>) -> Self {
        StaticCatalog { tables }
    }
}

impl Catalog for StaticCatalog {
    fn list_tables(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn table_columns(&self, table: &str) -> Result<Vec<String>, SourceError> {
        self.tables
            .get(table)
            .cloned()
            .ok_or_else(|| SourceError::Catalog {
                path: table.to_string(),
                message: String::from("no fields in catalog response"),
            })
    }
}

/// Executor that records every submitted statement, optionally failing some
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub executed: Vec<String>,
    pub fail_containing: Option<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewExecutor for RecordingExecutor {
    fn execute(&mut self, sql: &str) -> Result<(), SourceError> {
        if let Some(needle) = &self.fail_containing {
            if sql.contains(needle.as_str()) {
                return Err(SourceError::Execution(format!(
                    "statement rejected (matched {:?})",
                    needle
                )));
            }
        }
        self.executed.push(sql.to_string());
        Ok(())
    }
}
