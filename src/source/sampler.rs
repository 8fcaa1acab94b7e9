//! Row sampling and key discovery over the relational source
//!
//! Sequential, one column at a time. The connection is health-checked before
//! every query and reestablished within a bounded retry budget; exhausting
//! that budget is the only condition that aborts a discovery pass.

use crate::config::PipelineConfig;
use crate::discover::{KeyExtractor, KeyInventory, NestedFormExtractor, NestedFormInventory};
use crate::source::{ColumnRef, SourceConnection, SourceConnector, SourceError};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Drives both extractors over every text column of the configured schema
pub struct SchemaSampler<C: SourceConnector> {
    connector: C,
    conn: Option<C::Conn>,
    config: PipelineConfig,
}

impl<C: SourceConnector> SchemaSampler<C> {
    pub fn new(connector: C, config: PipelineConfig) -> Self {
        SchemaSampler {
            connector,
            conn: None,
            config,
        }
    }

    /// Run one discovery pass: enumerate text columns, sample each, and
    /// aggregate key-paths and form ids into the inventories
    pub fn discover(&mut self) -> Result<(KeyInventory, NestedFormInventory), SourceError> {
        let schema = self.config.schema.clone();
        let columns = self.connection()?.text_columns(&schema)?;

        let mut by_table: BTreeMap<String, Vec<ColumnRef>> = BTreeMap::new();
        for column in columns {
            by_table.entry(column.full_table_name()).or_default().push(column);
        }
        log::info!(
            "found {} tables with text columns in schema '{}'",
            by_table.len(),
            self.config.schema
        );

        let mut keys = KeyInventory::new();
        let mut forms = NestedFormInventory::new();

        for (full_table_name, table_columns) in &by_table {
            log::info!(
                "processing `{}` (columns: {})",
                full_table_name,
                table_columns
                    .iter()
                    .map(|c| c.column.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            for column in table_columns {
                let rows = match self.sample_column(column) {
                    Ok(rows) => rows,
                    Err(SourceError::ConnectionExhausted { attempts }) => {
                        return Err(SourceError::ConnectionExhausted { attempts });
                    }
                    Err(err) => {
                        log::error!(
                            "error fetching data from `{}` ({}): {}",
                            full_table_name,
                            column.column,
                            err
                        );
                        continue;
                    }
                };

                let mut column_keys = BTreeSet::new();
                let mut column_ids = BTreeSet::new();
                for row in &rows {
                    column_keys.extend(KeyExtractor::extract_keys(row));
                    column_ids.extend(NestedFormExtractor::extract_ids(row));
                }

                if !column_keys.is_empty() {
                    log::info!(
                        "extracted {} keys from `{}` (column `{}`)",
                        column_keys.len(),
                        full_table_name,
                        column.column
                    );
                }
                keys.record(full_table_name, &column.column, column_keys);
                forms.record(full_table_name, &column.column, column_ids);
            }
        }

        Ok((keys, forms))
    }

    fn sample_column(&mut self, column: &ColumnRef) -> Result<Vec<String>, SourceError> {
        let tenant_column = self.config.tenant_column.clone();
        let tenant_id = self.config.tenant_id.clone();
        self.connection()?
            .sample_rows(column, &tenant_column, &tenant_id)
    }

    /// Health-check the connection, reconnecting within the retry budget
    fn connection(&mut self) -> Result<&mut C::Conn, SourceError> {
        let healthy = matches!(&self.conn, Some(c) if c.is_connected());
        if !healthy {
            if self.conn.is_some() {
                log::info!("source connection lost, reconnecting");
            }
            self.conn = Some(self.establish()?);
        }
        Ok(self.conn.as_mut().unwrap())
    }

    fn establish(&self) -> Result<C::Conn, SourceError> {
        let retries = self.config.connect_retries;
        for attempt in 1..=retries {
            match self.connector.connect() {
                Ok(conn) => {
                    log::info!("connected to source for schema '{}'", self.config.schema);
                    return Ok(conn);
                }
                Err(err) => {
                    log::warn!(
                        "source connection failed (attempt {}/{}): {}",
                        attempt,
                        retries,
                        err
                    );
                    std::thread::sleep(self.config.connect_backoff);
                }
            }
        }
        Err(SourceError::ConnectionExhausted { attempts: retries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use std::cell::Cell;
    use std::time::Duration;

    fn test_config() -> PipelineConfig {
        PipelineConfig {
            schema: String::from("app"),
            connect_backoff: Duration::ZERO,
            ..PipelineConfig::default()
        }
    }

    fn dump() -> MemorySource {
        serde_json::from_value(serde_json::json!({
            "app.orders": {
                "payload": [
                    "{\"status\":\"ok\",\"meta\":{\"region\":\"eu\"}}",
                    "{\"status\":42}",
                    "not json at all"
                ]
            },
            "app.trips": {
                "attrs": [
                    "[{\"key\":\"Cost Center\",\"id\":\"cost_center\",\"value\":\"R&D\"}]"
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_discover_builds_both_inventories() {
        let mut sampler = SchemaSampler::new(dump(), test_config());
        let (keys, forms) = sampler.discover().unwrap();

        let orders = keys.columns_for("app.orders").unwrap();
        let expected: Vec<&str> = vec!["meta", "meta.region", "status"];
        assert_eq!(
            orders["payload"].iter().map(String::as_str).collect::<Vec<_>>(),
            expected
        );

        let trips = forms.forms_for("app.trips").unwrap();
        assert_eq!(trips.column, "attrs");
        assert!(trips.nested_keys.contains("cost_center"));

        // the form triple's own keys still land in the generic inventory
        assert!(keys.columns_for("app.trips").is_some());
    }

    #[test]
    fn test_malformed_rows_do_not_abort_column() {
        let mut sampler = SchemaSampler::new(dump(), test_config());
        let (keys, _) = sampler.discover().unwrap();
        // the "not json at all" row was skipped, valid rows still contributed
        assert!(keys.columns_for("app.orders").is_some());
    }

    /// Connector that fails a fixed number of connect attempts
    struct FlakyConnector {
        failures_left: Cell<u32>,
        inner: MemorySource,
    }

    impl SourceConnector for FlakyConnector {
        type Conn = MemorySource;

        fn connect(&self) -> Result<MemorySource, SourceError> {
            let left = self.failures_left.get();
            if left > 0 {
                self.failures_left.set(left - 1);
                return Err(SourceError::Connect(String::from("refused")));
            }
            Ok(self.inner.clone())
        }
    }

    #[test]
    fn test_reconnect_within_budget_succeeds() {
        let connector = FlakyConnector {
            failures_left: Cell::new(2),
            inner: dump(),
        };
        let mut sampler = SchemaSampler::new(connector, test_config());
        assert!(sampler.discover().is_ok());
    }

    #[test]
    fn test_exhausted_budget_is_fatal() {
        let connector = FlakyConnector {
            failures_left: Cell::new(10),
            inner: dump(),
        };
        let mut sampler = SchemaSampler::new(connector, test_config());
        match sampler.discover() {
            Err(SourceError::ConnectionExhausted { attempts }) => assert_eq!(attempts, 3),
            other => panic!("expected ConnectionExhausted, got {:?}", other.map(|_| ())),
        }
    }
}
