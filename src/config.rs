use std::time::Duration;

/// What to emit for a table whose column list is empty after exclusion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyTablePolicy {
    /// Log and emit no view for the table
    Skip,
    /// Emit a single `CAST(NULL AS VARCHAR) AS empty_table_placeholder` column
    Placeholder,
}

/// Configuration for one pipeline run
///
/// Built once (from CLI flags or test literals) and passed by reference into
/// every component; nothing in the crate reads ambient process state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Source schema whose text columns are introspected
    pub schema: String,

    /// Column every generated view filters on
    pub tenant_column: String,

    /// Tenant identifier compared against `tenant_column`
    pub tenant_id: String,

    /// Path prefix prepended to source table names in FROM clauses,
    /// e.g. `"saas-main-db".app.`
    pub source_prefix: String,

    /// Path prefix under which views are created
    pub view_space: String,

    /// Schema qualifier stripped from full table names, e.g. `app.`
    pub schema_prefix: String,

    /// Table-name prefixes stripped when forming alias suffixes
    pub strip_prefixes: Vec<String>,

    /// Raw columns never projected into a view
    pub excluded_columns: Vec<String>,

    pub empty_table_policy: EmptyTablePolicy,

    /// Connection attempts before sampling aborts
    pub connect_retries: u32,

    /// Fixed delay between connection attempts
    pub connect_backoff: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            schema: String::from("app"),
            tenant_column: String::from("company_id"),
            tenant_id: String::from("0"),
            source_prefix: String::new(),
            view_space: String::new(),
            schema_prefix: String::new(),
            strip_prefixes: vec![],
            excluded_columns: ["date", "search", "month", "value"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            empty_table_policy: EmptyTablePolicy::Skip,
            connect_retries: 3,
            connect_backoff: Duration::from_secs(3),
        }
    }
}

impl PipelineConfig {
    /// Strip the configured schema qualifier from a full table name,
    /// e.g. `app.app_orders` -> `app_orders`
    pub fn short_table_name<'a>(&self, full_table_name: &'a str) -> &'a str {
        if !self.schema_prefix.is_empty() {
            if let Some(rest) = full_table_name.strip_prefix(self.schema_prefix.as_str()) {
                return rest;
            }
        }
        full_table_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions() {
        let config = PipelineConfig::default();
        assert_eq!(config.excluded_columns, vec!["date", "search", "month", "value"]);
        assert_eq!(config.connect_retries, 3);
    }

    #[test]
    fn test_short_table_name() {
        let config = PipelineConfig {
            schema_prefix: String::from("app."),
            ..PipelineConfig::default()
        };
        assert_eq!(config.short_table_name("app.app_orders"), "app_orders");
        assert_eq!(config.short_table_name("other.app_orders"), "other.app_orders");
    }
}
