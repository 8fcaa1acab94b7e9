//! Deterministic column alias generation
//!
//! Maps a raw column or discovered key to an unquoted SQL identifier of the
//! shape `local[_jsoncolumn]_tablesuffix`. Pure function of its inputs; it
//! does not guarantee uniqueness across a view's columns (see the collision
//! warning in the synthesizer).

use crate::config::PipelineConfig;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

static LEADING_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+").unwrap());

pub struct AliasPolicy {
    config: PipelineConfig,
}

impl AliasPolicy {
    pub fn new(config: &PipelineConfig) -> Self {
        AliasPolicy {
            config: config.clone(),
        }
    }

    /// Table name with the schema qualifier and configured prefixes removed
    pub fn table_suffix(&self, full_table_name: &str) -> String {
        let mut name = self.config.short_table_name(full_table_name).to_string();
        for prefix in &self.config.strip_prefixes {
            name = name.replace(prefix.as_str(), "");
        }
        name
    }

    /// Build the alias for a raw column (`json_column` = None) or a
    /// discovered key within a JSON column
    ///
    /// The local part is trimmed and dot/dash-normalized; any remaining
    /// character outside `[A-Za-z0-9_]` becomes `_`; a leading run of digits
    /// is stripped entirely, never replaced.
    pub fn alias(&self, local: &str, json_column: Option<&str>, full_table_name: &str) -> String {
        let local = local.trim().replace('.', "_").replace('-', "_");
        let suffix = self.table_suffix(full_table_name);

        let raw = match json_column {
            Some(column) => format!("{}_{}_{}", local, column, suffix),
            None => format!("{}_{}", local, suffix),
        };

        let cleaned = NON_WORD.replace_all(&raw, "_");
        LEADING_DIGITS.replace(&cleaned, "").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AliasPolicy {
        AliasPolicy::new(&PipelineConfig {
            schema_prefix: String::from("app."),
            strip_prefixes: vec![String::from("app_"), String::from("vc_")],
            ..PipelineConfig::default()
        })
    }

    #[test]
    fn test_raw_column_alias() {
        let p = policy();
        assert_eq!(p.alias("id", None, "app.orders"), "id_orders");
    }

    #[test]
    fn test_prefixes_stripped_from_suffix() {
        let p = policy();
        assert_eq!(p.table_suffix("app.app_mapped_services"), "mapped_services");
        assert_eq!(
            p.alias("entity", Some("tags"), "app.vc_trips"),
            "entity_tags_trips"
        );
    }

    #[test]
    fn test_dotted_key_normalized() {
        let p = policy();
        assert_eq!(
            p.alias("meta.region", Some("payload"), "app.orders"),
            "meta_region_payload_orders"
        );
    }

    #[test]
    fn test_special_characters_become_underscores() {
        let p = policy();
        assert_eq!(
            p.alias("rate (%)", Some("attrs"), "app.orders"),
            "rate_____attrs_orders"
        );
        assert_eq!(
            p.alias("a@b/c*d", Some("attrs"), "app.orders"),
            "a_b_c_d_attrs_orders"
        );
    }

    #[test]
    fn test_leading_digits_stripped_not_replaced() {
        let p = policy();
        let alias = p.alias("2fa_code", Some("payload"), "app.orders");
        assert_eq!(alias, "fa_code_payload_orders");
        assert!(!alias.starts_with(|c: char| c.is_ascii_digit()));
    }

    #[test]
    fn test_alias_is_pure() {
        let p = policy();
        let a = p.alias("status", Some("payload"), "app.orders");
        let b = p.alias("status", Some("payload"), "app.orders");
        assert_eq!(a, b);
    }

    #[test]
    fn test_suffix_agrees_with_config_qualifier_strip() {
        let config = PipelineConfig {
            schema_prefix: String::from("app."),
            ..PipelineConfig::default()
        };
        let p = AliasPolicy::new(&config);
        assert_eq!(p.table_suffix("app.orders"), config.short_table_name("app.orders"));
        assert_eq!(p.table_suffix("other.orders"), config.short_table_name("other.orders"));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let p = policy();
        assert_eq!(p.alias(" status ", Some("payload"), "app.orders"), "status_payload_orders");
    }
}
