//! Dynamic-form identifier discovery
//!
//! Targets the list-of-`{key, id, value}` serialization used for dynamic form
//! submissions. Kept separate from the generic key walk so per-submission
//! field ids don't pollute the generic key inventory.

use serde_json::Value;
use std::collections::BTreeSet;

/// Extracts form-field identifiers from raw stored text values
pub struct NestedFormExtractor;

impl NestedFormExtractor {
    /// Extract `id` values from triple-shaped list elements
    ///
    /// A list element counts only when it is an object carrying all three of
    /// `key`, `id`, `value`; its children are not walked further. An `id`
    /// key on an object lacking the sibling keys is ignored.
    pub fn extract_ids(raw_text: &str) -> BTreeSet<String> {
        let trimmed = raw_text.trim();
        if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
            return BTreeSet::new();
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => {
                let mut ids = BTreeSet::new();
                Self::walk(&value, &mut ids);
                ids
            }
            Err(err) => {
                log::warn!("skipping malformed JSON row: {}", err);
                BTreeSet::new()
            }
        }
    }

    fn walk(value: &Value, ids: &mut BTreeSet<String>) {
        match value {
            Value::Object(obj) => {
                for child in obj.values() {
                    if matches!(child, Value::Object(_) | Value::Array(_)) {
                        Self::walk(child, ids);
                    }
                }
            }
            Value::Array(arr) => {
                for item in arr {
                    if let Some(id) = Self::triple_id(item) {
                        ids.insert(id);
                    } else if matches!(item, Value::Object(_) | Value::Array(_)) {
                        Self::walk(item, ids);
                    }
                }
            }
            _ => {}
        }
    }

    /// The `id` of a `{key, id, value}` element, stringified for numbers
    fn triple_id(item: &Value) -> Option<String> {
        let obj = item.as_object()?;
        if !(obj.contains_key("key") && obj.contains_key("id") && obj.contains_key("value")) {
            return None;
        }
        match &obj["id"] {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &str) -> Vec<String> {
        NestedFormExtractor::extract_ids(raw).into_iter().collect()
    }

    #[test]
    fn test_triple_elements_yield_ids() {
        let raw = r#"[{"key":"Cost Center","id":"cost_center","value":"R&D"},
                      {"key":"Grade","id":"grade","value":"L4"}]"#;
        assert_eq!(ids(raw), vec!["cost_center", "grade"]);
    }

    #[test]
    fn test_id_without_siblings_is_ignored() {
        let raw = r#"[{"id":"orphan","value":"x"},{"id":"alone"}]"#;
        assert!(ids(raw).is_empty());
    }

    #[test]
    fn test_matched_elements_are_not_descended() {
        // The nested triple inside "value" must not be walked
        let raw = r#"[{"key":"outer","id":"outer","value":[{"key":"inner","id":"inner","value":1}]}]"#;
        assert_eq!(ids(raw), vec!["outer"]);
    }

    #[test]
    fn test_triples_found_under_nested_objects() {
        let raw = r#"{"form":{"fields":[{"key":"k","id":"dept","value":"sales"}]}}"#;
        assert_eq!(ids(raw), vec!["dept"]);
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let raw = r#"[{"key":"k","id":42,"value":"v"}]"#;
        assert_eq!(ids(raw), vec!["42"]);
    }

    #[test]
    fn test_non_json_is_empty() {
        assert!(ids("plain text").is_empty());
        assert!(ids("").is_empty());
    }

    #[test]
    fn test_triple_at_object_position_is_ignored() {
        // The triple shape only matches list elements, not a bare object
        let raw = r#"{"key":"k","id":"top","value":"v"}"#;
        assert!(ids(raw).is_empty());
    }
}
