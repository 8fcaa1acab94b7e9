//! Generic JSON key-path discovery
//!
//! Walks sampled text values and collects every dotted key-path reachable by
//! object-key traversal. Array elements merge their keys under the parent's
//! path, so sibling elements of a heterogeneous array contribute to one
//! combined key set.

use serde_json::Value;
use std::collections::BTreeSet;

/// Extracts dotted key-paths from raw stored text values
pub struct KeyExtractor;

impl KeyExtractor {
    /// Extract all key-paths from one stored text value
    ///
    /// Values that don't look like JSON (after trimming, not starting with
    /// `{` or `[`) contribute nothing; other rows sampled from the same
    /// column may still contribute. Malformed JSON past that guard is logged
    /// and skipped.
    pub fn extract_keys(raw_text: &str) -> BTreeSet<String> {
        let trimmed = raw_text.trim();
        if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
            return BTreeSet::new();
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => {
                let mut keys = BTreeSet::new();
                Self::walk(&value, "", &mut keys);
                keys
            }
            Err(err) => {
                log::warn!("skipping malformed JSON row: {}", err);
                BTreeSet::new()
            }
        }
    }

    /// Recursively collect key-paths from a parsed value
    ///
    /// Object keys extend the prefix; arrays recurse into each element under
    /// the same prefix; scalars terminate.
    fn walk(value: &Value, prefix: &str, keys: &mut BTreeSet<String>) {
        match value {
            Value::Object(obj) => {
                for (key, child) in obj.iter() {
                    let full_key = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    keys.insert(full_key.clone());
                    Self::walk(child, &full_key, keys);
                }
            }
            Value::Array(arr) => {
                for item in arr {
                    Self::walk(item, prefix, keys);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &str) -> Vec<String> {
        KeyExtractor::extract_keys(raw).into_iter().collect()
    }

    #[test]
    fn test_flat_object() {
        assert_eq!(keys(r#"{"status":"ok","amount":5}"#), vec!["amount", "status"]);
    }

    #[test]
    fn test_nested_object_paths() {
        assert_eq!(
            keys(r#"{"status":"ok","meta":{"region":"eu"}}"#),
            vec!["meta", "meta.region", "status"]
        );
    }

    #[test]
    fn test_array_elements_merge_under_parent_path() {
        assert_eq!(keys(r#"{"a":[{"b":1},{"c":2}]}"#), vec!["a", "a.b", "a.c"]);
    }

    #[test]
    fn test_top_level_array() {
        assert_eq!(keys(r#"[{"x":1},{"y":{"z":2}}]"#), vec!["x", "y", "y.z"]);
    }

    #[test]
    fn test_non_json_text_is_empty() {
        assert!(keys("not json").is_empty());
        assert!(keys("").is_empty());
        assert!(keys("   ").is_empty());
    }

    #[test]
    fn test_malformed_json_is_empty_not_panic() {
        assert!(keys(r#"{"unterminated": "#).is_empty());
        assert!(keys("[1, 2,").is_empty());
    }

    #[test]
    fn test_leading_whitespace_tolerated() {
        assert_eq!(keys("  \n {\"a\":1}"), vec!["a"]);
    }

    #[test]
    fn test_scalars_terminate() {
        assert_eq!(keys(r#"{"a":{"b":[1,"x",null,true]}}"#), vec!["a", "a.b"]);
    }
}
