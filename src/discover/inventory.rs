//! Discovered-key inventories
//!
//! BTree-backed so every artifact and every generated SELECT list is emitted
//! in a deterministic order. Both inventories serialize to the same JSON
//! shapes a previous run wrote, so a synthesis-only run can consume a stored
//! inventory instead of re-sampling.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Key-paths discovered per (table, json column)
///
/// Serialized shape: `{ "schema.table": { "column": ["key", ...] } }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyInventory {
    tables: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl KeyInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union a column's discovered keys into the inventory; empty sets are
    /// not recorded
    pub fn record(&mut self, full_table_name: &str, column: &str, keys: BTreeSet<String>) {
        if keys.is_empty() {
            return;
        }
        self.tables
            .entry(full_table_name.to_string())
            .or_default()
            .entry(column.to_string())
            .or_default()
            .extend(keys);
    }

    /// Columns and keys for one table, if any were discovered
    pub fn columns_for(&self, full_table_name: &str) -> Option<&BTreeMap<String, BTreeSet<String>>> {
        self.tables.get(full_table_name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &String> {
        self.tables.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

/// Form-field identifiers discovered per table
///
/// Serialized shape mirrors the discovery artifact:
/// `{ "schema.table": { "forms": { "column": c, "nested_keys": [...] } } }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestedFormInventory {
    tables: BTreeMap<String, TableForms>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableForms {
    pub forms: FormsEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormsEntry {
    /// Canonical source column the form expressions extract from:
    /// the lexicographically first column that yielded any id
    pub column: String,
    pub nested_keys: BTreeSet<String>,
}

impl NestedFormInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge ids found in one column into the table's entry; empty sets are
    /// not recorded. The canonical column is the smallest column name seen.
    pub fn record(&mut self, full_table_name: &str, column: &str, ids: BTreeSet<String>) {
        if ids.is_empty() {
            return;
        }
        match self.tables.get_mut(full_table_name) {
            Some(entry) => {
                if column < entry.forms.column.as_str() {
                    entry.forms.column = column.to_string();
                }
                entry.forms.nested_keys.extend(ids);
            }
            None => {
                self.tables.insert(
                    full_table_name.to_string(),
                    TableForms {
                        forms: FormsEntry {
                            column: column.to_string(),
                            nested_keys: ids,
                        },
                    },
                );
            }
        }
    }

    pub fn forms_for(&self, full_table_name: &str) -> Option<&FormsEntry> {
        self.tables.get(full_table_name).map(|t| &t.forms)
    }

    pub fn tables(&self) -> impl Iterator<Item = &String> {
        self.tables.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_record_unions_across_rows() {
        let mut inv = KeyInventory::new();
        inv.record("app.orders", "payload", set(&["status", "meta"]));
        inv.record("app.orders", "payload", set(&["meta", "meta.region"]));

        let columns = inv.columns_for("app.orders").unwrap();
        assert_eq!(
            columns["payload"],
            set(&["meta", "meta.region", "status"])
        );
    }

    #[test]
    fn test_empty_sets_not_recorded() {
        let mut inv = KeyInventory::new();
        inv.record("app.orders", "payload", BTreeSet::new());
        assert!(inv.is_empty());
    }

    #[test]
    fn test_key_inventory_artifact_shape() {
        let mut inv = KeyInventory::new();
        inv.record("app.orders", "payload", set(&["status"]));

        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"app.orders": {"payload": ["status"]}})
        );

        let back: KeyInventory = serde_json::from_value(json).unwrap();
        assert_eq!(back, inv);
    }

    #[test]
    fn test_forms_canonical_column_is_smallest() {
        let mut inv = NestedFormInventory::new();
        inv.record("app.trips", "meta", set(&["grade"]));
        inv.record("app.trips", "attrs", set(&["cost_center"]));

        let forms = inv.forms_for("app.trips").unwrap();
        assert_eq!(forms.column, "attrs");
        assert_eq!(forms.nested_keys, set(&["cost_center", "grade"]));
    }

    #[test]
    fn test_forms_artifact_round_trip() {
        let mut inv = NestedFormInventory::new();
        inv.record("app.trips", "attrs", set(&["cost_center"]));

        let json = serde_json::to_string(&inv).unwrap();
        let back: NestedFormInventory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inv);
    }
}
