//! FILENAME: core/pivot-engine/src/cache.rs
//! Pivot Groups - Source rows collected by key.
//!
//! A single scan over the key columns builds `group key -> row positions` and
//! remembers where each distinct row key and column key first appears, so the
//! engine can rebuild typed key columns with `Column::take`.

use frame::{Column, KeyValue};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ============================================================================
// GROUP KEY
// ============================================================================

/// The key of one pivot group: the row key, the column key, or both in that
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub values: SmallVec<[KeyValue; 2]>,
}

impl GroupKey {
    pub fn new(row: Option<KeyValue>, column: Option<KeyValue>) -> Self {
        GroupKey {
            values: row.into_iter().chain(column).collect(),
        }
    }
}

// ============================================================================
// PIVOT GROUPS
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct PivotGroups {
    groups: FxHashMap<GroupKey, Vec<usize>>,
    /// Distinct row keys and their first source position.
    row_keys: FxHashMap<KeyValue, usize>,
    /// Distinct column keys and their first source position.
    column_keys: FxHashMap<KeyValue, usize>,
    record_count: usize,
}

impl PivotGroups {
    /// Groups source rows by the given key columns. Both columns come from the
    /// same table and so have the same length.
    pub fn build(rows: Option<&Column>, columns: Option<&Column>) -> Self {
        let record_count = rows.or(columns).map_or(0, Column::len);
        let mut groups = PivotGroups {
            record_count,
            ..PivotGroups::default()
        };

        for i in 0..record_count {
            let row = rows.map(|c| c.key_at(i));
            let column = columns.map(|c| c.key_at(i));
            if let Some(key) = &row {
                groups.row_keys.entry(key.clone()).or_insert(i);
            }
            if let Some(key) = &column {
                groups.column_keys.entry(key.clone()).or_insert(i);
            }
            groups
                .groups
                .entry(GroupKey::new(row, column))
                .or_default()
                .push(i);
        }
        groups
    }

    /// Distinct row keys in ascending order, each with its first position.
    pub fn row_keys(&self) -> Vec<(KeyValue, usize)> {
        sorted(&self.row_keys)
    }

    /// Distinct column keys in ascending order, each with its first position.
    pub fn column_keys(&self) -> Vec<(KeyValue, usize)> {
        sorted(&self.column_keys)
    }

    /// Source positions of a group, in source order.
    pub fn positions(&self, key: &GroupKey) -> Option<&[usize]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }
}

fn sorted(keys: &FxHashMap<KeyValue, usize>) -> Vec<(KeyValue, usize)> {
    let mut keys: Vec<(KeyValue, usize)> = keys.iter().map(|(k, &i)| (k.clone(), i)).collect();
    keys.sort_by(|a, b| a.0.cmp(&b.0));
    keys
}
