//! FILENAME: core/frame/src/table.rs
//! PURPOSE: The column store: an ordered, named collection of equal-length buffers.
//! CONTEXT: Names and buffers are kept in parallel vectors so column order is
//! explicit. Every constructor and mutator re-establishes the invariants
//! (unique non-empty names, equal lengths, no fixed-width text) and debug builds
//! re-check them after each mutation.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::column::{Column, DType};
use crate::error::{FrameError, Result};
use crate::value::{Scalar, Value};

/// An ordered mapping from unique column name to column buffer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}

/// One column name or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnNames {
    One(String),
    Many(Vec<String>),
}

impl ColumnNames {
    fn into_vec(self) -> Vec<String> {
        match self {
            ColumnNames::One(name) => vec![name],
            ColumnNames::Many(names) => names,
        }
    }
}

impl From<&str> for ColumnNames {
    fn from(name: &str) -> Self {
        ColumnNames::One(name.to_string())
    }
}

impl From<String> for ColumnNames {
    fn from(name: String) -> Self {
        ColumnNames::One(name)
    }
}

impl From<Vec<&str>> for ColumnNames {
    fn from(names: Vec<&str>) -> Self {
        ColumnNames::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for ColumnNames {
    fn from(names: Vec<String>) -> Self {
        ColumnNames::Many(names)
    }
}

impl From<&[&str]> for ColumnNames {
    fn from(names: &[&str]) -> Self {
        ColumnNames::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

impl Table {
    /// Builds a table from `(name, buffer)` pairs, in order.
    ///
    /// Fails with `InvalidInputType` for an empty name, `DuplicateName` for a
    /// repeated name and `ShapeMismatch` if the buffers differ in length.
    /// Fixed-width text buffers are normalized to the generic element type.
    pub fn new<I, S, C>(data: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, C)>,
        S: Into<String>,
        C: Into<Column>,
    {
        let mut names = Vec::new();
        let mut columns = Vec::new();
        for (name, column) in data {
            names.push(name.into());
            columns.push(column.into().normalized());
        }

        check_names(&names)?;
        check_lengths(&names, &columns)?;

        Ok(Table { names, columns })
    }

    /// A table with no columns (and therefore no rows).
    pub fn empty() -> Self {
        Table::default()
    }

    /// Assembles a table from already-validated parts.
    pub(crate) fn from_parts(names: Vec<String>, columns: Vec<Column>) -> Self {
        let table = Table { names, columns };
        debug_assert!(table.check_invariants().is_ok(), "table invariants violated");
        table
    }

    // ========================================================================
    // SHAPE & METADATA
    // ========================================================================

    /// Number of rows. A table without columns has zero rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.len(), self.num_columns())
    }

    pub fn columns(&self) -> &[String] {
        &self.names
    }

    /// Column names offered for interactive completion.
    pub fn column_names_for_completion(&self) -> Vec<String> {
        self.names.clone()
    }

    /// Positional rename: the i-th name replaces the i-th column's name.
    pub fn set_columns<S: Into<String>>(&mut self, names: Vec<S>) -> Result<()> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != self.names.len() {
            return Err(FrameError::ShapeMismatch(format!(
                "expected {} column names, got {}",
                self.names.len(),
                names.len()
            )));
        }
        check_names(&names)?;
        self.names = names;
        debug_assert!(self.check_invariants().is_ok(), "table invariants violated");
        Ok(())
    }

    pub fn position(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| FrameError::ColumnNotFound(name.to_string()))
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.column(name).ok()
    }

    /// Iterates `(name, buffer)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Two-column table of column names and their element kinds.
    pub fn dtypes(&self) -> Result<Table> {
        let names: Vec<Value> = self.names.iter().map(|n| Value::text(n.as_str())).collect();
        let kinds: Vec<Value> = self
            .columns
            .iter()
            .map(|c| Value::text(c.dtype().name()))
            .collect();
        Table::new([("Column Name", Column::Generic(names)), ("Data Type", Column::Generic(kinds))])
    }

    /// All buffers stacked side by side, row-major.
    pub fn values(&self) -> Vec<Vec<Scalar>> {
        (0..self.len())
            .map(|row| {
                self.columns
                    .iter()
                    .filter_map(|c| c.scalar_at(row))
                    .collect()
            })
            .collect()
    }

    // ========================================================================
    // RENAME & DROP
    // ========================================================================

    /// New table with names found in `mapping` replaced. Order is preserved.
    pub fn rename<I, K, V>(&self, mapping: I) -> Result<Table>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mapping: FxHashMap<String, String> = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let names: Vec<String> = self
            .names
            .iter()
            .map(|n| mapping.get(n).cloned().unwrap_or_else(|| n.clone()))
            .collect();
        check_names(&names)?;
        Ok(Table::from_parts(names, self.columns.clone()))
    }

    /// New table without the named column(s). Unknown names are ignored.
    pub fn drop(&self, names: impl Into<ColumnNames>) -> Result<Table> {
        let dropped: FxHashSet<String> = names.into().into_vec().into_iter().collect();
        let (names, columns) = self
            .names
            .iter()
            .zip(&self.columns)
            .filter(|(name, _)| !dropped.contains(*name))
            .map(|(name, column)| (name.clone(), column.clone()))
            .unzip();
        Ok(Table::from_parts(names, columns))
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Overwrites `name` in place or appends it. The caller has validated the
    /// buffer length.
    pub(crate) fn put_column(&mut self, name: String, column: Column) {
        let column = column.normalized();
        match self.names.iter().position(|n| *n == name) {
            Some(i) => self.columns[i] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
        debug_assert!(self.check_invariants().is_ok(), "table invariants violated");
    }

    /// Verifies unique non-empty names, equal lengths and no fixed-width text.
    pub fn check_invariants(&self) -> Result<()> {
        if self.names.len() != self.columns.len() {
            return Err(FrameError::ShapeMismatch(
                "name and buffer counts differ".to_string(),
            ));
        }
        check_names(&self.names)?;
        check_lengths(&self.names, &self.columns)?;
        if let Some(i) = self.columns.iter().position(|c| c.dtype() == DType::Str) {
            return Err(FrameError::InvalidInputType(format!(
                "column '{}' holds fixed-width text",
                self.names[i]
            )));
        }
        Ok(())
    }
}

/// Makes generated column names unique. The first occurrence of a name keeps
/// it; each later repeat becomes `name_1`, `name_2`, ... taking the smallest
/// suffix that clashes with no other name in the list.
pub fn unique_names(names: Vec<String>) -> Vec<String> {
    let original: FxHashSet<String> = names.iter().cloned().collect();
    let mut used: FxHashSet<String> = FxHashSet::default();
    names
        .into_iter()
        .map(|name| {
            if used.insert(name.clone()) {
                return name;
            }
            let mut suffix = 1;
            loop {
                let candidate = format!("{}_{}", name, suffix);
                if !original.contains(&candidate) && used.insert(candidate.clone()) {
                    return candidate;
                }
                suffix += 1;
            }
        })
        .collect()
}

fn check_names(names: &[String]) -> Result<()> {
    let mut seen = FxHashSet::default();
    for name in names {
        if name.is_empty() {
            return Err(FrameError::InvalidInputType(
                "column names must be non-empty strings".to_string(),
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(FrameError::DuplicateName(name.clone()));
        }
    }
    Ok(())
}

fn check_lengths(names: &[String], columns: &[Column]) -> Result<()> {
    let Some(first) = columns.first() else {
        return Ok(());
    };
    let expected = first.len();
    for (name, column) in names.iter().zip(columns) {
        if column.len() != expected {
            return Err(FrameError::ShapeMismatch(format!(
                "column '{}' has length {}, expected {}",
                name,
                column.len(),
                expected
            )));
        }
    }
    Ok(())
}
