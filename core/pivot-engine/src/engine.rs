//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - Turns a definition and a source table into a pivoted table.
//!
//! Algorithm:
//! 1. Validate the definition and look up the key and value columns
//! 2. Group source rows by key in a single scan (see `cache`)
//! 3. Aggregate the value column for every group
//! 4. Reshape into the requested layout with sorted, deduplicated keys
//!
//! Output column names are made unique with `frame::unique_names`: the row key
//! column keeps its name and a later clashing name (an aggregate name, a
//! column-key label, or two keys with the same label such as null and the
//! text "None") takes the next free `_1`, `_2`, ... suffix.

use frame::{unique_names, Column, FrameError, KeyValue, Result, Scalar, Table, Value};
use log::debug;

use crate::cache::{GroupKey, PivotGroups};
use crate::definition::{AggregationType, PivotDefinition, PivotLayout};

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Calculates a pivot of `source` as described by `definition`.
pub fn calculate_pivot(source: &Table, definition: &PivotDefinition) -> Result<Table> {
    let (layout, aggregation) = definition.plan()?;

    let rows = lookup(source, definition.rows.as_deref())?;
    let columns = lookup(source, definition.columns.as_deref())?;
    let values = lookup(source, definition.values.as_deref())?;

    let groups = PivotGroups::build(rows, columns);
    debug!(
        "pivot {:?}/{}: {} records in {} groups",
        layout,
        aggregation,
        groups.record_count(),
        groups.group_count()
    );

    let calculator = PivotCalculator {
        groups: &groups,
        values,
        aggregation,
    };

    match (layout, definition.rows.as_deref(), rows) {
        (PivotLayout::ColumnsOnly, _, _) => calculator.columns_only(),
        (PivotLayout::RowsOnly, Some(name), Some(rows)) => calculator.rows_only(name, rows),
        (PivotLayout::Both, Some(name), Some(rows)) => calculator.both(name, rows),
        _ => Err(FrameError::MissingArgument("pivot rows column".to_string())),
    }
}

/// Pivot entry point on the table itself, taking the aggregation by name.
pub trait PivotExt {
    fn pivot(
        &self,
        rows: Option<&str>,
        columns: Option<&str>,
        values: Option<&str>,
        aggfunc: Option<&str>,
    ) -> Result<Table>;
}

impl PivotExt for Table {
    fn pivot(
        &self,
        rows: Option<&str>,
        columns: Option<&str>,
        values: Option<&str>,
        aggfunc: Option<&str>,
    ) -> Result<Table> {
        let aggregation = aggfunc
            .map(|name| name.parse::<AggregationType>())
            .transpose()?;
        let definition = PivotDefinition {
            rows: rows.map(str::to_string),
            columns: columns.map(str::to_string),
            values: values.map(str::to_string),
            aggregation,
        };
        calculate_pivot(self, &definition)
    }
}

fn lookup<'a>(source: &'a Table, name: Option<&str>) -> Result<Option<&'a Column>> {
    name.map(|n| source.column(n)).transpose()
}

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

struct PivotCalculator<'a> {
    groups: &'a PivotGroups,
    values: Option<&'a Column>,
    aggregation: AggregationType,
}

impl PivotCalculator<'_> {
    /// Aggregate of one group, or `None` when no source row has that key.
    fn cell(&self, key: &GroupKey) -> Result<Option<Scalar>> {
        let Some(positions) = self.groups.positions(key) else {
            return Ok(None);
        };
        let value = match self.values {
            None => Scalar::Int(positions.len() as i64),
            Some(column) => self.aggregation.reduction().apply(&column.take(positions))?,
        };
        Ok(Some(value))
    }

    fn columns_only(&self) -> Result<Table> {
        let mut labels = Vec::new();
        let mut columns = Vec::new();
        for (key, _) in self.groups.column_keys() {
            labels.push(key.label());
            let cell = self.cell(&GroupKey::new(None, Some(key)))?;
            columns.push(assemble_cells(vec![cell]));
        }
        Table::new(unique_names(labels).into_iter().zip(columns))
    }

    fn rows_only(&self, name: &str, rows: &Column) -> Result<Table> {
        let row_keys = self.groups.row_keys();
        let mut cells = Vec::with_capacity(row_keys.len());
        for (key, _) in &row_keys {
            cells.push(self.cell(&GroupKey::new(Some(key.clone()), None))?);
        }
        let names = unique_names(vec![name.to_string(), self.aggregation.name().to_string()]);
        Table::new(names.into_iter().zip([key_column(rows, &row_keys), assemble_cells(cells)]))
    }

    fn both(&self, name: &str, rows: &Column) -> Result<Table> {
        let row_keys = self.groups.row_keys();
        let mut labels = vec![name.to_string()];
        let mut columns = vec![key_column(rows, &row_keys)];
        for (col_key, _) in self.groups.column_keys() {
            let mut cells = Vec::with_capacity(row_keys.len());
            for (row_key, _) in &row_keys {
                let key = GroupKey::new(Some(row_key.clone()), Some(col_key.clone()));
                cells.push(self.cell(&key)?);
            }
            labels.push(col_key.label());
            columns.push(assemble_cells(cells));
        }
        Table::new(unique_names(labels).into_iter().zip(columns))
    }
}

/// Distinct keys as a buffer of the source column's own kind.
fn key_column(source: &Column, keys: &[(KeyValue, usize)]) -> Column {
    let firsts: Vec<usize> = keys.iter().map(|(_, first)| *first).collect();
    source.take(&firsts)
}

// ============================================================================
// CELL TYPING
// ============================================================================

/// Builds an output buffer from per-group aggregates, `None` marking a group
/// with no source rows.
///
/// Integers stay integers only when nothing is missing; any gap turns a
/// numeric buffer into floats with NaN in the gaps. Homogeneous booleans and
/// text keep their kind. Anything else falls back to generic text.
fn assemble_cells(cells: Vec<Option<Scalar>>) -> Column {
    let complete: Option<Vec<Scalar>> = cells
        .iter()
        .map(|c| c.clone().filter(|s| !s.is_null()))
        .collect();

    if let Some(values) = &complete {
        if let Some(ints) = values
            .iter()
            .map(|v| match v {
                Scalar::Int(i) => Some(*i),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
        {
            return Column::Int(ints);
        }
        if let Some(bools) = values
            .iter()
            .map(|v| match v {
                Scalar::Bool(b) => Some(*b),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
        {
            if !bools.is_empty() {
                return Column::Bool(bools);
            }
        }
    }

    let numeric = cells.iter().all(|c| match c {
        None | Some(Scalar::Null) => true,
        Some(s) => s.as_f64().is_some(),
    });
    if numeric {
        return Column::Float(
            cells
                .iter()
                .map(|c| c.as_ref().and_then(Scalar::as_f64).unwrap_or(f64::NAN))
                .collect(),
        );
    }

    Column::Generic(
        cells
            .into_iter()
            .map(|c| match c {
                None | Some(Scalar::Null) => Value::Null,
                Some(Scalar::Text(s)) => Value::Text(s),
                Some(other) => Value::Text(other.to_string()),
            })
            .collect(),
    )
}
