//! FILENAME: core/frame/src/selection.rs
//! PURPOSE: Selection engine. Materializes a resolved selection and performs
//! single-column assignment.
//! CONTEXT: `Table::select` is the entry point: the resolver normalizes the key,
//! then `materialize` applies the row selection to each resolved column buffer.

use log::trace;

use crate::column::Column;
use crate::error::{FrameError, Result};
use crate::selector::{normalize_position, resolve, slice_positions, Key, ResolvedSelection, RowSelection, Slice};
use crate::table::Table;
use crate::value::Scalar;

/// How a row selection is applied to each buffer.
enum RowPlan<'a> {
    Take(Vec<usize>),
    Filter(&'a [bool]),
}

impl RowSelection {
    fn plan(&self, row_count: usize) -> Result<RowPlan<'_>> {
        match self {
            RowSelection::Positions(positions) => positions
                .iter()
                .map(|&p| normalize_position(p, row_count))
                .collect::<Result<Vec<_>>>()
                .map(RowPlan::Take),
            RowSelection::Slice { start, stop, step } => {
                slice_positions(*start, *stop, *step, row_count).map(RowPlan::Take)
            }
            RowSelection::Mask(mask) => {
                if mask.len() != row_count {
                    return Err(FrameError::ShapeMismatch(format!(
                        "boolean selector has {} rows, table has {}",
                        mask.len(),
                        row_count
                    )));
                }
                Ok(RowPlan::Filter(mask))
            }
        }
    }
}

/// Applies `selection` to `table`, producing a new table in resolved column
/// order. A name resolved more than once keeps its first position.
pub fn materialize(table: &Table, selection: &ResolvedSelection) -> Result<Table> {
    let plan = selection.rows.plan(table.len())?;

    let mut names: Vec<String> = Vec::with_capacity(selection.columns.len());
    let mut columns = Vec::with_capacity(selection.columns.len());
    for name in &selection.columns {
        if names.contains(name) {
            continue;
        }
        let column = table.column(name)?;
        let selected = match &plan {
            RowPlan::Take(positions) => column.take(positions),
            RowPlan::Filter(mask) => column.filter(mask),
        };
        names.push(name.clone());
        columns.push(selected);
    }

    Ok(Table::from_parts(names, columns))
}

/// Right-hand side of a column assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignValue {
    Column(Column),
    /// Must have exactly one column.
    Table(Table),
    /// Broadcast to the row count.
    Scalar(Scalar),
}

impl Table {
    /// Selects rows and/or columns.
    ///
    /// - `"name"`: one column
    /// - `vec!["a", "b"]`: those columns, in the given order
    /// - a one-column boolean `Table`: row mask over every column
    /// - `(rows, cols)`: simultaneous row and column selection, where rows are
    ///   an int, a list of ints, a slice or a boolean table, and cols are an
    ///   int, a name, a list of ints/names or a slice (label bounds inclusive)
    pub fn select(&self, key: impl Into<Key>) -> Result<Table> {
        let selection = resolve(self, key.into())?;
        materialize(self, &selection)
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Result<Table> {
        let n = n.min(self.len()) as isize;
        self.select((Slice::range(0, n), Slice::full()))
    }

    /// Last `n` rows.
    pub fn tail(&self, n: usize) -> Result<Table> {
        let n = n.min(self.len()) as isize;
        self.select((Slice::starting_at(-n), Slice::full()))
    }

    /// Adds a column or overwrites an existing one in place.
    ///
    /// The key must be a single name. Existing columns keep their position,
    /// new columns are appended. Nothing changes if validation fails.
    pub fn assign(&mut self, key: impl Into<Key>, value: impl Into<AssignValue>) -> Result<()> {
        let name = match key.into() {
            Key::Label(name) => name,
            other => {
                return Err(FrameError::UnsupportedOperation(format!(
                    "can only set a single column by name, got {:?}",
                    other
                )))
            }
        };
        if name.is_empty() {
            return Err(FrameError::InvalidInputType(
                "column names must be non-empty strings".to_string(),
            ));
        }

        let row_count = self.len();
        let column = match value.into() {
            AssignValue::Column(column) => column,
            AssignValue::Table(table) => {
                if table.num_columns() != 1 {
                    return Err(FrameError::ShapeMismatch(format!(
                        "assigned table must have exactly one column, got {}",
                        table.num_columns()
                    )));
                }
                table.iter().map(|(_, c)| c.clone()).next().ok_or_else(|| {
                    FrameError::ShapeMismatch("assigned table has no columns".to_string())
                })?
            }
            AssignValue::Scalar(value) => Column::repeat(&value, row_count)?,
        };

        // The first column of an empty table defines the row count.
        if self.num_columns() > 0 && column.len() != row_count {
            return Err(FrameError::ShapeMismatch(format!(
                "assigned buffer has length {}, table has {} rows",
                column.len(),
                row_count
            )));
        }

        trace!("assigning column '{}' ({} rows)", name, column.len());
        self.put_column(name, column);
        Ok(())
    }
}

impl From<Column> for AssignValue {
    fn from(column: Column) -> Self {
        AssignValue::Column(column)
    }
}

impl From<Table> for AssignValue {
    fn from(table: Table) -> Self {
        AssignValue::Table(table)
    }
}

impl From<Scalar> for AssignValue {
    fn from(value: Scalar) -> Self {
        AssignValue::Scalar(value)
    }
}

impl From<i64> for AssignValue {
    fn from(v: i64) -> Self {
        AssignValue::Scalar(Scalar::Int(v))
    }
}

impl From<f64> for AssignValue {
    fn from(v: f64) -> Self {
        AssignValue::Scalar(Scalar::Float(v))
    }
}

impl From<bool> for AssignValue {
    fn from(v: bool) -> Self {
        AssignValue::Scalar(Scalar::Bool(v))
    }
}

impl From<&str> for AssignValue {
    fn from(s: &str) -> Self {
        AssignValue::Scalar(Scalar::Text(s.to_string()))
    }
}

impl From<String> for AssignValue {
    fn from(s: String) -> Self {
        AssignValue::Scalar(Scalar::Text(s))
    }
}
