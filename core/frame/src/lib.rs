//! FILENAME: core/frame/src/lib.rs
//! PURPOSE: Main library entry point for the columnar table engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.
//!
//! Layers:
//! - `table`: the column store and its invariants
//! - `selector`: resolves selection keys into rows + column names
//! - `selection`: materializes selections, column assignment
//! - `aggregate`: per-column reductions and distinct-value scans
//! - `text`, `reader`, `display`: thin collaborators at the edges

pub mod aggregate;
pub mod column;
pub mod display;
pub mod error;
pub mod reader;
pub mod selection;
pub mod selector;
pub mod table;
pub mod text;
pub mod value;

// Re-export commonly used types at the crate root
pub use aggregate::{AggOutcome, Reduction};
pub use column::{Column, DType};
pub use error::{FrameError, Result};
pub use reader::{read_csv, read_delimited, ReadOptions};
pub use selection::{materialize, AssignValue};
pub use selector::{resolve, Bound, Key, KeyItem, ResolvedSelection, RowSelection, Slice};
pub use table::{unique_names, ColumnNames, Table};
pub use text::TextAccessor;
pub use value::{KeyValue, OrderedFloat, Scalar, Value};

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new([
            ("a", Column::from_strs(&["a", "b", "c"])),
            ("b", Column::generic([Some("c"), Some("d"), None])),
            ("c", Column::Float(vec![0.25, 0.5, 0.75])),
            ("d", Column::Bool(vec![true, false, true])),
            ("e", Column::Int(vec![1, 2, 3])),
        ])
        .unwrap()
    }

    #[test]
    fn integration_test_filter_then_aggregate() {
        let table = sample();
        let mask = table.select("d").unwrap();
        let filtered = table.select(mask).unwrap();
        assert_eq!(filtered.len(), 2);

        let sums = filtered.sum().unwrap();
        // "b" holds a null in the surviving rows, so it cannot be summed
        assert_eq!(sums.columns(), ["a", "c", "d", "e"]);
        assert_eq!(sums.column("e").unwrap(), &Column::Int(vec![4]));
    }

    #[test]
    fn integration_test_assign_then_select_by_label_slice() {
        let mut table = sample();
        table.assign("f", 1.5).unwrap();
        let result = table
            .select((Slice::until(2), Slice::labels(Some("d"), None)))
            .unwrap();
        assert_eq!(result.columns(), ["d", "e", "f"]);
        assert_eq!(result.column("f").unwrap(), &Column::Float(vec![1.5, 1.5]));
    }

    #[test]
    fn integration_test_completion_names() {
        assert_eq!(sample().column_names_for_completion(), ["a", "b", "c", "d", "e"]);
    }
}
