//! Shared fixtures for the frame integration tests.

use frame::{Column, Table};

/// The five-column table used across the selection tests:
/// text, text-with-null, float, bool and int columns of three rows.
pub fn mixed_table() -> Table {
    Table::new([
        ("a", Column::from_strs(&["a", "b", "c"])),
        ("b", Column::generic([Some("c"), Some("d"), None])),
        ("c", Column::Float(vec![0.1, 0.2, 0.3])),
        ("d", Column::Bool(vec![true, false, true])),
        ("e", Column::Int(vec![1, 2, 3])),
    ])
    .expect("fixture table is valid")
}

/// Four int columns named a..d.
#[allow(dead_code)]
pub fn abcd_table() -> Table {
    Table::new([
        ("a", Column::Int(vec![1, 2, 3])),
        ("b", Column::Int(vec![4, 5, 6])),
        ("c", Column::Int(vec![7, 8, 9])),
        ("d", Column::Int(vec![10, 11, 12])),
    ])
    .expect("fixture table is valid")
}
