//! Aggregation engine behaviour across mixed column kinds.

mod common;

use common::mixed_table;
use frame::{AggOutcome, Column, FrameError, Reduction, Scalar, Table};

#[test]
fn test_uncombinable_column_is_silently_absent() {
    let table = Table::new([
        ("a", Column::Int(vec![1, 2, 3])),
        ("b", Column::generic([None, Some("x"), None])),
    ])
    .unwrap();
    let result = table.sum().unwrap();
    assert_eq!(result.columns(), ["a"]);
    assert_eq!(result.shape(), (1, 1));
}

#[test]
fn test_outcomes_report_reasons() {
    let outcomes = mixed_table()
        .aggregate_outcomes(|c| Reduction::Mean.apply(c))
        .unwrap();
    let skipped: Vec<&str> = outcomes
        .iter()
        .filter(|(_, o)| matches!(o, AggOutcome::Skipped { .. }))
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(skipped, ["a", "b"]);
    assert_eq!(outcomes[4].1, AggOutcome::Reduced(Scalar::Float(2.0)));
}

#[test]
fn test_each_named_reduction_returns_one_row() {
    let table = mixed_table();
    let results = [
        table.min(),
        table.max(),
        table.mean(),
        table.median(),
        table.sum(),
        table.var(),
        table.std(),
        table.all(),
        table.any(),
        table.argmax(),
        table.argmin(),
    ];
    for result in results {
        let result = result.unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.columns().iter().any(|c| c == "e"));
    }
}

#[test]
fn test_bool_reductions() {
    let table = mixed_table();
    assert_eq!(table.sum().unwrap().column("d").unwrap(), &Column::Int(vec![2]));
    assert_eq!(table.min().unwrap().column("d").unwrap(), &Column::Bool(vec![false]));
    assert_eq!(table.argmin().unwrap().column("d").unwrap(), &Column::Int(vec![1]));
}

#[test]
fn test_custom_reducer() {
    let table = mixed_table();
    let lengths = table
        .aggregate(|c| Ok(Scalar::Int(c.len() as i64 * 10)))
        .unwrap();
    assert_eq!(lengths.column("b").unwrap(), &Column::Int(vec![30]));

    let only_ints = table
        .aggregate(|c| match c {
            Column::Int(v) => Ok(Scalar::Int(v.iter().sum())),
            other => Err(FrameError::IncompatibleType(other.dtype().name().to_string())),
        })
        .unwrap();
    assert_eq!(only_ints.columns(), ["e"]);
}

#[test]
fn test_value_counts_per_column() {
    let table = Table::new([
        ("k", Column::from_strs(&["x", "y", "x"])),
        ("n", Column::Int(vec![1, 1, 1])),
    ])
    .unwrap();
    let counts = table.value_counts(false).unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].columns(), ["k", "count"]);
    assert_eq!(counts[1].column("count").unwrap(), &Column::Int(vec![3]));
}
