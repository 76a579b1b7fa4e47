//! Selection and assignment properties of the column store.

mod common;

use common::{abcd_table, mixed_table};
use frame::{Column, FrameError, Key, KeyItem, Scalar, Slice, Table};

#[test]
fn test_full_selection_is_identity() {
    let table = mixed_table();
    let result = table.select((Slice::full(), Slice::full())).unwrap();
    assert_eq!(result, table);
    assert_eq!(result.columns(), table.columns());
}

#[test]
fn test_single_column_reselection_is_idempotent() {
    let table = mixed_table();
    for name in table.columns() {
        let once = table.select(name.as_str()).unwrap();
        let twice = once.select(name.as_str()).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_multiple_columns_follow_requested_order() {
    let result = mixed_table().select(vec!["e", "a"]).unwrap();
    assert_eq!(result.columns(), ["e", "a"]);
    assert_eq!(result.column("a").unwrap(), &Column::generic(["a", "b", "c"]));
}

#[test]
fn test_all_true_and_all_false_masks() {
    let table = mixed_table();

    let all = Table::new([("m", Column::Bool(vec![true; 3]))]).unwrap();
    assert_eq!(table.select(all).unwrap(), table);

    let none = Table::new([("m", Column::Bool(vec![false; 3]))]).unwrap();
    let empty = table.select(none).unwrap();
    assert_eq!(empty.shape(), (0, 5));
    assert_eq!(empty.columns(), table.columns());
    let kinds: Vec<_> = empty.iter().map(|(_, c)| c.dtype()).collect();
    let expected: Vec<_> = table.iter().map(|(_, c)| c.dtype()).collect();
    assert_eq!(kinds, expected);
}

#[test]
fn test_simple_boolean_mask() {
    let table = mixed_table();
    let mask = Table::new([("col", Column::Bool(vec![true, false, false]))]).unwrap();
    let result = table.select(&mask).unwrap();
    assert_eq!(result.shape(), (1, 5));
    assert_eq!(result.column("c").unwrap(), &Column::Float(vec![0.1]));

    let wide = Table::new([
        ("col", Column::Bool(vec![true, false, false])),
        ("col2", Column::Bool(vec![true, false, false])),
    ])
    .unwrap();
    assert!(matches!(table.select(wide), Err(FrameError::ShapeMismatch(_))));
}

#[test]
fn test_mask_in_row_position() {
    let table = mixed_table();
    let mask = table.select("d").unwrap();
    let result = table.select((mask, "e")).unwrap();
    assert_eq!(result.column("e").unwrap(), &Column::Int(vec![1, 3]));
}

#[test]
fn test_label_slice_is_stop_inclusive_and_int_slice_is_not() {
    let table = abcd_table();
    let by_label = table
        .select((Slice::full(), Slice::labels(Some("a"), Some("c"))))
        .unwrap();
    assert_eq!(by_label.columns(), ["a", "b", "c"]);

    let by_position = table.select((Slice::full(), Slice::range(0, 2))).unwrap();
    assert_eq!(by_position.columns(), ["a", "b"]);
}

#[test]
fn test_column_slice_with_step_and_open_bounds() {
    let table = abcd_table();
    let stepped = table
        .select((Slice::full(), Slice::labels(Some("b"), None).with_step(2)))
        .unwrap();
    assert_eq!(stepped.columns(), ["b", "d"]);

    let reversed = table
        .select((Slice::full(), Slice::full().with_step(-1)))
        .unwrap();
    assert_eq!(reversed.columns(), ["d", "c", "b", "a"]);
}

#[test]
fn test_tuple_forms() {
    let table = mixed_table();
    assert_eq!(
        table.select((Slice::full(), "a")).unwrap(),
        Table::new([("a", Column::from_strs(&["a", "b", "c"]))]).unwrap()
    );
    assert_eq!(table.select((Slice::full(), 3isize)).unwrap().columns(), ["d"]);

    let mixed = table
        .select((vec![0isize, 2], vec![KeyItem::Position(4), KeyItem::from("a")]))
        .unwrap();
    assert_eq!(mixed.columns(), ["e", "a"]);
    assert_eq!(mixed.column("e").unwrap(), &Column::Int(vec![1, 3]));
}

#[test]
fn test_invalid_selectors() {
    let table = mixed_table();
    assert!(matches!(table.select(Key::Position(0)), Err(FrameError::InvalidSelectorType(_))));
    assert!(matches!(
        table.select(Key::Tuple(vec![Key::Position(1), Key::Position(2), Key::Position(3)])),
        Err(FrameError::InvalidSelectorValue(_))
    ));
    assert!(matches!(
        table.select((Slice::full(), Key::Tuple(vec![]))),
        Err(FrameError::InvalidSelectorType(_))
    ));
    assert!(matches!(table.select("missing"), Err(FrameError::ColumnNotFound(_))));
}

#[test]
fn test_head_and_tail() {
    let table = mixed_table();
    let head = table.head(2).unwrap();
    assert_eq!(head.column("e").unwrap(), &Column::Int(vec![1, 2]));
    let tail = table.tail(2).unwrap();
    assert_eq!(tail.column("e").unwrap(), &Column::Int(vec![2, 3]));
    assert_eq!(table.head(10).unwrap(), table);
    assert_eq!(table.head(usize::MAX).unwrap(), table);
    assert_eq!(table.tail(usize::MAX).unwrap(), table);
}

#[test]
fn test_row_step_larger_than_the_table() {
    let table = mixed_table();
    let result = table
        .select((Slice::starting_at(1).with_step(isize::MAX), Slice::full()))
        .unwrap();
    assert_eq!(result.shape(), (1, 5));
    assert_eq!(result.column("e").unwrap(), &Column::Int(vec![2]));

    let reversed = table
        .select((Slice::full().with_step(isize::MIN), "e"))
        .unwrap();
    assert_eq!(reversed.column("e").unwrap(), &Column::Int(vec![3]));
}

#[test]
fn test_scalar_assignment_broadcasts_to_row_count() {
    let mut table = mixed_table();
    for (name, value) in [
        ("i", Scalar::Int(4)),
        ("f", Scalar::Float(2.5)),
        ("t", Scalar::Bool(false)),
        ("s", Scalar::from("z")),
    ] {
        table.assign(name, value.clone()).unwrap();
        let column = table.column(name).unwrap();
        assert_eq!(column.len(), table.len());
        for i in 0..column.len() {
            assert_eq!(column.scalar_at(i).unwrap(), value);
        }
    }
}

#[test]
fn test_failed_assignment_leaves_table_untouched() {
    let mut table = mixed_table();
    let before = table.clone();
    assert!(table.assign(2isize, 1i64).is_err());
    assert!(table.assign("new", Column::Int(vec![1])).is_err());
    assert_eq!(table, before);
}
