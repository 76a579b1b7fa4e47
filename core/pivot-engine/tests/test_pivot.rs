//! Pivot calculations over tables read from delimited text.

use frame::{read_delimited, Column, ReadOptions, Table};
use pivot_engine::{calculate_pivot, AggregationType, PivotDefinition, PivotExt};

fn orders() -> Table {
    let text = "\
region,product,units,price
N,apple,3,1.5
N,pear,1,2.0
S,apple,4,1.5
S,apple,2,1.25
E,pear,5,2.0
";
    read_delimited(text, &ReadOptions::default()).unwrap()
}

#[test]
fn test_region_totals() {
    let result = orders()
        .pivot(Some("region"), None, Some("units"), Some("sum"))
        .unwrap();
    assert_eq!(result.column("region").unwrap(), &Column::generic(["E", "N", "S"]));
    assert_eq!(result.column("sum").unwrap(), &Column::Int(vec![5, 4, 6]));
}

#[test]
fn test_cross_tab_of_counts() {
    let result = orders().pivot(Some("region"), Some("product"), None, None).unwrap();
    assert_eq!(result.columns(), ["region", "apple", "pear"]);
    assert_eq!(result.column("apple").unwrap(), &Column::Float(vec![f64::NAN, 1.0, 2.0]));
    assert_eq!(result.column("pear").unwrap(), &Column::Float(vec![1.0, 1.0, f64::NAN]));
}

#[test]
fn test_population_statistics() {
    let result = orders()
        .pivot(None, Some("product"), Some("units"), Some("var"))
        .unwrap();
    // apple units 3, 4, 2: mean 3, population variance 2/3
    match result.column("apple").unwrap() {
        Column::Float(v) => assert!((v[0] - 2.0 / 3.0).abs() < 1e-12),
        other => panic!("expected float column, got {:?}", other),
    }
}

#[test]
fn test_definition_from_json() {
    let definition: PivotDefinition = serde_json::from_str(
        r#"{"rows": "product", "values": "price", "aggregation": "median"}"#,
    )
    .unwrap();
    assert_eq!(definition.aggregation, Some(AggregationType::Median));

    let result = calculate_pivot(&orders(), &definition).unwrap();
    assert_eq!(result.columns(), ["product", "median"]);
    assert_eq!(result.column("median").unwrap(), &Column::Float(vec![1.5, 2.0]));
}

#[test]
fn test_definition_serializes_lowercase_aggregation() {
    let definition = PivotDefinition::new()
        .with_columns("region")
        .with_values("units")
        .with_aggregation(AggregationType::Std);
    let json = serde_json::to_value(&definition).unwrap();
    assert_eq!(json["aggregation"], "std");
    assert_eq!(json["rows"], serde_json::Value::Null);
}
