//! Selection and aggregation throughput on a wide mixed table.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use frame::{Column, Key, Slice, Table};

fn build_table(rows: usize) -> Table {
    let ints: Vec<i64> = (0..rows as i64).collect();
    let floats: Vec<f64> = (0..rows).map(|i| i as f64 * 0.5).collect();
    let flags: Vec<bool> = (0..rows).map(|i| i % 3 == 0).collect();
    let names = Column::generic((0..rows).map(|i| format!("name-{}", i % 97)));
    Table::new([
        ("id", Column::Int(ints)),
        ("score", Column::Float(floats)),
        ("flag", Column::Bool(flags)),
        ("name", names),
    ])
    .expect("bench table is valid")
}

fn bench_selection(c: &mut Criterion) {
    let table = build_table(100_000);
    let mask = table.select("flag").expect("flag column exists");

    c.bench_function("select_mask", |b| {
        b.iter(|| table.select(black_box(&mask)))
    });

    c.bench_function("select_slice_by_label", |b| {
        b.iter(|| {
            table.select(black_box(Key::pair(
                Slice::range(1_000, 50_000).with_step(3),
                Slice::labels(Some("score"), Some("name")),
            )))
        })
    });

    c.bench_function("aggregate_mean", |b| b.iter(|| table.mean()));

    c.bench_function("value_counts", |b| {
        b.iter(|| table.select("name").and_then(|t| t.value_counts(false)))
    });
}

criterion_group!(benches, bench_selection);
criterion_main!(benches);
