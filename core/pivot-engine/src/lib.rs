//! FILENAME: core/pivot-engine/src/lib.rs
//! Pivot subsystem for the columnar table.
//!
//! This crate regroups a `frame::Table` by one or two key columns and reshapes
//! the per-group aggregates into a new table. It depends on `frame` for the
//! table, column and reduction types.
//!
//! Layers:
//! - `definition`: Serializable configuration (what the pivot IS)
//! - `cache`: Grouping of source rows by key (HOW we collect)
//! - `engine`: Aggregation and reshape (HOW we calculate)

pub mod definition;
pub mod cache;
pub mod engine;

pub use definition::*;
pub use cache::{GroupKey, PivotGroups};
pub use engine::{calculate_pivot, PivotExt};
