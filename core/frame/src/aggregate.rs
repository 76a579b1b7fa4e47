//! FILENAME: core/frame/src/aggregate.rs
//! PURPOSE: Aggregation engine. Per-column reductions and distinct-value scans.
//! CONTEXT: `Table::aggregate` applies a reducer to every column independently.
//! A reducer that cannot handle a column's element type reports
//! `FrameError::IncompatibleType`; that column is recorded as skipped and left
//! out of the result. Every other error propagates.

use std::str::FromStr;

use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{FrameError, Result};
use crate::table::{unique_names, Table};
use crate::value::{KeyValue, Scalar, Value};

// ============================================================================
// REDUCTIONS
// ============================================================================

/// Built-in reductions over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    Min,
    Max,
    Mean,
    Median,
    Sum,
    Prod,
    /// Population variance.
    Var,
    /// Population standard deviation.
    Std,
    All,
    Any,
    ArgMin,
    ArgMax,
    /// Number of elements.
    Size,
    /// Number of non-missing elements.
    Count,
}

impl Reduction {
    pub fn name(&self) -> &'static str {
        match self {
            Reduction::Min => "min",
            Reduction::Max => "max",
            Reduction::Mean => "mean",
            Reduction::Median => "median",
            Reduction::Sum => "sum",
            Reduction::Prod => "prod",
            Reduction::Var => "var",
            Reduction::Std => "std",
            Reduction::All => "all",
            Reduction::Any => "any",
            Reduction::ArgMin => "argmin",
            Reduction::ArgMax => "argmax",
            Reduction::Size => "size",
            Reduction::Count => "count",
        }
    }

    /// Reduces one column to a scalar.
    pub fn apply(&self, column: &Column) -> Result<Scalar> {
        let kernel = match self {
            Reduction::Size => return Ok(Scalar::Int(column.len() as i64)),
            Reduction::Count => {
                let missing = column.missing_mask().iter().filter(|&&m| m).count();
                return Ok(Scalar::Int((column.len() - missing) as i64));
            }
            Reduction::Min => Kernel::Min,
            Reduction::Max => Kernel::Max,
            Reduction::Mean => Kernel::Mean,
            Reduction::Median => Kernel::Median,
            Reduction::Sum => Kernel::Sum,
            Reduction::Prod => Kernel::Prod,
            Reduction::Var => Kernel::Var,
            Reduction::Std => Kernel::Std,
            Reduction::All => Kernel::All,
            Reduction::Any => Kernel::Any,
            Reduction::ArgMin => Kernel::ArgMin,
            Reduction::ArgMax => Kernel::ArgMax,
        };

        match column {
            Column::Int(values) => kernel.ints(values),
            Column::Float(values) => kernel.floats(values),
            Column::Bool(values) => kernel.bools(values),
            Column::Str(values) => {
                let texts: Vec<Option<&str>> = values.iter().map(|s| Some(s.as_str())).collect();
                kernel.texts(&texts)
            }
            Column::Generic(values) => {
                let texts: Vec<Option<&str>> = values.iter().map(Value::as_text).collect();
                kernel.texts(&texts)
            }
        }
    }
}

/// Reductions that read element values. `Size` and `Count` only count
/// elements and never reach these kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kernel {
    Min,
    Max,
    Mean,
    Median,
    Sum,
    Prod,
    Var,
    Std,
    All,
    Any,
    ArgMin,
    ArgMax,
}

impl Kernel {
    fn name(self) -> &'static str {
        match self {
            Kernel::Min => "min",
            Kernel::Max => "max",
            Kernel::Mean => "mean",
            Kernel::Median => "median",
            Kernel::Sum => "sum",
            Kernel::Prod => "prod",
            Kernel::Var => "var",
            Kernel::Std => "std",
            Kernel::All => "all",
            Kernel::Any => "any",
            Kernel::ArgMin => "argmin",
            Kernel::ArgMax => "argmax",
        }
    }

    fn ints(self, values: &[i64]) -> Result<Scalar> {
        let as_floats = || values.iter().map(|&v| v as f64).collect::<Vec<_>>();
        Ok(match self {
            Kernel::Min => Scalar::Int(*values.iter().min().ok_or_else(|| self.empty())?),
            Kernel::Max => Scalar::Int(*values.iter().max().ok_or_else(|| self.empty())?),
            Kernel::Sum => Scalar::Int(values.iter().fold(0i64, |acc, &v| acc.wrapping_add(v))),
            Kernel::Prod => Scalar::Int(values.iter().fold(1i64, |acc, &v| acc.wrapping_mul(v))),
            Kernel::Mean => Scalar::Float(mean(&as_floats())),
            Kernel::Median => Scalar::Float(median(&as_floats())),
            Kernel::Var => Scalar::Float(variance(&as_floats())),
            Kernel::Std => Scalar::Float(variance(&as_floats()).sqrt()),
            Kernel::All => Scalar::Bool(values.iter().all(|&v| v != 0)),
            Kernel::Any => Scalar::Bool(values.iter().any(|&v| v != 0)),
            Kernel::ArgMin => Scalar::Int(first_extreme(values, |a, b| a < b).ok_or_else(|| self.empty())?),
            Kernel::ArgMax => Scalar::Int(first_extreme(values, |a, b| a > b).ok_or_else(|| self.empty())?),
        })
    }

    fn floats(self, values: &[f64]) -> Result<Scalar> {
        let nan_at = values.iter().position(|v| v.is_nan());
        Ok(match self {
            Kernel::Min | Kernel::Max => {
                if values.is_empty() {
                    return Err(self.empty());
                }
                if nan_at.is_some() {
                    Scalar::Float(f64::NAN)
                } else if self == Kernel::Min {
                    Scalar::Float(values.iter().copied().fold(f64::INFINITY, f64::min))
                } else {
                    Scalar::Float(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
                }
            }
            Kernel::Sum => Scalar::Float(values.iter().sum()),
            Kernel::Prod => Scalar::Float(values.iter().product()),
            Kernel::Mean => Scalar::Float(mean(values)),
            Kernel::Median => Scalar::Float(median(values)),
            Kernel::Var => Scalar::Float(variance(values)),
            Kernel::Std => Scalar::Float(variance(values).sqrt()),
            Kernel::All => Scalar::Bool(values.iter().all(|&v| v != 0.0)),
            Kernel::Any => Scalar::Bool(values.iter().any(|&v| v != 0.0)),
            Kernel::ArgMin | Kernel::ArgMax => {
                // The first NaN wins, as in the usual numeric-library convention.
                if let Some(i) = nan_at {
                    Scalar::Int(i as i64)
                } else if self == Kernel::ArgMin {
                    Scalar::Int(first_extreme(values, |a, b| a < b).ok_or_else(|| self.empty())?)
                } else {
                    Scalar::Int(first_extreme(values, |a, b| a > b).ok_or_else(|| self.empty())?)
                }
            }
        })
    }

    fn bools(self, values: &[bool]) -> Result<Scalar> {
        let as_floats = || {
            values
                .iter()
                .map(|&b| if b { 1.0 } else { 0.0 })
                .collect::<Vec<f64>>()
        };
        Ok(match self {
            Kernel::Min => Scalar::Bool(*values.iter().min().ok_or_else(|| self.empty())?),
            Kernel::Max => Scalar::Bool(*values.iter().max().ok_or_else(|| self.empty())?),
            Kernel::Sum => Scalar::Int(values.iter().filter(|&&b| b).count() as i64),
            Kernel::Prod => Scalar::Int(i64::from(values.iter().all(|&b| b))),
            Kernel::Mean => Scalar::Float(mean(&as_floats())),
            Kernel::Median => Scalar::Float(median(&as_floats())),
            Kernel::Var => Scalar::Float(variance(&as_floats())),
            Kernel::Std => Scalar::Float(variance(&as_floats()).sqrt()),
            Kernel::All => Scalar::Bool(values.iter().all(|&b| b)),
            Kernel::Any => Scalar::Bool(values.iter().any(|&b| b)),
            Kernel::ArgMin => Scalar::Int(first_extreme(values, |a, b| a < b).ok_or_else(|| self.empty())?),
            Kernel::ArgMax => Scalar::Int(first_extreme(values, |a, b| a > b).ok_or_else(|| self.empty())?),
        })
    }

    /// Text reductions. Ordering-based reductions and concatenation fail on nulls.
    fn texts(self, values: &[Option<&str>]) -> Result<Scalar> {
        Ok(match self {
            Kernel::All => Scalar::Bool(values.iter().all(|v| truthy(*v))),
            Kernel::Any => Scalar::Bool(values.iter().any(|v| truthy(*v))),
            Kernel::Mean | Kernel::Median | Kernel::Var | Kernel::Std | Kernel::Prod => {
                return Err(FrameError::IncompatibleType(format!(
                    "{} is not defined for text",
                    self.name()
                )))
            }
            Kernel::Min => {
                let texts = self.non_null(values)?;
                Scalar::Text(texts.iter().min().ok_or_else(|| self.empty())?.to_string())
            }
            Kernel::Max => {
                let texts = self.non_null(values)?;
                Scalar::Text(texts.iter().max().ok_or_else(|| self.empty())?.to_string())
            }
            Kernel::Sum => {
                let texts = self.non_null(values)?;
                // An empty sum starts from the integer zero.
                if texts.is_empty() {
                    Scalar::Int(0)
                } else {
                    Scalar::Text(texts.concat())
                }
            }
            Kernel::ArgMin => {
                let texts = self.non_null(values)?;
                Scalar::Int(first_extreme(&texts, |a, b| a < b).ok_or_else(|| self.empty())?)
            }
            Kernel::ArgMax => {
                let texts = self.non_null(values)?;
                Scalar::Int(first_extreme(&texts, |a, b| a > b).ok_or_else(|| self.empty())?)
            }
        })
    }

    fn non_null<'a>(self, values: &[Option<&'a str>]) -> Result<Vec<&'a str>> {
        values
            .iter()
            .map(|v| {
                v.ok_or_else(|| {
                    FrameError::IncompatibleType(format!(
                        "{} cannot compare or combine null with text",
                        self.name()
                    ))
                })
            })
            .collect()
    }

    fn empty(self) -> FrameError {
        FrameError::EmptyReduction(self.name().to_string())
    }
}

impl FromStr for Reduction {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "min" => Reduction::Min,
            "max" => Reduction::Max,
            "mean" => Reduction::Mean,
            "median" => Reduction::Median,
            "sum" => Reduction::Sum,
            "prod" => Reduction::Prod,
            "var" => Reduction::Var,
            "std" => Reduction::Std,
            "all" => Reduction::All,
            "any" => Reduction::Any,
            "argmin" => Reduction::ArgMin,
            "argmax" => Reduction::ArgMax,
            "size" => Reduction::Size,
            "count" => Reduction::Count,
            other => return Err(FrameError::UnknownAggregation(other.to_string())),
        })
    }
}

fn truthy(value: Option<&str>) -> bool {
    value.is_some_and(|s| !s.is_empty())
}

/// Position of the first element that no later element beats.
fn first_extreme<T: Copy>(values: &[T], better: impl Fn(T, T) -> bool) -> Option<i64> {
    let mut best: Option<(usize, T)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if !better(v, b) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i as i64)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() || values.iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population variance via Welford's algorithm.
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &v) in values.iter().enumerate() {
        let delta = v - mean;
        mean += delta / (i + 1) as f64;
        m2 += delta * (v - mean);
    }
    m2 / values.len() as f64
}

// ============================================================================
// PER-COLUMN OUTCOMES
// ============================================================================

/// What happened when a reducer was applied to one column.
#[derive(Debug, Clone, PartialEq)]
pub enum AggOutcome {
    Reduced(Scalar),
    /// The reducer does not apply to the column's element type.
    Skipped { reason: String },
}

impl Table {
    /// Applies `reducer` to every column and records each outcome, in column order.
    pub fn aggregate_outcomes<F>(&self, reducer: F) -> Result<Vec<(String, AggOutcome)>>
    where
        F: Fn(&Column) -> Result<Scalar>,
    {
        let mut outcomes = Vec::with_capacity(self.num_columns());
        for (name, column) in self.iter() {
            let outcome = match reducer(column) {
                Ok(value) => AggOutcome::Reduced(value),
                Err(FrameError::IncompatibleType(reason)) => {
                    debug!("skipping column '{}': {}", name, reason);
                    AggOutcome::Skipped { reason }
                }
                Err(e) => return Err(e),
            };
            outcomes.push((name.to_string(), outcome));
        }
        Ok(outcomes)
    }

    /// One-row table of reduced columns. Skipped columns are omitted.
    pub fn aggregate<F>(&self, reducer: F) -> Result<Table>
    where
        F: Fn(&Column) -> Result<Scalar>,
    {
        let reduced = self
            .aggregate_outcomes(reducer)?
            .into_iter()
            .filter_map(|(name, outcome)| match outcome {
                AggOutcome::Reduced(value) => Some((name, Column::from_scalar(value))),
                AggOutcome::Skipped { .. } => None,
            });
        Table::new(reduced)
    }

    pub fn reduce(&self, reduction: Reduction) -> Result<Table> {
        self.aggregate(|column| reduction.apply(column))
    }

    pub fn min(&self) -> Result<Table> {
        self.reduce(Reduction::Min)
    }

    pub fn max(&self) -> Result<Table> {
        self.reduce(Reduction::Max)
    }

    pub fn mean(&self) -> Result<Table> {
        self.reduce(Reduction::Mean)
    }

    pub fn median(&self) -> Result<Table> {
        self.reduce(Reduction::Median)
    }

    pub fn sum(&self) -> Result<Table> {
        self.reduce(Reduction::Sum)
    }

    pub fn var(&self) -> Result<Table> {
        self.reduce(Reduction::Var)
    }

    pub fn std(&self) -> Result<Table> {
        self.reduce(Reduction::Std)
    }

    pub fn all(&self) -> Result<Table> {
        self.reduce(Reduction::All)
    }

    pub fn any(&self) -> Result<Table> {
        self.reduce(Reduction::Any)
    }

    pub fn argmax(&self) -> Result<Table> {
        self.reduce(Reduction::ArgMax)
    }

    pub fn argmin(&self) -> Result<Table> {
        self.reduce(Reduction::ArgMin)
    }

    // ========================================================================
    // DERIVED SCANS
    // ========================================================================

    /// Boolean table marking missing elements.
    pub fn isna(&self) -> Result<Table> {
        Table::new(
            self.iter()
                .map(|(name, column)| (name, Column::Bool(column.missing_mask()))),
        )
    }

    /// One-row table of non-missing counts.
    pub fn count(&self) -> Result<Table> {
        self.reduce(Reduction::Count)
    }

    /// One table per column holding its sorted distinct values.
    pub fn unique(&self) -> Result<Vec<Table>> {
        self.iter()
            .map(|(name, column)| {
                let distinct: Vec<usize> = distinct_positions(column)
                    .into_iter()
                    .map(|(_, first, _)| first)
                    .collect();
                Table::new([(name, column.take(&distinct))])
            })
            .collect()
    }

    /// One-row table of distinct counts.
    pub fn nunique(&self) -> Result<Table> {
        Table::new(
            self.iter()
                .map(|(name, column)| (name, Column::Int(vec![distinct_positions(column).len() as i64]))),
        )
    }

    /// Frequency of each distinct value, one two-column table per column,
    /// most frequent first. Equal frequencies keep ascending value order.
    /// The frequency column is `count`, or `count_1` when the counted column
    /// is itself named `count`.
    pub fn value_counts(&self, normalize: bool) -> Result<Vec<Table>> {
        self.iter()
            .map(|(name, column)| {
                let mut distinct = distinct_positions(column);
                // Stable: ties stay in ascending key order.
                distinct.sort_by(|a, b| b.2.cmp(&a.2));

                let firsts: Vec<usize> = distinct.iter().map(|(_, first, _)| *first).collect();
                let counts = if normalize {
                    let total = column.len() as f64;
                    Column::Float(distinct.iter().map(|(_, _, n)| *n as f64 / total).collect())
                } else {
                    Column::Int(distinct.iter().map(|(_, _, n)| *n as i64).collect())
                };
                let names = unique_names(vec![name.to_string(), "count".to_string()]);
                Ok(Table::from_parts(names, vec![column.take(&firsts), counts]))
            })
            .collect()
    }
}

/// Distinct keys of `column` sorted ascending, with the first position and
/// the number of occurrences of each.
fn distinct_positions(column: &Column) -> Vec<(KeyValue, usize, usize)> {
    let mut seen: FxHashMap<KeyValue, (usize, usize)> = FxHashMap::default();
    for i in 0..column.len() {
        seen.entry(column.key_at(i))
            .and_modify(|(_, n)| *n += 1)
            .or_insert((i, 1));
    }
    let mut distinct: Vec<(KeyValue, usize, usize)> = seen
        .into_iter()
        .map(|(key, (first, n))| (key, first, n))
        .collect();
    distinct.sort_by(|a, b| a.0.cmp(&b.0));
    distinct
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixed() -> Table {
        Table::new([
            ("a", Column::from_strs(&["a", "b", "c"])),
            ("b", Column::Int(vec![21, 15, 6])),
            ("c", Column::Float(vec![4.3, f64::NAN, 9.1])),
        ])
        .unwrap()
    }

    #[test]
    fn test_min_keeps_text_and_propagates_nan() {
        let result = mixed().min().unwrap();
        assert_eq!(result.column("a").unwrap(), &Column::generic(["a"]));
        assert_eq!(result.column("b").unwrap(), &Column::Int(vec![6]));
        assert_eq!(result.column("c").unwrap(), &Column::Float(vec![f64::NAN]));
    }

    #[test]
    fn test_sum_skips_column_with_nulls() {
        let table = Table::new([
            ("a", Column::Int(vec![1, 2, 3])),
            ("b", Column::generic([None, Some("x"), None])),
        ])
        .unwrap();
        let result = table.sum().unwrap();
        assert_eq!(result.columns(), ["a"]);
        assert_eq!(result.column("a").unwrap(), &Column::Int(vec![6]));

        let outcomes = table.aggregate_outcomes(|c| Reduction::Sum.apply(c)).unwrap();
        assert!(matches!(outcomes[1].1, AggOutcome::Skipped { .. }));
    }

    #[test]
    fn test_text_sum_concatenates() {
        let result = mixed().sum().unwrap();
        assert_eq!(result.column("a").unwrap(), &Column::generic(["abc"]));
    }

    #[test]
    fn test_mean_skips_text() {
        let result = mixed().mean().unwrap();
        assert_eq!(result.columns(), ["b", "c"]);
        assert_eq!(result.column("b").unwrap(), &Column::Float(vec![14.0]));
    }

    #[test]
    fn test_structural_errors_propagate() {
        let empty = mixed().head(0).unwrap();
        assert!(matches!(empty.max(), Err(FrameError::EmptyReduction(_))));

        let result = mixed().aggregate(|_| Err(FrameError::InvalidInputType("boom".to_string())));
        assert!(matches!(result, Err(FrameError::InvalidInputType(_))));
    }

    #[test]
    fn test_variance_is_population() {
        let table = Table::new([("x", Column::Int(vec![1, 2, 3, 4]))]).unwrap();
        assert_eq!(table.var().unwrap().column("x").unwrap(), &Column::Float(vec![1.25]));
        assert_eq!(table.median().unwrap().column("x").unwrap(), &Column::Float(vec![2.5]));
    }

    #[test]
    fn test_arg_reductions() {
        let result = mixed().argmax().unwrap();
        assert_eq!(result.column("a").unwrap(), &Column::Int(vec![2]));
        assert_eq!(result.column("b").unwrap(), &Column::Int(vec![0]));
        assert_eq!(result.column("c").unwrap(), &Column::Int(vec![1]));
    }

    #[test]
    fn test_all_any_truthiness() {
        let table = Table::new([
            ("t", Column::generic([Some("x"), Some("")])),
            ("i", Column::Int(vec![1, 0])),
        ])
        .unwrap();
        let all = table.all().unwrap();
        assert_eq!(all.column("t").unwrap(), &Column::Bool(vec![false]));
        assert_eq!(all.column("i").unwrap(), &Column::Bool(vec![false]));
        let any = table.any().unwrap();
        assert_eq!(any.column("t").unwrap(), &Column::Bool(vec![true]));
    }

    #[test]
    fn test_isna_and_count() {
        let table = Table::new([
            ("b", Column::generic([Some("c"), Some("d"), None])),
            ("c", Column::Float(vec![4.3, f64::NAN, 9.1])),
            ("e", Column::Int(vec![1, 2, 3])),
        ])
        .unwrap();
        let na = table.isna().unwrap();
        assert_eq!(na.column("b").unwrap(), &Column::Bool(vec![false, false, true]));
        assert_eq!(na.column("c").unwrap(), &Column::Bool(vec![false, true, false]));
        assert_eq!(na.column("e").unwrap(), &Column::Bool(vec![false, false, false]));

        let count = table.count().unwrap();
        assert_eq!(count.column("b").unwrap(), &Column::Int(vec![2]));
        assert_eq!(count.column("e").unwrap(), &Column::Int(vec![3]));
    }

    #[test]
    fn test_unique_and_nunique() {
        let table = Table::new([
            ("a", Column::Int(vec![3, 1, 3, 2])),
            ("b", Column::from_strs(&["y", "x", "y", "y"])),
        ])
        .unwrap();
        let unique = table.unique().unwrap();
        assert_eq!(unique[0].column("a").unwrap(), &Column::Int(vec![1, 2, 3]));
        assert_eq!(unique[1].column("b").unwrap(), &Column::generic(["x", "y"]));

        let counts = table.nunique().unwrap();
        assert_eq!(counts.column("a").unwrap(), &Column::Int(vec![3]));
        assert_eq!(counts.column("b").unwrap(), &Column::Int(vec![2]));
    }

    #[test]
    fn test_value_counts_of_column_named_count() {
        let table = Table::new([("count", Column::Int(vec![1, 1, 2]))]).unwrap();
        let counts = table.value_counts(false).unwrap();
        assert_eq!(counts[0].columns(), ["count", "count_1"]);
        assert_eq!(counts[0].column("count").unwrap(), &Column::Int(vec![1, 2]));
        assert_eq!(counts[0].column("count_1").unwrap(), &Column::Int(vec![2, 1]));
    }

    #[test]
    fn test_value_counts_orders_by_frequency_then_value() {
        let table = Table::new([("k", Column::from_strs(&["b", "a", "c", "a", "b", "a"]))]).unwrap();
        let counts = table.value_counts(false).unwrap();
        assert_eq!(counts[0].column("k").unwrap(), &Column::generic(["a", "b", "c"]));
        assert_eq!(counts[0].column("count").unwrap(), &Column::Int(vec![3, 2, 1]));

        let ties = Table::new([("k", Column::Int(vec![5, 4, 5, 4, 9]))]).unwrap();
        let counts = ties.value_counts(true).unwrap();
        assert_eq!(counts[0].column("k").unwrap(), &Column::Int(vec![4, 5, 9]));
        assert_eq!(counts[0].column("count").unwrap(), &Column::Float(vec![0.4, 0.4, 0.2]));
    }

    #[test]
    fn test_reduction_names_parse() {
        assert_eq!("argmax".parse::<Reduction>().unwrap(), Reduction::ArgMax);
        assert!(matches!("mode".parse::<Reduction>(), Err(FrameError::UnknownAggregation(_))));
    }
}
