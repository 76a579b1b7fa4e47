//! FILENAME: core/frame/src/column.rs
//! PURPOSE: Defines the typed, fixed-length buffer stored under each column name.
//! CONTEXT: A `Column` is homogeneous. Fixed-width text (`Str`) cannot hold a
//! null, so tables normalize it to `Generic` on the way in; everything else in
//! the crate may still receive a `Str` buffer from callers and handles it like a
//! null-free generic buffer.

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};
use crate::value::{KeyValue, OrderedFloat, Scalar, Value};

/// Element kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    Int,
    Float,
    Bool,
    Str,
    Generic,
}

impl DType {
    /// Name reported by `Table::dtypes`.
    pub fn name(&self) -> &'static str {
        match self {
            DType::Int => "int",
            DType::Float => "float",
            DType::Bool => "bool",
            DType::Str | DType::Generic => "string",
        }
    }
}

/// A one-dimensional homogeneous buffer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Column {
    Int(Vec<i64>),
    /// Missing values are NaN.
    Float(Vec<f64>),
    Bool(Vec<bool>),
    /// Fixed-width text without nulls.
    Str(Vec<String>),
    /// Text and/or explicit nulls.
    Generic(Vec<Value>),
}

/// Applies the same buffer expression to whichever variant `$col` holds and
/// rewraps the result in that variant.
macro_rules! map_buffer {
    ($col:expr, $buf:ident => $body:expr) => {
        match $col {
            Column::Int($buf) => Column::Int($body),
            Column::Float($buf) => Column::Float($body),
            Column::Bool($buf) => Column::Bool($body),
            Column::Str($buf) => Column::Str($body),
            Column::Generic($buf) => Column::Generic($body),
        }
    };
}

impl Column {
    pub fn from_strs(values: &[&str]) -> Self {
        Column::Str(values.iter().map(|s| s.to_string()).collect())
    }

    pub fn generic<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Column::Generic(values.into_iter().map(Into::into).collect())
    }

    /// Wraps a reduction result as a length-1 buffer.
    pub fn from_scalar(value: Scalar) -> Self {
        match value {
            Scalar::Int(v) => Column::Int(vec![v]),
            Scalar::Float(v) => Column::Float(vec![v]),
            Scalar::Bool(b) => Column::Bool(vec![b]),
            Scalar::Text(s) => Column::Generic(vec![Value::Text(s)]),
            Scalar::Null => Column::Generic(vec![Value::Null]),
        }
    }

    /// Broadcasts a scalar to a buffer of `len` copies.
    pub fn repeat(value: &Scalar, len: usize) -> Result<Self> {
        match value {
            Scalar::Int(v) => Ok(Column::Int(vec![*v; len])),
            Scalar::Float(v) => Ok(Column::Float(vec![*v; len])),
            Scalar::Bool(b) => Ok(Column::Bool(vec![*b; len])),
            Scalar::Text(s) => Ok(Column::Str(vec![s.clone(); len])),
            Scalar::Null => Err(FrameError::InvalidInputType(
                "a broadcast value must be an integer, float, boolean or string".to_string(),
            )),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int(b) => b.len(),
            Column::Float(b) => b.len(),
            Column::Bool(b) => b.len(),
            Column::Str(b) => b.len(),
            Column::Generic(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        match self {
            Column::Int(_) => DType::Int,
            Column::Float(_) => DType::Float,
            Column::Bool(_) => DType::Bool,
            Column::Str(_) => DType::Str,
            Column::Generic(_) => DType::Generic,
        }
    }

    /// Converts fixed-width text to the generic element type; other kinds pass through.
    pub fn normalized(self) -> Self {
        match self {
            Column::Str(values) => Column::Generic(values.into_iter().map(Value::Text).collect()),
            other => other,
        }
    }

    pub fn as_bool(&self) -> Option<&[bool]> {
        match self {
            Column::Bool(b) => Some(b),
            _ => None,
        }
    }

    // ========================================================================
    // INDEXING
    // ========================================================================

    /// Gathers elements at `positions`, in order, duplicates allowed.
    /// Positions must already be validated against `len()`.
    pub fn take(&self, positions: &[usize]) -> Self {
        map_buffer!(self, buf => positions.iter().map(|&i| buf[i].clone()).collect())
    }

    /// Keeps elements whose mask entry is true. The mask must match `len()`.
    pub fn filter(&self, mask: &[bool]) -> Self {
        map_buffer!(self, buf => buf
            .iter()
            .zip(mask)
            .filter_map(|(v, &keep)| if keep { Some(v.clone()) } else { None })
            .collect())
    }

    pub fn scalar_at(&self, i: usize) -> Option<Scalar> {
        if i >= self.len() {
            return None;
        }
        Some(match self {
            Column::Int(b) => Scalar::Int(b[i]),
            Column::Float(b) => Scalar::Float(b[i]),
            Column::Bool(b) => Scalar::Bool(b[i]),
            Column::Str(b) => Scalar::Text(b[i].clone()),
            Column::Generic(b) => Scalar::from(b[i].clone()),
        })
    }

    /// Hashable key for element `i`. Panics if `i` is out of range.
    pub fn key_at(&self, i: usize) -> KeyValue {
        match self {
            Column::Int(b) => KeyValue::Int(b[i]),
            Column::Float(b) => KeyValue::Float(OrderedFloat(b[i])),
            Column::Bool(b) => KeyValue::Bool(b[i]),
            Column::Str(b) => KeyValue::Text(b[i].clone()),
            Column::Generic(b) => match &b[i] {
                Value::Null => KeyValue::Null,
                Value::Text(s) => KeyValue::Text(s.clone()),
            },
        }
    }

    /// True where the element is missing: null for generic, NaN for float.
    pub fn missing_mask(&self) -> Vec<bool> {
        match self {
            Column::Float(b) => b.iter().map(|v| v.is_nan()).collect(),
            Column::Generic(b) => b.iter().map(Value::is_null).collect(),
            other => vec![false; other.len()],
        }
    }
}

impl PartialEq for Column {
    /// Element-wise equality where NaN equals NaN.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Column::Int(a), Column::Int(b)) => a == b,
            (Column::Float(a), Column::Float(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| OrderedFloat(*x) == OrderedFloat(*y))
            }
            (Column::Bool(a), Column::Bool(b)) => a == b,
            (Column::Str(a), Column::Str(b)) => a == b,
            (Column::Generic(a), Column::Generic(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Column::Int(values)
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Float(values)
    }
}

impl From<Vec<bool>> for Column {
    fn from(values: Vec<bool>) -> Self {
        Column::Bool(values)
    }
}

impl From<Vec<String>> for Column {
    fn from(values: Vec<String>) -> Self {
        Column::Str(values)
    }
}

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::from_strs(&values)
    }
}

impl From<Vec<Value>> for Column {
    fn from(values: Vec<Value>) -> Self {
        Column::Generic(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_honors_order_and_duplicates() {
        let col = Column::Int(vec![10, 20, 30]);
        assert_eq!(col.take(&[2, 0, 2]), Column::Int(vec![30, 10, 30]));
    }

    #[test]
    fn test_filter_by_mask() {
        let col = Column::from_strs(&["a", "b", "c"]);
        assert_eq!(col.filter(&[true, false, true]), Column::from_strs(&["a", "c"]));
    }

    #[test]
    fn test_normalize_fixed_text() {
        let col = Column::from_strs(&["x", "y"]).normalized();
        assert_eq!(col.dtype(), DType::Generic);
        assert_eq!(col, Column::generic(["x", "y"]));
    }

    #[test]
    fn test_repeat_rejects_null() {
        assert!(matches!(
            Column::repeat(&Scalar::Null, 3),
            Err(FrameError::InvalidInputType(_))
        ));
        assert_eq!(Column::repeat(&Scalar::Bool(true), 2).unwrap(), Column::Bool(vec![true, true]));
    }

    #[test]
    fn test_float_equality_treats_nan_as_equal() {
        assert_eq!(Column::Float(vec![1.0, f64::NAN]), Column::Float(vec![1.0, f64::NAN]));
        assert_ne!(Column::Float(vec![1.0]), Column::Int(vec![1]));
    }

    #[test]
    fn test_missing_mask() {
        let col = Column::generic([Some("a"), None]);
        assert_eq!(col.missing_mask(), vec![false, true]);
        assert_eq!(Column::Int(vec![1, 2]).missing_mask(), vec![false, false]);
    }
}
