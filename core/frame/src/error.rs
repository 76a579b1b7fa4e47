//! FILENAME: core/frame/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Invalid input type: {0}")]
    InvalidInputType(String),

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid selector type: {0}")]
    InvalidSelectorType(String),

    #[error("Invalid selector value: {0}")]
    InvalidSelectorValue(String),

    #[error("Duplicate column name: {0}")]
    DuplicateName(String),

    #[error("Missing argument: {0}")]
    MissingArgument(String),

    #[error("Conflicting argument: {0}")]
    ConflictingArgument(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Index {index} is out of bounds for axis with size {len}")]
    IndexOutOfBounds { index: isize, len: usize },

    /// Raised by a reduction that cannot be applied to a column's element type.
    /// The aggregation engine turns this into a skipped column.
    #[error("Incompatible type: {0}")]
    IncompatibleType(String),

    #[error("Zero-size column has no {0}")]
    EmptyReduction(String),

    #[error("Unknown aggregation: {0}")]
    UnknownAggregation(String),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
