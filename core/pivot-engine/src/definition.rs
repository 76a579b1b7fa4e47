//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The serializable configuration.
//!
//! This module contains the types needed to DESCRIBE a pivot. They are plain
//! data: serializable, cheap to clone, and validated only when a pivot is
//! calculated.

use std::fmt;
use std::str::FromStr;

use frame::{FrameError, Reduction, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for the value column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    /// Number of rows in the group, missing values included.
    Size,
    /// Number of non-missing values in the group.
    Count,
    Sum,
    Prod,
    Mean,
    Median,
    Min,
    Max,
    /// Population variance.
    Var,
    /// Population standard deviation.
    Std,
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Size
    }
}

impl AggregationType {
    pub const ALL: [AggregationType; 10] = [
        AggregationType::Size,
        AggregationType::Count,
        AggregationType::Sum,
        AggregationType::Prod,
        AggregationType::Mean,
        AggregationType::Median,
        AggregationType::Min,
        AggregationType::Max,
        AggregationType::Var,
        AggregationType::Std,
    ];

    /// The name used for the aggregate column of a rows-only pivot.
    pub fn name(&self) -> &'static str {
        self.reduction().name()
    }

    /// The column reduction computing this aggregate.
    pub fn reduction(&self) -> Reduction {
        match self {
            AggregationType::Size => Reduction::Size,
            AggregationType::Count => Reduction::Count,
            AggregationType::Sum => Reduction::Sum,
            AggregationType::Prod => Reduction::Prod,
            AggregationType::Mean => Reduction::Mean,
            AggregationType::Median => Reduction::Median,
            AggregationType::Min => Reduction::Min,
            AggregationType::Max => Reduction::Max,
            AggregationType::Var => Reduction::Var,
            AggregationType::Std => Reduction::Std,
        }
    }
}

impl fmt::Display for AggregationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregationType {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        AggregationType::ALL
            .into_iter()
            .find(|agg| agg.name() == s)
            .ok_or_else(|| FrameError::UnknownAggregation(s.to_string()))
    }
}

// ============================================================================
// PIVOT DEFINITION
// ============================================================================

/// Describes a pivot over a source table.
///
/// `rows` and `columns` name the key columns; `values` names the column to
/// aggregate. Without `values` the group sizes are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotDefinition {
    #[serde(default)]
    pub rows: Option<String>,
    #[serde(default)]
    pub columns: Option<String>,
    #[serde(default)]
    pub values: Option<String>,
    #[serde(default)]
    pub aggregation: Option<AggregationType>,
}

/// Which key columns a pivot groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotLayout {
    /// One output row, one column per distinct column key.
    ColumnsOnly,
    /// A key column of distinct row keys and one aggregate column.
    RowsOnly,
    /// A key column of distinct row keys and one column per distinct column key.
    Both,
}

impl PivotDefinition {
    pub fn new() -> Self {
        PivotDefinition::default()
    }

    pub fn with_rows(mut self, name: impl Into<String>) -> Self {
        self.rows = Some(name.into());
        self
    }

    pub fn with_columns(mut self, name: impl Into<String>) -> Self {
        self.columns = Some(name.into());
        self
    }

    pub fn with_values(mut self, name: impl Into<String>) -> Self {
        self.values = Some(name.into());
        self
    }

    pub fn with_aggregation(mut self, aggregation: AggregationType) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Checks the argument combination and returns the layout together with
    /// the effective aggregation.
    pub fn plan(&self) -> Result<(PivotLayout, AggregationType)> {
        let layout = match (&self.rows, &self.columns) {
            (None, None) => {
                return Err(FrameError::MissingArgument(
                    "pivot needs 'rows', 'columns' or both".to_string(),
                ))
            }
            (None, Some(_)) => PivotLayout::ColumnsOnly,
            (Some(_), None) => PivotLayout::RowsOnly,
            (Some(_), Some(_)) => PivotLayout::Both,
        };

        let aggregation = match (&self.values, self.aggregation) {
            (Some(_), Some(aggregation)) => aggregation,
            (Some(values), None) => {
                return Err(FrameError::MissingArgument(format!(
                    "an aggregation is required to pivot values of '{}'",
                    values
                )))
            }
            (None, Some(aggregation)) => {
                return Err(FrameError::ConflictingArgument(format!(
                    "aggregation '{}' given without a values column",
                    aggregation
                )))
            }
            (None, None) => AggregationType::Size,
        };

        Ok((layout, aggregation))
    }
}
