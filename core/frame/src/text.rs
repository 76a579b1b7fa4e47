//! FILENAME: core/frame/src/text.rs
//! PURPOSE: Element-wise string transforms over a single generic column.
//! CONTEXT: Nulls pass through unchanged; every transform returns a new
//! one-column table under the same name.

use crate::column::Column;
use crate::error::{FrameError, Result};
use crate::table::Table;
use crate::value::Value;

pub struct TextAccessor<'a> {
    name: &'a str,
    values: &'a [Value],
}

impl Table {
    /// Text accessor over a one-column table holding generic elements.
    pub fn text(&self) -> Result<TextAccessor<'_>> {
        if self.num_columns() != 1 {
            return Err(FrameError::ShapeMismatch(format!(
                "the text accessor works on exactly one column, got {}",
                self.num_columns()
            )));
        }
        match self.iter().next() {
            Some((name, Column::Generic(values))) => Ok(TextAccessor { name, values }),
            Some((name, other)) => Err(FrameError::IncompatibleType(format!(
                "column '{}' is {}, text operations need string values",
                name,
                other.dtype().name()
            ))),
            None => Err(FrameError::ShapeMismatch("table has no columns".to_string())),
        }
    }
}

impl<'a> TextAccessor<'a> {
    /// Applies `f` to every non-null element.
    pub fn apply<F>(&self, f: F) -> Result<Table>
    where
        F: Fn(&str) -> String,
    {
        let values: Vec<Value> = self
            .values
            .iter()
            .map(|v| match v {
                Value::Text(s) => Value::Text(f(s)),
                Value::Null => Value::Null,
            })
            .collect();
        Table::new([(self.name, Column::Generic(values))])
    }

    pub fn upper(&self) -> Result<Table> {
        self.apply(str::to_uppercase)
    }

    pub fn lower(&self) -> Result<Table> {
        self.apply(str::to_lowercase)
    }

    /// First character upper-cased, the rest lower-cased.
    pub fn capitalize(&self) -> Result<Table> {
        self.apply(|s| {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => {
                    let rest = chars.as_str().to_lowercase();
                    first.to_uppercase().chain(rest.chars()).collect()
                }
                None => String::new(),
            }
        })
    }

    pub fn strip(&self) -> Result<Table> {
        self.apply(|s| s.trim().to_string())
    }

    pub fn replace(&self, from: &str, to: &str) -> Result<Table> {
        self.apply(|s| s.replace(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nulls_pass_through() {
        let table = Table::new([("name", Column::generic([Some("ada"), None]))]).unwrap();
        let upper = table.text().unwrap().upper().unwrap();
        assert_eq!(upper.column("name").unwrap(), &Column::generic([Some("ADA"), None]));
    }

    #[test]
    fn test_capitalize_and_replace() {
        let table = Table::new([("w", Column::from_strs(&["hELLO", ""]))]).unwrap();
        let accessor = table.text().unwrap();
        assert_eq!(accessor.capitalize().unwrap().column("w").unwrap(), &Column::generic(["Hello", ""]));
        assert_eq!(accessor.replace("L", "l").unwrap().column("w").unwrap(), &Column::generic(["hEllO", ""]));
    }

    #[test]
    fn test_rejects_non_text_columns() {
        let table = Table::new([("n", Column::Int(vec![1]))]).unwrap();
        assert!(matches!(table.text(), Err(FrameError::IncompatibleType(_))));
    }
}
