//! FILENAME: core/frame/src/reader.rs
//! PURPOSE: Builds a table from delimited text.
//! CONTEXT: Records are parsed by `csv::Reader` (quoted fields may contain the
//! delimiter, doubled quotes escape a quote). Each column is then inferred as
//! integer, then float, then generic text. Blank fields are missing: NaN in a
//! float column, null in a text column.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{FrameError, Result};
use crate::table::Table;
use crate::value::Value;

/// Reader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// A single ASCII character.
    pub delimiter: char,
    /// When false, columns are named by position ("0", "1", ...).
    pub has_header: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            delimiter: ',',
            has_header: true,
        }
    }
}

/// Reads a delimited file from disk.
pub fn read_csv(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Table> {
    let file = File::open(path.as_ref())?;
    debug!("reading delimited file {}", path.as_ref().display());
    read_from(file, options)
}

/// Parses delimited text into a table.
pub fn read_delimited(text: &str, options: &ReadOptions) -> Result<Table> {
    read_from(text.as_bytes(), options)
}

fn read_from<R: Read>(source: R, options: &ReadOptions) -> Result<Table> {
    let delimiter = u8::try_from(options.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            FrameError::InvalidInputType(format!(
                "delimiter must be a single ASCII character, got {:?}",
                options.delimiter
            ))
        })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(options.has_header)
        .from_reader(source);

    let header: Option<StringRecord> = if options.has_header {
        Some(reader.headers().map_err(parse_error)?.clone())
    } else {
        None
    };
    let records = reader
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()
        .map_err(parse_error)?;

    let names: Vec<String> = match &header {
        Some(header) => header.iter().map(str::to_string).collect(),
        None => {
            let width = records.first().map_or(0, StringRecord::len);
            (0..width).map(|i| i.to_string()).collect()
        }
    };
    if names.is_empty() {
        return Ok(Table::empty());
    }

    let columns = (0..names.len()).map(|c| {
        let cells: Vec<&str> = records.iter().map(|r| r.get(c).unwrap_or("")).collect();
        infer_column(&cells)
    });

    let table = Table::new(names.into_iter().zip(columns))?;
    debug!("parsed delimited text into {:?} table", table.shape());
    Ok(table)
}

/// I/O failures keep their kind; everything else becomes a `Parse` error
/// carrying the 1-based line of the offending record.
fn parse_error(err: csv::Error) -> FrameError {
    let line = err.position().map_or(0, |p| p.line() as usize);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => FrameError::Io(io),
        _ => FrameError::Parse { line, message },
    }
}

/// Integer if every cell parses as one, else float if every non-blank cell
/// parses as one, else generic text.
fn infer_column(cells: &[&str]) -> Column {
    if let Some(ints) = cells
        .iter()
        .map(|c| c.trim().parse::<i64>().ok())
        .collect::<Option<Vec<_>>>()
    {
        return Column::Int(ints);
    }

    let floats = cells
        .iter()
        .map(|c| {
            let c = c.trim();
            if c.is_empty() {
                Some(f64::NAN)
            } else {
                c.parse::<f64>().ok()
            }
        })
        .collect::<Option<Vec<_>>>();
    if let Some(floats) = floats {
        return Column::Float(floats);
    }

    Column::Generic(
        cells
            .iter()
            .map(|c| {
                if c.trim().is_empty() {
                    Value::Null
                } else {
                    Value::text(*c)
                }
            })
            .collect(),
    )
}
