//! FILENAME: core/frame/src/selector.rs
//! PURPOSE: Index resolver. Turns a `Key` into a `(RowSelection, column names)` pair.
//! CONTEXT: A `Key` is built once at the call boundary and matched exhaustively
//! here. Column slices accept label bounds; a label stop bound is inclusive
//! while an integer stop bound is exclusive. Resolution never touches buffers,
//! apart from unwrapping a boolean mask table.

use log::trace;

use crate::error::{FrameError, Result};
use crate::table::Table;

// ============================================================================
// SELECTOR TYPES
// ============================================================================

/// A raw selection argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// A single column name.
    Label(String),
    /// A list of names and/or positions.
    List(Vec<KeyItem>),
    /// A one-column boolean table used as a row mask.
    Mask(Table),
    /// A single integer position.
    Position(isize),
    Slice(Slice),
    /// A `(row, column)` pair. Any other arity is rejected during resolution.
    Tuple(Vec<Key>),
}

/// An element of a `Key::List`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyItem {
    Position(isize),
    Label(String),
}

/// A slice bound: a position or, for column slices only, a column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Position(isize),
    Label(String),
}

/// `start:stop:step`, each part optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Slice {
    pub start: Option<Bound>,
    pub stop: Option<Bound>,
    pub step: Option<Bound>,
}

impl Slice {
    /// `:`
    pub fn full() -> Self {
        Slice::default()
    }

    pub fn new(start: Option<isize>, stop: Option<isize>) -> Self {
        Slice {
            start: start.map(Bound::Position),
            stop: stop.map(Bound::Position),
            step: None,
        }
    }

    /// `start:stop`
    pub fn range(start: isize, stop: isize) -> Self {
        Slice::new(Some(start), Some(stop))
    }

    /// `start:`
    pub fn starting_at(start: isize) -> Self {
        Slice::new(Some(start), None)
    }

    /// `:stop`
    pub fn until(stop: isize) -> Self {
        Slice::new(None, Some(stop))
    }

    /// Column slice bounded by names; the stop column is included.
    pub fn labels(start: Option<&str>, stop: Option<&str>) -> Self {
        Slice {
            start: start.map(|s| Bound::Label(s.to_string())),
            stop: stop.map(|s| Bound::Label(s.to_string())),
            step: None,
        }
    }

    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(Bound::Position(step));
        self
    }
}

/// Positions selected by `start:stop:step` over a sequence of `len` items,
/// with the usual negative-index and clamping rules.
pub fn slice_positions(
    start: Option<isize>,
    stop: Option<isize>,
    step: Option<isize>,
    len: usize,
) -> Result<Vec<usize>> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(FrameError::InvalidSelectorValue(
            "slice step cannot be zero".to_string(),
        ));
    }

    let len = len as isize;
    let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
    let clamp = |bound: Option<isize>, default: isize| match bound {
        None => default,
        Some(b) => {
            let b = if b < 0 { b + len } else { b };
            b.clamp(lower, upper)
        }
    };

    let start = clamp(start, if step > 0 { lower } else { upper });
    let stop = clamp(stop, if step > 0 { upper } else { lower });

    let mut positions = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        positions.push(i as usize);
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    Ok(positions)
}

// ============================================================================
// RESOLVED SELECTION
// ============================================================================

/// Which rows to extract.
#[derive(Debug, Clone, PartialEq)]
pub enum RowSelection {
    /// Explicit positions, order and duplicates preserved. Negative values
    /// count from the end.
    Positions(Vec<isize>),
    /// Integer-bounded range over positions.
    Slice {
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    },
    /// Length equals the table's row count.
    Mask(Vec<bool>),
}

impl RowSelection {
    pub fn all() -> Self {
        RowSelection::Slice {
            start: None,
            stop: None,
            step: None,
        }
    }
}

/// Output of the resolver: a row selection plus the ordered column names.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    pub rows: RowSelection,
    pub columns: Vec<String>,
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves a key against `table`.
pub fn resolve(table: &Table, key: Key) -> Result<ResolvedSelection> {
    match key {
        Key::Label(name) => {
            table.position(&name)?;
            Ok(ResolvedSelection {
                rows: RowSelection::all(),
                columns: vec![name],
            })
        }
        Key::List(items) => {
            let mut columns = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    KeyItem::Label(name) => {
                        table.position(&name)?;
                        columns.push(name);
                    }
                    KeyItem::Position(p) => {
                        return Err(FrameError::InvalidSelectorType(format!(
                            "a column list may only hold names outside a (row, column) pair, got position {}",
                            p
                        )));
                    }
                }
            }
            Ok(ResolvedSelection {
                rows: RowSelection::all(),
                columns,
            })
        }
        Key::Mask(mask) => Ok(ResolvedSelection {
            rows: RowSelection::Mask(mask_from_table(&mask, table.len())?),
            columns: table.columns().to_vec(),
        }),
        Key::Tuple(parts) => resolve_tuple(table, parts),
        Key::Position(_) | Key::Slice(_) => Err(FrameError::InvalidSelectorType(
            "select with a name, a list of names, a boolean table or a (row, column) pair".to_string(),
        )),
    }
}

fn resolve_tuple(table: &Table, parts: Vec<Key>) -> Result<ResolvedSelection> {
    let [row_key, col_key]: [Key; 2] = parts.try_into().map_err(|parts: Vec<Key>| {
        FrameError::InvalidSelectorValue(format!(
            "a (row, column) selection needs exactly 2 parts, got {}",
            parts.len()
        ))
    })?;

    let rows = resolve_rows(table, row_key)?;
    let columns = resolve_columns(table, col_key)?;
    trace!("resolved rows {:?}, columns {:?}", rows, columns);
    Ok(ResolvedSelection { rows, columns })
}

fn resolve_rows(table: &Table, key: Key) -> Result<RowSelection> {
    match key {
        Key::Position(p) => Ok(RowSelection::Positions(vec![p])),
        Key::List(items) => items
            .into_iter()
            .map(|item| match item {
                KeyItem::Position(p) => Ok(p),
                KeyItem::Label(name) => Err(FrameError::InvalidSelectorType(format!(
                    "row lists hold positions, got label '{}'",
                    name
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(RowSelection::Positions),
        Key::Mask(mask) => Ok(RowSelection::Mask(mask_from_table(&mask, table.len())?)),
        Key::Slice(slice) => Ok(RowSelection::Slice {
            start: row_bound(slice.start)?,
            stop: row_bound(slice.stop)?,
            step: row_bound(slice.step)?,
        }),
        Key::Label(_) | Key::Tuple(_) => Err(FrameError::InvalidSelectorType(
            "row selection must be an int, a slice, a list of ints or a boolean table".to_string(),
        )),
    }
}

fn row_bound(bound: Option<Bound>) -> Result<Option<isize>> {
    match bound {
        None => Ok(None),
        Some(Bound::Position(p)) => Ok(Some(p)),
        Some(Bound::Label(name)) => Err(FrameError::InvalidSelectorType(format!(
            "row slices take integer bounds, got '{}'",
            name
        ))),
    }
}

fn resolve_columns(table: &Table, key: Key) -> Result<Vec<String>> {
    let names = table.columns();
    match key {
        Key::Position(p) => Ok(vec![column_at(names, p)?]),
        Key::Label(name) => {
            table.position(&name)?;
            Ok(vec![name])
        }
        Key::List(items) => items
            .into_iter()
            .map(|item| match item {
                KeyItem::Position(p) => column_at(names, p),
                KeyItem::Label(name) => table.position(&name).map(|_| name),
            })
            .collect(),
        Key::Slice(slice) => {
            // Label bounds become positions; a label stop is made inclusive.
            let start = match slice.start {
                None => None,
                Some(Bound::Position(p)) => Some(p),
                Some(Bound::Label(name)) => Some(table.position(&name)? as isize),
            };
            let stop = match slice.stop {
                None => None,
                Some(Bound::Position(p)) => Some(p),
                Some(Bound::Label(name)) => Some(table.position(&name)? as isize + 1),
            };
            let step = match slice.step {
                None => None,
                Some(Bound::Position(p)) => Some(p),
                Some(Bound::Label(name)) => {
                    return Err(FrameError::InvalidSelectorType(format!(
                        "slice step must be an integer, got '{}'",
                        name
                    )))
                }
            };
            Ok(slice_positions(start, stop, step, names.len())?
                .into_iter()
                .map(|i| names[i].clone())
                .collect())
        }
        Key::Mask(_) | Key::Tuple(_) => Err(FrameError::InvalidSelectorType(
            "column selection must be an int, a string, a list or a slice".to_string(),
        )),
    }
}

fn column_at(names: &[String], position: isize) -> Result<String> {
    normalize_position(position, names.len()).map(|i| names[i].clone())
}

/// Maps a possibly negative position onto `0..len`.
pub(crate) fn normalize_position(position: isize, len: usize) -> Result<usize> {
    let resolved = if position < 0 {
        position + len as isize
    } else {
        position
    };
    if resolved < 0 || resolved >= len as isize {
        return Err(FrameError::IndexOutOfBounds {
            index: position,
            len,
        });
    }
    Ok(resolved as usize)
}

/// Unwraps a one-column boolean table into a mask of `row_count` entries.
fn mask_from_table(mask: &Table, row_count: usize) -> Result<Vec<bool>> {
    if mask.num_columns() != 1 {
        return Err(FrameError::ShapeMismatch(format!(
            "a boolean selector must have exactly one column, got {}",
            mask.num_columns()
        )));
    }
    let (name, column) = mask
        .iter()
        .next()
        .ok_or_else(|| FrameError::ShapeMismatch("empty boolean selector".to_string()))?;
    let values = column.as_bool().ok_or_else(|| {
        FrameError::InvalidSelectorValue(format!(
            "selector column '{}' must be boolean, got {}",
            name,
            column.dtype().name()
        ))
    })?;
    if values.len() != row_count {
        return Err(FrameError::ShapeMismatch(format!(
            "boolean selector has {} rows, table has {}",
            values.len(),
            row_count
        )));
    }
    Ok(values.to_vec())
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl Key {
    /// A `(row, column)` pair.
    pub fn pair(row: impl Into<Key>, col: impl Into<Key>) -> Self {
        Key::Tuple(vec![row.into(), col.into()])
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Label(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Label(name)
    }
}

impl From<isize> for Key {
    fn from(position: isize) -> Self {
        Key::Position(position)
    }
}

impl From<Slice> for Key {
    fn from(slice: Slice) -> Self {
        Key::Slice(slice)
    }
}

impl From<Table> for Key {
    fn from(mask: Table) -> Self {
        Key::Mask(mask)
    }
}

impl From<&Table> for Key {
    fn from(mask: &Table) -> Self {
        Key::Mask(mask.clone())
    }
}

impl From<Vec<&str>> for Key {
    fn from(names: Vec<&str>) -> Self {
        Key::List(names.into_iter().map(KeyItem::from).collect())
    }
}

impl From<Vec<String>> for Key {
    fn from(names: Vec<String>) -> Self {
        Key::List(names.into_iter().map(KeyItem::Label).collect())
    }
}

impl From<Vec<isize>> for Key {
    fn from(positions: Vec<isize>) -> Self {
        Key::List(positions.into_iter().map(KeyItem::Position).collect())
    }
}

impl From<Vec<KeyItem>> for Key {
    fn from(items: Vec<KeyItem>) -> Self {
        Key::List(items)
    }
}

impl<R: Into<Key>, C: Into<Key>> From<(R, C)> for Key {
    fn from((row, col): (R, C)) -> Self {
        Key::pair(row, col)
    }
}

impl From<&str> for KeyItem {
    fn from(name: &str) -> Self {
        KeyItem::Label(name.to_string())
    }
}

impl From<isize> for KeyItem {
    fn from(position: isize) -> Self {
        KeyItem::Position(position)
    }
}
