//! FILENAME: core/frame/src/display.rs
//! PURPOSE: Plain-text rendering of a table.
//! CONTEXT: A header row of column names followed by one line per row, with a
//! leading row-position column. Cells are right-aligned to the widest entry.

use std::fmt;

use crate::table::Table;

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num_columns() == 0 {
            return f.write_str("Empty table");
        }

        let rows = self.values();
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
        grid.push(
            std::iter::once(String::new())
                .chain(self.columns().iter().cloned())
                .collect(),
        );
        for (i, row) in rows.iter().enumerate() {
            grid.push(
                std::iter::once(i.to_string())
                    .chain(row.iter().map(|v| v.to_string()))
                    .collect(),
            );
        }

        let widths: Vec<usize> = (0..grid[0].len())
            .map(|c| grid.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
            .collect();

        for (r, row) in grid.iter().enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{:>w$}", cell, w = w))
                .collect();
            f.write_str(line.join("  ").trim_end())?;
        }
        Ok(())
    }
}
