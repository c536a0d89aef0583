//! In-memory CSV tables.
//!
//! A [`Table`] is a header row plus string cells. Cells an outer join could
//! not fill are empty strings.

pub mod join;
pub mod loader;

use crate::error::{Result, TableError};

/// A named table of string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from headers and rows. Rows shorter than the header are
    /// padded with empty cells.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the table (names appear in error messages).
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, or `MissingColumn`.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| TableError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// All values of one column, in row order.
    pub fn column(&self, column: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Value of a single cell.
    pub fn cell(&self, row: usize, column: &str) -> Result<Option<&str>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.get(row).map(|r| r[idx].as_str()))
    }

    /// Append columns to the table. `values` holds one row of new cells per
    /// existing row, in the same order as `columns`.
    pub fn with_columns(mut self, columns: &[&str], values: Vec<Vec<String>>) -> Result<Self> {
        for column in columns {
            if self.headers.iter().any(|h| h == column) {
                return Err(TableError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.to_string(),
                });
            }
        }
        self.headers.extend(columns.iter().map(|c| c.to_string()));

        let mut values = values.into_iter();
        for row in &mut self.rows {
            let mut extra = values.next().unwrap_or_default();
            extra.resize(columns.len(), String::new());
            row.extend(extra);
        }

        Ok(self)
    }
}
