//! CSV reading and writing for [`Table`].

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::Table;
use crate::error::{Result, TableError};

impl Table {
    /// Load a comma-delimited CSV file with a header row.
    ///
    /// The table is named after the file stem. Quoted fields may contain
    /// commas; rows whose field count differs from the header are rejected.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let table = Self::from_reader(name, file)?;
        tracing::debug!(
            "Loaded {} rows x {} columns from {:?}",
            table.len(),
            table.headers().len(),
            path
        );
        Ok(table)
    }

    /// Parse CSV content from any reader.
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let csv_err = |source: csv::Error| TableError::Csv {
            table: name.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_err)?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(Self::new(name, headers, rows))
    }

    /// Write headers and rows as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let csv_err = |source: csv::Error| TableError::Csv {
            table: self.name.clone(),
            source,
        };

        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers).map_err(csv_err)?;
        for row in &self.rows {
            writer.write_record(row).map_err(csv_err)?;
        }
        writer.flush().map_err(|e| csv_err(e.into()))?;

        Ok(())
    }

    /// Write the table to a CSV file, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.write_csv(file)
    }
}
