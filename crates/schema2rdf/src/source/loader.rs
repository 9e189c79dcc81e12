//! Load delimited model tables from disk.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;

use crate::error::SourceError;

/// A delimited table: header row plus data rows, cells trimmed.
#[derive(Debug, Clone)]
pub struct SourceTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl SourceTable {
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Deserialize every data row, paired with its 1-based row index.
    pub fn rows<T: DeserializeOwned>(
        &self,
    ) -> impl Iterator<Item = (usize, Result<T, SourceError>)> + '_ {
        self.records.iter().enumerate().map(move |(i, record)| {
            let row = i + 1;
            let parsed = record
                .deserialize(Some(&self.headers))
                .map_err(|e| SourceError::MalformedRow {
                    row,
                    reason: e.to_string(),
                });
            (row, parsed)
        })
    }
}

/// Delimiter implied by a file suffix: tab for `.tsv`, `.tab` and `.txt`,
/// comma otherwise.
pub fn delimiter_for(path: &Path) -> u8 {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("tsv" | "tab" | "txt") => b'\t',
        _ => b',',
    }
}

/// Load a table from disk, using `delimiter` or the one implied by the suffix.
pub fn load_table(path: &Path, delimiter: Option<u8>) -> Result<SourceTable, SourceError> {
    let content = std::fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let delimiter = delimiter.unwrap_or_else(|| delimiter_for(path));
    read_table(content.as_slice(), delimiter)
}

/// Read a table from any reader.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<SourceTable, SourceError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut records = reader.records().collect::<Result<Vec<_>, _>>()?;
    // Spreadsheet exports drop trailing empty cells; pad so every row
    // deserializes against the full header.
    for record in &mut records {
        while record.len() < headers.len() {
            record.push_field("");
        }
    }
    log::debug!("read {} rows with columns {:?}", records.len(), headers);
    Ok(SourceTable { headers, records })
}
