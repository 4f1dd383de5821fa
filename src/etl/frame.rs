//! Untyped tabular input as read from CSV.

use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// Header row plus string cells. Short rows are padded with empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path).map_err(csv::Error::from)?;
        Self::from_reader(file)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell at `row` in column `name`; empty for unknown columns.
    pub fn cell(&self, row: usize, name: &str) -> &str {
        self.column_index(name)
            .and_then(|i| self.rows.get(row).and_then(|r| r.get(i)))
            .map(String::as_str)
            .unwrap_or("")
    }
}
