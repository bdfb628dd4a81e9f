//! CSV Upload Loader Module
//! Reads an uploaded CSV with Polars, keeping every cell as text.

use crate::error::{DashboardError, Result};
use log::{debug, info};
use polars::prelude::*;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;

/// Header plus text cells of an upload, column-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    columns: Vec<Vec<Option<String>>>,
    height: usize,
}

impl RawTable {
    /// Build from row-major cells. Short rows are padded with missing cells.
    pub fn from_rows<S: AsRef<str>>(headers: &[S], rows: &[Vec<Option<&str>>]) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let columns = (0..headers.len())
            .map(|c| {
                rows.iter()
                    .map(|row| row.get(c).copied().flatten().map(str::to_string))
                    .collect()
            })
            .collect();

        Self {
            headers,
            columns,
            height: rows.len(),
        }
    }

    fn from_frame(frame: &DataFrame) -> Result<Self> {
        let headers = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut columns = Vec::with_capacity(frame.width());
        for column in frame.get_columns() {
            let text = column.cast(&DataType::String)?;
            let cells: Vec<Option<String>> = text
                .as_materialized_series()
                .str()?
                .into_iter()
                .map(|cell| cell.map(str::to_string))
                .collect();
            columns.push(cells);
        }

        Ok(Self {
            headers,
            columns,
            height: frame.height(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Cell text at (row, column); `None` for nulls and out-of-range.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.columns.get(column)?.get(row)?.as_deref()
    }
}

/// A parsed upload with its content digest.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub digest: String,
    pub table: RawTable,
}

/// Handles CSV loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Read a CSV file from disk.
    pub fn load_csv(path: &Path) -> Result<Upload> {
        if path.as_os_str().is_empty() {
            return Err(DashboardError::NoFileProvided);
        }

        let bytes = std::fs::read(path).map_err(|e| DashboardError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self::load_bytes(&name, bytes)
    }

    /// Parse an in-memory upload.
    pub fn load_bytes(name: &str, bytes: Vec<u8>) -> Result<Upload> {
        if bytes.is_empty() {
            return Err(DashboardError::NoFileProvided);
        }

        let digest = content_digest(&bytes);
        debug!("Parsing upload '{}' ({} bytes, digest {})", name, bytes.len(), digest);

        // No schema inference: the cleaner owns all type coercion.
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        let table = RawTable::from_frame(&frame)?;
        info!(
            "Loaded '{}': {} rows, {} columns",
            name,
            table.height(),
            table.width()
        );

        Ok(Upload {
            name: name.to_string(),
            digest,
            table,
        })
    }
}

/// Hex SHA-256 of the upload bytes.
pub fn content_digest(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bytes_keeps_text() {
        let csv = "State,Year,Rainfall\nSelangor,2010,\"150,5\"\nJohor,,-\n";
        let upload = DataLoader::load_bytes("sample.csv", csv.as_bytes().to_vec()).unwrap();

        assert_eq!(upload.table.headers(), &["State", "Year", "Rainfall"]);
        assert_eq!(upload.table.height(), 2);
        assert_eq!(upload.table.cell(0, 2), Some("150,5"));
        assert_eq!(upload.table.cell(1, 1), None);
        assert_eq!(upload.table.cell(1, 2), Some("-"));
    }

    #[test]
    fn test_empty_upload() {
        assert!(matches!(
            DataLoader::load_bytes("empty.csv", Vec::new()),
            Err(DashboardError::NoFileProvided)
        ));
    }

    #[test]
    fn test_digest_changes_with_content() {
        assert_eq!(content_digest(b"a"), content_digest(b"a"));
        assert_ne!(content_digest(b"a"), content_digest(b"b"));
        assert_eq!(content_digest(b"").len(), 64);
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let table = RawTable::from_rows(&["A", "B"], &[vec![Some("1")]]);
        assert_eq!(table.cell(0, 0), Some("1"));
        assert_eq!(table.cell(0, 1), None);
        assert_eq!(table.column_index("B"), Some(1));
    }
}
