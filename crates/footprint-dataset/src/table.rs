//! Raw table loading for CSV and Excel sources.

use std::path::Path;
use std::sync::Arc;

use calamine::{open_workbook_auto, Reader};

use crate::error::DatasetError;

/// One source row: cell values keyed by the shared header list.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl Row {
    pub(crate) fn new(headers: Arc<[String]>, mut values: Vec<String>) -> Self {
        // Short rows are padded so every header has a cell.
        values.resize(headers.len(), String::new());
        Self { headers, values }
    }

    /// Returns the cell under `column`, or `None` if the column does not exist.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == column)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    /// Returns the cell under `column` when it is present and not blank.
    #[must_use]
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }

    pub(crate) fn set(&mut self, column: &str, value: String) -> bool {
        match self.headers.iter().position(|h| h == column) {
            Some(idx) => {
                self.values[idx] = value;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }
}

/// A loaded table: the header row plus every data row in source order.
#[derive(Debug)]
pub(crate) struct Table {
    pub headers: Arc<[String]>,
    pub rows: Vec<Row>,
}

impl Table {
    pub(crate) fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

pub(crate) fn read_csv(path: &Path) -> Result<Table, DatasetError> {
    let csv_err = |source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Arc<[String]> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let values = record.iter().map(str::to_string).collect();
        rows.push(Row::new(Arc::clone(&headers), values));
    }

    Ok(Table { headers, rows })
}

/// Reads the first worksheet; its first row is the header.
pub(crate) fn read_workbook(path: &Path) -> Result<Table, DatasetError> {
    let workbook_err = |reason: String| DatasetError::Workbook {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| workbook_err("workbook has no worksheets".to_string()))?
        .map_err(|e| workbook_err(e.to_string()))?;

    let mut sheet_rows = range.rows();
    let headers: Arc<[String]> = match sheet_rows.next() {
        Some(cells) => cells.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Err(workbook_err("worksheet is empty".to_string())),
    };

    let rows = sheet_rows
        .map(|cells| {
            let values = cells.iter().map(ToString::to_string).collect();
            Row::new(Arc::clone(&headers), values)
        })
        .collect();

    Ok(Table { headers, rows })
}
