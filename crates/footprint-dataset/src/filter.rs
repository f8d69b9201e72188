//! Dataset Filter: load a tabular source, keep matching rows, normalize.

use std::path::Path;

use footprint_core::SourceFormat;

use crate::error::DatasetError;
use crate::predicate::Predicate;
use crate::record::{ColumnMap, LocationRecord};
use crate::table::{read_csv, read_workbook, Row, Table};

/// Columns of the coordinate export that arrive wrapped in quotes or padding.
const CSV_TRIMMED_COLUMNS: [&str; 3] = ["Longitude", "Latitude", "Company Name"];

/// Loads `path`, keeps the rows matching `filter`, and normalizes them.
///
/// For [`SourceFormat::Csv`] the longitude, latitude, and company name cells
/// have surrounding `'` and space characters stripped. Row order follows the
/// source.
///
/// # Errors
///
/// - [`DatasetError::NotFound`] if `path` does not exist.
/// - [`DatasetError::InvalidFilter`] if `filter` does not parse.
/// - [`DatasetError::UnknownColumn`] if `filter` names a column the file lacks.
/// - [`DatasetError::MissingColumn`] if a CSV source lacks a normalized column.
/// - [`DatasetError::Csv`] / [`DatasetError::Workbook`] if the file cannot be parsed.
pub fn filter_dataset(
    path: &Path,
    filter: &str,
    format: SourceFormat,
) -> Result<Vec<Row>, DatasetError> {
    let predicate = Predicate::parse(filter)?;

    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }

    let table = match format {
        SourceFormat::Csv => read_csv(path)?,
        SourceFormat::Excel => read_workbook(path)?,
    };
    predicate.validate(&table.headers)?;

    let total = table.rows.len();
    let rows = match format {
        SourceFormat::Csv => normalize_csv(table, &predicate)?,
        SourceFormat::Excel => table
            .rows
            .into_iter()
            .filter(|row| predicate.matches(row))
            .collect(),
    };

    tracing::info!(
        path = %path.display(),
        format = %format,
        filter = predicate.source(),
        total,
        kept = rows.len(),
        "dataset filtered"
    );

    Ok(rows)
}

/// [`filter_dataset`] followed by record extraction with the format's column map.
///
/// # Errors
///
/// Same as [`filter_dataset`].
pub fn load_records(
    path: &Path,
    filter: &str,
    format: SourceFormat,
) -> Result<Vec<LocationRecord>, DatasetError> {
    let columns = ColumnMap::for_format(format);
    Ok(filter_dataset(path, filter, format)?
        .iter()
        .map(|row| LocationRecord::from_row(row, &columns))
        .collect())
}

fn normalize_csv(table: Table, predicate: &Predicate) -> Result<Vec<Row>, DatasetError> {
    if let Some(missing) = CSV_TRIMMED_COLUMNS
        .iter()
        .find(|col| !table.has_column(col))
    {
        return Err(DatasetError::MissingColumn((*missing).to_string()));
    }

    Ok(table
        .rows
        .into_iter()
        .filter(|row| predicate.matches(row))
        .map(|mut row| {
            for column in CSV_TRIMMED_COLUMNS {
                let trimmed = row
                    .get(column)
                    .unwrap_or_default()
                    .trim_matches(|c| c == ' ' || c == '\'')
                    .to_string();
                row.set(column, trimmed);
            }
            row
        })
        .collect())
}
