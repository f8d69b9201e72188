//! Typed location records extracted from filtered rows.

use footprint_core::{Coordinate, SourceFormat};

use crate::table::Row;

/// Column names for one source layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub longitude: Option<&'static str>,
    pub latitude: Option<&'static str>,
    /// Cell holding a Plus Code, optionally followed by a locality
    /// (`"GV4M+J4 London"`); only the first token is used.
    pub plus_code: Option<&'static str>,
    pub postcode: Option<&'static str>,
    pub company_name: &'static str,
    pub entity_type: &'static str,
    pub country: &'static str,
}

impl ColumnMap {
    /// Coordinate export (CSV): one row per site with explicit lat/lon.
    #[must_use]
    pub fn coordinate_export() -> Self {
        Self {
            longitude: Some("Longitude"),
            latitude: Some("Latitude"),
            plus_code: None,
            postcode: None,
            company_name: "Company Name",
            entity_type: "Entity Type",
            country: "Country/Region",
        }
    }

    /// Site register (Excel): one row per site keyed by Plus Code and postcode.
    #[must_use]
    pub fn plus_code_register() -> Self {
        Self {
            longitude: None,
            latitude: None,
            plus_code: Some("GOOGLE LOC"),
            postcode: Some("P1L_Postcode"),
            company_name: "P1L_Name",
            entity_type: "P1L_Type",
            // Header spelling as it appears in the register.
            country: "P1L_Counrty",
        }
    }

    #[must_use]
    pub fn for_format(format: SourceFormat) -> Self {
        match format {
            SourceFormat::Csv => Self::coordinate_export(),
            SourceFormat::Excel => Self::plus_code_register(),
        }
    }
}

/// One input site. Immutable once extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub plus_code: Option<String>,
    pub postcode: Option<String>,
    pub company_name: String,
    /// Empty when the source leaves the cell blank.
    pub entity_type: String,
    pub country: Option<String>,
}

impl LocationRecord {
    #[must_use]
    pub fn from_row(row: &Row, columns: &ColumnMap) -> Self {
        let number = |column: Option<&str>| {
            column
                .and_then(|c| row.non_empty(c))
                .and_then(|v| v.parse::<f64>().ok())
        };
        let text = |column: Option<&str>| column.and_then(|c| row.non_empty(c)).map(str::to_string);

        Self {
            longitude: number(columns.longitude),
            latitude: number(columns.latitude),
            plus_code: columns
                .plus_code
                .and_then(|c| row.non_empty(c))
                .and_then(|v| v.split_whitespace().next())
                .map(str::to_string),
            postcode: text(columns.postcode),
            company_name: text(Some(columns.company_name)).unwrap_or_default(),
            entity_type: text(Some(columns.entity_type)).unwrap_or_default(),
            country: text(Some(columns.country)),
        }
    }

    /// Direct coordinate, when both latitude and longitude parsed.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            _ => None,
        }
    }
}
