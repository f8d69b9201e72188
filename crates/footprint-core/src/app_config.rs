use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Layout of the tabular location source.
///
/// `Csv` is the coordinate export (Longitude/Latitude columns, resolved through
/// reverse geocoding). `Excel` is the site register keyed by Plus Code and
/// postcode, resolved through the nearest-feature search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Excel,
}

impl SourceFormat {
    /// Row filter used when `FOOTPRINT_ROW_FILTER` is not set.
    #[must_use]
    pub fn default_row_filter(self) -> &'static str {
        match self {
            SourceFormat::Csv => "`Country/Region` == 'United Kingdom'",
            SourceFormat::Excel => "`P1L_Counrty` == 'UK'",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Csv => write!(f, "csv"),
            SourceFormat::Excel => write!(f, "excel"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub locations_path: PathBuf,
    pub geodata_path: PathBuf,
    pub source_format: SourceFormat,
    pub row_filter: String,
    pub nominatim_url: String,
    pub overpass_url: String,
    pub postcodes_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub postcode_timeout_secs: u64,
    pub search_radius_m: u32,
    pub code_lookup_delay_ms: u64,
    pub geocode_delay_ms: u64,
    pub brand_search_timeout_secs: u64,
}
