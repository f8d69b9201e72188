use crate::app_config::{AppConfig, Environment, SourceFormat};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every key has a default, so the only failure mode is a value that does not
/// parse. Tests drive this with a `HashMap` lookup instead of touching the
/// process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("FOOTPRINT_ENV", "development"))?;

    let bind_addr = or_default("FOOTPRINT_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("FOOTPRINT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("FOOTPRINT_LOG_LEVEL", "info");

    let data_dir = PathBuf::from(or_default("FOOTPRINT_DATA_DIR", "data"));
    let locations_path =
        PathBuf::from(or_default("FOOTPRINT_LOCATIONS_PATH", "data/locations.csv"));
    let geodata_path = PathBuf::from(or_default("FOOTPRINT_GEODATA_PATH", "out/geodata.json"));

    let source_format = parse_source_format(&or_default("FOOTPRINT_SOURCE_FORMAT", "csv"))?;
    let row_filter = or_default(
        "FOOTPRINT_ROW_FILTER",
        source_format.default_row_filter(),
    );

    let nominatim_url = or_default(
        "FOOTPRINT_NOMINATIM_URL",
        "https://nominatim.openstreetmap.org",
    );
    let overpass_url = or_default(
        "FOOTPRINT_OVERPASS_URL",
        "https://overpass.private.coffee/api/interpreter",
    );
    let postcodes_url = or_default("FOOTPRINT_POSTCODES_URL", "https://api.postcodes.io");
    let user_agent = or_default(
        "FOOTPRINT_USER_AGENT",
        "footprint/0.1 (location-intelligence)",
    );

    let request_timeout_secs = parse_u64("FOOTPRINT_REQUEST_TIMEOUT_SECS", "25")?;
    let postcode_timeout_secs = parse_u64("FOOTPRINT_POSTCODE_TIMEOUT_SECS", "10")?;
    let search_radius_m = parse_u32("FOOTPRINT_SEARCH_RADIUS_M", "30")?;
    let code_lookup_delay_ms = parse_u64("FOOTPRINT_CODE_LOOKUP_DELAY_MS", "2000")?;
    let geocode_delay_ms = parse_u64("FOOTPRINT_GEOCODE_DELAY_MS", "1000")?;
    let brand_search_timeout_secs = parse_u64("FOOTPRINT_BRAND_SEARCH_TIMEOUT_SECS", "1200")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        data_dir,
        locations_path,
        geodata_path,
        source_format,
        row_filter,
        nominatim_url,
        overpass_url,
        postcodes_url,
        user_agent,
        request_timeout_secs,
        postcode_timeout_secs,
        search_radius_m,
        code_lookup_delay_ms,
        geocode_delay_ms,
        brand_search_timeout_secs,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOOTPRINT_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

fn parse_source_format(s: &str) -> Result<SourceFormat, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "csv" => Ok(SourceFormat::Csv),
        "excel" | "xlsx" => Ok(SourceFormat::Excel),
        other => Err(ConfigError::InvalidEnvVar {
            var: "FOOTPRINT_SOURCE_FORMAT".to_string(),
            reason: format!("expected csv or excel; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
