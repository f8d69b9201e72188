use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "FOOTPRINT_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should parse");

    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.data_dir, PathBuf::from("data"));
    assert_eq!(cfg.locations_path, PathBuf::from("data/locations.csv"));
    assert_eq!(cfg.geodata_path, PathBuf::from("out/geodata.json"));
    assert_eq!(cfg.source_format, SourceFormat::Csv);
    assert_eq!(cfg.row_filter, "`Country/Region` == 'United Kingdom'");
    assert_eq!(cfg.nominatim_url, "https://nominatim.openstreetmap.org");
    assert_eq!(
        cfg.overpass_url,
        "https://overpass.private.coffee/api/interpreter"
    );
    assert_eq!(cfg.postcodes_url, "https://api.postcodes.io");
    assert_eq!(cfg.user_agent, "footprint/0.1 (location-intelligence)");
    assert_eq!(cfg.request_timeout_secs, 25);
    assert_eq!(cfg.postcode_timeout_secs, 10);
    assert_eq!(cfg.search_radius_m, 30);
    assert_eq!(cfg.code_lookup_delay_ms, 2000);
    assert_eq!(cfg.geocode_delay_ms, 1000);
    assert_eq!(cfg.brand_search_timeout_secs, 1200);
}

#[test]
fn build_app_config_excel_format_switches_default_filter() {
    let mut map = HashMap::new();
    map.insert("FOOTPRINT_SOURCE_FORMAT", "excel");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.source_format, SourceFormat::Excel);
    assert_eq!(cfg.row_filter, "`P1L_Counrty` == 'UK'");
}

#[test]
fn build_app_config_explicit_filter_wins_over_format_default() {
    let mut map = HashMap::new();
    map.insert("FOOTPRINT_SOURCE_FORMAT", "excel");
    map.insert("FOOTPRINT_ROW_FILTER", "`P1L_Counrty` == 'IE'");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.row_filter, "`P1L_Counrty` == 'IE'");
}

#[test]
fn build_app_config_fails_with_unknown_source_format() {
    let mut map = HashMap::new();
    map.insert("FOOTPRINT_SOURCE_FORMAT", "parquet");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOOTPRINT_SOURCE_FORMAT"),
        "expected InvalidEnvVar(FOOTPRINT_SOURCE_FORMAT), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("FOOTPRINT_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOOTPRINT_BIND_ADDR"),
        "expected InvalidEnvVar(FOOTPRINT_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_path_overrides() {
    let mut map = HashMap::new();
    map.insert("FOOTPRINT_DATA_DIR", "/srv/footprint/data");
    map.insert("FOOTPRINT_LOCATIONS_PATH", "/srv/footprint/data/sites.xlsx");
    map.insert("FOOTPRINT_GEODATA_PATH", "/srv/footprint/out/geo.json");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.data_dir, PathBuf::from("/srv/footprint/data"));
    assert_eq!(
        cfg.locations_path,
        PathBuf::from("/srv/footprint/data/sites.xlsx")
    );
    assert_eq!(cfg.geodata_path, PathBuf::from("/srv/footprint/out/geo.json"));
}

#[test]
fn build_app_config_search_radius_override() {
    let mut map = HashMap::new();
    map.insert("FOOTPRINT_SEARCH_RADIUS_M", "75");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.search_radius_m, 75);
}

#[test]
fn build_app_config_search_radius_invalid() {
    let mut map = HashMap::new();
    map.insert("FOOTPRINT_SEARCH_RADIUS_M", "-5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOOTPRINT_SEARCH_RADIUS_M"),
        "expected InvalidEnvVar(FOOTPRINT_SEARCH_RADIUS_M), got: {result:?}"
    );
}

#[test]
fn build_app_config_delay_overrides() {
    let mut map = HashMap::new();
    map.insert("FOOTPRINT_CODE_LOOKUP_DELAY_MS", "0");
    map.insert("FOOTPRINT_GEOCODE_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.code_lookup_delay_ms, 0);
    assert_eq!(cfg.geocode_delay_ms, 0);
}

#[test]
fn build_app_config_delay_invalid() {
    let mut map = HashMap::new();
    map.insert("FOOTPRINT_GEOCODE_DELAY_MS", "one second");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "FOOTPRINT_GEOCODE_DELAY_MS"),
        "expected InvalidEnvVar(FOOTPRINT_GEOCODE_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_upstream_url_overrides() {
    let mut map = HashMap::new();
    map.insert("FOOTPRINT_NOMINATIM_URL", "http://127.0.0.1:9001");
    map.insert("FOOTPRINT_OVERPASS_URL", "http://127.0.0.1:9002/api/interpreter");
    map.insert("FOOTPRINT_POSTCODES_URL", "http://127.0.0.1:9003");
    map.insert("FOOTPRINT_USER_AGENT", "footprint-test/0.1");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.nominatim_url, "http://127.0.0.1:9001");
    assert_eq!(cfg.overpass_url, "http://127.0.0.1:9002/api/interpreter");
    assert_eq!(cfg.postcodes_url, "http://127.0.0.1:9003");
    assert_eq!(cfg.user_agent, "footprint-test/0.1");
}
