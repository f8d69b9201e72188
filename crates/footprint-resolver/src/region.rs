//! ISO 3166 reference names used to label brand search results.
//!
//! Names come from the `rust_iso3166` registry. A small bundled table of
//! common short names ("United States", "United Kingdom") takes precedence,
//! and `{data_dir}/iso3166.json` may replace that table.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Outcome, ResolveError};

const BUNDLED: &str = include_str!("../data/iso3166.json");

/// File name of the optional override inside the data directory.
pub const OVERRIDE_FILE: &str = "iso3166.json";

/// Preferred ISO 3166-1 alpha-2 country names and ISO 3166-2 subdivision
/// names, consulted before the registry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionTable {
    #[serde(default)]
    countries: HashMap<String, String>,
    #[serde(default)]
    subdivisions: HashMap<String, String>,
}

/// Labels derived from a region code such as `US-CA`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionLabel {
    pub country_code: String,
    /// Empty when the country code is unknown.
    pub country: String,
    /// `"<subdivision>, <country>"`; unknown parts are empty.
    pub address: String,
}

impl RegionTable {
    /// The table compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Deserialize`] if the bundled data is malformed.
    pub fn bundled() -> Outcome<Self> {
        Self::from_json(BUNDLED, "bundled region table")
    }

    /// Loads `{data_dir}/iso3166.json` when present, else the bundled table.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::RegionTable`] if the override exists but cannot be read.
    /// - [`ResolveError::Deserialize`] if the chosen table is malformed.
    pub fn load(data_dir: &Path) -> Outcome<Self> {
        let path = data_dir.join(OVERRIDE_FILE);
        if !path.exists() {
            return Self::bundled();
        }
        let json = std::fs::read_to_string(&path).map_err(|source| ResolveError::RegionTable {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "using region table override");
        Self::from_json(&json, &path.display().to_string())
    }

    fn from_json(json: &str, context: &str) -> Outcome<Self> {
        let table: Self = serde_json::from_str(json).map_err(|e| ResolveError::Deserialize {
            context: context.to_string(),
            source: e,
        })?;
        // Keys are matched upper-case.
        Ok(Self {
            countries: upper_keys(table.countries),
            subdivisions: upper_keys(table.subdivisions),
        })
    }

    #[must_use]
    pub fn country_name(&self, alpha2: &str) -> Option<&str> {
        let alpha2 = alpha2.to_ascii_uppercase();
        self.countries
            .get(&alpha2)
            .map(String::as_str)
            .or_else(|| rust_iso3166::from_alpha2(&alpha2).map(|c| c.name))
    }

    #[must_use]
    pub fn subdivision_name(&self, code: &str) -> Option<&str> {
        let code = code.to_ascii_uppercase();
        self.subdivisions
            .get(&code)
            .map(String::as_str)
            .or_else(|| rust_iso3166::iso3166_2::from_code(&code).map(|s| s.name))
    }

    #[must_use]
    pub fn label(&self, region: &str) -> RegionLabel {
        let region = region.to_ascii_uppercase();
        let country_code = region.split('-').next().unwrap_or_default().to_string();
        let country = self.country_name(&country_code).unwrap_or_default().to_string();
        let subdivision = self.subdivision_name(&region).unwrap_or_default();
        RegionLabel {
            address: format!("{subdivision}, {country}"),
            country_code,
            country,
        }
    }
}

fn upper_keys(map: HashMap<String, String>) -> HashMap<String, String> {
    map.into_iter()
        .map(|(k, v)| (k.to_ascii_uppercase(), v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_table_covers_us_states_and_uk_nations() {
        let table = RegionTable::bundled().unwrap();
        assert_eq!(table.country_name("US"), Some("United States"));
        assert_eq!(table.country_name("gb"), Some("United Kingdom"));
        assert_eq!(table.subdivision_name("US-CA"), Some("California"));
        assert_eq!(table.subdivision_name("GB-SCT"), Some("Scotland"));
    }

    #[test]
    fn label_joins_subdivision_and_country() {
        let table = RegionTable::bundled().unwrap();
        assert_eq!(
            table.label("us-tx"),
            RegionLabel {
                country_code: "US".to_string(),
                country: "United States".to_string(),
                address: "Texas, United States".to_string(),
            }
        );
    }

    #[test]
    fn registry_covers_subdivisions_outside_bundled_table() {
        let table = RegionTable::bundled().unwrap();
        for (region, country) in [
            ("FR-IDF", "France"),
            ("JP-13", "Japan"),
            ("NG-LA", "Nigeria"),
            ("IT-25", "Italy"),
            ("GB-LND", "United Kingdom"),
        ] {
            let label = table.label(region);
            assert_eq!(label.country, country, "{region}");
            assert!(
                label.address.ends_with(&format!(", {country}")),
                "{region}: {}",
                label.address
            );
            assert!(!label.address.starts_with(", "), "{region}: {}", label.address);
        }
    }

    #[test]
    fn registry_supplies_countries_missing_from_bundled_table() {
        let table = RegionTable::bundled().unwrap();
        assert!(table.country_name("NG").is_some_and(|n| !n.is_empty()));
        assert!(table.country_name("KE").is_some());
        assert!(table.subdivision_name("fr-idf").is_some());
    }

    #[test]
    fn unknown_parts_become_empty() {
        let table = RegionTable::bundled().unwrap();
        let label = table.label("ZZ-QQ");
        assert_eq!(label.country_code, "ZZ");
        assert_eq!(label.country, "");
        assert_eq!(label.address, ", ");
    }

    #[test]
    fn load_prefers_override_file() {
        let dir = std::env::temp_dir().join(format!("footprint-region-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(OVERRIDE_FILE),
            r#"{"countries": {"xx": "Testland", "us": "USA"}, "subdivisions": {"XX-01": "North"}}"#,
        )
        .unwrap();

        let table = RegionTable::load(&dir).unwrap();
        assert_eq!(table.label("XX-01").address, "North, Testland");
        assert_eq!(table.country_name("US"), Some("USA"));
        assert_eq!(table.label("US-CA").address, "California, USA");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_falls_back_to_bundled_table() {
        let dir = std::env::temp_dir().join("footprint-region-no-override");
        let table = RegionTable::load(&dir).unwrap();
        assert_eq!(table.country_name("DE"), Some("Germany"));
    }

    #[test]
    fn malformed_override_is_a_deserialize_error() {
        let dir = std::env::temp_dir().join(format!(
            "footprint-region-bad-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(OVERRIDE_FILE), "not json").unwrap();

        let err = RegionTable::load(&dir).unwrap_err();
        assert!(matches!(err, ResolveError::Deserialize { .. }));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
