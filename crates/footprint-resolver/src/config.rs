use footprint_core::AppConfig;

/// Upstream endpoints and limits shared by every resolver client.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub nominatim_url: String,
    pub overpass_url: String,
    pub postcodes_url: String,
    pub user_agent: String,
    /// Timeout for reverse geocoding and radius searches, in seconds.
    pub request_timeout_secs: u64,
    pub postcode_timeout_secs: u64,
    /// Radius of the nearest-feature search, in meters.
    pub search_radius_m: u32,
    /// Server-side timeout placed in brand search queries, in seconds.
    pub brand_search_timeout_secs: u64,
}

impl ResolverConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            nominatim_url: config.nominatim_url.clone(),
            overpass_url: config.overpass_url.clone(),
            postcodes_url: config.postcodes_url.clone(),
            user_agent: config.user_agent.clone(),
            request_timeout_secs: config.request_timeout_secs,
            postcode_timeout_secs: config.postcode_timeout_secs,
            search_radius_m: config.search_radius_m,
            brand_search_timeout_secs: config.brand_search_timeout_secs,
        }
    }

    /// Config with every upstream pointed at `base_url` (a mock server).
    #[must_use]
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            nominatim_url: base_url.to_string(),
            overpass_url: format!("{}/api/interpreter", base_url.trim_end_matches('/')),
            postcodes_url: base_url.to_string(),
            user_agent: "footprint-test/0.1".to_string(),
            request_timeout_secs: 5,
            postcode_timeout_secs: 5,
            search_radius_m: 30,
            brand_search_timeout_secs: 60,
        }
    }
}
