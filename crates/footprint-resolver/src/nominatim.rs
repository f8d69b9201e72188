//! Boundary resolution via Nominatim reverse geocoding.

use footprint_core::{Coordinate, Feature, Geometry, Properties, Ring};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::config::ResolverConfig;
use crate::error::{Outcome, ResolveError};
use crate::geometry::close_ring;
use crate::http::{build_client, join_segments, parse_base_url, read_json};

/// Address keys scanned, most specific first, for the feature's label.
const ADDRESS_KEYS: [&str; 7] = [
    "city", "town", "village", "hamlet", "suburb", "borough", "county",
];

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    features: Vec<ReverseFeature>,
}

#[derive(Debug, Deserialize)]
struct ReverseFeature {
    #[serde(default)]
    bbox: Option<[f64; 4]>,
    geometry: RawGeometry,
    #[serde(default)]
    properties: ReverseProperties,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
struct ReverseProperties {
    osm_id: Option<i64>,
    osm_type: Option<String>,
    #[serde(default)]
    address: serde_json::Map<String, serde_json::Value>,
}

/// Client for the Nominatim `/reverse` endpoint.
pub struct NominatimClient {
    client: Client,
    base_url: Url,
}

impl NominatimClient {
    /// # Errors
    ///
    /// Returns [`ResolveError::Http`] if the HTTP client cannot be built or
    /// [`ResolveError::InvalidBaseUrl`] if the configured URL does not parse.
    pub fn new(config: &ResolverConfig) -> Outcome<Self> {
        Ok(Self {
            client: build_client(&config.user_agent, config.request_timeout_secs)?,
            base_url: parse_base_url(&config.nominatim_url)?,
        })
    }

    /// Reverse-geocodes `coordinate` to the polygon of the object there.
    ///
    /// The returned feature carries the bbox, OSM identity, an address label,
    /// and the country name and code.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoFeature`] when the response holds no feature, or its
    ///   polygon has no non-empty ring.
    /// - [`ResolveError::DroppedGeometry`] for any geometry other than `Polygon`.
    /// - [`ResolveError::UnexpectedStatus`], [`ResolveError::Http`], or
    ///   [`ResolveError::Deserialize`] on request failures.
    pub async fn boundary(&self, coordinate: Coordinate) -> Outcome<Feature> {
        let url = join_segments(&self.base_url, &["reverse"])?;
        let response = self
            .client
            .get(url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("format", "geojson".to_string()),
                ("polygon_geojson", "1".to_string()),
                ("zoom", "18".to_string()),
                ("accept-language", "en".to_string()),
            ])
            .send()
            .await?;
        let body: ReverseResponse =
            read_json(response, &format!("reverse geocode ({coordinate})")).await?;

        let feature = body
            .features
            .into_iter()
            .next()
            .ok_or(ResolveError::NoFeature)?;

        if feature.geometry.kind != "Polygon" {
            return Err(ResolveError::DroppedGeometry(feature.geometry.kind));
        }
        let rings: Vec<Ring> = serde_json::from_value(feature.geometry.coordinates).map_err(
            |e| ResolveError::Deserialize {
                context: format!("polygon coordinates ({coordinate})"),
                source: e,
            },
        )?;
        let rings: Vec<Ring> = rings
            .into_iter()
            .filter(|ring| !ring.is_empty())
            .map(close_ring)
            .collect();
        if rings.is_empty() {
            return Err(ResolveError::NoFeature);
        }

        let address = &feature.properties.address;
        let country = address_value(address, "country");
        let country_code = address_value(address, "country_code").map(str::to_string);

        Ok(Feature {
            geometry: Geometry::Polygon(rings),
            bbox: feature.bbox,
            properties: Properties {
                osm_id: feature.properties.osm_id,
                osm_type: feature.properties.osm_type,
                address: Some(address_label(address)),
                country_code,
                country: country.map(str::to_string),
                ..Properties::default()
            },
        })
    }
}

fn address_value<'a>(
    address: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<&'a str> {
    address
        .get(key)
        .and_then(serde_json::Value::as_str)
        .filter(|v| !v.is_empty())
}

/// `"<locality>, <country>"` using the first locality key present, or just the
/// country.
fn address_label(address: &serde_json::Map<String, serde_json::Value>) -> String {
    let country = address_value(address, "country").unwrap_or_default();
    match ADDRESS_KEYS.iter().find_map(|key| address_value(address, key)) {
        Some(locality) => format!("{locality}, {country}"),
        None => country.to_string(),
    }
}
