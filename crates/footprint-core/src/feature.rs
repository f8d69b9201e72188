//! GeoJSON-shaped domain types shared by the resolvers, the pipeline, and the server.
//!
//! Positions are stored `[longitude, latitude]`, the GeoJSON axis order.
//! [`Coordinate`] is the latitude-first pair used at API boundaries.

use serde::{Deserialize, Serialize};

/// A closed sequence of `[lon, lat]` positions (first == last).
pub type Ring = Vec<[f64; 2]>;

/// A latitude/longitude pair in float degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Area geometry attached to a [`Feature`].
///
/// Serialized as `{"type": "Polygon", "coordinates": [...]}` and
/// `{"type": "MultiPolygon", "coordinates": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// Outer ring first, then any holes.
    Polygon(Vec<Ring>),
    /// One member polygon per constituent way.
    MultiPolygon(Vec<Vec<Ring>>),
}

impl Geometry {
    /// GeoJSON type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Iterates every ring of the geometry in order.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Ring> + '_> {
        match self {
            Geometry::Polygon(rings) => Box::new(rings.iter()),
            Geometry::MultiPolygon(polygons) => Box::new(polygons.iter().flatten()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub osm_id: Option<i64>,
    pub osm_type: Option<String>,
    pub company_name: Option<String>,
    pub entity_type: Option<String>,
    /// Human-readable label such as `"Leeds, United Kingdom"`.
    pub address: Option<String>,
    pub country_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    pub geometry: Geometry,
    /// `[min_lon, min_lat, max_lon, max_lat]` as reported by the geocoder.
    pub bbox: Option<[f64; 4]>,
    pub properties: Properties,
}

impl Feature {
    #[must_use]
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            geometry,
            bbox: None,
            properties,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Ring {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]
    }

    #[test]
    fn polygon_serializes_with_geojson_tag() {
        let geometry = Geometry::Polygon(vec![square()]);
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "Polygon");
        assert_eq!(json["coordinates"][0][2], serde_json::json!([1.0, 1.0]));
    }

    #[test]
    fn multipolygon_serializes_one_member_per_polygon() {
        let geometry = Geometry::MultiPolygon(vec![vec![square()], vec![square()]]);
        let json = serde_json::to_value(&geometry).unwrap();
        assert_eq!(json["type"], "MultiPolygon");
        assert_eq!(json["coordinates"].as_array().unwrap().len(), 2);
        assert_eq!(geometry.rings().count(), 2);
    }

    #[test]
    fn feature_collection_has_type_tag_and_null_properties() {
        let mut collection = FeatureCollection::new();
        collection.push(Feature::new(
            Geometry::Polygon(vec![square()]),
            Properties {
                osm_id: Some(42),
                ..Properties::default()
            },
        ));

        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["properties"]["osm_id"], 42);
        assert!(json["features"][0]["properties"]["company_name"].is_null());
        assert!(json["features"][0]["bbox"].is_null());
    }

    #[test]
    fn feature_collection_round_trips_through_json() {
        let collection: FeatureCollection = std::iter::once(Feature::new(
            Geometry::Polygon(vec![square()]),
            Properties::default(),
        ))
        .collect();
        let text = serde_json::to_string(&collection).unwrap();
        let parsed: FeatureCollection = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, collection);
    }

    #[test]
    fn empty_collection_still_carries_features_array() {
        let json = serde_json::to_value(FeatureCollection::new()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "FeatureCollection", "features": []})
        );
    }
}
