//! Overpass `[out:json]` response shapes for `out geom` queries.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Runtime error reported alongside a (possibly partial) result.
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    /// Vertex list of a way.
    #[serde(default)]
    pub geometry: Vec<LatLon>,
    /// Members of a relation.
    #[serde(default)]
    pub members: Vec<Member>,
}

impl Element {
    /// `name` tag, else `brand`, else empty.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.tags
            .get("name")
            .or_else(|| self.tags.get("brand"))
            .map_or("", String::as_str)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "ref", default)]
    pub reference: i64,
    #[serde(default)]
    pub role: String,
    pub geometry: Option<Vec<LatLon>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}
