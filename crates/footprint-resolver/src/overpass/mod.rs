//! Overpass interpreter client: nearest-feature containment search and
//! region-wide brand search.

pub mod query;
pub mod types;

use std::sync::LazyLock;
use std::time::Duration;

use footprint_core::{Coordinate, Feature, Geometry, Properties};
use regex::Regex;
use reqwest::{Client, Url};

use crate::config::ResolverConfig;
use crate::error::{Outcome, ResolveError};
use crate::geometry::{first_containing, is_degenerate, ring_from_points};
use crate::http::{build_client, parse_base_url, read_json};
use crate::region::RegionTable;

use self::query::{brand_search_query, nearest_feature_query};
use self::types::{Element, OverpassResponse};

/// Entity type stamped on every brand search result.
pub const BRANCH_ENTITY_TYPE: &str = "Branch";

/// Extra client-side allowance on top of the server-side query timeout.
const BRAND_SEARCH_GRACE_SECS: u64 = 60;

static REGION_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}(-[A-Za-z0-9]{1,3})?$").expect("valid regex"));

/// Client for an Overpass API interpreter endpoint.
pub struct OverpassClient {
    client: Client,
    url: Url,
    radius_m: u32,
    brand_timeout_secs: u64,
}

impl OverpassClient {
    /// # Errors
    ///
    /// Returns [`ResolveError::Http`] if the HTTP client cannot be built or
    /// [`ResolveError::InvalidBaseUrl`] if the configured URL does not parse.
    pub fn new(config: &ResolverConfig) -> Outcome<Self> {
        Ok(Self {
            client: build_client(&config.user_agent, config.request_timeout_secs)?,
            url: parse_base_url(&config.overpass_url)?,
            radius_m: config.search_radius_m,
            brand_timeout_secs: config.brand_search_timeout_secs,
        })
    }

    #[must_use]
    pub fn radius_m(&self) -> u32 {
        self.radius_m
    }

    /// Finds the building or industrial/commercial area containing
    /// `coordinate` among those within the configured radius.
    ///
    /// Candidates are tested in response order and the first containing one
    /// wins.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NoContainingFeature`] when no candidate contains the point.
    /// - [`ResolveError::UnexpectedStatus`], [`ResolveError::Http`], or
    ///   [`ResolveError::Deserialize`] on request failures.
    pub async fn nearest_feature(&self, coordinate: Coordinate) -> Outcome<Feature> {
        let query = nearest_feature_query(coordinate, self.radius_m);
        let response = self
            .client
            .get(self.url.clone())
            .query(&[("data", query.as_str())])
            .send()
            .await?;
        let body: OverpassResponse =
            read_json(response, &format!("nearest feature ({coordinate})")).await?;
        log_remark(body.remark.as_deref());

        let mut candidates: Vec<(&Element, Geometry)> = body
            .elements
            .iter()
            .filter_map(|element| candidate_geometry(element).map(|g| (element, g)))
            .collect();
        let total = candidates.len();

        let Some(index) = first_containing(candidates.iter().map(|(_, g)| g), coordinate) else {
            return Err(ResolveError::NoContainingFeature {
                radius: self.radius_m,
            });
        };
        let (element, geometry) = candidates.swap_remove(index);

        tracing::debug!(
            osm_type = %element.kind,
            osm_id = element.id,
            candidates = total,
            "containing feature found"
        );

        Ok(Feature::new(
            geometry,
            Properties {
                osm_id: Some(element.id),
                osm_type: Some(element.kind.clone()),
                ..Properties::default()
            },
        ))
    }

    /// Collects every non-highway way and relation in `region` whose `brand`
    /// or `name` tag matches `pattern`.
    ///
    /// Zero matches is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::InvalidRegion`] if `region` is not an ISO 3166 code.
    /// - [`ResolveError::InvalidPattern`] if `pattern` is not a valid regex.
    /// - [`ResolveError::UnexpectedStatus`], [`ResolveError::Http`], or
    ///   [`ResolveError::Deserialize`] on request failures.
    pub async fn brand_search(
        &self,
        region: &str,
        pattern: &str,
        regions: &RegionTable,
    ) -> Outcome<Vec<Feature>> {
        if !REGION_CODE.is_match(region) {
            return Err(ResolveError::InvalidRegion(region.to_string()));
        }
        Regex::new(pattern).map_err(|e| ResolveError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let region = region.to_ascii_uppercase();
        let query = brand_search_query(&region, pattern, self.brand_timeout_secs);
        tracing::info!(region = %region, pattern, "searching region for brand");

        let response = self
            .client
            .post(self.url.clone())
            .timeout(Duration::from_secs(
                self.brand_timeout_secs + BRAND_SEARCH_GRACE_SECS,
            ))
            .body(query)
            .send()
            .await?;
        tracing::debug!(status = response.status().as_u16(), "brand search responded");
        let body: OverpassResponse =
            read_json(response, &format!("brand search ({region})")).await?;
        log_remark(body.remark.as_deref());

        let label = regions.label(&region);
        let mut features = Vec::new();
        for element in &body.elements {
            let Some(geometry) = brand_geometry(element) else {
                continue;
            };
            features.push(Feature::new(
                geometry,
                Properties {
                    osm_id: Some(element.id),
                    osm_type: Some(element.kind.clone()),
                    company_name: Some(element.display_name().to_string()),
                    entity_type: Some(BRANCH_ENTITY_TYPE.to_string()),
                    address: Some(label.address.clone()),
                    country_code: Some(label.country_code.clone()),
                    country: Some(label.country.clone()),
                },
            ));
            tracing::debug!(count = features.len(), osm_id = element.id, "brand feature collected");
        }

        tracing::info!(region = %region, count = features.len(), "brand search complete");
        Ok(features)
    }
}

fn log_remark(remark: Option<&str>) {
    if let Some(remark) = remark {
        tracing::warn!(remark, "overpass reported a runtime remark");
    }
}

/// Containment candidate for the nearest-feature search. Degenerate rings are
/// dropped; an element left without rings is not a candidate.
fn candidate_geometry(element: &Element) -> Option<Geometry> {
    match element.kind.as_str() {
        "way" => ring_from_points(&element.geometry)
            .filter(|ring| !is_degenerate(ring))
            .map(|ring| Geometry::Polygon(vec![ring])),
        "relation" => {
            let polygons: Vec<_> = element
                .members
                .iter()
                .filter(|m| m.kind == "way")
                .filter_map(|m| m.geometry.as_deref())
                .filter_map(ring_from_points)
                .filter(|ring| !is_degenerate(ring))
                .map(|ring| vec![ring])
                .collect();
            (!polygons.is_empty()).then_some(Geometry::MultiPolygon(polygons))
        }
        _ => None,
    }
}

/// Brand search geometry: closed rings taken as-is, without the degeneracy
/// filter.
fn brand_geometry(element: &Element) -> Option<Geometry> {
    match element.kind.as_str() {
        "way" => ring_from_points(&element.geometry).map(|ring| Geometry::Polygon(vec![ring])),
        "relation" => {
            let polygons: Vec<_> = element
                .members
                .iter()
                .filter(|m| m.kind == "way")
                .filter_map(|m| m.geometry.as_deref())
                .filter_map(ring_from_points)
                .map(|ring| vec![ring])
                .collect();
            (!polygons.is_empty()).then_some(Geometry::MultiPolygon(polygons))
        }
        _ => None,
    }
}
