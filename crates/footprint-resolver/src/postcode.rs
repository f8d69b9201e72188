//! Plus Code resolution, anchored by a postcode lookup for short codes.

use footprint_core::Coordinate;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::config::ResolverConfig;
use crate::error::{Outcome, ResolveError};
use crate::http::{build_client, join_segments, parse_base_url};
use crate::plus_code;

#[derive(Debug, Deserialize)]
struct PostcodeResponse {
    status: Option<u16>,
    result: Option<PostcodeResult>,
}

#[derive(Debug, Deserialize)]
struct PostcodeResult {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Client for a postcodes.io-shaped lookup service.
pub struct PostcodeClient {
    client: Client,
    base_url: Url,
}

impl PostcodeClient {
    /// # Errors
    ///
    /// Returns [`ResolveError::Http`] if the HTTP client cannot be built or
    /// [`ResolveError::InvalidBaseUrl`] if the configured URL does not parse.
    pub fn new(config: &ResolverConfig) -> Outcome<Self> {
        Ok(Self {
            client: build_client(&config.user_agent, config.postcode_timeout_secs)?,
            base_url: parse_base_url(&config.postcodes_url)?,
        })
    }

    /// Looks up the centroid of `postcode`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::PostcodeStatus`] on a non-200 HTTP status.
    /// - [`ResolveError::PostcodeNoResult`] when the body carries no usable result.
    /// - [`ResolveError::Http`] / [`ResolveError::Deserialize`] on transport or
    ///   body failures.
    pub async fn lookup(&self, postcode: &str) -> Outcome<Coordinate> {
        let url = join_segments(&self.base_url, &["postcodes", postcode])?;
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ResolveError::PostcodeStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: PostcodeResponse =
            serde_json::from_str(&body).map_err(|e| ResolveError::Deserialize {
                context: format!("postcode lookup ({url})"),
                source: e,
            })?;

        if parsed.status != Some(200) {
            return Err(ResolveError::PostcodeNoResult);
        }
        match parsed.result {
            Some(PostcodeResult {
                latitude: Some(latitude),
                longitude: Some(longitude),
            }) => Ok(Coordinate::new(latitude, longitude)),
            _ => Err(ResolveError::PostcodeNoResult),
        }
    }
}

/// Turns a full or short Plus Code into a coordinate.
pub struct PlusCodeResolver {
    postcodes: PostcodeClient,
}

impl PlusCodeResolver {
    #[must_use]
    pub fn new(postcodes: PostcodeClient) -> Self {
        Self { postcodes }
    }

    /// Whether resolving `code` with `postcode` performs a network lookup.
    #[must_use]
    pub fn needs_lookup(code: &str, postcode: Option<&str>) -> bool {
        plus_code::is_short(code.trim()) && non_empty(postcode).is_some()
    }

    /// Resolves `code` to the center of the area it denotes.
    ///
    /// Full codes decode locally. Short codes are recovered against the
    /// postcode's location first.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::PostcodeRequired`] for a short code without a postcode.
    /// - [`ResolveError::InvalidPlusCode`] when `code` is neither full nor short.
    /// - Any [`PostcodeClient::lookup`] error.
    pub async fn resolve(&self, code: &str, postcode: Option<&str>) -> Outcome<Coordinate> {
        let code = code.trim();

        if plus_code::is_full(code) {
            return plus_code::decode(code)
                .map(|area| area.center())
                .ok_or_else(|| ResolveError::InvalidPlusCode(code.to_string()));
        }

        if plus_code::is_short(code) {
            let postcode = non_empty(postcode).ok_or(ResolveError::PostcodeRequired)?;
            let anchor = self.postcodes.lookup(postcode).await?;
            let full = plus_code::recover_nearest(code, anchor.latitude, anchor.longitude)
                .ok_or_else(|| ResolveError::InvalidPlusCode(code.to_string()))?;
            tracing::debug!(short = code, full = %full, postcode, "recovered plus code");
            return plus_code::decode(&full)
                .map(|area| area.center())
                .ok_or_else(|| ResolveError::InvalidPlusCode(full.clone()));
        }

        Err(ResolveError::InvalidPlusCode(code.to_string()))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PlusCodeResolver {
        // Unroutable: any network use would fail the test.
        let config = ResolverConfig::for_base_url("http://127.0.0.1:9");
        PlusCodeResolver::new(PostcodeClient::new(&config).unwrap())
    }

    #[tokio::test]
    async fn full_code_resolves_without_network() {
        let coordinate = resolver().resolve("9C3XGV4M+J4", None).await.unwrap();
        assert!((coordinate.latitude - 51.506_562_5).abs() < 1e-9);
        assert!((coordinate.longitude + 0.117_187_5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn short_code_without_postcode_is_rejected() {
        for postcode in [None, Some(""), Some("   ")] {
            let err = resolver().resolve("GV4M+J4", postcode).await.unwrap_err();
            assert!(matches!(err, ResolveError::PostcodeRequired), "got {err:?}");
        }
    }

    #[tokio::test]
    async fn malformed_code_is_rejected() {
        let err = resolver().resolve("hello", Some("SE1 9SG")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid plus code format. Received: hello");
    }

    #[test]
    fn only_short_codes_with_postcodes_need_lookup() {
        assert!(PlusCodeResolver::needs_lookup("GV4M+J4", Some("SE1 9SG")));
        assert!(!PlusCodeResolver::needs_lookup("GV4M+J4", None));
        assert!(!PlusCodeResolver::needs_lookup("9C3XGV4M+J4", Some("SE1 9SG")));
        assert!(!PlusCodeResolver::needs_lookup("hello", Some("SE1 9SG")));
    }
}
