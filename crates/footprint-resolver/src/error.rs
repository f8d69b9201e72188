use thiserror::Error;

/// Why a resolver produced no value for a location.
///
/// The `Display` string is the human-readable diagnostic the orchestrator
/// logs against the row.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("reverse geocoder returned no feature")]
    NoFeature,

    /// The geocoder answered with a geometry type other than `Polygon`.
    #[error("Dropped:{0}")]
    DroppedGeometry(String),

    #[error("No data was found within the specified radius. Current radius: {radius} meters.")]
    NoContainingFeature { radius: u32 },

    #[error("Postcode required for short plus codes.")]
    PostcodeRequired,

    #[error("Postcode API request failed. Status code: {0}")]
    PostcodeStatus(u16),

    #[error("Postcode API returned no result.")]
    PostcodeNoResult,

    #[error("Invalid plus code format. Received: {0}")]
    InvalidPlusCode(String),

    #[error("invalid brand pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid ISO 3166 region code '{0}'")]
    InvalidRegion(String),

    #[error("missing required row field: {0}")]
    MissingField(&'static str),

    #[error("failed to read region table {path}: {source}")]
    RegionTable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result of every resolver operation.
pub type Outcome<T> = Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_geometry_display_names_the_type() {
        assert_eq!(
            ResolveError::DroppedGeometry("Point".to_string()).to_string(),
            "Dropped:Point"
        );
    }

    #[test]
    fn no_containing_feature_display_reports_radius() {
        assert_eq!(
            ResolveError::NoContainingFeature { radius: 30 }.to_string(),
            "No data was found within the specified radius. Current radius: 30 meters."
        );
    }

    #[test]
    fn postcode_status_display_reports_code() {
        assert_eq!(
            ResolveError::PostcodeStatus(404).to_string(),
            "Postcode API request failed. Status code: 404"
        );
    }
}
