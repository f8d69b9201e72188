//! Sequential per-record resolution with fixed pauses after upstream calls.

use std::time::Duration;

use footprint_core::{AppConfig, Feature, FeatureCollection};
use footprint_dataset::LocationRecord;
use footprint_resolver::{
    NominatimClient, Outcome, OverpassClient, PlusCodeResolver, PostcodeClient, ResolveError,
    ResolverConfig,
};

/// Pauses awaited after upstream calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    /// After a short-code postcode lookup.
    pub code_lookup: Duration,
    /// After every reverse-geocode or nearest-feature search.
    pub geocode: Duration,
}

impl Delays {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            code_lookup: Duration::from_millis(config.code_lookup_delay_ms),
            geocode: Duration::from_millis(config.geocode_delay_ms),
        }
    }

    #[must_use]
    pub fn none() -> Self {
        Self {
            code_lookup: Duration::ZERO,
            geocode: Duration::ZERO,
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub features: usize,
    pub skipped: usize,
}

pub struct Pipeline {
    plus_codes: PlusCodeResolver,
    boundaries: NominatimClient,
    nearest: OverpassClient,
    delays: Delays,
}

impl Pipeline {
    /// # Errors
    ///
    /// Returns a [`ResolveError`] if any upstream client cannot be built.
    pub fn new(config: &ResolverConfig, delays: Delays) -> Result<Self, ResolveError> {
        Ok(Self {
            plus_codes: PlusCodeResolver::new(PostcodeClient::new(config)?),
            boundaries: NominatimClient::new(config)?,
            nearest: OverpassClient::new(config)?,
            delays,
        })
    }

    /// # Errors
    ///
    /// Returns a [`ResolveError`] if any upstream client cannot be built.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ResolveError> {
        Self::new(
            &ResolverConfig::from_app_config(config),
            Delays::from_app_config(config),
        )
    }

    /// Resolves every record in order, one at a time.
    ///
    /// Records that fail to resolve are logged with the reason and skipped.
    pub async fn run(&self, records: &[LocationRecord]) -> (FeatureCollection, RunSummary) {
        let mut collection = FeatureCollection::new();
        let mut summary = RunSummary {
            rows: records.len(),
            ..RunSummary::default()
        };

        for (index, record) in records.iter().enumerate() {
            match self.resolve_record(record).await {
                Ok(feature) => collection.push(overlay(feature, record)),
                Err(e) => {
                    summary.skipped += 1;
                    tracing::warn!(
                        row = index,
                        company = %record.company_name,
                        reason = %e,
                        "skipping row"
                    );
                }
            }
        }
        summary.features = collection.len();

        tracing::info!(
            rows = summary.rows,
            features = summary.features,
            skipped = summary.skipped,
            "pipeline run complete"
        );
        (collection, summary)
    }

    async fn resolve_record(&self, record: &LocationRecord) -> Outcome<Feature> {
        if let Some(code) = record.plus_code.as_deref() {
            let postcode = record.postcode.as_deref();
            let looked_up = PlusCodeResolver::needs_lookup(code, postcode);
            let resolved = self.plus_codes.resolve(code, postcode).await;
            if looked_up {
                pause(self.delays.code_lookup).await;
            }
            let coordinate = resolved?;

            let feature = self.nearest.nearest_feature(coordinate).await;
            pause(self.delays.geocode).await;
            return feature;
        }

        if let Some(coordinate) = record.coordinate() {
            let feature = self.boundaries.boundary(coordinate).await;
            pause(self.delays.geocode).await;
            return feature;
        }

        Err(ResolveError::MissingField("plus code or latitude/longitude"))
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// Stamps the record's identity onto the resolved feature. The record's
/// country replaces the geocoder's only when the record has one.
fn overlay(mut feature: Feature, record: &LocationRecord) -> Feature {
    feature.properties.company_name = Some(record.company_name.clone());
    feature.properties.entity_type = Some(record.entity_type.clone());
    if let Some(country) = &record.country {
        feature.properties.country = Some(country.clone());
    }
    feature
}
