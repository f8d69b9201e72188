//! The gated build: run the pipeline only when no artifact exists yet.

use footprint_core::AppConfig;
use footprint_dataset::load_records;

use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use crate::store::OutputStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// The artifact existed; nothing was fetched or written.
    AlreadyPresent,
    Built { features: usize },
}

/// Builds the geodata artifact unless `store` already holds one.
///
/// # Errors
///
/// - [`PipelineError::Dataset`] if the locations file cannot be loaded or
///   filtered. Nothing is written.
/// - [`PipelineError::Resolver`] if the upstream clients cannot be built.
/// - [`PipelineError::Store`] if the artifact cannot be written.
pub async fn build_if_absent(
    config: &AppConfig,
    store: &OutputStore,
) -> Result<BuildOutcome, PipelineError> {
    if store.exists() {
        tracing::info!(path = %store.path().display(), "geodata already present, skipping build");
        return Ok(BuildOutcome::AlreadyPresent);
    }

    let records = load_records(
        &config.locations_path,
        &config.row_filter,
        config.source_format,
    )?;
    tracing::info!(
        path = %config.locations_path.display(),
        records = records.len(),
        "building geodata"
    );

    let pipeline = Pipeline::from_app_config(config)?;
    let (collection, _summary) = pipeline.run(&records).await;
    store.write(&collection).await?;

    Ok(BuildOutcome::Built {
        features: collection.len(),
    })
}
