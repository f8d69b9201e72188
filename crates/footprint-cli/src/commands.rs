//! Command handlers called from `main` once config and logging are set up.

use std::path::Path;

use footprint_core::{AppConfig, FeatureCollection};
use footprint_pipeline::{build_if_absent, BuildOutcome, OutputStore};
use footprint_resolver::{
    OverpassClient, PlusCodeResolver, PostcodeClient, RegionTable, ResolverConfig,
};

pub(crate) async fn run_build(config: &AppConfig) -> anyhow::Result<()> {
    let store = OutputStore::new(&config.geodata_path);
    match build_if_absent(config, &store).await? {
        BuildOutcome::AlreadyPresent => println!(
            "geodata already present at {}; delete it to rebuild",
            store.path().display()
        ),
        BuildOutcome::Built { features } => println!(
            "wrote {features} features to {}",
            store.path().display()
        ),
    }
    Ok(())
}

/// Runs a region-wide brand search and writes the features to `output`.
///
/// A failed query is logged and produces an empty collection, matching how
/// the pipeline treats resolver diagnostics.
pub(crate) async fn run_brand_search(
    config: &AppConfig,
    region: &str,
    pattern: &str,
    output: &Path,
    timeout_secs: Option<u64>,
) -> anyhow::Result<()> {
    let mut resolver_config = ResolverConfig::from_app_config(config);
    if let Some(secs) = timeout_secs {
        resolver_config.brand_search_timeout_secs = secs;
    }
    let client = OverpassClient::new(&resolver_config)
        .map_err(|e| anyhow::anyhow!("failed to build Overpass client: {e}"))?;
    let regions = RegionTable::load(&config.data_dir)?;

    let features = match client.brand_search(region, pattern, &regions).await {
        Ok(features) => features,
        Err(e) => {
            tracing::warn!(region, pattern, reason = %e, "brand search failed");
            Vec::new()
        }
    };

    let collection: FeatureCollection = features.into_iter().collect();
    OutputStore::new(output).write(&collection).await?;
    println!(
        "wrote {} features for {region} to {}",
        collection.len(),
        output.display()
    );
    Ok(())
}

pub(crate) async fn run_decode(
    config: &AppConfig,
    code: &str,
    postcode: Option<&str>,
) -> anyhow::Result<()> {
    let resolver_config = ResolverConfig::from_app_config(config);
    let resolver = PlusCodeResolver::new(PostcodeClient::new(&resolver_config)?);
    let coordinate = resolver.resolve(code, postcode).await?;
    println!("{coordinate}");
    Ok(())
}
