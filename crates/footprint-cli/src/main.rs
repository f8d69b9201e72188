mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "footprint-cli")]
#[command(about = "Company location footprint command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the geodata file unless it already exists
    Build,
    /// Collect every matching brand or name feature in an ISO 3166-2 region
    BrandSearch {
        /// Region code such as `US-CA` or `GB-ENG`
        #[arg(long)]
        region: String,
        /// Regular expression matched against `brand` and `name` tags
        #[arg(long)]
        pattern: String,
        /// Where to write the resulting feature collection
        #[arg(long, default_value = "out/brand_search.json")]
        output: PathBuf,
        /// Server-side query timeout in seconds (overrides config)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
    /// Decode a Plus Code to its center coordinate
    Decode {
        code: String,
        /// Postcode anchoring a short code
        #[arg(long)]
        postcode: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = footprint_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Build => commands::run_build(&config).await,
        Commands::BrandSearch {
            region,
            pattern,
            output,
            timeout_secs,
        } => {
            commands::run_brand_search(&config, &region, &pattern, &output, timeout_secs).await
        }
        Commands::Decode { code, postcode } => {
            commands::run_decode(&config, &code, postcode.as_deref()).await
        }
    }
}

#[cfg(test)]
mod tests;
