pub mod app_config;
pub mod config;
pub mod feature;

pub use app_config::{AppConfig, Environment, SourceFormat};
pub use config::{load_app_config, load_app_config_from_env};
pub use feature::{Coordinate, Feature, FeatureCollection, Geometry, Properties, Ring};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
