//! Pipeline Orchestrator and Output Store: resolve every filtered location
//! record to a feature and persist the collection once.

pub mod build;
pub mod error;
pub mod pipeline;
pub mod store;

pub use build::{build_if_absent, BuildOutcome};
pub use error::{PipelineError, StoreError};
pub use pipeline::{Delays, Pipeline, RunSummary};
pub use store::OutputStore;
