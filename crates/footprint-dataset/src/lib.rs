//! Tabular location sources: loading, row filtering, and record extraction.

pub mod error;
pub mod filter;
pub mod predicate;
pub mod record;
mod table;

pub use error::DatasetError;
pub use filter::{filter_dataset, load_records};
pub use predicate::Predicate;
pub use record::{ColumnMap, LocationRecord};
pub use table::Row;
