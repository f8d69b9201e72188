//! Geometry resolvers: Plus Code decoding, Nominatim boundaries, Overpass
//! nearest-feature containment, and Overpass brand search.

pub mod config;
pub mod error;
pub mod geometry;
mod http;
pub mod nominatim;
pub mod overpass;
pub mod plus_code;
pub mod postcode;
pub mod region;

pub use config::ResolverConfig;
pub use error::{Outcome, ResolveError};
pub use nominatim::NominatimClient;
pub use overpass::{OverpassClient, BRANCH_ENTITY_TYPE};
pub use plus_code::CodeArea;
pub use postcode::{PlusCodeResolver, PostcodeClient};
pub use region::{RegionLabel, RegionTable};
