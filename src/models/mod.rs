// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchSet, QueryPoint, Venue};
pub use requests::{NearbyRequest, ValidationError};
pub use responses::HealthResponse;
