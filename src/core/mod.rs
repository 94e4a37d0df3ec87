// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod search;

pub use distance::{haversine_distance, DistanceFormula};
pub use filters::{is_open_at, is_within_radius, matches_query};
pub use search::{shard_bounds, SearchEngine};
