//! Venue Finder - nearby-and-open venue lookup
//!
//! Keeps an in-memory catalog of venues, refreshed periodically from a remote
//! CSV file, and answers "which venues can reach me and are open now?" with a
//! sharded brute-force scan over an immutable catalog snapshot.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

use thiserror::Error;

// Re-export commonly used types
pub use self::core::{haversine_distance, is_open_at, is_within_radius, DistanceFormula, SearchEngine};
pub use models::{MatchSet, QueryPoint, Venue};
pub use services::{Catalog, CatalogStore, CatalogWriter, CsvSource, FetchOutcome, RefreshLoop, SourceError, VenueSource};

/// Errors that prevent the service from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("No catalog source configured (set CSV_URL)")]
    MissingSourceUrl,

    #[error("Initial catalog load failed: {0}")]
    InitialLoad(#[source] SourceError),

    #[error("Catalog source returned no data on initial load")]
    EmptySource,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetch the catalog the service starts with
///
/// Unlike periodic refreshes, any failure here is fatal.
pub async fn load_initial_catalog<S: VenueSource>(source: &mut S) -> Result<Catalog, StartupError> {
    match source.fetch().await.map_err(StartupError::InitialLoad)? {
        FetchOutcome::Updated(venues) => Ok(Catalog::new(venues)),
        FetchOutcome::NotModified => Err(StartupError::EmptySource),
    }
}
