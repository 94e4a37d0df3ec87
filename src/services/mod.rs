// Service exports
pub mod catalog;
pub mod refresh;
pub mod source;

pub use catalog::{Catalog, CatalogStore, CatalogWriter};
pub use refresh::{RefreshLoop, RefreshOutcome};
pub use source::{CsvSource, FetchOutcome, SourceError, VenueSource};
