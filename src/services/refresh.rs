use std::time::{Duration, Instant};
use tokio::time::{self, MissedTickBehavior};

use crate::services::catalog::{Catalog, CatalogWriter};
use crate::services::source::{FetchOutcome, SourceError, VenueSource};

/// Outcome of a single refresh attempt that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new catalog with this many venues was installed
    Replaced(usize),
    /// The source reported no change; the catalog was left as is
    Unchanged,
}

/// Periodic catalog refresher
///
/// Owns the only [`CatalogWriter`], so it is the single component that ever
/// replaces the catalog. Fetching and parsing happen outside the store's
/// lock; only the final swap takes it. Any failure keeps the previous
/// catalog in place.
pub struct RefreshLoop<S> {
    source: S,
    writer: CatalogWriter,
    interval: Duration,
}

impl<S: VenueSource> RefreshLoop<S> {
    pub fn new(source: S, writer: CatalogWriter, interval: Duration) -> Self {
        Self {
            source,
            writer,
            interval,
        }
    }

    /// Fetch once and install the result if the source changed
    pub async fn refresh_once(&mut self) -> Result<RefreshOutcome, SourceError> {
        match self.source.fetch().await? {
            FetchOutcome::Updated(venues) => {
                let count = venues.len();
                self.writer.replace(Catalog::new(venues));
                Ok(RefreshOutcome::Replaced(count))
            }
            FetchOutcome::NotModified => Ok(RefreshOutcome::Unchanged),
        }
    }

    /// Refresh forever on the configured interval
    ///
    /// The first refresh happens one interval after start, since the
    /// catalog was loaded during startup.
    pub async fn run(mut self) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        tracing::info!("Catalog refresh every {:?}", self.interval);

        loop {
            ticker.tick().await;

            let started = Instant::now();
            match self.refresh_once().await {
                Ok(RefreshOutcome::Replaced(count)) => {
                    tracing::info!("Catalog refreshed with {} venues in {:?}", count, started.elapsed());
                }
                Ok(RefreshOutcome::Unchanged) => {
                    tracing::info!("Catalog source unchanged, checked in {:?}", started.elapsed());
                }
                Err(e) => {
                    tracing::warn!(
                        "Catalog refresh failed after {:?}, keeping {} cached venues: {}",
                        started.elapsed(),
                        self.writer.store().len(),
                        e
                    );
                }
            }
        }
    }
}
