use std::ops::Range;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::core::distance::DistanceFormula;
use crate::core::filters::matches_query;
use crate::models::{MatchSet, QueryPoint, Venue};
use crate::services::Catalog;

/// Default number of shards a catalog is split into per query
pub const DEFAULT_SHARD_COUNT: usize = 10;

/// Split `len` items into `shard_count` contiguous ranges
///
/// Boundaries are `i * len / n .. (i + 1) * len / n`. The last range always
/// ends at `len`, so the remainder of an uneven split is searched too.
/// A `shard_count` of zero is treated as one.
pub fn shard_bounds(len: usize, shard_count: usize) -> Vec<Range<usize>> {
    let shards = shard_count.max(1);
    (0..shards)
        .map(|i| {
            let start = i * len / shards;
            let end = if i + 1 == shards { len } else { (i + 1) * len / shards };
            start..end
        })
        .collect()
}

/// Sharded nearby-and-open search over a catalog snapshot
///
/// # Pipeline
/// 1. Partition the snapshot into contiguous shards
/// 2. Filter each shard on its own blocking worker (radius, then hours)
/// 3. Collect matches through a channel once every worker has finished
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine {
    shard_count: usize,
    formula: DistanceFormula,
}

impl SearchEngine {
    pub fn new(shard_count: usize, formula: DistanceFormula) -> Self {
        Self {
            shard_count: shard_count.max(1),
            formula,
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shard_count
    }

    pub fn formula(&self) -> DistanceFormula {
        self.formula
    }

    /// Find every venue in `catalog` reachable from and open at `query`
    ///
    /// Never fails; an empty result is a normal outcome. Result order is
    /// unspecified.
    pub async fn search(&self, query: &QueryPoint, catalog: &Catalog) -> MatchSet {
        if catalog.is_empty() {
            return MatchSet::new();
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<Venue>();
        let mut workers = JoinSet::new();

        for range in shard_bounds(catalog.len(), self.shard_count) {
            if range.is_empty() {
                continue;
            }

            let shard = catalog.clone();
            let tx = tx.clone();
            let query = *query;
            let formula = self.formula;

            workers.spawn_blocking(move || {
                for venue in &shard[range] {
                    if matches_query(formula, &query, venue) && tx.send(venue.clone()).is_err() {
                        // Receiver gone, nobody is waiting for the rest
                        return;
                    }
                }
            });
        }

        // Only workers hold senders now, so the channel closes when they finish
        drop(tx);

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Search shard worker failed: {}", e);
            }
        }

        let mut matches = MatchSet::new();
        while let Some(venue) = rx.recv().await {
            matches.push(venue);
        }

        tracing::debug!(
            "Searched {} venues in {} shards, {} matches",
            catalog.len(),
            self.shard_count,
            matches.len()
        );

        matches
    }

    /// Single-threaded evaluation of the same predicate over the whole catalog
    pub fn search_sequential(&self, query: &QueryPoint, catalog: &[Venue]) -> MatchSet {
        catalog
            .iter()
            .filter(|venue| matches_query(self.formula, query, venue))
            .cloned()
            .collect()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SHARD_COUNT, DistanceFormula::Haversine)
    }
}
