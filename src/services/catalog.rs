use parking_lot::Mutex;
use std::ops::Deref;
use std::sync::Arc;

use crate::models::Venue;

/// Immutable snapshot of the venue catalog
///
/// Cloning is cheap (one reference count bump), so a snapshot can be handed
/// to every search worker by value. A snapshot stays valid after the store
/// has moved on to a newer catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    venues: Arc<[Venue]>,
}

impl Catalog {
    pub fn new(venues: Vec<Venue>) -> Self {
        Self { venues: venues.into() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// True if both snapshots share the same underlying allocation
    pub fn ptr_eq(&self, other: &Catalog) -> bool {
        Arc::ptr_eq(&self.venues, &other.venues)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for Catalog {
    type Target = [Venue];

    fn deref(&self) -> &[Venue] {
        &self.venues
    }
}

impl From<Vec<Venue>> for Catalog {
    fn from(venues: Vec<Venue>) -> Self {
        Self::new(venues)
    }
}

/// Holder of the current catalog snapshot
///
/// The lock only covers swapping or cloning the snapshot reference, never
/// filtering or I/O.
#[derive(Debug)]
pub struct CatalogStore {
    current: Mutex<Catalog>,
}

/// Sole write handle to a [`CatalogStore`]
///
/// Not `Clone`: whoever owns it (the refresh loop) is the only writer.
#[derive(Debug)]
pub struct CatalogWriter {
    store: Arc<CatalogStore>,
}

impl CatalogStore {
    /// Create a store seeded with `initial`, returning the shared read side
    /// and the unique writer.
    pub fn open(initial: Catalog) -> (Arc<CatalogStore>, CatalogWriter) {
        let store = Arc::new(CatalogStore {
            current: Mutex::new(initial),
        });
        let writer = CatalogWriter {
            store: Arc::clone(&store),
        };
        (store, writer)
    }

    /// Current catalog snapshot
    pub fn snapshot(&self) -> Catalog {
        self.current.lock().clone()
    }

    /// Number of venues in the current snapshot
    pub fn len(&self) -> usize {
        self.current.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn replace(&self, catalog: Catalog) -> Catalog {
        std::mem::replace(&mut *self.current.lock(), catalog)
    }
}

impl CatalogWriter {
    /// Atomically install a new catalog
    pub fn replace(&self, catalog: Catalog) {
        // The previous snapshot is dropped here, after the lock is released
        let _previous = self.store.replace(catalog);
    }

    /// The store this writer publishes to
    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }
}
