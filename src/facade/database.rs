use std::path::Path;
use std::sync::Arc;

use crate::core::Result;
use crate::domain::{Bookings, Reviews, Users, Vehicles, Vendors};
use crate::storage::{DurabilityMode, MemoryBackend, StorageBackend};
use crate::store::Store;

/// Marketplace database: one injected [`Store`] plus an accessor per
/// entity collection. Construct one per data directory, or one per test
/// over a temp directory or memory backend; instances are independent and
/// there is no process-wide state.
#[derive(Clone)]
pub struct RentalDb {
    store: Store,
    users: Users,
    vendors: Vendors,
    vehicles: Vehicles,
    bookings: Bookings,
    reviews: Reviews,
}

impl RentalDb {
    /// Open a file-backed database rooted at `data_dir` with default
    /// durability.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_store(Store::open(data_dir)?))
    }

    pub fn open_with(data_dir: impl AsRef<Path>, durability: DurabilityMode) -> Result<Self> {
        Ok(Self::from_store(Store::open_with(data_dir, durability)?))
    }

    /// Ephemeral in-memory database, mainly for tests.
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()))
    }

    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        Self::from_store(Store::new(backend))
    }

    pub fn from_store(store: Store) -> Self {
        Self {
            users: Users::new(&store),
            vendors: Vendors::new(&store),
            vehicles: Vehicles::new(&store),
            bookings: Bookings::new(&store),
            reviews: Reviews::new(&store),
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn users(&self) -> &Users {
        &self.users
    }

    pub fn vendors(&self) -> &Vendors {
        &self.vendors
    }

    pub fn vehicles(&self) -> &Vehicles {
        &self.vehicles
    }

    pub fn bookings(&self) -> &Bookings {
        &self.bookings
    }

    pub fn reviews(&self) -> &Reviews {
        &self.reviews
    }
}
