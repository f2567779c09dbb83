pub mod collection;

pub use collection::{Collection, WriteGuard};

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::RwLock;

use crate::core::Result;
use crate::storage::{DurabilityMode, FileBackend, StorageBackend};

/// Root handle over one storage backend.
///
/// One `Store` instance is constructed by the application (or one per test,
/// over a temp directory) and injected into every domain accessor; there is
/// no process-wide singleton. Cloning is cheap and clones share the same
/// backend and the same per-collection locks.
///
/// ## Concurrency model
///
/// Every collection gets one `RwLock`. Reads hold it shared, mutations hold
/// it exclusively, so concurrent load-modify-save cycles on one collection
/// cannot lose writes while different collections proceed independently.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: Arc<dyn StorageBackend>,
    locks: Mutex<HashMap<String, Arc<RwLock<()>>>>,
}

impl Store {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                backend,
                locks: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Open a file-backed store rooted at `data_dir` with default
    /// durability.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(data_dir, DurabilityMode::default())
    }

    pub fn open_with(data_dir: impl AsRef<Path>, durability: DurabilityMode) -> Result<Self> {
        let backend = FileBackend::new(data_dir, durability)?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// Handle on one named collection. Handles taken for the same name
    /// share one lock, whichever `Store` clone they came from.
    pub fn collection(&self, name: &str) -> Collection {
        let lock = {
            let mut locks = self
                .inner
                .locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(name.to_string()).or_default())
        };
        Collection::new(name.to_string(), Arc::clone(&self.inner.backend), lock)
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.inner.backend
    }

    /// Collections currently present on the backend.
    pub async fn collections(&self) -> Result<Vec<String>> {
        self.inner.backend.collections().await
    }
}
