use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::{Record, Result};

use super::StorageBackend;

/// In-memory backend with the same contract as [`super::FileBackend`].
/// Useful for tests and ephemeral stores; nothing survives the process.
#[derive(Default)]
pub struct MemoryBackend {
    collections: RwLock<HashMap<String, Vec<Record>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn read(&self, collection: &str) -> Result<Vec<Record>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn write(&self, collection: &str, records: &[Record]) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.insert(collection.to_string(), records.to_vec());
        Ok(())
    }

    async fn collections(&self) -> Result<Vec<String>> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
