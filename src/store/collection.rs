//! Per-collection handle: durable load/save plus the record lifecycle
//! (create, update, delete, find, filter, paginate).

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::core::{Fields, Filter, PageInfo, Paginated, Patch, Record, RecordId, Result, StoreError};
use crate::storage::StorageBackend;

/// Handle on one named collection. Cheap to clone; clones share the
/// collection lock.
#[derive(Clone)]
pub struct Collection {
    name: String,
    backend: Arc<dyn StorageBackend>,
    lock: Arc<RwLock<()>>,
}

impl Collection {
    pub(crate) fn new(name: String, backend: Arc<dyn StorageBackend>, lock: Arc<RwLock<()>>) -> Self {
        Self {
            name,
            backend,
            lock,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Next id to assign: `max + 1`, or 1 for an empty collection. Ids are
    /// never reused after deletion because the maximum only grows.
    pub fn next_id(records: &[Record]) -> RecordId {
        records
            .iter()
            .filter_map(Record::id)
            .max()
            .map_or(1, |max| max + 1)
    }

    // =========================================================================
    // Collection Store: durable load/save under the collection lock
    // =========================================================================

    /// All records in insertion order. A collection that does not exist yet
    /// is empty; an unreachable medium is `StorageUnavailable`.
    pub async fn load(&self) -> Result<Vec<Record>> {
        let _shared = self.lock.read().await;
        self.backend.read(&self.name).await
    }

    /// Replace the entire collection. Atomic from any reader's point of
    /// view (the backend writes to a temp location and renames).
    pub async fn save(&self, records: &[Record]) -> Result<()> {
        let _exclusive = self.lock.write().await;
        self.backend.write(&self.name, records).await
    }

    /// Take the collection's exclusive lock for a multi-step sequence, e.g.
    /// check-availability-then-create. Everything done through the guard
    /// happens before any other writer (or reader) touches the collection.
    pub async fn begin_write(&self) -> WriteGuard<'_> {
        WriteGuard {
            collection: self,
            _exclusive: self.lock.write().await,
        }
    }

    // =========================================================================
    // Record lifecycle
    // =========================================================================

    /// Append a new record: assigns the next id and stamps both timestamps.
    pub async fn create(&self, fields: Fields) -> Result<Record> {
        let mut guard = self.begin_write().await;
        guard.create(fields).await
    }

    /// Merge `patch` over the record with this id and refresh `updated_at`.
    /// Fails with `NotFound` if no record matches.
    pub async fn update(&self, id: RecordId, patch: Patch) -> Result<Record> {
        let mut guard = self.begin_write().await;
        guard.update(id, patch).await
    }

    /// Remove and return the record with this id. Fails with `NotFound` if
    /// no record matches.
    pub async fn delete(&self, id: RecordId) -> Result<Record> {
        let mut guard = self.begin_write().await;
        guard.delete(id).await
    }

    /// Point lookup. Absence is a normal outcome, not an error.
    pub async fn find(&self, id: RecordId) -> Result<Option<Record>> {
        let records = self.load().await?;
        Ok(records.into_iter().find(|r| r.id() == Some(id)))
    }

    /// All records matching every predicate in `filter`.
    pub async fn filter(&self, filter: &Filter) -> Result<Vec<Record>> {
        let mut records = self.load().await?;
        records.retain(|record| filter.matches(record));
        Ok(records)
    }

    /// Filtered, then sliced into a 1-based page with metadata. Pages past
    /// the end are empty, not an error.
    pub async fn paginate(
        &self,
        page: usize,
        per_page: usize,
        filter: &Filter,
    ) -> Result<Paginated<Record>> {
        let matched = self.filter(filter).await?;
        let info = PageInfo::compute(page, per_page, matched.len());
        let (start, end) = info.slice_bounds();
        let data = matched[start..end].to_vec();
        Ok(Paginated::new(data, info))
    }
}

/// Exclusive access to one collection for the duration of a multi-step
/// mutation. Methods here perform the same load-modify-save cycles as the
/// [`Collection`] lifecycle methods, without re-taking the lock.
pub struct WriteGuard<'a> {
    collection: &'a Collection,
    _exclusive: RwLockWriteGuard<'a, ()>,
}

impl WriteGuard<'_> {
    /// Current contents, read under the held lock.
    pub async fn records(&self) -> Result<Vec<Record>> {
        self.collection
            .backend
            .read(&self.collection.name)
            .await
    }

    pub async fn save(&mut self, records: &[Record]) -> Result<()> {
        self.collection
            .backend
            .write(&self.collection.name, records)
            .await
    }

    pub async fn create(&mut self, fields: Fields) -> Result<Record> {
        let mut records = self.records().await?;
        let id = Collection::next_id(&records);
        let record = Record::with_envelope(fields, id);
        records.push(record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    pub async fn update(&mut self, id: RecordId, patch: Patch) -> Result<Record> {
        let mut records = self.records().await?;
        let position = records
            .iter()
            .position(|r| r.id() == Some(id))
            .ok_or_else(|| StoreError::not_found(&self.collection.name, id))?;
        records[position].apply_patch(patch);
        let updated = records[position].clone();
        self.save(&records).await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: RecordId) -> Result<Record> {
        let mut records = self.records().await?;
        let position = records
            .iter()
            .position(|r| r.id() == Some(id))
            .ok_or_else(|| StoreError::not_found(&self.collection.name, id))?;
        let removed = records.remove(position);
        self.save(&records).await?;
        Ok(removed)
    }
}
