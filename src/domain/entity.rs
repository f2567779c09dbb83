//! Typed layer over the generic collection store.
//!
//! Each entity embeds [`BaseRecord`] (flattened, so records stay flat JSON
//! objects on disk) and names its backing collection through the [`Entity`]
//! trait. [`Repository`] does the serde conversion in both directions; the
//! store underneath never learns about concrete entity types.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::{Fields, Filter, Paginated, Patch, Record, RecordId, Result, StoreError};
use crate::store::{Collection, Store};

/// System envelope shared by every entity: id plus both timestamps.
/// Assigned by the store, never by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRecord {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A typed entity persisted in one named collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the backing collection.
    const COLLECTION: &'static str;

    fn base(&self) -> &BaseRecord;

    fn id(&self) -> RecordId {
        self.base().id
    }
}

/// Typed view over one collection: drafts go in, entities come out.
pub struct Repository<T> {
    collection: Collection,
    _entity: PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: &Store) -> Self {
        Self {
            collection: store.collection(T::COLLECTION),
            _entity: PhantomData,
        }
    }

    /// The untyped collection handle underneath, for multi-step critical
    /// sections via [`Collection::begin_write`].
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub async fn create<D: Serialize>(&self, draft: &D) -> Result<T> {
        let record = self.collection.create(to_fields(draft)?).await?;
        decode(record)
    }

    pub async fn find(&self, id: RecordId) -> Result<Option<T>> {
        match self.collection.find(id).await? {
            Some(record) => Ok(Some(decode(record)?)),
            None => Ok(None),
        }
    }

    pub async fn update(&self, id: RecordId, patch: Patch) -> Result<T> {
        decode(self.collection.update(id, patch).await?)
    }

    pub async fn delete(&self, id: RecordId) -> Result<T> {
        decode(self.collection.delete(id).await?)
    }

    pub async fn all(&self) -> Result<Vec<T>> {
        self.collection.load().await?.into_iter().map(decode).collect()
    }

    pub async fn find_where(&self, filter: &Filter) -> Result<Vec<T>> {
        self.collection
            .filter(filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn first_where(&self, filter: &Filter) -> Result<Option<T>> {
        let mut matched = self.find_where(filter).await?;
        if matched.is_empty() {
            Ok(None)
        } else {
            Ok(Some(matched.swap_remove(0)))
        }
    }

    pub async fn paginate(
        &self,
        page: usize,
        per_page: usize,
        filter: &Filter,
    ) -> Result<Paginated<T>> {
        self.collection
            .paginate(page, per_page, filter)
            .await?
            .try_map(decode)
    }
}

/// Decode a stored record into a typed entity.
pub(crate) fn decode<T: DeserializeOwned>(record: Record) -> Result<T> {
    serde_json::from_value(JsonValue::Object(record.into_fields()))
        .map_err(|e| StoreError::Serialization(format!("failed to decode record: {e}")))
}

/// Serialize a draft into entity fields. Drafts must be flat objects.
pub(crate) fn to_fields<D: Serialize>(draft: &D) -> Result<Fields> {
    match serde_json::to_value(draft) {
        Ok(JsonValue::Object(fields)) => Ok(fields),
        Ok(_) => Err(StoreError::Invalid(
            "entity draft must serialize to an object".to_string(),
        )),
        Err(e) => Err(StoreError::Serialization(format!(
            "failed to encode entity draft: {e}"
        ))),
    }
}
