use async_trait::async_trait;

use crate::core::{Record, Result};

/// Storage backend trait - allows pluggable durable media behind the
/// collection store. Implementations own the on-disk (or in-memory)
/// representation exclusively; nothing above this seam touches it.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the full contents of a collection in insertion order.
    ///
    /// A collection that has never been written is empty, not an error.
    /// Any other failure to reach the medium is `StorageUnavailable`;
    /// unreadable content is `Serialization`.
    async fn read(&self, collection: &str) -> Result<Vec<Record>>;

    /// Atomically replace the full contents of a collection. A concurrent
    /// reader sees either the previous contents or the new ones, never a
    /// torn write.
    async fn write(&self, collection: &str, records: &[Record]) -> Result<()>;

    /// List collections present on the medium.
    async fn collections(&self) -> Result<Vec<String>>;
}
