use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record {id} not found in collection '{collection}'")]
    NotFound { collection: String, id: u64 },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn not_found(collection: impl Into<String>, id: u64) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id,
        }
    }

    /// True for errors the route layer maps to a 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
