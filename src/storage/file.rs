//! File-backed storage: one pretty-printed JSON array per collection.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use tempfile::NamedTempFile;

use crate::core::{Record, Result, StoreError};

use super::StorageBackend;

/// How hard to push writes toward the platters before the rename.
/// Replace-by-rename keeps readers consistent in both modes; `Sync` also
/// survives power loss at the cost of an fsync per save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurabilityMode {
    Sync,
    #[default]
    Async,
}

/// Stores each collection as `{data_dir}/{collection}.json`, a JSON array
/// of flat record objects with 2-space indentation for human diffability.
pub struct FileBackend {
    data_dir: PathBuf,
    durability: DurabilityMode,
}

impl FileBackend {
    pub fn new(data_dir: impl AsRef<Path>, durability: DurabilityMode) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir).map_err(|e| {
            StoreError::StorageUnavailable(format!(
                "failed to create data directory '{}': {}",
                data_dir.display(),
                e
            ))
        })?;
        Ok(Self {
            data_dir,
            durability,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn durability(&self) -> DurabilityMode {
        self.durability
    }

    fn collection_path(&self, collection: &str) -> Result<PathBuf> {
        validate_collection_name(collection)?;
        Ok(self.data_dir.join(format!("{collection}.json")))
    }
}

/// Collection names become file names; reject anything that could escape
/// the data directory or collide with the temp-file scheme.
fn validate_collection_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::Invalid(format!(
            "invalid collection name '{name}'"
        )))
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn read(&self, collection: &str) -> Result<Vec<Record>> {
        let path = self.collection_path(collection)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("collection '{collection}' not on disk yet, reading as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StoreError::StorageUnavailable(format!(
                    "failed to read '{}': {}",
                    path.display(),
                    e
                )));
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::Serialization(format!(
                "collection '{collection}' does not contain a valid record array: {e}"
            ))
        })
    }

    async fn write(&self, collection: &str, records: &[Record]) -> Result<()> {
        let path = self.collection_path(collection)?;
        let json = serde_json::to_vec_pretty(records).map_err(|e| {
            StoreError::Serialization(format!("failed to encode collection '{collection}': {e}"))
        })?;

        // Write the new contents next to the target, then rename over it.
        // The temp file must live in the same directory as the target so
        // the rename never crosses a filesystem boundary.
        let mut tmp = NamedTempFile::new_in(&self.data_dir).map_err(|e| {
            StoreError::StorageUnavailable(format!(
                "failed to create temp file in '{}': {}",
                self.data_dir.display(),
                e
            ))
        })?;
        tmp.write_all(&json)
            .and_then(|_| tmp.flush())
            .map_err(|e| {
                StoreError::StorageUnavailable(format!(
                    "failed to write collection '{collection}': {e}"
                ))
            })?;
        if self.durability == DurabilityMode::Sync {
            tmp.as_file().sync_all().map_err(|e| {
                StoreError::StorageUnavailable(format!(
                    "failed to sync collection '{collection}': {e}"
                ))
            })?;
        }
        tmp.persist(&path).map_err(|e| {
            StoreError::StorageUnavailable(format!(
                "failed to replace '{}': {}",
                path.display(),
                e.error
            ))
        })?;

        debug!("persisted {} records to '{collection}'", records.len());
        Ok(())
    }

    async fn collections(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.data_dir).map_err(|e| {
            StoreError::StorageUnavailable(format!(
                "failed to list '{}': {}",
                self.data_dir.display(),
                e
            ))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                StoreError::StorageUnavailable(format!(
                    "failed to list '{}': {}",
                    self.data_dir.display(),
                    e
                ))
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
