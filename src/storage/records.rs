//! Asynchronous record storage (the larger-capacity backend, IndexedDB-like).
//!
//! A [`RecordBackend`] opens a named store inside a named database and returns a
//! [`RecordStore`] handle. Opening creates the store when it does not exist yet.
//! A backend that lacks the feature altogether returns `Ok(None)` from
//! [`RecordBackend::open`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;

mod in_memory;
mod json;

pub use in_memory::InMemoryRecordBackend;
pub use json::JsonRecordBackend;

/// One stored photo: the prefixed storage key and its data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub key: String,
    pub data: String,
}

impl PhotoRecord {
    pub fn new<K: Into<String>, D: Into<String>>(key: K, data: D) -> Self {
        Self { key: key.into(), data: data.into() }
    }
}

/// An opened object store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Retrieves the record stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<PhotoRecord>, StorageError>;

    /// Inserts or replaces the record under `record.key`.
    async fn put(&self, record: PhotoRecord) -> Result<(), StorageError>;
}

/// Provider of object stores.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Opens `store` inside `database`, creating it when missing.
    ///
    /// `Ok(None)` means the backend is not supported in this context.
    async fn open(
        &self,
        database: &str,
        store: &str,
    ) -> Result<Option<Arc<dyn RecordStore>>, StorageError>;
}
