use std::fmt::Debug;
use std::sync::Arc;

use crate::config::PageConfig;
use crate::storage::area::StorageArea;
use crate::storage::connection::LazyConnection;
use crate::storage::records::{PhotoRecord, RecordBackend};

/// Photo persistence over both backends.
///
/// Reads prefer the record backend and fall back to the synchronous area. Writes go
/// to the synchronous area first and then to the record backend. Neither operation
/// fails observably: backend errors are logged and swallowed.
pub struct PhotoStore {
    area: Arc<dyn StorageArea>,
    records: LazyConnection,
    prefix: String,
}

impl Debug for PhotoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoStore")
            .field("prefix", &self.prefix)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl PhotoStore {
    pub fn new(area: Arc<dyn StorageArea>, records: LazyConnection, config: &PageConfig) -> Self {
        Self {
            area,
            records,
            prefix: config.photo_prefix.clone(),
        }
    }

    /// Store over both backends, using the database and store names of `config`.
    pub fn with_backend(
        area: Arc<dyn StorageArea>,
        backend: Arc<dyn RecordBackend>,
        config: &PageConfig,
    ) -> Self {
        let records = LazyConnection::new(backend, &config.database_name, &config.store_name);
        Self::new(area, records, config)
    }

    /// Store for contexts without a record backend.
    pub fn sync_only(area: Arc<dyn StorageArea>, config: &PageConfig) -> Self {
        Self::new(area, LazyConnection::unavailable(), config)
    }

    pub fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn connection(&self) -> &LazyConnection {
        &self.records
    }

    /// Returns the stored image data for `key`, if any.
    pub async fn read(&self, key: &str) -> Option<String> {
        let storage_key = self.storage_key(key);

        if let Some(store) = self.records.get().await {
            match store.get(&storage_key).await {
                Ok(Some(record)) if !record.data.is_empty() => return Some(record.data),
                Ok(_) => {}
                Err(e) => log::debug!("record read of {storage_key} failed: {e}"),
            }
        }

        self.area.get_item(&storage_key)
    }

    /// Stores `value` for `key` in both backends, best-effort.
    pub async fn write(&self, key: &str, value: &str) {
        let storage_key = self.storage_key(key);

        if let Err(e) = self.area.set_item(&storage_key, value) {
            log::debug!("synchronous write of {storage_key} dropped: {e}");
        }

        let Some(store) = self.records.get().await else {
            return;
        };
        if let Err(e) = store.put(PhotoRecord::new(storage_key.clone(), value)).await {
            log::debug!("record write of {storage_key} dropped: {e}");
        }
    }
}
