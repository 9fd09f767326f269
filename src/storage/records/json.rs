//! JSON-backed record backend.
//!
//! Every store is one file, `<root>/<database>/<store>.json`, holding a JSON object
//! that maps storage keys to [`PhotoRecord`]s. Opening a store creates the database
//! directory and an empty file when missing.
//!
//! `put` reads then rewrites the whole file; writes are serialized per store
//! handle. The file is replaced through a temporary file, so readers never observe a
//! half-written store.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::StorageError;
use crate::storage::records::{PhotoRecord, RecordBackend, RecordStore};

type StoreFile = BTreeMap<String, PhotoRecord>;

pub struct JsonRecordBackend {
    root: PathBuf,
}

impl JsonRecordBackend {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl RecordBackend for JsonRecordBackend {
    async fn open(
        &self,
        database: &str,
        store: &str,
    ) -> Result<Option<Arc<dyn RecordStore>>, StorageError> {
        let dir = self.root.join(database);
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(format!("{store}.json"));
        if tokio::fs::metadata(&path).await.is_err() {
            log::debug!("creating record store {}", path.display());
            tokio::fs::write(&path, b"{}").await?;
        }

        Ok(Some(Arc::new(JsonRecordStore {
            path,
            write_lock: Mutex::new(()),
        })))
    }
}

struct JsonRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonRecordStore {
    async fn load(&self) -> Result<StoreFile, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoreFile::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, file: &StoreFile) -> Result<(), StorageError> {
        let contents = serde_json::to_vec(file)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn get(&self, key: &str) -> Result<Option<PhotoRecord>, StorageError> {
        let mut file = self.load().await?;
        Ok(file.remove(key))
    }

    async fn put(&self, record: PhotoRecord) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.load().await?;
        file.insert(record.key.clone(), record);
        self.save(&file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_creates_database_and_store() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonRecordBackend::new(dir.path());

        let store = backend.open("keepsake-media", "photos").await.unwrap().unwrap();
        let path = dir.path().join("keepsake-media").join("photos.json");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert!(store.get("photo:none").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn records_survive_a_new_backend() {
        let dir = tempfile::tempdir().unwrap();

        {
            let backend = JsonRecordBackend::new(dir.path());
            let store = backend.open("media", "photos").await.unwrap().unwrap();
            store.put(PhotoRecord::new("photo:a", "data:old")).await.unwrap();
            store.put(PhotoRecord::new("photo:a", "data:new")).await.unwrap();
            store.put(PhotoRecord::new("photo:b", "data:b")).await.unwrap();
        }

        let backend = JsonRecordBackend::new(dir.path());
        let store = backend.open("media", "photos").await.unwrap().unwrap();
        assert_eq!(
            store.get("photo:a").await.unwrap().map(|r| r.data),
            Some("data:new".to_string())
        );
        assert_eq!(
            store.get("photo:b").await.unwrap().map(|r| r.data),
            Some("data:b".to_string())
        );
    }

    #[tokio::test]
    async fn corrupt_store_fails_reads() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonRecordBackend::new(dir.path());
        let store = backend.open("media", "photos").await.unwrap().unwrap();

        std::fs::write(dir.path().join("media").join("photos.json"), "not json").unwrap();
        assert!(matches!(store.get("photo:a").await, Err(StorageError::Json(_))));
    }
}
