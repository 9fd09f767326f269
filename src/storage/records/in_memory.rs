use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::errors::StorageError;
use crate::storage::records::{PhotoRecord, RecordBackend, RecordStore};

type Records = Arc<RwLock<HashMap<String, PhotoRecord>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Available,
    /// Behaves like a context without the feature (`open` yields `None`).
    Absent,
    /// Every `open` fails, like storage denied by the user agent.
    Denied,
}

/// In-memory record backend.
///
/// Databases live as long as the backend, so stores reopened through the same
/// backend observe earlier writes.
#[derive(Default)]
pub struct InMemoryRecordBackend {
    databases: RwLock<HashMap<(String, String), Records>>,
    mode: Mode,
    opens: AtomicUsize,
}

impl InMemoryRecordBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absent() -> Self {
        Self { mode: Mode::Absent, ..Self::default() }
    }

    pub fn denied() -> Self {
        Self { mode: Mode::Denied, ..Self::default() }
    }

    /// Number of `open` calls received so far.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordBackend for InMemoryRecordBackend {
    async fn open(
        &self,
        database: &str,
        store: &str,
    ) -> Result<Option<Arc<dyn RecordStore>>, StorageError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            Mode::Absent => return Ok(None),
            Mode::Denied => return Err(StorageError::Unavailable),
            Mode::Available => {}
        }

        let mut databases = self
            .databases
            .write()
            .map_err(|_| StorageError::Backend("record backend lock poisoned".into()))?;
        let records = databases
            .entry((database.to_string(), store.to_string()))
            .or_default()
            .clone();
        Ok(Some(Arc::new(InMemoryRecordStore { records })))
    }
}

struct InMemoryRecordStore {
    records: Records,
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, key: &str) -> Result<Option<PhotoRecord>, StorageError> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::Backend("record store lock poisoned".into()))?;
        Ok(records.get(key).cloned())
    }

    async fn put(&self, record: PhotoRecord) -> Result<(), StorageError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::Backend("record store lock poisoned".into()))?;
        records.insert(record.key.clone(), record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reopened_store_sees_earlier_writes() {
        let backend = InMemoryRecordBackend::new();

        let store = backend.open("media", "photos").await.unwrap().unwrap();
        store.put(PhotoRecord::new("photo:a", "data:1")).await.unwrap();

        let again = backend.open("media", "photos").await.unwrap().unwrap();
        assert_eq!(
            again.get("photo:a").await.unwrap(),
            Some(PhotoRecord::new("photo:a", "data:1"))
        );

        let other = backend.open("media", "thumbs").await.unwrap().unwrap();
        assert!(other.get("photo:a").await.unwrap().is_none());
        assert_eq!(backend.open_count(), 3);
    }

    #[tokio::test]
    async fn absent_and_denied_modes() {
        assert!(InMemoryRecordBackend::absent()
            .open("media", "photos")
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            InMemoryRecordBackend::denied().open("media", "photos").await,
            Err(StorageError::Unavailable)
        ));
    }
}
