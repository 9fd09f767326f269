use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::storage::records::{RecordBackend, RecordStore};

/// Lazily opened, memoized connection to the record backend.
///
/// The first caller of [`LazyConnection::get`] opens the store; callers that arrive
/// while the open is in flight await the same attempt. The outcome is cached for the
/// lifetime of the connection, including an unavailable outcome, so a missing or
/// failing backend is probed exactly once.
pub struct LazyConnection {
    backend: Option<Arc<dyn RecordBackend>>,
    database: String,
    store: String,
    cell: OnceCell<Option<Arc<dyn RecordStore>>>,
}

impl Debug for LazyConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyConnection")
            .field("database", &self.database)
            .field("store", &self.store)
            .field("opened", &self.cell.initialized())
            .finish_non_exhaustive()
    }
}

impl LazyConnection {
    pub fn new<D: Into<String>, S: Into<String>>(
        backend: Arc<dyn RecordBackend>,
        database: D,
        store: S,
    ) -> Self {
        Self {
            backend: Some(backend),
            database: database.into(),
            store: store.into(),
            cell: OnceCell::new(),
        }
    }

    /// A connection for contexts that have no record backend at all.
    pub fn unavailable() -> Self {
        Self {
            backend: None,
            database: String::new(),
            store: String::new(),
            cell: OnceCell::new(),
        }
    }

    /// Returns the opened store, or `None` when the backend is unavailable.
    pub async fn get(&self) -> Option<Arc<dyn RecordStore>> {
        self.cell.get_or_init(|| self.open()).await.clone()
    }

    /// `Some(true)` once opened, `Some(false)` once degraded, `None` before the first use.
    pub fn is_available(&self) -> Option<bool> {
        self.cell.get().map(Option::is_some)
    }

    async fn open(&self) -> Option<Arc<dyn RecordStore>> {
        let Some(backend) = &self.backend else {
            log::warn!("no record backend, photos are kept in synchronous storage only");
            return None;
        };

        match backend.open(&self.database, &self.store).await {
            Ok(Some(store)) => {
                log::debug!("opened record store {}/{}", self.database, self.store);
                Some(store)
            }
            Ok(None) => {
                log::warn!("record backend not supported, photos are kept in synchronous storage only");
                None
            }
            Err(e) => {
                log::warn!(
                    "cannot open record store {}/{}: {}; photos are kept in synchronous storage only",
                    self.database,
                    self.store,
                    e
                );
                None
            }
        }
    }
}
