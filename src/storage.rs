//! Storage system for the page.
//!
//! This module defines the traits, types, and implementations that persist edited
//! text and uploaded photos. It provides two kinds of backends and two stores that
//! combine them.
//!
//! # Concepts
//!
//! - **Synchronous storage**: a small, always-available key/value area (the
//!   browser's local storage). Every backend implements [`StorageArea`].
//! - **Record storage**: a larger-capacity asynchronous backend that may be missing
//!   or refuse to open (the browser's IndexedDB). Backends implement
//!   [`RecordBackend`] and hand out [`RecordStore`]s.
//!
//! [`PhotoStore`] writes photos through both kinds and reads from record storage
//! first; [`TextStore`] keeps editable text in synchronous storage only. The record
//! backend is opened lazily, once, through a [`LazyConnection`].
//!
//! # Available types
//!
//! - [`InMemoryArea`]: in-memory synchronous storage with an optional quota.
//! - [`SqliteArea`]: SQLite-backed persistent synchronous storage.
//! - [`InMemoryRecordBackend`]: in-memory record storage, also able to play an
//!   absent or denied backend.
//! - [`JsonRecordBackend`]: file-backed record storage, one JSON file per store.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use keepsake::config::PageConfig;
//! use keepsake::storage::{JsonRecordBackend, PhotoStore, SqliteArea, TextStore};
//!
//! # async fn demo() -> Result<(), keepsake::errors::StorageError> {
//! let config = PageConfig::default();
//! let area = Arc::new(SqliteArea::open("local.db", "file:///index.html")?);
//!
//! let photos = PhotoStore::with_backend(area.clone(), Arc::new(JsonRecordBackend::new("media")), &config);
//! let texts = TextStore::new(area, &config);
//!
//! photos.write("hero", "data:image/png;base64,AAA").await;
//! texts.save("greeting", "Hello");
//! # Ok(()) }
//! ```

/// Synchronous key/value storage interface.
pub mod area;
/// Memoized connection to the record backend.
pub mod connection;
/// Photo persistence over both backends.
pub mod photos;
/// Asynchronous record storage.
pub mod records;
/// Editable text persistence.
pub mod texts;

/// Synchronous storage implementations.
pub mod local {
    /// In-memory synchronous storage.
    pub mod in_memory;
    /// SQLite-backed synchronous storage.
    #[cfg(feature = "sqlite_store")]
    pub mod sqlite_store;
}

pub use area::StorageArea;
pub use connection::LazyConnection;
pub use local::in_memory::InMemoryArea;
#[cfg(feature = "sqlite_store")]
pub use local::sqlite_store::SqliteArea;
pub use photos::PhotoStore;
pub use records::{InMemoryRecordBackend, JsonRecordBackend, PhotoRecord, RecordBackend, RecordStore};
pub use texts::TextStore;
