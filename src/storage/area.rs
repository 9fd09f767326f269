use crate::errors::StorageError;

/// Object-safe synchronous key/value storage area (the DOM's `Storage`).
///
/// This is the small-capacity backend that is always available. Writes may fail
/// with [`StorageError::QuotaExceeded`] when the area is full.
pub trait StorageArea: Send + Sync {
    /// Retrieves the value associated with the given key, or `None` if not found.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Sets the value for the given key, overwriting any existing value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the item with the given key.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Clears all items in the storage area.
    fn clear(&self) -> Result<(), StorageError>;

    /// Returns the number of items in the storage area.
    fn len(&self) -> usize;

    /// Returns all keys in the storage area, sorted.
    fn keys(&self) -> Vec<String>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryArea;
    use std::sync::Arc;

    fn set(area: &Arc<dyn StorageArea>, k: &str, v: &str) {
        area.set_item(k, v).unwrap();
    }

    #[test]
    fn storagearea_basic_contract() {
        let area: Arc<dyn StorageArea> = Arc::new(InMemoryArea::new());

        // starts empty
        assert!(area.is_empty());
        assert!(area.get_item("missing").is_none());

        // set + get
        set(&area, "photo:a", "1");
        set(&area, "editable-b", "2");
        assert_eq!(area.len(), 2);
        assert_eq!(area.get_item("photo:a").as_deref(), Some("1"));
        assert_eq!(area.get_item("editable-b").as_deref(), Some("2"));

        // overwrite keeps len()
        set(&area, "photo:a", "ONE");
        assert_eq!(area.len(), 2);
        assert_eq!(area.get_item("photo:a").as_deref(), Some("ONE"));

        // remove
        area.remove_item("editable-b").unwrap();
        assert_eq!(area.len(), 1);
        assert!(area.get_item("editable-b").is_none());

        // clear
        area.clear().unwrap();
        assert!(area.is_empty());
    }
}
