use std::collections::HashMap;
use std::sync::Mutex;

use crate::config::PageConfig;
use crate::errors::StorageError;
use crate::storage::area::StorageArea;

/// In‑memory synchronous storage (no persistence).
///
/// An optional quota bounds the summed byte length of all keys and values, the way a
/// browser bounds local storage per origin.
#[derive(Default)]
pub struct InMemoryArea {
    map: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl InMemoryArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self {
            map: Mutex::default(),
            quota: Some(bytes),
        }
    }

    /// Area bounded by `config.sync_quota`, unbounded when unset.
    pub fn for_config(config: &PageConfig) -> Self {
        match config.sync_quota {
            Some(bytes) => Self::with_quota(bytes),
            None => Self::new(),
        }
    }

    /// Bytes currently in use.
    pub fn used(&self) -> usize {
        let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl StorageArea for InMemoryArea {
    fn get_item(&self, key: &str) -> Option<String> {
        self.map.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(quota) = self.quota {
            let current: usize = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = current + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.map.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.map.lock().unwrap_or_else(|e| e.into_inner()).clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.map.lock().map(|m| m.len()).unwrap_or(0)
    }

    fn keys(&self) -> Vec<String> {
        let mut v: Vec<String> = match self.map.lock() {
            Ok(map) => map.keys().cloned().collect(),
            Err(_) => return vec![],
        };
        v.sort_unstable();
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_contract() {
        let area = InMemoryArea::new();

        assert_eq!(area.len(), 0);
        assert!(area.get_item("missing").is_none());

        area.set_item("b", "2").unwrap();
        area.set_item("a", "1").unwrap();
        assert_eq!(area.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(area.used(), 4);

        area.clear().unwrap();
        assert!(area.keys().is_empty());
    }

    #[test]
    fn quota_rejects_oversized_writes() {
        let area = InMemoryArea::with_quota(10);
        area.set_item("k", "12345").unwrap();

        let err = area.set_item("other", "123456").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { needed: 17, quota: 10 }));
        assert!(area.get_item("other").is_none());

        // replacing an existing key only counts the new value
        area.set_item("k", "123456789").unwrap();
        assert_eq!(area.get_item("k").as_deref(), Some("123456789"));
    }

    #[test]
    fn config_quota_applies() {
        let config = PageConfig::builder().sync_quota(3).build().unwrap();
        let area = InMemoryArea::for_config(&config);
        assert!(area.set_item("abcd", "").is_err());

        let unbounded = InMemoryArea::for_config(&PageConfig::default());
        unbounded.set_item("abcd", &"x".repeat(10_000)).unwrap();
    }

    #[test]
    fn removing_frees_quota() {
        let area = InMemoryArea::with_quota(8);
        area.set_item("a", "1234567").unwrap();
        assert!(area.set_item("b", "1").is_err());

        area.remove_item("a").unwrap();
        area.set_item("b", "1").unwrap();
        assert_eq!(area.len(), 1);
    }
}
