use std::sync::Arc;

use crate::config::PageConfig;
use crate::storage::area::StorageArea;

/// Editable text persistence. Synchronous backend only; text is assumed to fit.
#[derive(Clone)]
pub struct TextStore {
    area: Arc<dyn StorageArea>,
    prefix: String,
}

impl TextStore {
    pub fn new(area: Arc<dyn StorageArea>, config: &PageConfig) -> Self {
        Self {
            area,
            prefix: config.text_prefix.clone(),
        }
    }

    pub fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn load(&self, key: &str) -> Option<String> {
        self.area.get_item(&self.storage_key(key))
    }

    /// Best-effort: a failed write is logged and dropped.
    pub fn save(&self, key: &str, html: &str) {
        let storage_key = self.storage_key(key);
        if let Err(e) = self.area.set_item(&storage_key, html) {
            log::warn!("cannot persist {storage_key}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryArea;

    #[test]
    fn save_and_load_use_prefixed_keys() {
        let area = Arc::new(InMemoryArea::new());
        let texts = TextStore::new(area.clone(), &PageConfig::default());

        assert!(texts.load("greeting").is_none());
        texts.save("greeting", "<b>Hi</b>");
        assert_eq!(texts.load("greeting").as_deref(), Some("<b>Hi</b>"));
        assert_eq!(area.keys(), vec!["editable-greeting".to_string()]);
    }

    #[test]
    fn configured_prefix_is_used() {
        let area = Arc::new(InMemoryArea::new());
        let config = PageConfig::builder().text_prefix("txt:").build().unwrap();
        let texts = TextStore::new(area.clone(), &config);

        texts.save("a", "x");
        assert_eq!(texts.storage_key("a"), "txt:a");
        assert_eq!(area.get_item("txt:a").as_deref(), Some("x"));
    }

    #[test]
    fn failed_save_is_swallowed() {
        let area = Arc::new(InMemoryArea::with_quota(4));
        let texts = TextStore::new(area, &PageConfig::default());

        texts.save("greeting", "far too long for the quota");
        assert!(texts.load("greeting").is_none());
    }
}
