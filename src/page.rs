//! Page model: keyed editable nodes and keyed images.
//!
//! [`Document`] is the surface the rest of the crate needs from a page. A DOM binding
//! implements it over live nodes; [`PageDocument`] implements it in memory.

mod actions;

pub use actions::{data_url, edit_text, hydrate, upload_photo, upload_photo_bytes};

use std::collections::HashSet;

use crate::errors::{KeyKind, PageError};

/// Access to the keyed nodes of a page. Setters return `false` when no node carries
/// the key.
pub trait Document {
    /// Keys of all editable nodes, in document order.
    fn editable_keys(&self) -> Vec<String>;

    /// Current inner markup of the editable node with `key`.
    fn text(&self, key: &str) -> Option<String>;

    fn set_text(&mut self, key: &str, html: &str) -> bool;

    /// Keys of all keyed images, in document order.
    fn image_keys(&self) -> Vec<String>;

    /// Current resolved source of the image with `key`.
    fn image_src(&self, key: &str) -> Option<String>;

    /// Full-resolution reference of the image with `key`, if set.
    fn image_full(&self, key: &str) -> Option<String>;

    /// Sets both the displayed source and the full-resolution reference.
    fn set_image(&mut self, key: &str, src: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableNode {
    pub key: String,
    pub inner_html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageNode {
    pub key: String,
    pub src: String,
    pub full: Option<String>,
}

/// In-memory page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDocument {
    editables: Vec<EditableNode>,
    images: Vec<ImageNode>,
}

impl PageDocument {
    pub fn builder() -> PageDocumentBuilder {
        PageDocumentBuilder::default()
    }

    pub fn editables(&self) -> &[EditableNode] {
        &self.editables
    }

    pub fn images(&self) -> &[ImageNode] {
        &self.images
    }

    fn editable_mut(&mut self, key: &str) -> Option<&mut EditableNode> {
        self.editables.iter_mut().find(|n| n.key == key)
    }

    fn image_mut(&mut self, key: &str) -> Option<&mut ImageNode> {
        self.images.iter_mut().find(|n| n.key == key)
    }
}

impl Document for PageDocument {
    fn editable_keys(&self) -> Vec<String> {
        self.editables.iter().map(|n| n.key.clone()).collect()
    }

    fn text(&self, key: &str) -> Option<String> {
        self.editables.iter().find(|n| n.key == key).map(|n| n.inner_html.clone())
    }

    fn set_text(&mut self, key: &str, html: &str) -> bool {
        match self.editable_mut(key) {
            Some(node) => {
                node.inner_html = html.to_string();
                true
            }
            None => false,
        }
    }

    fn image_keys(&self) -> Vec<String> {
        self.images.iter().map(|n| n.key.clone()).collect()
    }

    fn image_src(&self, key: &str) -> Option<String> {
        self.images.iter().find(|n| n.key == key).map(|n| n.src.clone())
    }

    fn image_full(&self, key: &str) -> Option<String> {
        self.images.iter().find(|n| n.key == key).and_then(|n| n.full.clone())
    }

    fn set_image(&mut self, key: &str, src: &str) -> bool {
        match self.image_mut(key) {
            Some(node) => {
                node.src = src.to_string();
                node.full = Some(src.to_string());
                true
            }
            None => false,
        }
    }
}

/// Builds a [`PageDocument`] in document order.
///
/// Editables added without a key get `edit-<n>`, `n` being their position among all
/// editables. [`PageDocumentBuilder::editable_from_attrs`] takes the key the way the
/// page markup does: `data-edit-key`, then `data-editable-key`, then the position. Keys must be unique per kind; [`PageDocumentBuilder::build`] rejects
/// duplicates.
#[derive(Debug, Default)]
pub struct PageDocumentBuilder {
    editables: Vec<(Option<String>, String)>,
    images: Vec<ImageNode>,
}

impl PageDocumentBuilder {
    pub fn editable<K: Into<String>, H: Into<String>>(mut self, key: K, html: H) -> Self {
        self.editables.push((Some(key.into()), html.into()));
        self
    }

    /// An editable node without an explicit key.
    pub fn unkeyed_editable<H: Into<String>>(mut self, html: H) -> Self {
        self.editables.push((None, html.into()));
        self
    }

    /// An editable node keyed from its markup attributes. Empty values count as unset.
    pub fn editable_from_attrs<H: Into<String>>(
        mut self,
        edit_key: Option<&str>,
        editable_key: Option<&str>,
        html: H,
    ) -> Self {
        let key = edit_key
            .filter(|k| !k.is_empty())
            .or(editable_key.filter(|k| !k.is_empty()))
            .map(str::to_string);
        self.editables.push((key, html.into()));
        self
    }

    pub fn image<K: Into<String>, S: Into<String>>(mut self, key: K, src: S) -> Self {
        self.images.push(ImageNode { key: key.into(), src: src.into(), full: None });
        self
    }

    pub fn build(self) -> Result<PageDocument, PageError> {
        let editables: Vec<EditableNode> = self
            .editables
            .into_iter()
            .enumerate()
            .map(|(idx, (key, inner_html))| EditableNode {
                key: key.unwrap_or_else(|| format!("edit-{idx}")),
                inner_html,
            })
            .collect();

        ensure_unique(KeyKind::Text, editables.iter().map(|n| n.key.as_str()))?;
        ensure_unique(KeyKind::Photo, self.images.iter().map(|n| n.key.as_str()))?;

        Ok(PageDocument { editables, images: self.images })
    }
}

fn ensure_unique<'a>(kind: KeyKind, keys: impl Iterator<Item = &'a str>) -> Result<(), PageError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(PageError::DuplicateKey { kind, key: key.to_string() });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unkeyed_editables_get_positional_keys() {
        let doc = PageDocument::builder()
            .editable("title", "Our firsts")
            .unkeyed_editable("first date")
            .unkeyed_editable("first trip")
            .build()
            .unwrap();

        assert_eq!(doc.editable_keys(), vec!["title", "edit-1", "edit-2"]);
        assert_eq!(doc.text("edit-2").as_deref(), Some("first trip"));
    }

    #[test]
    fn attribute_keys_fall_back_in_order() {
        let doc = PageDocument::builder()
            .editable_from_attrs(Some("title"), Some("ignored"), "Our firsts")
            .editable_from_attrs(None, Some("subtitle"), "since 2019")
            .editable_from_attrs(Some(""), None, "first trip")
            .build()
            .unwrap();

        assert_eq!(doc.editable_keys(), vec!["title", "subtitle", "edit-2"]);
        assert_eq!(doc.text("subtitle").as_deref(), Some("since 2019"));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let err = PageDocument::builder()
            .editable("a", "x")
            .editable("a", "y")
            .build()
            .unwrap_err();
        assert!(matches!(err, PageError::DuplicateKey { kind: KeyKind::Text, ref key } if key == "a"));

        let err = PageDocument::builder()
            .image("hero", "hero.jpg")
            .image("hero", "other.jpg")
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "Duplicate photo key: hero");

        // the same key may name one editable and one image
        assert!(PageDocument::builder().editable("x", "").image("x", "").build().is_ok());
    }

    #[test]
    fn setters_report_unknown_keys() {
        let mut doc = PageDocument::builder()
            .editable("greeting", "Old")
            .image("hero", "hero.jpg")
            .build()
            .unwrap();

        assert!(doc.set_text("greeting", "New"));
        assert!(!doc.set_text("missing", "New"));
        assert_eq!(doc.text("greeting").as_deref(), Some("New"));

        assert_eq!(doc.image_full("hero"), None);
        assert!(doc.set_image("hero", "data:image/png;base64,AAA"));
        assert!(!doc.set_image("missing", "data:"));
        assert_eq!(doc.image_src("hero").as_deref(), Some("data:image/png;base64,AAA"));
        assert_eq!(doc.image_full("hero").as_deref(), Some("data:image/png;base64,AAA"));
    }
}
