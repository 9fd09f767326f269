//! The state document shared by the page, the export/import controls and the
//! offline patcher.
//!
//! ```json
//! {"texts": {"greeting": "<b>Hi</b>"}, "photos": {"hero": "data:image/png;base64,AAA"}}
//! ```
//!
//! Key order is the order of the source document; the patcher relies on it for
//! reproducible output.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Snapshot of all editable texts and photos of a page.
///
/// Values are kept as raw JSON values so that documents written by other tools are
/// read leniently; use [`PageState::texts`] and [`PageState::photos`] for the
/// interpreted view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageState {
    #[serde(default)]
    pub texts: Map<String, Value>,
    #[serde(default)]
    pub photos: Map<String, Value>,
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a state document. Only invalid JSON is an error: a document that is
    /// not an object, or whose `texts`/`photos` are missing or not objects, yields
    /// empty maps for the affected parts.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(raw)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut root) = value else {
            return Self::default();
        };
        let mut section = |name: &str| match root.remove(name) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let texts = section("texts");
        let photos = section("photos");
        Self { texts, photos }
    }

    /// Compact JSON text of this state.
    pub fn to_json(&self) -> String {
        Value::from(self.clone()).to_string()
    }

    pub fn insert_text<K: Into<String>, V: Into<String>>(&mut self, key: K, html: V) {
        self.texts.insert(key.into(), Value::String(html.into()));
    }

    pub fn insert_photo<K: Into<String>, V: Into<String>>(&mut self, key: K, data: V) {
        self.photos.insert(key.into(), Value::String(data.into()));
    }

    /// Text entries in document order. `null` reads as an empty fragment, other
    /// non-string values as their JSON text.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
        self.texts.iter().map(|(key, value)| {
            let html = match value {
                Value::String(s) => Cow::Borrowed(s.as_str()),
                Value::Null => Cow::Borrowed(""),
                other => Cow::Owned(other.to_string()),
            };
            (key.as_str(), html)
        })
    }

    /// Photo entries in document order. The value is `None` unless it is a string
    /// with non-whitespace content.
    pub fn photos(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.photos.iter().map(|(key, value)| {
            let data = value.as_str().filter(|s| !s.trim().is_empty());
            (key.as_str(), data)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.photos.is_empty()
    }
}

impl From<PageState> for Value {
    fn from(state: PageState) -> Self {
        let mut root = Map::new();
        root.insert("texts".into(), Value::Object(state.texts));
        root.insert("photos".into(), Value::Object(state.photos));
        Value::Object(root)
    }
}
