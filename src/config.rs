//! Page configuration.
//!
//! `PageConfig` fixes the names that bind markup, storage and the exported state
//! together: the attributes that carry editable/upload keys, the storage key
//! prefixes, the database and store names of the record backend, and the file
//! name used when exporting state.
//!
//! `PageConfig` provides defaults via [`Default`] and a fluent
//! [`PageConfig::builder()`] with validation.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use keepsake::config::PageConfig;
//! let cfg = PageConfig::default();
//! assert_eq!(cfg.edit_key_attr, "data-edit-key");
//! assert_eq!(cfg.photo_prefix, "photo:");
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use keepsake::config::PageConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = PageConfig::builder()
//!     .database_name("memories-media")
//!     .export_file_name("memories-state.json")
//!     .sync_quota(5 * 1024 * 1024)
//!     .build()?; // returns Result<PageConfig, PageConfigError>
//! # Ok(()) }
//! ```
//!
//! # Errors
//!
//! Builder validation returns [`PageConfigError`] for empty names, attribute names
//! with characters outside `[A-Za-z0-9_:-]`, an export file name containing a path
//! separator, or a zero quota.

use std::fmt;

pub const DEFAULT_EDIT_KEY_ATTR: &str = "data-edit-key";
pub const DEFAULT_UPLOAD_KEY_ATTR: &str = "data-upload-key";
pub const DEFAULT_FULL_ATTR: &str = "data-full";
pub const DEFAULT_PHOTO_PREFIX: &str = "photo:";
pub const DEFAULT_TEXT_PREFIX: &str = "editable-";
pub const DEFAULT_DATABASE_NAME: &str = "keepsake-media";
pub const DEFAULT_STORE_NAME: &str = "photos";
pub const DEFAULT_EXPORT_FILE_NAME: &str = "keepsake-state.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    /// Attribute binding an element to an editable text value
    pub edit_key_attr: String,
    /// Attribute binding an `<img>` to a photo value
    pub upload_key_attr: String,
    /// Attribute holding the full-resolution image reference
    pub full_attr: String,
    /// Prefix of photo keys in both storage backends
    pub photo_prefix: String,
    /// Prefix of editable text keys in the synchronous backend
    pub text_prefix: String,
    /// Database opened on the record backend
    pub database_name: String,
    /// Store inside that database
    pub store_name: String,
    /// File name of an exported state document
    pub export_file_name: String,
    /// Byte limit of the in-memory synchronous backend, if any
    pub sync_quota: Option<usize>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            edit_key_attr: DEFAULT_EDIT_KEY_ATTR.to_string(),
            upload_key_attr: DEFAULT_UPLOAD_KEY_ATTR.to_string(),
            full_attr: DEFAULT_FULL_ATTR.to_string(),
            photo_prefix: DEFAULT_PHOTO_PREFIX.to_string(),
            text_prefix: DEFAULT_TEXT_PREFIX.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            store_name: DEFAULT_STORE_NAME.to_string(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            sync_quota: None,
        }
    }
}

impl PageConfig {
    pub fn builder() -> PageConfigBuilder {
        PageConfigBuilder::default()
    }
}

/// Builder for [`PageConfig`].
#[derive(Debug, Clone, Default)]
pub struct PageConfigBuilder {
    inner: PageConfig,
}

impl PageConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut PageConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn edit_key_attr<S: Into<String>>(self, s: S) -> Self { self.map(|c| c.edit_key_attr = s.into()) }
    pub fn upload_key_attr<S: Into<String>>(self, s: S) -> Self { self.map(|c| c.upload_key_attr = s.into()) }
    pub fn full_attr<S: Into<String>>(self, s: S) -> Self { self.map(|c| c.full_attr = s.into()) }
    pub fn photo_prefix<S: Into<String>>(self, s: S) -> Self { self.map(|c| c.photo_prefix = s.into()) }
    pub fn text_prefix<S: Into<String>>(self, s: S) -> Self { self.map(|c| c.text_prefix = s.into()) }
    pub fn database_name<S: Into<String>>(self, s: S) -> Self { self.map(|c| c.database_name = s.into()) }
    pub fn store_name<S: Into<String>>(self, s: S) -> Self { self.map(|c| c.store_name = s.into()) }
    pub fn export_file_name<S: Into<String>>(self, s: S) -> Self { self.map(|c| c.export_file_name = s.into()) }
    pub fn sync_quota(self, bytes: usize) -> Self { self.map(|c| c.sync_quota = Some(bytes)) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut PageConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<PageConfig, PageConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageConfigError {
    Empty(&'static str),
    InvalidAttribute(String),
    InvalidFileName(String),
    ZeroQuota,
}

impl fmt::Display for PageConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageConfigError::Empty(field) =>
                write!(f, "{field} must not be empty"),
            PageConfigError::InvalidAttribute(name) =>
                write!(f, "attribute name {name:?} contains characters outside [A-Za-z0-9_:-]"),
            PageConfigError::InvalidFileName(name) =>
                write!(f, "export file name {name:?} must not contain a path separator"),
            PageConfigError::ZeroQuota =>
                write!(f, "sync_quota must be at least 1 byte"),
        }
    }
}
impl std::error::Error for PageConfigError {}

fn valid_attribute(name: &str) -> bool {
    name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-'))
}

fn validate(c: &PageConfig) -> Result<(), PageConfigError> {
    let required = [
        ("edit_key_attr", &c.edit_key_attr),
        ("upload_key_attr", &c.upload_key_attr),
        ("full_attr", &c.full_attr),
        ("photo_prefix", &c.photo_prefix),
        ("text_prefix", &c.text_prefix),
        ("database_name", &c.database_name),
        ("store_name", &c.store_name),
        ("export_file_name", &c.export_file_name),
    ];
    for (field, value) in required {
        if value.is_empty() {
            return Err(PageConfigError::Empty(field));
        }
    }
    for attr in [&c.edit_key_attr, &c.upload_key_attr, &c.full_attr] {
        if !valid_attribute(attr) {
            return Err(PageConfigError::InvalidAttribute(attr.clone()));
        }
    }
    if c.export_file_name.contains(['/', '\\']) {
        return Err(PageConfigError::InvalidFileName(c.export_file_name.clone()));
    }
    if c.sync_quota == Some(0) {
        return Err(PageConfigError::ZeroQuota);
    }
    Ok(())
}
