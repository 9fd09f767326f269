use std::path::PathBuf;

/// Failures of a storage backend. These never cross the [`PhotoStore`](crate::storage::PhotoStore)
/// or [`TextStore`](crate::storage::TextStore) boundary; callers of those only see best-effort
/// behaviour.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage quota exceeded ({needed} bytes needed, {quota} bytes allowed)")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("Storage backend unavailable")]
    Unavailable,

    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "sqlite_store")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "sqlite_store")]
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

/// Kind of keyed node, used in error and report messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Text,
    Photo,
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyKind::Text => write!(f, "text"),
            KeyKind::Photo => write!(f, "photo"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Duplicate {kind} key: {key}")]
    DuplicateKey { kind: KeyKind, key: String },
}

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The message is shown to the user as-is.
    #[error("Please select a valid JSON state file ({0})")]
    Malformed(#[source] serde_json::Error),

    #[error("Cannot write state file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("No JSON state file given")]
    MissingStatePath,

    #[error("Unexpected argument: {}", .0.display())]
    UnexpectedArgument(PathBuf),

    #[error("JSON state file not found: {}", .0.display())]
    StateNotFound(PathBuf),

    #[error("HTML file not found: {}", .0.display())]
    HtmlNotFound(PathBuf),

    #[error("Cannot read JSON state file {}: {source}", .path.display())]
    ReadState {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse JSON state: {0}")]
    ParseState(#[source] serde_json::Error),

    #[error("Cannot read HTML file {}: {source}", .path.display())]
    ReadHtml {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write output file {}: {source}", .path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Keys occur more than once in the markup: {}", .0.join(", "))]
    DuplicateKeys(Vec<String>),
}
