//! Save and load controls: collect the live page into a [`PageState`], write it to a
//! file, and apply a user-supplied state document back onto the page.

use std::path::{Path, PathBuf};

use crate::errors::TransferError;
use crate::page::Document;
use crate::state::PageState;
use crate::storage::{PhotoStore, TextStore};

/// Counts of values applied by [`import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub texts: usize,
    pub photos: usize,
}

/// Snapshot of every editable's markup and every keyed image's current source.
pub fn collect<D: Document + ?Sized>(doc: &D) -> PageState {
    let mut state = PageState::new();
    for key in doc.editable_keys() {
        if let Some(html) = doc.text(&key) {
            state.insert_text(key, html);
        }
    }
    for key in doc.image_keys() {
        if let Some(src) = doc.image_src(&key) {
            state.insert_photo(key, src);
        }
    }
    state
}

/// Writes `state` as `<dir>/<file_name>` and returns the written path.
pub fn export(state: &PageState, dir: &Path, file_name: &str) -> Result<PathBuf, TransferError> {
    let path = dir.join(file_name);
    std::fs::write(&path, state.to_json())?;
    log::info!("state exported to {}", path.display());
    Ok(path)
}

/// Applies a raw state document to the page and persists what was applied.
///
/// Unparseable input fails before anything is touched. Keys without a matching node,
/// and photo values that are not strings, are skipped.
pub async fn import<D: Document + ?Sized>(
    doc: &mut D,
    raw: &str,
    texts: &TextStore,
    photos: &PhotoStore,
) -> Result<ImportReport, TransferError> {
    let state = PageState::from_json(raw).map_err(TransferError::Malformed)?;
    let mut report = ImportReport::default();

    for (key, html) in state.texts() {
        if doc.set_text(key, &html) {
            texts.save(key, &html);
            report.texts += 1;
        } else {
            log::debug!("import: no editable for {key}");
        }
    }

    for (key, value) in &state.photos {
        let Some(data) = value.as_str() else {
            log::debug!("import: photo {key} is not a string");
            continue;
        };
        if doc.set_image(key, data) {
            photos.write(key, data).await;
            report.photos += 1;
        } else {
            log::debug!("import: no image for {key}");
        }
    }

    Ok(report)
}
