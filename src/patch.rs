//! Offline patcher: bakes a saved [`PageState`] into static markup.
//!
//! [`Patcher::apply`] rewrites a markup string in memory. [`PatchJob`] wraps it with
//! the file handling of the `apply-state` tool: read the state and the markup, patch,
//! then either report (dry run) or write the result.

pub mod markup;

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::PageConfig;
use crate::errors::PatchError;
use crate::state::PageState;

/// Result of patching one markup string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    pub html: String,
    pub text_updates: usize,
    pub photo_updates: usize,
    pub missing_texts: Vec<String>,
    pub missing_photos: Vec<String>,
    /// State keys whose key attribute occurs more than once in the input markup.
    /// Only the first occurrence is patched.
    pub duplicate_keys: Vec<String>,
}

/// Applies states to markup using the attribute names of a [`PageConfig`].
#[derive(Debug, Clone)]
pub struct Patcher {
    edit_key_attr: String,
    upload_key_attr: String,
    full_attr: String,
}

impl Default for Patcher {
    fn default() -> Self {
        Self::new(&PageConfig::default())
    }
}

impl Patcher {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            edit_key_attr: config.edit_key_attr.clone(),
            upload_key_attr: config.upload_key_attr.clone(),
            full_attr: config.full_attr.clone(),
        }
    }

    /// Patches all texts, then all photos, in state order. Each replacement works on
    /// the output of the previous one.
    pub fn apply(&self, html: &str, state: &PageState) -> PatchOutcome {
        let mut outcome = PatchOutcome {
            html: html.to_string(),
            ..PatchOutcome::default()
        };

        for (key, value) in state.texts() {
            if markup::count_key(html, &self.edit_key_attr, key) > 1 {
                outcome.duplicate_keys.push(key.to_string());
            }
            match markup::replace_editable(&outcome.html, &self.edit_key_attr, key, &value) {
                Some(patched) => {
                    outcome.html = patched;
                    outcome.text_updates += 1;
                }
                None => outcome.missing_texts.push(key.to_string()),
            }
        }

        for (key, value) in state.photos() {
            if markup::count_key(html, &self.upload_key_attr, key) > 1 {
                outcome.duplicate_keys.push(key.to_string());
            }
            let Some(value) = value else {
                outcome.missing_photos.push(key.to_string());
                continue;
            };
            match markup::replace_photo(
                &outcome.html,
                &self.upload_key_attr,
                &self.full_attr,
                key,
                value,
            ) {
                Some(patched) => {
                    outcome.html = patched;
                    outcome.photo_updates += 1;
                }
                None => outcome.missing_photos.push(key.to_string()),
            }
        }

        log::debug!(
            "patched {} texts and {} photos ({} texts and {} photos missing)",
            outcome.text_updates,
            outcome.photo_updates,
            outcome.missing_texts.len(),
            outcome.missing_photos.len()
        );
        outcome
    }
}

/// One run of the patch tool.
#[derive(Debug, Clone)]
pub struct PatchJob {
    pub state: PathBuf,
    pub html: PathBuf,
    /// Defaults to `html`, i.e. patch in place.
    pub out: Option<PathBuf>,
    pub dry_run: bool,
    /// Refuse to patch when a state key occurs more than once in the markup.
    pub strict: bool,
}

/// What a [`PatchJob`] did. `written` is `None` for a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSummary {
    pub text_updates: usize,
    pub photo_updates: usize,
    pub missing_texts: Vec<String>,
    pub missing_photos: Vec<String>,
    pub duplicate_keys: Vec<String>,
    pub written: Option<PathBuf>,
}

impl PatchJob {
    pub fn output_path(&self) -> &Path {
        self.out.as_deref().unwrap_or(&self.html)
    }

    /// Runs the job. On error nothing has been written.
    pub fn execute(&self, patcher: &Patcher) -> Result<PatchSummary, PatchError> {
        if !self.state.exists() {
            return Err(PatchError::StateNotFound(self.state.clone()));
        }
        if !self.html.exists() {
            return Err(PatchError::HtmlNotFound(self.html.clone()));
        }

        let raw = std::fs::read_to_string(&self.state).map_err(|source| PatchError::ReadState {
            path: self.state.clone(),
            source,
        })?;
        let state = PageState::from_json(&raw).map_err(PatchError::ParseState)?;
        let html = std::fs::read_to_string(&self.html).map_err(|source| PatchError::ReadHtml {
            path: self.html.clone(),
            source,
        })?;

        let outcome = patcher.apply(&html, &state);
        if self.strict && !outcome.duplicate_keys.is_empty() {
            return Err(PatchError::DuplicateKeys(outcome.duplicate_keys));
        }

        let written = if self.dry_run {
            None
        } else {
            let out = self.output_path();
            write_atomically(out, &outcome.html).map_err(|source| PatchError::WriteOutput {
                path: out.to_path_buf(),
                source,
            })?;
            Some(out.to_path_buf())
        };

        Ok(PatchSummary {
            text_updates: outcome.text_updates,
            photo_updates: outcome.photo_updates,
            missing_texts: outcome.missing_texts,
            missing_photos: outcome.missing_photos,
            duplicate_keys: outcome.duplicate_keys,
            written,
        })
    }
}

/// Writes through a temporary file in the target directory, then renames it over
/// `path`.
fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
