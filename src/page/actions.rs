use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::page::Document;
use crate::storage::{PhotoStore, TextStore};

/// Restores stored texts and photos into the page. Returns how many texts and
/// photos were restored.
pub async fn hydrate<D: Document + ?Sized>(
    doc: &mut D,
    texts: &TextStore,
    photos: &PhotoStore,
) -> (usize, usize) {
    let mut restored_texts = 0;
    for key in doc.editable_keys() {
        if let Some(html) = texts.load(&key) {
            doc.set_text(&key, &html);
            restored_texts += 1;
        }
    }

    let mut restored_photos = 0;
    for key in doc.image_keys() {
        // an empty value keeps the markup image
        if let Some(data) = photos.read(&key).await.filter(|d| !d.is_empty()) {
            doc.set_image(&key, &data);
            restored_photos += 1;
        }
    }

    log::debug!("hydrated {restored_texts} texts and {restored_photos} photos");
    (restored_texts, restored_photos)
}

/// Applies an edit to an editable node and persists it.
pub fn edit_text<D: Document + ?Sized>(doc: &mut D, texts: &TextStore, key: &str, html: &str) -> bool {
    if !doc.set_text(key, html) {
        return false;
    }
    texts.save(key, html);
    true
}

/// Shows `data_url` in the image with `key` and persists it.
pub async fn upload_photo<D: Document + ?Sized>(
    doc: &mut D,
    photos: &PhotoStore,
    key: &str,
    data_url: &str,
) -> bool {
    if !doc.set_image(key, data_url) {
        return false;
    }
    photos.write(key, data_url).await;
    true
}

/// Like [`upload_photo`], for raw file contents of the given media type.
pub async fn upload_photo_bytes<D: Document + ?Sized>(
    doc: &mut D,
    photos: &PhotoStore,
    key: &str,
    mime: &str,
    bytes: &[u8],
) -> bool {
    upload_photo(doc, photos, key, &data_url(mime, bytes)).await
}

/// `data:<mime>;base64,<payload>` for `bytes`.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
