use std::path::Path;

use lopdf::Document;

use cvscreen_core::{Error, Result};

/// Extract a resume's text: pages in ascending order, joined with no separator.
///
/// A page without a text layer, or whose text cannot be decoded, contributes
/// nothing. A document with no text at all is a format error.
pub fn read_resume(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let text = extract_pages(&bytes).map_err(|reason| Error::format(path, reason))?;
    if text.trim().is_empty() {
        return Err(Error::format(path, "no extractable text"));
    }
    Ok(text)
}

fn extract_pages(bytes: &[u8]) -> std::result::Result<String, String> {
    let doc = Document::load_mem(bytes).map_err(|e| format!("failed to parse PDF: {e}"))?;

    // get_pages is keyed by 1-based page number, already in order
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut text = String::new();
    for page in pages {
        match doc.extract_text(&[page]) {
            Ok(page_text) if page_text.trim().is_empty() => {
                tracing::debug!("page {page} has no text layer");
            }
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => tracing::warn!("⚠️  page {page}: text extraction failed ({e}), skipping"),
        }
    }
    Ok(text)
}
