//! Text extraction for job descriptions (plain text) and resumes (PDF).
use std::path::{Path, PathBuf};

use cvscreen_core::types::{DocumentKind, DocumentRef};
use cvscreen_core::{Error, Result};

pub mod pdf;

pub use pdf::read_resume;

/// Full text of a document as one string. Nothing is cached; every call
/// reads the source again.
pub fn extract_text(doc: &DocumentRef) -> Result<String> {
    match doc.kind() {
        DocumentKind::JobDescription => read_job(doc.path()),
        DocumentKind::Resume => read_resume(doc.path()),
    }
}

/// Read a plain-text job description as-is.
pub fn read_job(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Regular files (or links to files) directly under `dir`, sorted, as resume references.
pub fn list_candidates(dir: &Path) -> Result<Vec<DocumentRef>> {
    let meta = std::fs::metadata(dir).map_err(|e| Error::io(dir, e))?;
    if !meta.is_dir() {
        return Err(Error::io(dir, std::io::Error::new(std::io::ErrorKind::Other, "not a directory")));
    }
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed"));
            Error::io(dir, source)
        })?;
        // symlinks count unless they point at a directory; a dangling link
        // then fails per candidate instead of disappearing from the batch
        let is_candidate = entry.file_type().is_file() || (entry.path_is_symlink() && !entry.path().is_dir());
        if is_candidate { files.push(entry.into_path()); }
    }
    files.sort();
    tracing::debug!("found {} candidate files under {}", files.len(), dir.display());
    Ok(files.into_iter().map(DocumentRef::resume).collect())
}
