//! Directory loader.
//!
//! Walks a source tree and reads every file whose extension (or exact file
//! name) is on the allow-list. Ignored directories are pruned before
//! descending, so nothing below `node_modules` or `.git` is ever touched.

use crate::types::Document;
use archimind_core::config::IndexSettings;
use archimind_core::{AppError, AppResult};
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Load every allowed document under `root`, in walk order with siblings
/// sorted by file name.
///
/// Unreadable and oversized files are skipped with a warning. A `root` that
/// is itself a file is loaded on its own when allowed.
///
/// # Errors
/// Returns `AppError::Index` if `root` does not exist.
pub fn load_documents(root: &Path, settings: &IndexSettings) -> AppResult<Vec<Document>> {
    if !root.exists() {
        return Err(AppError::Index(format!("Path does not exist: {:?}", root)));
    }

    let mut documents = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored_dir(e, &settings.ignored_dirs));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(extension) = matching_extension(entry.path(), &settings.extensions) else {
            continue;
        };

        match read_document(root, &entry, extension, settings.max_file_bytes) {
            Ok(Some(doc)) => documents.push(doc),
            Ok(None) => {}
            Err(e) => tracing::warn!("Skipping {:?}: {}", entry.path(), e),
        }
    }

    tracing::debug!("Loaded {} documents from {:?}", documents.len(), root);
    Ok(documents)
}

fn is_ignored_dir(entry: &DirEntry, ignored: &[String]) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| ignored.iter().any(|dir| dir == name))
            .unwrap_or(false)
}

/// Return the allow-list entry matched by `path`, if any.
///
/// Entries starting with `.` match the extension case-insensitively; other
/// entries must equal the file name.
fn matching_extension(path: &Path, allowed: &[String]) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()));

    allowed
        .iter()
        .find(|entry| {
            if entry.starts_with('.') {
                extension.as_deref() == Some(entry.to_lowercase().as_str())
            } else {
                entry.as_str() == file_name
            }
        })
        .cloned()
}

fn read_document(
    root: &Path,
    entry: &DirEntry,
    extension: String,
    max_bytes: u64,
) -> AppResult<Option<Document>> {
    let size_bytes = entry.metadata().map_err(|e| AppError::Io(e.into()))?.len();
    if size_bytes > max_bytes {
        tracing::warn!(
            "Skipping {:?}: {} bytes exceeds limit of {}",
            entry.path(),
            size_bytes,
            max_bytes
        );
        return Ok(None);
    }

    let bytes = std::fs::read(entry.path())?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    let path = if relative.as_os_str().is_empty() {
        // root was a single file
        entry.file_name().to_string_lossy().into_owned()
    } else {
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    };

    Ok(Some(Document {
        path,
        absolute_path: entry.path().to_path_buf(),
        extension,
        content,
        size_bytes,
    }))
}
