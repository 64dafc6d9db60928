//! Preloading of resources generated by the IG build tool.

use crate::error::{Error, Result};
use crate::store::ResourceStore;
use fshval_package::{ResourceOrigin, ResourcePayload};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Every `*.json` file below `dir` (extension matched case-insensitively), sorted by
/// path. Symlinks to files count as files.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::GeneratedResourcesNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::GeneratedResourceRead {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: e.into(),
        })?;
        let is_json = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Add every generated `*.json` file below `dir` to `store`, returning how many
/// were added.
pub fn preload_generated(dir: &Path, store: &mut ResourceStore) -> Result<usize> {
    let files = json_files(dir)?;
    for path in &files {
        let content = fs::read_to_string(path).map_err(|source| Error::GeneratedResourceRead {
            path: path.clone(),
            source,
        })?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        debug!(file = %path.display(), "Loaded generated resource");
        store.add(ResourcePayload::new(
            ResourceOrigin::Generated { path: path.clone() },
            content,
        ));
    }
    Ok(files.len())
}
