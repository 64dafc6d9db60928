//! Local package cache lookup.
//!
//! The cache is a directory of extracted packages, one folder per `name#version`,
//! populated by an external installer (`~/.fhir/packages` by default). It is never
//! written to from here.

use crate::error::{PackageError, PackageResult};
use crate::PackageReference;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Folder inside each cache entry holding the package contents.
pub const PACKAGE_FOLDER: &str = "package";

/// Default cache location, `~/.fhir/packages`.
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".fhir").join("packages"))
}

/// Resolves package references to on-disk cache entries.
pub trait PackageCache {
    fn locate(&self, reference: &PackageReference) -> PackageResult<PackageCacheEntry>;
}

/// Verified location of an installed package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCacheEntry {
    pub reference: PackageReference,
    pub path: PathBuf,
}

impl PackageCacheEntry {
    pub fn package_dir(&self) -> PathBuf {
        self.path.join(PACKAGE_FOLDER)
    }
}

/// Package cache laid out as `<root>/<name>#<version>/package/...`.
#[derive(Debug, Clone)]
pub struct FileSystemCache {
    root: PathBuf,
}

impl FileSystemCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate folder for `reference`, whether or not it exists.
    pub fn entry_path(&self, reference: &PackageReference) -> PathBuf {
        self.root.join(reference.cache_key())
    }
}

impl PackageCache for FileSystemCache {
    fn locate(&self, reference: &PackageReference) -> PackageResult<PackageCacheEntry> {
        // A name or version that is not a single path component cannot be a cache entry.
        if !is_plain_component(&reference.name) || !is_plain_component(&reference.version) {
            return Err(PackageError::not_installed(reference));
        }

        let path = self.entry_path(reference);
        if !path.exists() {
            debug!(package = %reference, path = %path.display(), "Package not in cache");
            return Err(PackageError::not_installed(reference));
        }

        debug!(package = %reference, path = %path.display(), "Located package");
        Ok(PackageCacheEntry {
            reference: reference.clone(),
            path,
        })
    }
}

fn is_plain_component(value: &str) -> bool {
    !value.is_empty() && value != "." && value != ".." && !value.contains(['/', '\\'])
}
