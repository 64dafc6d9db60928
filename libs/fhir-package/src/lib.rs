//! FHIR packages as seen from a local package cache.
//!
//! - [`ProjectManifest`] reads `sushi-config.yaml` / `package.json` dependency sections.
//! - [`FileSystemCache`] maps a [`PackageReference`] to its `name#version` cache folder.
//! - [`LoadedPackage`] reads the resources listed in a package's `.index.json` together
//!   with the package's own dependencies.

pub mod cache;
pub mod error;
pub mod index;
pub mod loader;
pub mod manifest;
pub mod reference;
pub mod resource;

pub use cache::{default_cache_dir, FileSystemCache, PackageCache, PackageCacheEntry};
pub use error::{ErrorKind, PackageError, PackageResult};
pub use index::{IndexedFile, PackageIndex};
pub use loader::LoadedPackage;
pub use manifest::{Dependencies, ManifestFormat, ProjectManifest};
pub use reference::{PackageName, PackageReference, ParseReferenceError, Version};
pub use resource::{ResourceOrigin, ResourcePayload};

/// Decode file bytes as UTF-8, dropping a leading byte order mark.
pub(crate) fn decode_text(bytes: &[u8]) -> Result<String, std::str::Utf8Error> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(bytes).map(str::to_string)
}
