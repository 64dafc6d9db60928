//! Opening cached packages.

use crate::cache::{PackageCacheEntry, PACKAGE_FOLDER};
use crate::error::{PackageError, PackageResult};
use crate::index::{IndexedFile, PackageIndex, INDEX_FILE};
use crate::manifest::{Dependencies, ProjectManifest, PACKAGE_MANIFEST_FILE};
use crate::resource::{ResourceOrigin, ResourcePayload};
use crate::{decode_text, PackageReference};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Contents of one cache entry: its resources plus its declared dependencies.
///
/// Lives only for a single resolution step.
#[derive(Debug, Clone)]
pub struct LoadedPackage {
    pub reference: PackageReference,
    pub resources: Vec<ResourcePayload>,
    pub dependencies: Dependencies,
}

impl LoadedPackage {
    /// Read every resource listed in the package type index and the package's own
    /// dependencies.
    ///
    /// A missing `package/package.json` means the package has no dependencies. A
    /// missing `.index.json` is rebuilt by scanning the package folder. Any resource
    /// file that cannot be read makes the whole package corrupt.
    pub fn load(entry: &PackageCacheEntry) -> PackageResult<Self> {
        let reference = &entry.reference;
        let package_dir = entry.package_dir();
        if !package_dir.is_dir() {
            return Err(PackageError::corrupt(
                reference,
                format!("missing `{PACKAGE_FOLDER}` folder"),
            ));
        }

        let dependencies = read_dependencies(reference, &package_dir)?;
        let resources = match read_index(reference, &package_dir)? {
            Some(index) => index
                .resource_files()
                .into_iter()
                .map(|filename| read_resource(reference, &package_dir, filename))
                .collect::<PackageResult<Vec<_>>>()?,
            None => {
                debug!(package = %reference, "No {INDEX_FILE}, scanning package folder");
                scan_package_dir(reference, &package_dir)?
            }
        };

        debug!(
            package = %reference,
            resources = resources.len(),
            dependencies = dependencies.len(),
            "Loaded package"
        );

        Ok(Self {
            reference: reference.clone(),
            resources,
            dependencies,
        })
    }
}

fn read_dependencies(reference: &PackageReference, package_dir: &Path) -> PackageResult<Dependencies> {
    let path = package_dir.join(PACKAGE_MANIFEST_FILE);
    match ProjectManifest::from_path_if_exists(&path) {
        Ok(manifest) => Ok(manifest.map(|m| m.dependencies).unwrap_or_default()),
        Err(PackageError::ManifestRead { source, .. }) => Err(PackageError::corrupt(
            reference,
            format!("cannot read {PACKAGE_MANIFEST_FILE}: {source}"),
        )),
        Err(e) => Err(e),
    }
}

/// The package's type index, or `None` when it ships without one.
fn read_index(
    reference: &PackageReference,
    package_dir: &Path,
) -> PackageResult<Option<PackageIndex>> {
    let path = package_dir.join(INDEX_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let bytes = fs::read(&path)
        .map_err(|e| PackageError::corrupt(reference, format!("cannot read {INDEX_FILE}: {e}")))?;
    let text = decode_text(&bytes).map_err(|e| {
        PackageError::corrupt(reference, format!("{INDEX_FILE} is not valid UTF-8: {e}"))
    })?;
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| PackageError::corrupt(reference, format!("malformed {INDEX_FILE}: {e}")))
}

/// Read the `*.json` files directly in the package folder and keep the resources,
/// in the order an index built from them would list them. Each file is read once.
fn scan_package_dir(
    reference: &PackageReference,
    package_dir: &Path,
) -> PackageResult<Vec<ResourcePayload>> {
    let unreadable =
        |e: std::io::Error| PackageError::corrupt(reference, format!("cannot list package folder: {e}"));

    let mut filenames = Vec::new();
    for dir_entry in fs::read_dir(package_dir).map_err(unreadable)? {
        let path = dir_entry.map_err(unreadable)?.path();
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if path.is_file() && is_json && filename != PACKAGE_MANIFEST_FILE && filename != INDEX_FILE {
            filenames.push(filename.to_string());
        }
    }
    filenames.sort();

    let mut files = Vec::new();
    let mut payloads = HashMap::new();
    for filename in filenames {
        let payload = read_resource(reference, package_dir, &filename)?;
        match serde_json::from_str::<Value>(&payload.content) {
            Ok(resource) => {
                if let Some(file) = IndexedFile::from_resource(filename.as_str(), &resource) {
                    files.push(file);
                    payloads.insert(filename, payload);
                }
            }
            Err(e) => warn!(package = %reference, file = %filename, error = %e, "Skipping unparseable file"),
        }
    }

    let index = PackageIndex::from_files(files);
    Ok(index
        .resource_files()
        .into_iter()
        .filter_map(|filename| payloads.remove(filename))
        .collect())
}

fn read_resource(
    reference: &PackageReference,
    package_dir: &Path,
    filename: &str,
) -> PackageResult<ResourcePayload> {
    if filename.is_empty() || filename.contains(['/', '\\']) || filename == ".." {
        return Err(PackageError::corrupt(
            reference,
            format!("index entry `{filename}` is not a file in the package folder"),
        ));
    }

    let bytes = fs::read(package_dir.join(filename)).map_err(|e| {
        PackageError::corrupt(reference, format!("cannot read resource file {filename}: {e}"))
    })?;
    let content = decode_text(&bytes).map_err(|e| {
        PackageError::corrupt(reference, format!("resource file {filename} is not valid UTF-8: {e}"))
    })?;

    Ok(ResourcePayload::new(
        ResourceOrigin::Package {
            package: reference.clone(),
            filename: filename.to_string(),
        },
        content,
    ))
}
