use crate::config::ProjectConfig;
use crate::error::Result;
use crate::generated::preload_generated;
use crate::resolver::resolve;
use crate::store::ResourceStore;
use fshval_package::{FileSystemCache, ProjectManifest};
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

/// All resources available to validate a SUSHI project against.
///
/// Built in two phases: the project's generated resources are loaded first, then the
/// transitive closure of the root manifest's dependencies is resolved from the package
/// cache. Nothing from a failed resolution reaches the store.
#[derive(Debug)]
pub struct ProjectResources {
    manifest_path: PathBuf,
    manifest: ProjectManifest,
    store: ResourceStore,
}

impl ProjectResources {
    pub fn load(config: &ProjectConfig) -> Result<Self> {
        let _span = info_span!("load_project", project = %config.project_dir.display()).entered();

        let mut store = ResourceStore::new();
        let generated = preload_generated(&config.generated_dir, &mut store)?;

        let manifest_path = ProjectManifest::discover(&config.project_dir)?;
        let manifest = ProjectManifest::from_path(&manifest_path)?;
        info!(
            manifest = %manifest_path.display(),
            dependencies = manifest.dependencies.len(),
            "Read project manifest"
        );

        let cache = FileSystemCache::new(&config.package_cache_dir);
        let from_packages = resolve(&manifest, &cache)?;
        let packaged = from_packages.len();
        store.extend(from_packages);

        info!(
            generated,
            packaged,
            total = store.len(),
            "Project resources loaded"
        );

        Ok(Self {
            manifest_path,
            manifest,
            store,
        })
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    pub fn into_store(self) -> ResourceStore {
        self.store
    }
}
