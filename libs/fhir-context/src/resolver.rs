//! Transitive package dependency resolution.
//!
//! Depth-first, in manifest order. Each declared package is located in the cache,
//! loaded, its resources emitted, and then its own dependencies are resolved the
//! same way. The first failure aborts the whole resolution.
//!
//! A package reached through several paths (a diamond) emits its resources once per
//! path. It is only read from disk once per run, and its later copies are taken from
//! the output rather than from a retained [`LoadedPackage`]. A package that is already
//! on the current path (a cycle) is skipped.

use fshval_package::{
    Dependencies, LoadedPackage, PackageCache, PackageReference, PackageResult, ProjectManifest,
    ResourcePayload,
};
use std::collections::HashMap;
use std::ops::Range;
use std::rc::Rc;
use tracing::{debug, debug_span, info, warn};

/// Resolve all resources reachable from `manifest`.
pub fn resolve<C>(manifest: &ProjectManifest, cache: &C) -> PackageResult<Vec<ResourcePayload>>
where
    C: PackageCache + ?Sized,
{
    DependencyResolver::new(cache).resolve(manifest)
}

pub struct DependencyResolver<'c, C: PackageCache + ?Sized> {
    cache: &'c C,
    visited: HashMap<PackageReference, Visited>,
    path: Vec<PackageReference>,
}

/// What is remembered of a package once it has been loaded.
struct Visited {
    /// Where its resources were first written in the output.
    emitted: Range<usize>,
    dependencies: Rc<Dependencies>,
}

impl<'c, C: PackageCache + ?Sized> DependencyResolver<'c, C> {
    pub fn new(cache: &'c C) -> Self {
        Self {
            cache,
            visited: HashMap::new(),
            path: Vec::new(),
        }
    }

    pub fn resolve(&mut self, manifest: &ProjectManifest) -> PackageResult<Vec<ResourcePayload>> {
        // Emitted ranges point into a single output.
        self.visited.clear();
        let mut resources = Vec::new();
        self.resolve_dependencies(&manifest.dependencies, &mut resources)?;

        info!(
            packages = self.visited.len(),
            resources = resources.len(),
            "Resolved package dependencies"
        );
        Ok(resources)
    }

    /// Distinct packages read from the cache during the last run.
    pub fn packages_loaded(&self) -> usize {
        self.visited.len()
    }

    fn resolve_dependencies(
        &mut self,
        dependencies: &Dependencies,
        resources: &mut Vec<ResourcePayload>,
    ) -> PackageResult<()> {
        for reference in dependencies {
            if self.path.contains(reference) {
                warn!(
                    package = %reference,
                    via = %self.render_path(),
                    "Dependency cycle, not following package again"
                );
                continue;
            }

            let _span = debug_span!("package", package = %reference, depth = self.path.len()).entered();
            let transitive = self.emit(reference, resources)?;

            self.path.push(reference.clone());
            let nested = self.resolve_dependencies(&transitive, resources);
            self.path.pop();
            nested?;
        }
        Ok(())
    }

    /// Append the resources of `reference` to `resources` and return its dependencies.
    fn emit(
        &mut self,
        reference: &PackageReference,
        resources: &mut Vec<ResourcePayload>,
    ) -> PackageResult<Rc<Dependencies>> {
        if let Some(visited) = self.visited.get(reference) {
            debug!("Reusing already loaded package");
            resources.extend_from_within(visited.emitted.clone());
            return Ok(Rc::clone(&visited.dependencies));
        }

        let entry = self.cache.locate(reference)?;
        let LoadedPackage {
            resources: loaded,
            dependencies,
            ..
        } = LoadedPackage::load(&entry)?;

        let start = resources.len();
        resources.extend(loaded);
        let dependencies = Rc::new(dependencies);
        self.visited.insert(
            reference.clone(),
            Visited {
                emitted: start..resources.len(),
                dependencies: Rc::clone(&dependencies),
            },
        );
        Ok(dependencies)
    }

    fn render_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
