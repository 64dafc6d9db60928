use std::path::{Path, PathBuf};

/// Default folder (relative to the project) SUSHI writes its output to.
pub const GENERATED_DIR: &str = "fsh-generated";

/// Locations used to assemble a project's resources.
///
/// Passed explicitly to every load; nothing is read from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub project_dir: PathBuf,
    pub generated_dir: PathBuf,
    pub package_cache_dir: PathBuf,
}

impl ProjectConfig {
    /// Defaults: `<project>/fsh-generated` and `~/.fhir/packages`.
    ///
    /// Falls back to `.fhir/packages` relative to the working directory when no
    /// home directory can be determined.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let generated_dir = project_dir.join(GENERATED_DIR);
        let package_cache_dir = fshval_package::default_cache_dir()
            .unwrap_or_else(|| Path::new(".fhir").join("packages"));

        Self {
            project_dir,
            generated_dir,
            package_cache_dir,
        }
    }

    pub fn with_generated_dir(mut self, generated_dir: impl Into<PathBuf>) -> Self {
        self.generated_dir = generated_dir.into();
        self
    }

    pub fn with_package_cache_dir(mut self, package_cache_dir: impl Into<PathBuf>) -> Self {
        self.package_cache_dir = package_cache_dir.into();
        self
    }
}
