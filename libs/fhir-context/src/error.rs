//! Error types for project resource loading

use fshval_package::{ErrorKind as PackageErrorKind, PackageError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("Generated resources directory not found: {}", path.display())]
    GeneratedResourcesNotFound { path: PathBuf },

    #[error("Failed to read generated resource {}: {source}", path.display())]
    GeneratedResourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Every distinguishable failure of a project load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ManifestNotFound,
    ManifestParse,
    PackageNotInstalled,
    PackageCorrupt,
    GeneratedResources,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Package(e) => match e.kind() {
                PackageErrorKind::ManifestNotFound => ErrorKind::ManifestNotFound,
                PackageErrorKind::ManifestParse => ErrorKind::ManifestParse,
                PackageErrorKind::PackageNotInstalled => ErrorKind::PackageNotInstalled,
                PackageErrorKind::PackageCorrupt => ErrorKind::PackageCorrupt,
            },
            Self::GeneratedResourcesNotFound { .. } | Self::GeneratedResourceRead { .. } => {
                ErrorKind::GeneratedResources
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
