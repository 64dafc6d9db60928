//! Error types for package handling

use crate::PackageReference;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while reading manifests and resolving packages from the cache.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("Failed to read manifest {}: {source}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {}: {message}", path.display())]
    ManifestParse { path: PathBuf, message: String },

    #[error("Package {name}#{version} is not installed")]
    PackageNotInstalled { name: String, version: String },

    #[error("Package {package} is corrupt: {reason}")]
    PackageCorrupt {
        package: PackageReference,
        reason: String,
    },
}

/// Coarse classification of a [`PackageError`], stable for callers mapping
/// failures to exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ManifestNotFound,
    ManifestParse,
    PackageNotInstalled,
    PackageCorrupt,
}

impl PackageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ManifestNotFound { .. } => ErrorKind::ManifestNotFound,
            // An unreadable manifest is as unusable as a malformed one.
            Self::ManifestRead { .. } | Self::ManifestParse { .. } => ErrorKind::ManifestParse,
            Self::PackageNotInstalled { .. } => ErrorKind::PackageNotInstalled,
            Self::PackageCorrupt { .. } => ErrorKind::PackageCorrupt,
        }
    }

    pub(crate) fn not_installed(reference: &PackageReference) -> Self {
        Self::PackageNotInstalled {
            name: reference.name.clone(),
            version: reference.version.clone(),
        }
    }

    pub(crate) fn corrupt(reference: &PackageReference, reason: impl Into<String>) -> Self {
        Self::PackageCorrupt {
            package: reference.clone(),
            reason: reason.into(),
        }
    }
}

pub type PackageResult<T> = Result<T, PackageError>;
