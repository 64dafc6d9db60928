use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type PackageName = String;
pub type Version = String;

/// Exact `name#version` identity of a package in the local cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageReference {
    pub name: PackageName,
    pub version: Version,
}

impl PackageReference {
    pub fn new(name: impl Into<PackageName>, version: impl Into<Version>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Folder name of this package inside the package cache.
    pub fn cache_key(&self) -> String {
        format!("{}#{}", self.name, self.version)
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.version)
    }
}

/// Text that is not of the form `name#version`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid package reference '{0}': expected name#version")]
pub struct ParseReferenceError(pub String);

impl FromStr for PackageReference {
    type Err = ParseReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('#') {
            Some((name, version))
                if !name.trim().is_empty()
                    && !version.trim().is_empty()
                    && !version.contains('#') =>
            {
                Ok(Self::new(name.trim(), version.trim()))
            }
            _ => Err(ParseReferenceError(s.to_string())),
        }
    }
}
