use crate::PackageReference;
use serde_json::Value;
use std::path::PathBuf;

/// Where a resource payload was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOrigin {
    /// A file produced by the IG build tool.
    Generated { path: PathBuf },
    /// A file bundled in a cached package.
    Package {
        package: PackageReference,
        filename: String,
    },
}

impl std::fmt::Display for ResourceOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generated { path } => write!(f, "{}", path.display()),
            Self::Package { package, filename } => write!(f, "{package}/{filename}"),
        }
    }
}

/// Raw, unvalidated resource text. Parsing is left to the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePayload {
    pub origin: ResourceOrigin,
    pub content: String,
}

impl ResourcePayload {
    pub fn new(origin: ResourceOrigin, content: impl Into<String>) -> Self {
        Self {
            origin,
            content: content.into(),
        }
    }

    pub fn parse_json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.content)
    }
}
