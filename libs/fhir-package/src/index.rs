//! Package type index (`package/.index.json`).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

pub const INDEX_FILE: &str = ".index.json";

/// Package index (`.index.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageIndex {
    #[serde(rename = "index-version")]
    pub index_version: u8,
    pub files: Vec<IndexedFile>,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// File entry in package index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedFile {
    pub filename: String,
    #[serde(rename = "resourceType")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl IndexedFile {
    /// Index entry for a resource file, taken from the resource's own content.
    ///
    /// Returns `None` when the document has no `resourceType`.
    pub fn from_resource(filename: impl Into<String>, resource: &Value) -> Option<Self> {
        let field = |name: &str| resource.get(name).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            filename: filename.into(),
            resource_type: field("resourceType")?,
            id: field("id"),
            url: field("url"),
            version: field("version"),
            kind: field("kind"),
            r#type: field("type"),
            extra: Map::new(),
        })
    }
}

impl PackageIndex {
    pub fn from_files(files: Vec<IndexedFile>) -> Self {
        Self {
            index_version: 1,
            files,
            extra: Map::new(),
        }
    }

    /// Resource type → file names, in order of first appearance.
    pub fn types(&self) -> Vec<(&str, Vec<&str>)> {
        let mut types: Vec<(&str, Vec<&str>)> = Vec::new();
        for file in &self.files {
            match types
                .iter_mut()
                .find(|(resource_type, _)| *resource_type == file.resource_type)
            {
                Some((_, files)) => files.push(file.filename.as_str()),
                None => types.push((file.resource_type.as_str(), vec![file.filename.as_str()])),
            }
        }
        types
    }

    /// Every indexed file name once, grouped by resource type.
    pub fn resource_files(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.types()
            .into_iter()
            .flat_map(|(_, files)| files)
            .filter(|filename| seen.insert(*filename))
            .collect()
    }
}
