//! Project and package manifests.
//!
//! The same reader handles a SUSHI project configuration (`sushi-config.yaml`) and the
//! NPM-style `package/package.json` shipped inside every cached package. Only the
//! `dependencies` section is interpreted. Each entry is normalized to a
//! [`PackageReference`] at parse time, whether the version was written as a bare
//! string or as a record with a `version` field:
//!
//! ```yaml
//! dependencies:
//!   hl7.fhir.r4.core: 4.0.1
//!   de.basisprofil.r4:
//!     id: basis
//!     version: 1.4.0
//! ```

use crate::{decode_text, PackageError, PackageReference, PackageResult};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUSHI_CONFIG_FILE: &str = "sushi-config.yaml";
const SUSHI_CONFIG_FILE_ALT: &str = "sushi-config.yml";
pub const PACKAGE_MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    /// `.json` files are read as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parsed project or package manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectManifest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: Dependencies,
}

impl ProjectManifest {
    /// Read and parse the manifest at `path`.
    pub fn from_path(path: &Path) -> PackageResult<Self> {
        if !path.exists() {
            return Err(PackageError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = fs::read(path).map_err(|source| PackageError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        let parse_error = |message: String| PackageError::ManifestParse {
            path: path.to_path_buf(),
            message,
        };
        let content = decode_text(&bytes).map_err(|e| parse_error(format!("invalid UTF-8: {e}")))?;
        Self::decode(&content, ManifestFormat::from_path(path)).map_err(parse_error)
    }

    /// Like [`ProjectManifest::from_path`], but a missing file yields `None`.
    pub fn from_path_if_exists(path: &Path) -> PackageResult<Option<Self>> {
        match Self::from_path(path) {
            Ok(manifest) => Ok(Some(manifest)),
            Err(PackageError::ManifestNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Locate the root manifest of a project.
    ///
    /// Only `project_dir` itself is searched: `sushi-config.yaml`, then
    /// `sushi-config.yml`, then `package.json`. Parent directories are never
    /// consulted.
    pub fn discover(project_dir: &Path) -> PackageResult<PathBuf> {
        [SUSHI_CONFIG_FILE, SUSHI_CONFIG_FILE_ALT, PACKAGE_MANIFEST_FILE]
            .into_iter()
            .map(|file_name| project_dir.join(file_name))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| PackageError::ManifestNotFound {
                path: project_dir.join(SUSHI_CONFIG_FILE),
            })
    }

    fn decode(content: &str, format: ManifestFormat) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        match format {
            ManifestFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ManifestFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

/// Declared dependencies in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies(Vec<PackageReference>);

impl Dependencies {
    pub fn iter(&self) -> std::slice::Iter<'_, PackageReference> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PackageReference> {
        self.0.iter().find(|reference| reference.name == name)
    }
}

impl FromIterator<PackageReference> for Dependencies {
    fn from_iter<I: IntoIterator<Item = PackageReference>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dependencies {
    type Item = &'a PackageReference;
    type IntoIter = std::slice::Iter<'a, PackageReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Dependencies {
    type Item = PackageReference;
    type IntoIter = std::vec::IntoIter<PackageReference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de> Deserialize<'de> for Dependencies {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DependenciesVisitor)
    }
}

struct DependenciesVisitor;

impl<'de> Visitor<'de> for DependenciesVisitor {
    type Value = Dependencies;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a mapping of package names to versions")
    }

    // `dependencies:` with nothing after it
    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Dependencies::default())
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Dependencies::default())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut seen = HashSet::new();
        let mut references = Vec::new();

        while let Some((name, specifier)) = map.next_entry::<String, Value>()? {
            if !seen.insert(name.clone()) {
                return Err(de::Error::custom(format!("duplicate dependency `{name}`")));
            }
            let version = normalize_version(&name, &specifier).map_err(de::Error::custom)?;
            references.push(PackageReference { name, version });
        }

        Ok(Dependencies(references))
    }
}

/// Reduce a version specifier to the exact version string.
fn normalize_version(name: &str, specifier: &Value) -> Result<String, String> {
    let version = match specifier {
        Value::String(version) => version,
        Value::Object(fields) => match fields.get("version") {
            Some(Value::String(version)) => version,
            Some(other) => {
                return Err(format!(
                    "dependency `{name}`: `version` must be a string, found {}",
                    describe(other)
                ))
            }
            None => return Err(format!("dependency `{name}`: missing `version` field")),
        },
        other => {
            return Err(format!(
                "dependency `{name}`: expected a version string or a record with a `version` field, found {}",
                describe(other)
            ))
        }
    };

    if version.is_empty() {
        return Err(format!("dependency `{name}`: version is empty"));
    }
    Ok(version.clone())
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean `{b}`"),
        Value::Number(n) => format!("number `{n}` (quote the version)"),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "a list".to_string(),
        Value::Object(_) => "a record".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn yaml(content: &str) -> Result<ProjectManifest, String> {
        ProjectManifest::decode(content, ManifestFormat::Yaml)
    }

    #[test]
    fn bare_and_structured_versions_normalize_identically() {
        let bare = yaml("dependencies:\n  hl7.fhir.r4.core: 4.0.1\n").unwrap();
        let structured = yaml(
            "dependencies:\n  hl7.fhir.r4.core:\n    id: r4\n    uri: http://hl7.org/fhir\n    version: 4.0.1\n",
        )
        .unwrap();

        assert_eq!(bare.dependencies, structured.dependencies);
        assert_eq!(
            bare.dependencies.get("hl7.fhir.r4.core"),
            Some(&PackageReference::new("hl7.fhir.r4.core", "4.0.1"))
        );
    }

    #[test]
    fn dependencies_keep_document_order() {
        let manifest = yaml(
            "id: my.ig\ndependencies:\n  z.pkg: 1.0.0\n  a.pkg: 2.0.0\n  m.pkg: 3.0.0\n",
        )
        .unwrap();

        let names: Vec<&str> = manifest
            .dependencies
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["z.pkg", "a.pkg", "m.pkg"]);
        assert_eq!(manifest.id.as_deref(), Some("my.ig"));
    }

    #[test]
    fn json_package_manifest() {
        let manifest = ProjectManifest::decode(
            r#"{
                "name": "de.gematik.ti",
                "version": "1.0.0",
                "author": "gematik",
                "dependencies": { "hl7.fhir.r4.core": "4.0.1", "de.basisprofil.r4": "1.4.0" }
            }"#,
            ManifestFormat::Json,
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("de.gematik.ti"));
        assert_eq!(manifest.dependencies.len(), 2);
        assert_eq!(
            manifest.dependencies.iter().next(),
            Some(&PackageReference::new("hl7.fhir.r4.core", "4.0.1"))
        );
    }

    #[test]
    fn missing_or_empty_dependencies_are_empty() {
        assert!(yaml("id: my.ig\n").unwrap().dependencies.is_empty());
        assert!(yaml("dependencies:\n").unwrap().dependencies.is_empty());
        assert!(yaml("").unwrap().dependencies.is_empty());
    }

    #[test]
    fn unquoted_numeric_version_is_rejected() {
        let err = yaml("dependencies:\n  de.basisprofil.r4: 1.4\n").unwrap_err();
        assert!(err.contains("de.basisprofil.r4"), "{err}");
        assert!(err.contains("quote the version"), "{err}");
    }

    #[test]
    fn structured_specifier_without_version_is_rejected() {
        let err = yaml("dependencies:\n  hl7.fhir.us.core:\n    id: uscore\n").unwrap_err();
        assert!(err.contains("missing `version`"), "{err}");
    }

    #[test]
    fn list_specifier_is_rejected() {
        assert!(yaml("dependencies:\n  hl7.fhir.us.core: [3.1.0]\n").is_err());
    }

    #[test]
    fn dependencies_must_be_a_mapping() {
        assert!(yaml("dependencies: hl7.fhir.r4.core\n").is_err());
    }

    #[test]
    fn from_path_classifies_failures() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join(SUSHI_CONFIG_FILE);
        assert!(matches!(
            ProjectManifest::from_path(&missing),
            Err(PackageError::ManifestNotFound { .. })
        ));
        assert!(ProjectManifest::from_path_if_exists(&missing)
            .unwrap()
            .is_none());

        let broken = dir.path().join(PACKAGE_MANIFEST_FILE);
        fs::write(&broken, "{ \"dependencies\": ").unwrap();
        assert!(matches!(
            ProjectManifest::from_path(&broken),
            Err(PackageError::ManifestParse { .. })
        ));
        // A malformed nested manifest is still an error.
        assert!(ProjectManifest::from_path_if_exists(&broken).is_err());
    }

    #[test]
    fn from_path_strips_byte_order_mark() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PACKAGE_MANIFEST_FILE);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"\xEF\xBB\xBF{\"dependencies\": {\"a.pkg\": \"1.0.0\"}}")
            .unwrap();

        let manifest = ProjectManifest::from_path(&path).unwrap();
        assert_eq!(manifest.dependencies.len(), 1);
    }

    #[test]
    fn discover_prefers_sushi_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PACKAGE_MANIFEST_FILE), "{}").unwrap();
        fs::write(dir.path().join(SUSHI_CONFIG_FILE), "id: x\n").unwrap();

        let found = ProjectManifest::discover(dir.path()).unwrap();
        assert_eq!(found, dir.path().join(SUSHI_CONFIG_FILE));
    }

    #[test]
    fn discover_falls_back_to_package_json_in_project_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PACKAGE_MANIFEST_FILE), "{}").unwrap();

        let found = ProjectManifest::discover(dir.path()).unwrap();
        assert_eq!(found, dir.path().join(PACKAGE_MANIFEST_FILE));
    }

    #[test]
    fn discover_ignores_manifests_in_parent_directories() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("ig");
        fs::create_dir_all(&project).unwrap();
        fs::write(
            dir.path().join(PACKAGE_MANIFEST_FILE),
            r#"{"dependencies": {"fsh-sushi": "^3.0.0"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join(SUSHI_CONFIG_FILE), "id: parent\n").unwrap();

        let err = ProjectManifest::discover(&project).unwrap_err();
        match err {
            PackageError::ManifestNotFound { path } => {
                assert_eq!(path, project.join(SUSHI_CONFIG_FILE));
            }
            other => panic!("expected ManifestNotFound, got {other:?}"),
        }
    }
}
