//! Throw-away package caches and SUSHI projects for integration tests.
#![allow(dead_code)]

use fshval_package::{PackageReference, ProjectManifest};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Package cache in a temporary directory.
pub struct TestCache {
    dir: TempDir,
}

impl TestCache {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create cache dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn package(&self, name: &str, version: &str) -> PackageBuilder {
        PackageBuilder {
            entry_dir: self.root().join(format!("{name}#{version}")),
            name: name.to_string(),
            version: version.to_string(),
            dependencies: Vec::new(),
            resources: Vec::new(),
            with_index: true,
        }
    }
}

pub struct PackageBuilder {
    entry_dir: PathBuf,
    name: String,
    version: String,
    dependencies: Vec<(String, String)>,
    resources: Vec<Value>,
    with_index: bool,
}

impl PackageBuilder {
    pub fn depends_on(mut self, name: &str, version: &str) -> Self {
        self.dependencies.push((name.to_string(), version.to_string()));
        self
    }

    /// Add a StructureDefinition with id `<package>-<n>`.
    pub fn resources(mut self, count: usize) -> Self {
        for _ in 0..count {
            let id = format!("{}-{}", self.name, self.resources.len());
            self.resources.push(json!({
                "resourceType": "StructureDefinition",
                "id": id,
                "url": format!("http://example.org/StructureDefinition/{id}"),
            }));
        }
        self
    }

    pub fn without_index(mut self) -> Self {
        self.with_index = false;
        self
    }

    /// Write the package; the nested manifest is only written when there are dependencies.
    pub fn install(self) -> PackageReference {
        let package_dir = self.entry_dir.join("package");
        fs::create_dir_all(&package_dir).expect("create package dir");

        if !self.dependencies.is_empty() {
            let dependencies: serde_json::Map<String, Value> = self
                .dependencies
                .iter()
                .map(|(name, version)| (name.clone(), Value::from(version.as_str())))
                .collect();
            write_json(
                &package_dir.join("package.json"),
                &json!({
                    "name": self.name,
                    "version": self.version,
                    "dependencies": dependencies,
                }),
            );
        }

        let mut files = Vec::new();
        for resource in &self.resources {
            let filename = format!("StructureDefinition-{}.json", resource["id"].as_str().unwrap());
            write_json(&package_dir.join(&filename), resource);
            files.push(json!({ "filename": filename, "resourceType": "StructureDefinition" }));
        }
        if self.with_index {
            write_json(
                &package_dir.join(".index.json"),
                &json!({ "index-version": 1, "files": files }),
            );
        }

        PackageReference::new(self.name, self.version)
    }
}

/// SUSHI project in a temporary directory.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create project dir"),
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn sushi_config(&self, yaml: &str) -> &Self {
        fs::write(self.dir().join("sushi-config.yaml"), yaml).expect("write sushi-config.yaml");
        self
    }

    pub fn generated(&self, relative: &str, resource: &Value) -> &Self {
        let path = self.dir().join("fsh-generated").join(relative);
        fs::create_dir_all(path.parent().unwrap()).expect("create generated dir");
        write_json(&path, resource);
        self
    }

    pub fn manifest(&self) -> ProjectManifest {
        ProjectManifest::from_path(&self.dir().join("sushi-config.yaml")).expect("parse manifest")
    }
}

pub fn manifest_of(references: &[PackageReference]) -> ProjectManifest {
    ProjectManifest {
        dependencies: references.iter().cloned().collect(),
        ..Default::default()
    }
}

pub fn write_json(path: &Path, value: &Value) {
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).expect("write json");
}

/// `package` of every resource, in emission order.
pub fn packages_of(resources: &[fshval_package::ResourcePayload]) -> Vec<String> {
    resources
        .iter()
        .map(|r| match &r.origin {
            fshval_package::ResourceOrigin::Package { package, .. } => package.name.clone(),
            fshval_package::ResourceOrigin::Generated { .. } => "<generated>".to_string(),
        })
        .collect()
}
