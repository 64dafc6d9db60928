use crate::engine::{ValidationEngine, ValidationIssue};
use fshval_context::ResourceStore;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

pub const JSON_PARSE: &str = "JSON_PARSE";
pub const RESOURCE_TYPE_MISSING: &str = "RESOURCE_TYPE_MISSING";
pub const PROFILE_NOT_FOUND: &str = "PROFILE_NOT_FOUND";

/// Minimal engine that checks documents parse as resources and that every
/// `meta.profile` they claim is present in the resource store.
///
/// Stands in for a full FHIR validator; no structural or terminology checks.
#[derive(Debug, Clone, Default)]
pub struct CanonicalLookupEngine {
    canonicals: HashSet<String>,
}

impl CanonicalLookupEngine {
    pub fn from_store(store: &ResourceStore) -> Self {
        let mut canonicals = HashSet::new();
        for resource in store {
            match resource.parse_json() {
                Ok(value) => {
                    if let Some(url) = value.get("url").and_then(Value::as_str) {
                        canonicals.insert(url.to_string());
                    }
                }
                Err(e) => {
                    debug!(origin = %resource.origin, error = %e, "Skipping unparseable stored resource")
                }
            }
        }

        debug!(canonicals = canonicals.len(), "Indexed canonical URLs");
        Self { canonicals }
    }

    /// Whether `canonical` (optionally `|version` suffixed) is known.
    pub fn contains(&self, canonical: &str) -> bool {
        let url = canonical.split('|').next().unwrap_or(canonical);
        self.canonicals.contains(url)
    }
}

impl ValidationEngine for CanonicalLookupEngine {
    fn validate(&self, content: &str) -> Vec<ValidationIssue> {
        let resource: Value = match serde_json::from_str(content) {
            Ok(resource) => resource,
            Err(e) => {
                return vec![ValidationIssue::error(JSON_PARSE, e.to_string())
                    .with_location(e.line(), e.column())]
            }
        };

        if resource.get("resourceType").and_then(Value::as_str).is_none() {
            return vec![ValidationIssue::error(
                RESOURCE_TYPE_MISSING,
                "Document is not a FHIR resource: no `resourceType`".to_string(),
            )];
        }

        resource
            .pointer("/meta/profile")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .filter(|profile| !self.contains(profile))
            .map(|profile| {
                ValidationIssue::error(
                    PROFILE_NOT_FOUND,
                    format!("Profile reference '{profile}' has not been checked because it is unknown"),
                )
            })
            .collect()
    }
}
