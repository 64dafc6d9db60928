//! Running an engine over files and tallying the outcome.

use crate::engine::{IssueSeverity, ValidationEngine, ValidationIssue};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const FILE_UNREADABLE: &str = "FILE_UNREADABLE";

/// Message ids reported by default-configured engines that are noise for SUSHI output.
pub const DEFAULT_IGNORED_IDS: [&str; 1] = ["SD_TYPE_NOT_LOCAL"];

/// Issues reported for one validated file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileValidationResult {
    pub path: PathBuf,
    pub issues: Vec<ValidationIssue>,
}

impl FileValidationResult {
    /// `[path:(line,col): SEVERITY id: message]` for each issue.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.issues.iter().map(move |issue| {
            let id = issue
                .message_id
                .as_deref()
                .map(|id| format!(" {id}"))
                .unwrap_or_default();
            format!(
                "[{}:({},{}): {}{}: {}]",
                self.path.display(),
                issue.line.unwrap_or(0),
                issue.column.unwrap_or(0),
                issue.severity.to_string().to_uppercase(),
                id,
                issue.message
            )
        })
    }
}

/// Read and validate a single file. A file that cannot be read is reported as a
/// fatal issue instead of aborting the run.
pub fn validate_file<E>(engine: &E, path: &Path) -> FileValidationResult
where
    E: ValidationEngine + ?Sized,
{
    debug!(file = %path.display(), "Validating");
    let issues = match fs::read_to_string(path) {
        Ok(content) => engine.validate(content.strip_prefix('\u{feff}').unwrap_or(&content)),
        Err(e) => vec![ValidationIssue::new(
            IssueSeverity::Fatal,
            FILE_UNREADABLE,
            format!("Cannot read file: {e}"),
        )],
    };

    FileValidationResult {
        path: path.to_path_buf(),
        issues,
    }
}

/// Message ids to drop from the report.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    ids: HashSet<String>,
}

impl IgnoreList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_ignored(&self, issue: &ValidationIssue) -> bool {
        issue
            .message_id
            .as_ref()
            .is_some_and(|id| self.ids.contains(id))
    }
}

/// Totals over a validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl ValidationSummary {
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validated {} files. {} Errors. {} Warnings",
            self.files, self.errors, self.warnings
        )
    }
}

/// Results of validating a set of files, with ignored issues removed.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub results: Vec<FileValidationResult>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub fn run<E, P>(engine: &E, files: &[P], ignore: &IgnoreList) -> Self
    where
        E: ValidationEngine + ?Sized,
        P: AsRef<Path>,
    {
        let mut report = Self::default();
        for file in files {
            let mut result = validate_file(engine, file.as_ref());
            result.issues.retain(|issue| !ignore.is_ignored(issue));
            report.record(result);
        }
        report
    }

    fn record(&mut self, result: FileValidationResult) {
        self.summary.files += 1;
        for issue in &result.issues {
            if issue.is_error() {
                self.summary.errors += 1;
            } else if issue.severity == IssueSeverity::Warning {
                self.summary.warnings += 1;
            }
        }
        self.results.push(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Reports whatever the document says it should.
    struct ScriptedEngine;

    impl ValidationEngine for ScriptedEngine {
        fn validate(&self, content: &str) -> Vec<ValidationIssue> {
            content
                .lines()
                .filter_map(|line| match line.split_once(' ') {
                    Some(("error", id)) => Some(ValidationIssue::error(id, "scripted".into())),
                    Some(("warning", id)) => Some(ValidationIssue::warning(id, "scripted".into())),
                    Some(("info", id)) => Some(ValidationIssue::new(
                        IssueSeverity::Information,
                        id,
                        "scripted".into(),
                    )),
                    _ => None,
                })
                .collect()
        }
    }

    #[test]
    fn report_counts_and_filters() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("b.json");
        fs::write(&a, "error E1\nwarning SD_TYPE_NOT_LOCAL\ninfo I1\n").unwrap();
        fs::write(&b, "warning W1\nerror E2\n").unwrap();

        let report = ValidationReport::run(
            &ScriptedEngine,
            &[&a, &b],
            &IgnoreList::new(DEFAULT_IGNORED_IDS.iter().copied()),
        );

        assert_eq!(
            report.summary,
            ValidationSummary {
                files: 2,
                errors: 2,
                warnings: 1
            }
        );
        assert_eq!(report.results[0].issues.len(), 2);
        assert_eq!(
            report.summary.to_string(),
            "Validated 2 files. 2 Errors. 1 Warnings"
        );
    }

    #[test]
    fn unreadable_file_is_a_fatal_issue() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");

        let report = ValidationReport::run(&ScriptedEngine, &[&missing], &IgnoreList::default());

        assert!(report.summary.has_errors());
        assert_eq!(
            report.results[0].issues[0].message_id.as_deref(),
            Some(FILE_UNREADABLE)
        );
    }

    #[test]
    fn lines_render_location_severity_and_id() {
        let result = FileValidationResult {
            path: PathBuf::from("fsh-generated/resources/Patient-a.json"),
            issues: vec![
                ValidationIssue::error("E1", "broken".to_string()).with_location(4, 2),
                ValidationIssue {
                    severity: IssueSeverity::Warning,
                    message_id: None,
                    message: "hmm".to_string(),
                    line: None,
                    column: None,
                },
            ],
        };

        let lines: Vec<String> = result.lines().collect();
        assert_eq!(
            lines,
            vec![
                "[fsh-generated/resources/Patient-a.json:(4,2): ERROR E1: broken]",
                "[fsh-generated/resources/Patient-a.json:(0,0): WARNING: hmm]",
            ]
        );
    }
}
