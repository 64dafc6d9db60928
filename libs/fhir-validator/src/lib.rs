//! Validation of SUSHI output against a populated resource store.
//!
//! The engine itself sits behind [`ValidationEngine`]; this crate runs it over files,
//! drops ignored message ids and counts errors and warnings.
//! [`CanonicalLookupEngine`] is a small built-in engine that only checks profile
//! references can be resolved from the store.

pub mod canonical;
pub mod engine;
pub mod report;

pub use canonical::CanonicalLookupEngine;
pub use engine::{IssueSeverity, ValidationEngine, ValidationIssue};
pub use report::{
    validate_file, FileValidationResult, IgnoreList, ValidationReport, ValidationSummary,
    DEFAULT_IGNORED_IDS,
};
