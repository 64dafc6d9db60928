//! Contract between the resource store and a validation engine.

/// Validates one resource document.
///
/// Implementations are built over a populated
/// [`ResourceStore`](fshval_context::ResourceStore) and report every problem as a
/// [`ValidationIssue`]; an empty list means the document is valid.
pub trait ValidationEngine {
    fn validate(&self, content: &str) -> Vec<ValidationIssue>;
}

/// Individual validation issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub message_id: Option<String>,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl ValidationIssue {
    pub fn new(severity: IssueSeverity, message_id: &str, message: String) -> Self {
        Self {
            severity,
            message_id: Some(message_id.to_string()),
            message,
            line: None,
            column: None,
        }
    }

    pub fn error(message_id: &str, message: String) -> Self {
        Self::new(IssueSeverity::Error, message_id, message)
    }

    pub fn warning(message_id: &str, message: String) -> Self {
        Self::new(IssueSeverity::Warning, message_id, message)
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, IssueSeverity::Fatal | IssueSeverity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fatal => write!(f, "Fatal"),
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
            Self::Information => write!(f, "Information"),
        }
    }
}
