use thiserror::Error;

/// Root domain error type.
///
/// Domain errors are pure: they never carry I/O handles, so they stay
/// `Clone + PartialEq` and can be asserted on directly in tests.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    // ========================================================================
    // Derivation Failures
    // ========================================================================
    #[error("Random source unavailable: {reason}")]
    RandomSource { reason: String },

    #[error("Unsupported context type '{0}'")]
    UnsupportedContext(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingRequiredField { field } => vec![
                format!("Set '{field}' in project.yml"),
                format!("Or pass it on the command line: --set {field}=\"...\""),
                "Run 'wpforge config create' to generate a starter config".into(),
            ],
            Self::InvalidValue { field, reason } => vec![
                format!("Check the value of '{field}': {reason}"),
                "Use 'wpforge config display' to inspect the resolved config".into(),
            ],
            Self::RandomSource { .. } => vec![
                "The operating system random source could not be read".into(),
                "Set the secret.* and db.prefix fields manually in project.yml".into(),
            ],
            Self::UnsupportedContext(kind) => vec![
                format!("'{kind}' is not a known context type"),
                "Supported types: project, vvv, scripts, bedrock, wordpress, plugin, theme".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingRequiredField { .. }
            | Self::InvalidValue { .. }
            | Self::UnsupportedContext(_) => ErrorCategory::Validation,
            Self::RandomSource { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_suggests_set_flag() {
        let err = DomainError::MissingRequiredField {
            field: "project.title",
        };
        assert!(err.suggestions().iter().any(|s| s.contains("--set project.title")));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn random_source_is_internal() {
        let err = DomainError::RandomSource {
            reason: "boom".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Internal);
    }
}
