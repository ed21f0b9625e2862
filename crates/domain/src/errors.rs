//! Error types for the evaluation domain.

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Metric name not recognized
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    /// Record is missing a field the caller required
    #[error("Record is missing required field '{field}'")]
    MissingField { field: &'static str },
}

impl DomainError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownMetric(_) => "UNKNOWN_METRIC",
            Self::MissingField { .. } => "MISSING_FIELD",
        }
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
