//! Application layer for Agent Eval
//!
//! This crate turns normalized records into scores and folds the scores into summary
//! tables.
//!
//! ## Modules
//!
//! - `scoring` - Text metrics, constraint checking, embedding similarity and the engine
//!   that selects which metrics apply to a record
//! - `aggregation` - Running accumulators and the single-pass and sharded pipelines

pub mod aggregation;
pub mod scoring;

// Re-export commonly used types
pub use aggregation::{
    evaluate_records, evaluate_sharded, AggregationPipeline, PartialAggregate, PipelineOutput,
    PipelineStats, ScoreAccumulator,
};
pub use scoring::{
    EmbeddingError, EmbeddingProvider, EmbeddingProviderFactory, EmbeddingRegistry,
    ScoredRecord, ScoringEngine, ScoringEngineBuilder, ScoringEngineConfig,
};

use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug, Clone)]
pub enum ApplicationError {
    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Get error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            ApplicationError::InvalidInput(_) => "INVALID_INPUT",
            ApplicationError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ApplicationError::InvalidInput("x".to_string()).error_code(), "INVALID_INPUT");
        assert_eq!(ApplicationError::Internal("x".to_string()).error_code(), "INTERNAL_ERROR");
    }
}
