//! Infrastructure layer for Agent Eval
//!
//! This crate provides implementations for:
//! - Reading JSON Lines run files into evaluated records
//! - Writing and reading the metrics document
//! - An HTTP embedding backend for semantic similarity
//!
//! ## Usage
//!
//! ```rust,no_run
//! use agent_eval_application::{evaluate_records, ScoringEngine};
//! use agent_eval_infrastructure::run_store::{open_records, write_metrics, MetricsDocument};
//! use std::path::Path;
//!
//! let engine = ScoringEngine::default();
//! let records: Vec<_> = open_records(Path::new("runs/output.jsonl"))?
//!     .filter_map(|record| record.ok())
//!     .collect();
//!
//! let output = evaluate_records(&engine, &records);
//! write_metrics(Path::new("runs/metrics.json"), &MetricsDocument::new(output))?;
//! # Ok::<(), agent_eval_infrastructure::Error>(())
//! ```

pub mod embeddings;
pub mod run_store;

// Re-export commonly used types
pub use embeddings::{HttpEmbeddingFactory, HttpEmbeddingProvider};
pub use run_store::{
    open_records, read_metrics, write_metrics, MetricsDocument, RecordReader, RunRecord,
};

// Re-export result and error types
pub type Result<T> = std::result::Result<T, Error>;

/// Infrastructure-level errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A run-file line that is not a valid record
    #[error("Failed to parse line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Line number of the offending input, for parse errors
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}
