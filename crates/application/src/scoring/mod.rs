//! Scoring module - text metrics and the per-record scoring engine
//!
//! This module provides the individual comparison metrics, constraint checking,
//! embedding-backed similarity, and the engine that picks which of them apply.

pub mod constraints;
pub mod embedding;
mod engine;
pub mod metrics;

pub use constraints::{constraint_adherence, Constraint};
pub use embedding::{
    cosine_similarity, semantic_similarity, EmbeddingError, EmbeddingProvider,
    EmbeddingProviderFactory, EmbeddingRegistry, SimilarityOutcome, UnavailableEmbeddingFactory,
};
pub use engine::*;
pub use metrics::{evidence_coverage, exact_match, lcs_length, rouge_l, token_f1, ROUGE_L_BETA};
