//! Scoring Engine - metric selection and per-record scoring
//!
//! The engine decides which metrics apply to a record from its task kind and the
//! presence of a reference and evidence, then computes them.

use crate::scoring::constraints::constraint_adherence;
use crate::scoring::embedding::{
    semantic_similarity, EmbeddingProviderFactory, EmbeddingRegistry, UnavailableEmbeddingFactory,
};
use crate::scoring::metrics::{evidence_coverage, exact_match, rouge_l, token_f1};
use agent_eval_domain::{EvaluatedRecord, Metric, ScoreSet, TaskKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Scoring engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringEngineConfig {
    /// Embedding model used for semantic similarity
    pub provider_id: String,
}

impl Default for ScoringEngineConfig {
    fn default() -> Self {
        Self {
            provider_id: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
        }
    }
}

/// Scores produced for one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredRecord {
    pub scores: ScoreSet,
    /// Semantic similarity was requested but the provider is degraded
    pub degraded_similarity: bool,
}

/// The main scoring engine
#[derive(Debug)]
pub struct ScoringEngine {
    config: ScoringEngineConfig,
    embeddings: EmbeddingRegistry,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringEngineConfig::default(), EmbeddingRegistry::unavailable())
    }
}

impl ScoringEngine {
    pub fn new(config: ScoringEngineConfig, embeddings: EmbeddingRegistry) -> Self {
        Self { config, embeddings }
    }

    pub fn config(&self) -> &ScoringEngineConfig {
        &self.config
    }

    pub fn embeddings(&self) -> &EmbeddingRegistry {
        &self.embeddings
    }

    /// Metrics that apply to `record`, in the order they are computed.
    pub fn applicable_metrics(&self, record: &EvaluatedRecord) -> Vec<Metric> {
        let mut metrics = Vec::new();

        if record.task_kind == TaskKind::ConstraintFollowing && record.evidence().is_some() {
            metrics.push(Metric::ConstraintAdherence);
        }

        if record.reference().is_some() {
            metrics.push(Metric::TokenF1);
            if record.task_kind == TaskKind::Summarization {
                metrics.push(Metric::RougeL);
                metrics.push(Metric::SemanticSimilarity);
            }
        }

        if record.evidence().is_some() {
            metrics.push(Metric::EvidenceCoverage);
        }

        metrics
    }

    /// Score a record with every applicable metric.
    ///
    /// A record with neither a reference nor evidence gets an empty score set.
    #[instrument(
        level = "debug",
        skip(self, record),
        fields(producer = %record.producer_id, source = %record.task_source_id)
    )]
    pub fn score_record(&self, record: &EvaluatedRecord) -> ScoredRecord {
        let mut scored = ScoredRecord::default();
        let prediction = record.prediction.as_str();
        let reference = record.reference();
        let evidence = record.evidence().unwrap_or(&[]);

        for metric in self.applicable_metrics(record) {
            let value = match metric {
                Metric::SemanticSimilarity => {
                    let outcome = semantic_similarity(
                        &self.embeddings,
                        prediction,
                        reference,
                        &self.config.provider_id,
                    );
                    scored.degraded_similarity |= outcome.is_degraded();
                    outcome.score()
                }
                other => self.score_metric(other, prediction, reference, evidence),
            };
            scored.scores.insert(metric, value);
        }

        debug!(metrics = scored.scores.len(), "Record scored");
        scored
    }

    /// Compute a single metric regardless of the selection policy.
    ///
    /// For [`Metric::ConstraintAdherence`] the `evidence` items are the constraint texts.
    pub fn score_metric(
        &self,
        metric: Metric,
        prediction: &str,
        reference: Option<&str>,
        evidence: &[String],
    ) -> f64 {
        match metric {
            Metric::ExactMatch => exact_match(prediction, reference),
            Metric::TokenF1 => token_f1(prediction, reference),
            Metric::RougeL => rouge_l(prediction, reference),
            Metric::EvidenceCoverage => evidence_coverage(prediction, evidence),
            Metric::ConstraintAdherence => constraint_adherence(prediction, evidence),
            Metric::SemanticSimilarity => semantic_similarity(
                &self.embeddings,
                prediction,
                reference,
                &self.config.provider_id,
            )
            .score(),
        }
    }
}

/// Builder for creating a customized scoring engine
pub struct ScoringEngineBuilder {
    config: ScoringEngineConfig,
    factory: Arc<dyn EmbeddingProviderFactory>,
}

impl ScoringEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: ScoringEngineConfig::default(),
            factory: Arc::new(UnavailableEmbeddingFactory),
        }
    }

    pub fn config(mut self, config: ScoringEngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn provider_id(mut self, provider_id: impl Into<String>) -> Self {
        self.config.provider_id = provider_id.into();
        self
    }

    pub fn embedding_factory(mut self, factory: Arc<dyn EmbeddingProviderFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn build(self) -> ScoringEngine {
        ScoringEngine::new(self.config, EmbeddingRegistry::new(self.factory))
    }
}

impl Default for ScoringEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ScoringEngine {
        ScoringEngineBuilder::new().build()
    }

    #[test]
    fn test_qa_with_reference() {
        let record = EvaluatedRecord::new("rag", "qa", TaskKind::Qa, "Paris").with_reference("Paris");
        assert_eq!(engine().applicable_metrics(&record), vec![Metric::TokenF1]);
    }

    #[test]
    fn test_summarization_with_reference() {
        let record = EvaluatedRecord::new("p", "s", TaskKind::Summarization, "short text")
            .with_reference("short text");
        assert_eq!(
            engine().applicable_metrics(&record),
            vec![Metric::TokenF1, Metric::RougeL, Metric::SemanticSimilarity]
        );
    }

    #[test]
    fn test_constraint_following_with_evidence() {
        let record = EvaluatedRecord::new("p", "s", TaskKind::ConstraintFollowing, "- a\n- b")
            .with_evidence(["Use exactly 2 bullet points."]);
        assert_eq!(
            engine().applicable_metrics(&record),
            vec![Metric::ConstraintAdherence, Metric::EvidenceCoverage]
        );
    }

    #[test]
    fn test_nothing_to_compare() {
        let record = EvaluatedRecord::new("p", "s", TaskKind::Retrieval, "answer");
        let scored = engine().score_record(&record);
        assert!(scored.scores.is_empty());
        assert!(!scored.degraded_similarity);
    }

    #[test]
    fn test_degraded_similarity_is_flagged() {
        let record = EvaluatedRecord::new("p", "s", TaskKind::Summarization, "a b")
            .with_reference("a b");
        let scored = engine().score_record(&record);

        assert_eq!(scored.scores.get(Metric::SemanticSimilarity), Some(0.0));
        assert_eq!(scored.scores.get(Metric::RougeL), Some(1.0));
        assert!(scored.degraded_similarity);
    }

    #[test]
    fn test_score_metric_exact_match() {
        let engine = engine();
        assert_eq!(engine.score_metric(Metric::ExactMatch, "x", Some("x"), &[]), 1.0);
        assert_eq!(engine.score_metric(Metric::ExactMatch, "x", None, &[]), 0.0);
    }
}
