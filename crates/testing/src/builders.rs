//! Fluent builder for evaluated records.

use agent_eval_domain::{EvaluatedRecord, TaskKind};

/// Builder for creating EvaluatedRecord test instances
#[derive(Clone)]
pub struct RecordBuilder {
    producer_id: String,
    task_source_id: String,
    task_kind: TaskKind,
    prediction: String,
    reference: Option<String>,
    evidence: Vec<String>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self {
            producer_id: "rag".to_string(),
            task_source_id: "synthetic_long_qa".to_string(),
            task_kind: TaskKind::Qa,
            prediction: "The archive is stored in the north wing.".to_string(),
            reference: None,
            evidence: Vec::new(),
        }
    }

    /// Question answering record from the long-context QA source
    pub fn qa() -> Self {
        Self::new()
    }

    /// Summarization record from the long-summary source
    pub fn summarization() -> Self {
        Self::new()
            .with_source("synthetic_long_summary")
            .with_kind(TaskKind::Summarization)
            .with_prediction("The report covers memory limits and retrieval strategies.")
    }

    /// Constraint-following record from the synthetic constraints source
    pub fn constraint_following() -> Self {
        Self::new()
            .with_producer("sequenced")
            .with_source("synthetic_constraints")
            .with_kind(TaskKind::ConstraintFollowing)
            .with_prediction("- context matters\n- keep notes")
    }

    pub fn with_producer(mut self, producer_id: impl Into<String>) -> Self {
        self.producer_id = producer_id.into();
        self
    }

    pub fn with_source(mut self, task_source_id: impl Into<String>) -> Self {
        self.task_source_id = task_source_id.into();
        self
    }

    pub fn with_kind(mut self, task_kind: TaskKind) -> Self {
        self.task_kind = task_kind;
        self
    }

    pub fn with_prediction(mut self, prediction: impl Into<String>) -> Self {
        self.prediction = prediction.into();
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_evidence<I, S>(mut self, evidence: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evidence = evidence.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> EvaluatedRecord {
        let record = EvaluatedRecord::new(
            self.producer_id,
            self.task_source_id,
            self.task_kind,
            self.prediction,
        )
        .with_evidence(self.evidence);

        match self.reference {
            Some(reference) => record.with_reference(reference),
            None => record,
        }
    }
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
