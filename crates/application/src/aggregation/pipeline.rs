//! Aggregation Pipeline - scores a stream of records and folds them into summaries
//!
//! Records are consumed one at a time, so memory grows with the number of distinct
//! producers and task sources rather than with the number of records.

use crate::aggregation::accumulator::ScoreAccumulator;
use crate::scoring::ScoringEngine;
use agent_eval_domain::{EvaluatedRecord, EvaluationReport};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Counters describing one aggregation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Records handed to the pipeline
    pub records_seen: u64,
    /// Records that produced at least one score
    pub records_scored: u64,
    /// Records with neither a reference nor evidence
    pub records_without_scores: u64,
    /// Semantic similarity calls answered by a degraded provider
    pub degraded_similarity_calls: u64,
}

impl PipelineStats {
    pub fn merge(&mut self, other: &PipelineStats) {
        self.records_seen += other.records_seen;
        self.records_scored += other.records_scored;
        self.records_without_scores += other.records_without_scores;
        self.degraded_similarity_calls += other.degraded_similarity_calls;
    }
}

/// Running state of an aggregation over a subset of records.
#[derive(Debug, Clone, Default)]
pub struct PartialAggregate {
    pub accumulator: ScoreAccumulator,
    pub stats: PipelineStats,
}

impl PartialAggregate {
    pub fn merge(&mut self, other: &PartialAggregate) {
        self.accumulator.merge(&other.accumulator);
        self.stats.merge(&other.stats);
    }

    pub fn finish(self) -> PipelineOutput {
        PipelineOutput {
            report: self.accumulator.finalize(),
            stats: self.stats,
        }
    }
}

/// Final summaries plus run counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    pub report: EvaluationReport,
    pub stats: PipelineStats,
}

/// Scores records with an engine and accumulates the results.
pub struct AggregationPipeline<'a> {
    engine: &'a ScoringEngine,
    state: PartialAggregate,
}

impl<'a> AggregationPipeline<'a> {
    pub fn new(engine: &'a ScoringEngine) -> Self {
        Self {
            engine,
            state: PartialAggregate::default(),
        }
    }

    /// Score one record and fold it into the running sums.
    pub fn push(&mut self, record: &EvaluatedRecord) {
        self.state.stats.records_seen += 1;

        let scored = self.engine.score_record(record);
        if scored.degraded_similarity {
            self.state.stats.degraded_similarity_calls += 1;
        }

        if scored.scores.is_empty() {
            debug!(
                producer = %record.producer_id,
                source = %record.task_source_id,
                "Record has nothing to compare against"
            );
            self.state.stats.records_without_scores += 1;
            return;
        }

        self.state.stats.records_scored += 1;
        self.state
            .accumulator
            .observe(&record.producer_id, &record.task_source_id, &scored.scores);
    }

    pub fn extend<'r, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'r EvaluatedRecord>,
    {
        for record in records {
            self.push(record);
        }
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.state.stats
    }

    /// Stop accumulating and hand back the partial state for merging.
    pub fn into_partial(self) -> PartialAggregate {
        self.state
    }

    pub fn finish(self) -> PipelineOutput {
        self.state.finish()
    }
}

/// Score and summarize every record in one pass.
#[instrument(skip(engine, records))]
pub fn evaluate_records<'r, I>(engine: &ScoringEngine, records: I) -> PipelineOutput
where
    I: IntoIterator<Item = &'r EvaluatedRecord>,
{
    let mut pipeline = AggregationPipeline::new(engine);
    pipeline.extend(records);
    let output = pipeline.finish();

    info!(
        records = output.stats.records_seen,
        scored = output.stats.records_scored,
        producers = output.report.overall.len(),
        sources = output.report.by_source.len(),
        "Aggregation complete"
    );

    output
}
