//! Parallel aggregation over shards of records.
//!
//! Each shard is scored on the blocking thread pool; the partial aggregates are merged
//! once every shard finishes. Embedding providers are shared through the engine's
//! registry, so each provider is still constructed at most once.

use crate::aggregation::pipeline::{AggregationPipeline, PartialAggregate, PipelineOutput};
use crate::scoring::ScoringEngine;
use crate::{ApplicationError, ApplicationResult};
use agent_eval_domain::EvaluatedRecord;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Score `records` split across `shards` blocking tasks.
///
/// The summaries match a single-pass run over the same records up to floating-point
/// summation order.
#[instrument(skip(engine, records), fields(records = records.len()))]
pub async fn evaluate_sharded(
    engine: Arc<ScoringEngine>,
    records: Vec<EvaluatedRecord>,
    shards: usize,
) -> ApplicationResult<PipelineOutput> {
    if shards == 0 {
        return Err(ApplicationError::InvalidInput(
            "Shard count must be greater than 0".to_string(),
        ));
    }

    let chunk_size = records.len().div_ceil(shards).max(1);
    let mut remaining = records;
    let mut handles = Vec::with_capacity(shards);

    while !remaining.is_empty() {
        let rest = remaining.split_off(chunk_size.min(remaining.len()));
        let chunk = std::mem::replace(&mut remaining, rest);
        let engine = Arc::clone(&engine);
        let shard = handles.len();

        handles.push(tokio::task::spawn_blocking(move || {
            let mut pipeline = AggregationPipeline::new(&engine);
            pipeline.extend(&chunk);
            debug!(shard, records = chunk.len(), "Shard scored");
            pipeline.into_partial()
        }));
    }

    let mut merged = PartialAggregate::default();
    for handle in handles {
        let partial = handle
            .await
            .map_err(|e| ApplicationError::Internal(format!("Shard task failed: {}", e)))?;
        merged.merge(&partial);
    }

    let output = merged.finish();
    info!(
        shards,
        records = output.stats.records_seen,
        scored = output.stats.records_scored,
        "Sharded aggregation complete"
    );

    Ok(output)
}
