//! Tests for the aggregation pipeline
//!
//! Covers hand-checked means over the synthetic run, absence of non-applicable
//! metrics, order independence, and sharded aggregation.

use agent_eval_application::{
    evaluate_records, evaluate_sharded, AggregationPipeline, ApplicationError, PartialAggregate,
    ScoringEngine, ScoringEngineBuilder,
};
use agent_eval_domain::{EvaluatedRecord, Metric};
use agent_eval_testing::{
    assert_means_in_unit_range, assert_metric_absent, assert_reports_close, random_run,
    record_strategy, synthetic_run, FailingEmbeddingFactory, StaticEmbeddingFactory,
};
use proptest::prelude::*;
use std::sync::Arc;

const EPSILON: f64 = 1e-9;

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("metric should be present");
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

fn similarity_engine() -> ScoringEngine {
    ScoringEngineBuilder::new()
        .provider_id("test-model")
        .embedding_factory(Arc::new(StaticEmbeddingFactory::new(0.9)))
        .build()
}

// ============================================================================
// Summary Value Tests
// ============================================================================

#[test]
fn test_synthetic_run_overall_means() {
    // Arrange
    let engine = similarity_engine();
    let records = synthetic_run();

    // Act
    let output = evaluate_records(&engine, &records);
    let report = &output.report;

    // Assert - rag
    assert_close(report.overall_mean("rag", Metric::TokenF1), (1.0 + 8.0 / 9.0) / 2.0);
    assert_close(report.overall_mean("rag", Metric::RougeL), 1.952 / 2.24);
    assert_close(report.overall_mean("rag", Metric::SemanticSimilarity), 0.9);
    assert_close(report.overall_mean("rag", Metric::ConstraintAdherence), 1.0 / 3.0);
    assert_close(report.overall_mean("rag", Metric::EvidenceCoverage), 0.0);

    // Assert - sequenced
    assert_close(report.overall_mean("sequenced", Metric::TokenF1), 4.0 / 9.0);
    assert_close(report.overall_mean("sequenced", Metric::ConstraintAdherence), 1.0);
    assert_close(report.overall_mean("sequenced", Metric::EvidenceCoverage), 0.25);
}

#[test]
fn test_synthetic_run_stats() {
    let engine = ScoringEngine::default();
    let output = evaluate_records(&engine, &synthetic_run());

    assert_eq!(output.stats.records_seen, 7);
    assert_eq!(output.stats.records_scored, 6);
    assert_eq!(output.stats.records_without_scores, 1);
    assert_eq!(output.stats.degraded_similarity_calls, 1);
}

#[test]
fn test_non_applicable_metrics_are_absent() {
    // Arrange
    let engine = similarity_engine();

    // Act
    let report = evaluate_records(&engine, &synthetic_run()).report;

    // Assert
    assert_metric_absent(&report, "sequenced", Metric::RougeL);
    assert_metric_absent(&report, "sequenced", Metric::SemanticSimilarity);
    assert_eq!(
        report.source_mean("synthetic_long_qa", "rag", Metric::EvidenceCoverage),
        None
    );
    assert!(!report.overall["rag"].contains_key(&Metric::ExactMatch));
}

#[test]
fn test_producer_with_only_unscorable_records_is_absent_from_source() {
    let engine = ScoringEngine::default();
    let report = evaluate_records(&engine, &synthetic_run()).report;

    let retrieval = &report.by_source["synthetic_retrieval"];
    assert!(retrieval.contains_key("sequenced"));
    assert!(!retrieval.contains_key("rag"));
}

#[test]
fn test_empty_input_gives_empty_report() {
    let engine = ScoringEngine::default();
    let output = evaluate_records(&engine, &Vec::<EvaluatedRecord>::new());

    assert!(output.report.is_empty());
    assert_eq!(output.stats.records_seen, 0);
}

#[test]
fn test_failed_provider_still_reports_similarity() {
    // Arrange
    let factory = FailingEmbeddingFactory::new();
    let engine = ScoringEngineBuilder::new()
        .embedding_factory(Arc::new(factory.clone()))
        .build();

    // Act
    let report = evaluate_records(&engine, &synthetic_run()).report;

    // Assert
    assert_eq!(report.overall_mean("rag", Metric::SemanticSimilarity), Some(0.0));
    assert_eq!(factory.attempts(), 1);
}

// ============================================================================
// Order Independence Tests
// ============================================================================

#[test]
fn test_reversed_input_gives_same_report() {
    let engine = similarity_engine();
    let records = synthetic_run();
    let mut reversed = records.clone();
    reversed.reverse();

    let forward = evaluate_records(&engine, &records).report;
    let backward = evaluate_records(&engine, &reversed).report;

    assert_reports_close(&forward, &backward);
}

#[test]
fn test_partial_aggregates_merge_to_single_pass() {
    // Arrange
    let engine = similarity_engine();
    let records = synthetic_run();
    let (left, right) = records.split_at(3);

    // Act
    let mut first = AggregationPipeline::new(&engine);
    first.extend(left);
    let mut second = AggregationPipeline::new(&engine);
    second.extend(right);

    let mut merged = PartialAggregate::default();
    merged.merge(&second.into_partial());
    merged.merge(&first.into_partial());
    let merged = merged.finish();

    let single = evaluate_records(&engine, &records);

    // Assert
    assert!(merged.report.approx_eq(&single.report, EPSILON));
    assert_eq!(merged.stats, single.stats);
}

proptest! {
    #[test]
    fn prop_permutation_does_not_change_report(
        records in Just(synthetic_run()).prop_shuffle()
    ) {
        let engine = similarity_engine();
        let expected = evaluate_records(&engine, &synthetic_run()).report;
        let actual = evaluate_records(&engine, &records).report;

        prop_assert!(actual.approx_eq(&expected, EPSILON));
    }

    #[test]
    fn prop_all_means_in_unit_range(records in prop::collection::vec(record_strategy(), 0..20)) {
        let engine = similarity_engine();
        let report = evaluate_records(&engine, &records).report;

        for means in report.overall.values() {
            prop_assert!(!means.is_empty());
        }
        assert_means_in_unit_range(&report);
    }
}

// ============================================================================
// Sharded Aggregation Tests
// ============================================================================

#[tokio::test]
async fn test_sharded_matches_single_pass() {
    // Arrange
    let engine = Arc::new(similarity_engine());
    let records = random_run(40);
    let single = evaluate_records(&engine, &records);

    for shards in 1..=5 {
        // Act
        let sharded = evaluate_sharded(Arc::clone(&engine), records.clone(), shards)
            .await
            .unwrap();

        // Assert
        assert_reports_close(&sharded.report, &single.report);
        assert_eq!(sharded.stats, single.stats);
    }
}

#[tokio::test]
async fn test_more_shards_than_records() {
    let engine = Arc::new(ScoringEngine::default());
    let records = synthetic_run();

    let output = evaluate_sharded(engine, records, 32).await.unwrap();

    assert_eq!(output.stats.records_seen, 7);
    assert!(output.report.overall.contains_key("rag"));
}

#[tokio::test]
async fn test_sharded_constructs_provider_once() {
    let factory = FailingEmbeddingFactory::new();
    let engine = Arc::new(
        ScoringEngineBuilder::new()
            .embedding_factory(Arc::new(factory.clone()))
            .build(),
    );

    let mut records = synthetic_run();
    records.extend(synthetic_run());
    records.extend(synthetic_run());

    let output = evaluate_sharded(engine, records, 3).await.unwrap();

    assert_eq!(output.stats.degraded_similarity_calls, 3);
    assert_eq!(factory.attempts(), 1);
}

#[tokio::test]
async fn test_zero_shards_rejected() {
    let engine = Arc::new(ScoringEngine::default());
    let result = evaluate_sharded(engine, synthetic_run(), 0).await;

    assert!(matches!(result, Err(ApplicationError::InvalidInput(_))));
}
