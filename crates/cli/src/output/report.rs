//! Tables for evaluation reports

use super::TableFormatter;
use agent_eval_application::PipelineStats;
use agent_eval_domain::{EvaluationReport, Metric, MetricMeans};
use std::collections::BTreeMap;

const ABSENT: &str = "-";

fn format_mean(means: &MetricMeans, metric: Metric) -> String {
    means
        .get(&metric)
        .map(|value| format!("{value:.4}"))
        .unwrap_or_else(|| ABSENT.to_string())
}

fn producer_table(producers: &BTreeMap<String, MetricMeans>) -> String {
    let mut metrics: Vec<Metric> = producers
        .values()
        .flat_map(|means| means.keys().copied())
        .collect();
    metrics.sort();
    metrics.dedup();

    let mut headers = vec!["Producer"];
    headers.extend(metrics.iter().map(Metric::display_name));

    let rows = producers
        .iter()
        .map(|(producer, means)| {
            let mut row = vec![producer.clone()];
            row.extend(metrics.iter().map(|metric| format_mean(means, *metric)));
            row
        })
        .collect();

    TableFormatter::simple(headers, rows)
}

/// One row per producer, one column per metric observed for any producer.
///
/// Metrics that were never computed for a producer render as `-`.
pub fn overall_table(report: &EvaluationReport) -> String {
    producer_table(&report.overall)
}

/// The producer table for a single task source, or `None` if the source is unknown.
pub fn source_table(report: &EvaluationReport, task_source: &str) -> Option<String> {
    report.by_source.get(task_source).map(producer_table)
}

pub fn stats_table(stats: &PipelineStats, skipped_lines: u64) -> String {
    TableFormatter::key_value(vec![
        ("Records seen", stats.records_seen.to_string()),
        ("Records scored", stats.records_scored.to_string()),
        ("Records without scores", stats.records_without_scores.to_string()),
        (
            "Degraded similarity calls",
            stats.degraded_similarity_calls.to_string(),
        ),
        ("Skipped lines", skipped_lines.to_string()),
    ])
}
