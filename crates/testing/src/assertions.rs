//! Assertions over evaluation reports.

use agent_eval_domain::{EvaluationReport, Metric};

/// Tolerance for comparing means folded in different orders
pub const REPORT_EPSILON: f64 = 1e-9;

/// Assert two reports have the same groups and metrics with means within [`REPORT_EPSILON`]
#[track_caller]
pub fn assert_reports_close(actual: &EvaluationReport, expected: &EvaluationReport) {
    assert!(
        actual.approx_eq(expected, REPORT_EPSILON),
        "reports differ\n  actual: {:?}\nexpected: {:?}",
        actual,
        expected
    );
}

/// Assert `producer` has no overall mean for `metric`, not even 0.0
#[track_caller]
pub fn assert_metric_absent(report: &EvaluationReport, producer: &str, metric: Metric) {
    assert_eq!(
        report.overall_mean(producer, metric),
        None,
        "{} should be absent for {}",
        metric,
        producer
    );
}

/// Assert every mean in the report lies in [0, 1]
#[track_caller]
pub fn assert_means_in_unit_range(report: &EvaluationReport) {
    let overall = report.overall.values();
    let by_source = report.by_source.values().flat_map(|producers| producers.values());

    for means in overall.chain(by_source) {
        for (metric, value) in means {
            assert!(
                (0.0..=1.0).contains(value),
                "{} mean {} out of range",
                metric,
                value
            );
        }
    }
}
