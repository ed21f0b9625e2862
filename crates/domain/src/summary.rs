//! Summary tables produced by the aggregation pipeline.
//!
//! A summary maps a grouping key to the mean of every metric observed under that key.
//! Metrics that were never computed for a group are absent from it: a missing entry
//! means "not applicable", never zero.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metric::Metric;

/// Mean value per metric for one group.
pub type MetricMeans = BTreeMap<Metric, f64>;

/// Means grouped by producer.
pub type OverallTable = BTreeMap<String, MetricMeans>;

/// Means grouped by task source, then producer.
pub type BySourceTable = BTreeMap<String, BTreeMap<String, MetricMeans>>;

/// The two summary tables for one evaluation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// `overall[producer][metric]`
    pub overall: OverallTable,
    /// `by_source[task_source][producer][metric]`
    #[serde(alias = "by_benchmark")]
    pub by_source: BySourceTable,
}

impl EvaluationReport {
    pub fn is_empty(&self) -> bool {
        self.overall.is_empty() && self.by_source.is_empty()
    }

    pub fn overall_mean(&self, producer: &str, metric: Metric) -> Option<f64> {
        self.overall.get(producer)?.get(&metric).copied()
    }

    pub fn source_mean(&self, task_source: &str, producer: &str, metric: Metric) -> Option<f64> {
        self.by_source.get(task_source)?.get(producer)?.get(&metric).copied()
    }

    pub fn producers(&self) -> impl Iterator<Item = &str> {
        self.overall.keys().map(String::as_str)
    }

    pub fn task_sources(&self) -> impl Iterator<Item = &str> {
        self.by_source.keys().map(String::as_str)
    }

    /// Every metric that appears anywhere in the overall table, in stable order.
    pub fn metrics(&self) -> Vec<Metric> {
        let mut metrics: Vec<Metric> = self
            .overall
            .values()
            .flat_map(|means| means.keys().copied())
            .collect();
        metrics.sort();
        metrics.dedup();
        metrics
    }

    /// Structural equality with a tolerance on the mean values.
    ///
    /// Means are folded from floating-point sums, so two runs over the same records in a
    /// different order can differ in the last bits.
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        fn means_eq(a: &MetricMeans, b: &MetricMeans, epsilon: f64) -> bool {
            a.len() == b.len()
                && a.iter()
                    .all(|(metric, x)| b.get(metric).map_or(false, |y| (x - y).abs() <= epsilon))
        }

        let overall_eq = self.overall.len() == other.overall.len()
            && self.overall.iter().all(|(producer, means)| {
                other
                    .overall
                    .get(producer)
                    .map_or(false, |theirs| means_eq(means, theirs, epsilon))
            });

        let by_source_eq = self.by_source.len() == other.by_source.len()
            && self.by_source.iter().all(|(source, producers)| {
                other.by_source.get(source).map_or(false, |theirs| {
                    producers.len() == theirs.len()
                        && producers.iter().all(|(producer, means)| {
                            theirs
                                .get(producer)
                                .map_or(false, |t| means_eq(means, t, epsilon))
                        })
                })
            });

        overall_eq && by_source_eq
    }
}
