//! Running sums of per-record scores.

use agent_eval_domain::{EvaluationReport, Metric, MetricMeans, ScoreSet};
use std::collections::{BTreeMap, HashMap};

/// Sum and count of observed values for one metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    sum: f64,
    count: u64,
}

impl RunningMean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn merge(&mut self, other: &RunningMean) {
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Arithmetic mean, or `None` if nothing was observed.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

type MetricSums = BTreeMap<Metric, RunningMean>;

fn add_scores(sums: &mut MetricSums, scores: &ScoreSet) {
    for (metric, value) in scores.iter() {
        sums.entry(metric).or_default().push(value);
    }
}

fn merge_sums(into: &mut MetricSums, from: &MetricSums) {
    for (metric, running) in from {
        into.entry(*metric).or_default().merge(running);
    }
}

fn means(sums: &MetricSums) -> MetricMeans {
    sums.iter()
        .filter_map(|(metric, running)| running.mean().map(|mean| (*metric, mean)))
        .collect()
}

/// Accumulates scores per producer and per (task source, producer).
///
/// Accumulators built over disjoint subsets of records can be merged; the result equals
/// accumulating all of the records in one pass, up to floating-point summation order.
#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    overall: HashMap<String, MetricSums>,
    by_source: HashMap<(String, String), MetricSums>,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record's scores. Empty score sets are ignored.
    pub fn observe(&mut self, producer_id: &str, task_source_id: &str, scores: &ScoreSet) {
        if scores.is_empty() {
            return;
        }

        add_scores(
            self.overall.entry(producer_id.to_string()).or_default(),
            scores,
        );
        add_scores(
            self.by_source
                .entry((task_source_id.to_string(), producer_id.to_string()))
                .or_default(),
            scores,
        );
    }

    pub fn merge(&mut self, other: &ScoreAccumulator) {
        for (producer, sums) in &other.overall {
            merge_sums(self.overall.entry(producer.clone()).or_default(), sums);
        }
        for (key, sums) in &other.by_source {
            merge_sums(self.by_source.entry(key.clone()).or_default(), sums);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.overall.is_empty()
    }

    /// Number of values observed for `metric` across all records of `producer_id`.
    pub fn observations(&self, producer_id: &str, metric: Metric) -> u64 {
        self.overall
            .get(producer_id)
            .and_then(|sums| sums.get(&metric))
            .map(RunningMean::count)
            .unwrap_or(0)
    }

    /// Convert the running sums into mean tables.
    ///
    /// A metric appears under a key only if at least one record under that key had it.
    pub fn finalize(&self) -> EvaluationReport {
        let overall = self
            .overall
            .iter()
            .map(|(producer, sums)| (producer.clone(), means(sums)))
            .collect();

        let mut by_source: BTreeMap<String, BTreeMap<String, MetricMeans>> = BTreeMap::new();
        for ((source, producer), sums) in &self.by_source {
            by_source
                .entry(source.clone())
                .or_default()
                .insert(producer.clone(), means(sums));
        }

        EvaluationReport { overall, by_source }
    }
}
