//! Metric names and per-record score sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::errors::DomainError;

/// Named score produced by the scoring library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    ExactMatch,
    TokenF1,
    RougeL,
    EvidenceCoverage,
    SemanticSimilarity,
    ConstraintAdherence,
}

impl Metric {
    pub fn all() -> &'static [Metric] {
        &[
            Self::ExactMatch,
            Self::TokenF1,
            Self::RougeL,
            Self::EvidenceCoverage,
            Self::SemanticSimilarity,
            Self::ConstraintAdherence,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactMatch => "exact_match",
            Self::TokenF1 => "token_f1",
            Self::RougeL => "rouge_l",
            Self::EvidenceCoverage => "evidence_coverage",
            Self::SemanticSimilarity => "semantic_similarity",
            Self::ConstraintAdherence => "constraint_adherence",
        }
    }

    /// Human-readable label used in report headers.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ExactMatch => "Exact Match",
            Self::TokenF1 => "Token F1",
            Self::RougeL => "ROUGE-L (LCS)",
            Self::EvidenceCoverage => "Evidence Coverage",
            Self::SemanticSimilarity => "Semantic Similarity",
            Self::ConstraintAdherence => "Constraint Adherence",
        }
    }

    /// Whether the metric needs a reference text to be meaningful.
    pub fn requires_reference(&self) -> bool {
        matches!(
            self,
            Self::ExactMatch | Self::TokenF1 | Self::RougeL | Self::SemanticSimilarity
        )
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Metric::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownMetric(s.to_string()))
    }
}

/// Scores computed for a single record.
///
/// Values are clamped into [0, 1] on insertion. A set is built once by the scoring
/// engine; consumers only read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreSet {
    scores: BTreeMap<Metric, f64>,
}

impl ScoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metric: Metric, value: f64) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        self.scores.insert(metric, value);
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.scores.get(&metric).copied()
    }

    pub fn contains(&self, metric: Metric) -> bool {
        self.scores.contains_key(&metric)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.scores.iter().map(|(m, v)| (*m, *v))
    }
}

impl FromIterator<(Metric, f64)> for ScoreSet {
    fn from_iter<T: IntoIterator<Item = (Metric, f64)>>(iter: T) -> Self {
        let mut set = ScoreSet::new();
        for (metric, value) in iter {
            set.insert(metric, value);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_from_str() {
        assert_eq!("rouge_l".parse::<Metric>().unwrap(), Metric::RougeL);
        assert_eq!("Token-F1".parse::<Metric>().unwrap(), Metric::TokenF1);
        assert!(matches!(
            "bleu".parse::<Metric>(),
            Err(DomainError::UnknownMetric(name)) if name == "bleu"
        ));
    }

    #[test]
    fn test_metric_serializes_as_name() {
        let json = serde_json::to_string(&Metric::ConstraintAdherence).unwrap();
        assert_eq!(json, "\"constraint_adherence\"");
    }

    #[test]
    fn test_score_set_clamps_values() {
        let mut scores = ScoreSet::new();
        scores.insert(Metric::SemanticSimilarity, -0.4);
        scores.insert(Metric::TokenF1, 1.5);
        scores.insert(Metric::RougeL, f64::NAN);

        assert_eq!(scores.get(Metric::SemanticSimilarity), Some(0.0));
        assert_eq!(scores.get(Metric::TokenF1), Some(1.0));
        assert_eq!(scores.get(Metric::RougeL), Some(0.0));
        assert!(!scores.contains(Metric::ExactMatch));
    }

    #[test]
    fn test_score_set_json_shape() {
        let scores: ScoreSet = [(Metric::TokenF1, 0.5)].into_iter().collect();
        let value = serde_json::to_value(&scores).unwrap();
        assert_eq!(value, serde_json::json!({"token_f1": 0.5}));
    }
}
