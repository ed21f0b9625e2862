//! Evaluated record types.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Kind of task a record was produced for.
///
/// The kind drives which metrics the aggregation pipeline computes. Values that do not
/// name a known kind parse to [`TaskKind::Unknown`] rather than failing, so records from
/// new task generators still receive reference and evidence metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskKind {
    #[default]
    Unknown,
    Retrieval,
    Summarization,
    Qa,
    ConstraintFollowing,
}

impl TaskKind {
    pub fn all() -> &'static [TaskKind] {
        &[
            Self::Unknown,
            Self::Retrieval,
            Self::Summarization,
            Self::Qa,
            Self::ConstraintFollowing,
        ]
    }

    /// Parse a task kind, mapping run-file aliases onto the canonical kinds.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "retrieval" => Self::Retrieval,
            "summarization" => Self::Summarization,
            "qa" | "long_context_qa" => Self::Qa,
            "constraint_following" | "sequential_consistency" => Self::ConstraintFollowing,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Retrieval => "retrieval",
            Self::Summarization => "summarization",
            Self::Qa => "qa",
            Self::ConstraintFollowing => "constraint_following",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Retrieval => "Retrieval",
            Self::Summarization => "Summarization",
            Self::Qa => "Question Answering",
            Self::ConstraintFollowing => "Constraint Following",
        }
    }
}

impl From<String> for TaskKind {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for TaskKind {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<TaskKind> for String {
    fn from(kind: TaskKind) -> Self {
        kind.as_str().to_string()
    }
}

impl Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One producer's output for one task instance, normalized for scoring.
///
/// Records are immutable once built. Loaders are responsible for mapping whatever
/// schema a run file uses onto this shape before the record reaches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedRecord {
    pub producer_id: String,
    pub task_source_id: String,
    #[serde(default)]
    pub task_kind: TaskKind,
    pub prediction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl EvaluatedRecord {
    pub fn new(
        producer_id: impl Into<String>,
        task_source_id: impl Into<String>,
        task_kind: TaskKind,
        prediction: impl Into<String>,
    ) -> Self {
        Self {
            producer_id: producer_id.into(),
            task_source_id: task_source_id.into(),
            task_kind,
            prediction: prediction.into(),
            reference: None,
            evidence: Vec::new(),
        }
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

    /// The reference text, if one is present and non-empty.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }

    /// The evidence list, if it has at least one item.
    pub fn evidence(&self) -> Option<&[String]> {
        if self.evidence.is_empty() {
            None
        } else {
            Some(&self.evidence)
        }
    }

    /// Whether any metric can apply to this record at all.
    pub fn is_scorable(&self) -> bool {
        self.reference().is_some() || self.evidence().is_some()
    }
}
