//! Agent Eval Domain Types
//!
//! This crate provides the core domain model for scoring generated text and
//! summarizing the scores per producer and per task source.
//!
//! ## Architecture
//!
//! The domain layer is organized into the following modules:
//!
//! - **record**: Normalized evaluated records and task kinds
//! - **metric**: Metric names and per-record score sets
//! - **summary**: Summary tables grouped by producer and by task source
//! - **errors**: Domain error types
//!
//! ## Usage
//!
//! ```rust
//! use agent_eval_domain::{EvaluatedRecord, Metric, TaskKind};
//!
//! let record = EvaluatedRecord::new("rag", "synthetic_long_qa", TaskKind::Qa, "Paris")
//!     .with_reference("Paris");
//! assert!(record.is_scorable());
//!
//! let metric: Metric = "rouge_l".parse().unwrap();
//! assert_eq!(metric.display_name(), "ROUGE-L (LCS)");
//! ```

#![warn(clippy::all)]

pub mod errors;
pub mod metric;
pub mod record;
pub mod summary;

pub use errors::{DomainError, DomainResult};
pub use metric::{Metric, ScoreSet};
pub use record::{EvaluatedRecord, TaskKind};
pub use summary::{BySourceTable, EvaluationReport, MetricMeans, OverallTable};
