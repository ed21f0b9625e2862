//! Testing utilities for Agent Eval
//!
//! This crate provides:
//! - Fixtures with a small synthetic run covering the known task kinds
//! - A builder for evaluated records
//! - Mock embedding factories with construction and call counters
//! - Assertions over evaluation reports
//! - Property-based testing strategies
//!
//! # Examples
//!
//! ```
//! use agent_eval_testing::{builders::*, fixtures::*};
//!
//! let records = synthetic_run();
//! assert!(records.len() >= 5);
//!
//! let record = RecordBuilder::summarization()
//!     .with_reference("The report covers memory limits.")
//!     .build();
//! assert!(record.is_scorable());
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod mocks;

// Re-export commonly used types
pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use mocks::*;

// Re-export testing dependencies for convenience
pub use fake;
pub use proptest;
pub use wiremock;
