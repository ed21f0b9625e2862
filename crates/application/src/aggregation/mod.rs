//! Aggregation module - folds per-record scores into per-producer summaries

pub mod accumulator;
mod pipeline;
mod sharded;

pub use accumulator::{RunningMean, ScoreAccumulator};
pub use pipeline::*;
pub use sharded::evaluate_sharded;
