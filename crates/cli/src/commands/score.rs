//! Score command - compute one metric for one prediction

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use agent_eval_domain::Metric;

use super::CommandContext;
use crate::output::{Formattable, OutputFormat, TableFormatter};

/// Input for a single score computation
#[derive(Debug, Clone)]
pub struct ScoreRequest {
    pub metric: Metric,
    pub prediction: String,
    pub reference: Option<String>,
    /// Evidence snippets, or constraint texts for `constraint_adherence`
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub metric: Metric,
    pub value: f64,
    /// Set when semantic similarity was answered by an unavailable provider
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

/// Score a single prediction and print the value
pub async fn score(ctx: &CommandContext, request: ScoreRequest) -> Result<()> {
    let result = compute(ctx, request).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", result.format_json()?),
        OutputFormat::Plain => println!("{}: {:.4}", result.metric, result.value),
        OutputFormat::Table => {
            println!(
                "{}",
                TableFormatter::key_value(vec![
                    ("Metric", result.metric.display_name().to_string()),
                    ("Score", format!("{:.4}", result.value)),
                ])
            );
            if result.degraded {
                println!(
                    "{}",
                    "Embedding provider unavailable, semantic similarity scored as 0.0".yellow()
                );
            }
        }
    }

    Ok(())
}

/// Compute the score on a blocking thread; semantic similarity may call the embedding backend.
pub async fn compute(ctx: &CommandContext, request: ScoreRequest) -> Result<ScoreResult> {
    let engine = ctx.engine();

    tokio::task::spawn_blocking(move || {
        let value = engine.score_metric(
            request.metric,
            &request.prediction,
            request.reference.as_deref(),
            &request.evidence,
        );
        let degraded = request.metric == Metric::SemanticSimilarity
            && engine.embeddings().is_degraded(&engine.config().provider_id);

        ScoreResult {
            metric: request.metric,
            value,
            degraded,
        }
    })
    .await
    .context("Scoring task failed")
}
