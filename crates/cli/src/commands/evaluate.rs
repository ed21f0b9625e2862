//! Evaluate command
//!
//! Streams a run file through the scoring engine and writes the metrics document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing::{info, warn};

use agent_eval_application::{evaluate_sharded, AggregationPipeline, PipelineOutput, ScoringEngine};
use agent_eval_domain::EvaluatedRecord;
use agent_eval_infrastructure::{open_records, write_metrics, Error, MetricsDocument};

use super::CommandContext;
use crate::output::{overall_table, stats_table, Formattable, OutputFormat};

/// Options for one evaluation run; unset fields fall back to the `eval` config section.
#[derive(Debug, Clone, Default)]
pub struct EvaluateOptions {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub shards: Option<usize>,
}

/// Evaluate a run file and print the overall table
pub async fn evaluate(ctx: &CommandContext, options: EvaluateOptions) -> Result<()> {
    let output_path = options
        .output
        .clone()
        .unwrap_or_else(|| ctx.config.eval.output.clone());

    let document = run_evaluation(ctx, &options).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", document.format_json()?),
        OutputFormat::Plain => println!("{}", document.format_plain()?),
        OutputFormat::Table => {
            println!("{}", "Evaluation Complete".bold().cyan());
            println!("{}", "=".repeat(60));
            println!();
            if document.report.is_empty() {
                println!("{}", "No records produced any scores".yellow());
            } else {
                println!("{}", overall_table(&document.report));
            }
            println!();
            println!("{}", stats_table(&document.stats, document.skipped_lines));
            println!();
            println!(
                "Metrics written to {}",
                output_path.display().to_string().bold()
            );
        }
    }

    Ok(())
}

/// Run the evaluation and write the metrics document, without printing anything.
pub async fn run_evaluation(
    ctx: &CommandContext,
    options: &EvaluateOptions,
) -> Result<MetricsDocument> {
    let input = options
        .input
        .clone()
        .unwrap_or_else(|| ctx.config.eval.input.clone());
    let output_path = options
        .output
        .clone()
        .unwrap_or_else(|| ctx.config.eval.output.clone());
    let shards = options.shards.unwrap_or(ctx.config.eval.shards);

    if shards == 0 {
        bail!("Shard count must be at least 1");
    }

    info!(input = %input.display(), shards, "Starting evaluation");
    let engine = Arc::new(ctx.engine());

    let (output, skipped_lines) = if shards == 1 {
        let engine = Arc::clone(&engine);
        let path = input.clone();
        tokio::task::spawn_blocking(move || stream_evaluate(&engine, &path))
            .await
            .context("Evaluation task failed")??
    } else {
        let path = input.clone();
        let (records, skipped_lines) = tokio::task::spawn_blocking(move || load_records(&path))
            .await
            .context("Run file reader task failed")??;
        let output = evaluate_sharded(Arc::clone(&engine), records, shards).await?;
        (output, skipped_lines)
    };

    // The engine may own a blocking HTTP client, which must not be dropped on a runtime thread.
    tokio::task::spawn_blocking(move || drop(engine))
        .await
        .context("Failed to release scoring engine")?;

    let document = MetricsDocument::new(output).with_skipped_lines(skipped_lines);
    write_metrics(&output_path, &document)
        .with_context(|| format!("Failed to write metrics to {}", output_path.display()))?;

    Ok(document)
}

fn stream_evaluate(engine: &ScoringEngine, path: &Path) -> Result<(PipelineOutput, u64)> {
    let reader = open_records(path)
        .with_context(|| format!("Failed to open run file {}", path.display()))?;

    let mut pipeline = AggregationPipeline::new(engine);
    let mut skipped_lines = 0;

    for item in reader {
        match item {
            Ok(record) => pipeline.push(&record),
            Err(e @ Error::Parse { .. }) => {
                warn!(error = %e, "Skipping unreadable line");
                skipped_lines += 1;
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read run file {}", path.display()))
            }
        }
    }

    let output = pipeline.finish();
    info!(
        records = output.stats.records_seen,
        producers = output.report.overall.len(),
        skipped_lines,
        "Evaluation complete"
    );

    Ok((output, skipped_lines))
}

fn load_records(path: &Path) -> Result<(Vec<EvaluatedRecord>, u64)> {
    let reader = open_records(path)
        .with_context(|| format!("Failed to open run file {}", path.display()))?;

    let mut records = Vec::new();
    let mut skipped_lines = 0;

    for item in reader {
        match item {
            Ok(record) => records.push(record),
            Err(e @ Error::Parse { .. }) => {
                warn!(error = %e, "Skipping unreadable line");
                skipped_lines += 1;
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read run file {}", path.display()))
            }
        }
    }

    Ok((records, skipped_lines))
}
