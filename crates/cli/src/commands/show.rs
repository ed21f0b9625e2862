//! Show command - print a previously written metrics document

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;

use agent_eval_domain::{EvaluationReport, MetricMeans};
use agent_eval_infrastructure::read_metrics;

use super::CommandContext;
use crate::output::{overall_table, source_table, stats_table, Formattable, OutputFormat};

/// Subset of a report restricted to one task source
#[derive(Debug, Serialize)]
struct SourceView<'a> {
    task_source: &'a str,
    producers: &'a BTreeMap<String, MetricMeans>,
}

/// Print the overall and by-source tables of a metrics document
pub async fn show(ctx: &CommandContext, path: Option<PathBuf>, source: Option<String>) -> Result<()> {
    let path = path.unwrap_or_else(|| ctx.config.eval.output.clone());
    let document = read_metrics(&path)
        .with_context(|| format!("Failed to read metrics document {}", path.display()))?;
    let report = &document.report;

    if let Some(source) = source.as_deref() {
        let Some(producers) = report.by_source.get(source) else {
            bail!(
                "Task source '{}' not found. Available: {}",
                source,
                available_sources(report)
            );
        };

        let view = SourceView {
            task_source: source,
            producers,
        };
        match ctx.format {
            OutputFormat::Json => println!("{}", view.format_json()?),
            OutputFormat::Plain => println!("{}", view.format_plain()?),
            OutputFormat::Table => print_source(report, source),
        }
        return Ok(());
    }

    match ctx.format {
        OutputFormat::Json => println!("{}", document.format_json()?),
        OutputFormat::Plain => println!("{}", document.format_plain()?),
        OutputFormat::Table => {
            println!("{}", format!("Metrics: {}", path.display()).bold().cyan());
            println!("{}", "=".repeat(60));
            if let Some(generated_at) = document.generated_at {
                println!("{}", format!("Generated at {}", generated_at.to_rfc3339()).dimmed());
            }
            println!();

            if report.is_empty() {
                println!("{}", "Report is empty".yellow());
                return Ok(());
            }

            println!("{}", "Overall".bold());
            println!("{}", overall_table(report));
            println!();

            for source in report.task_sources() {
                print_source(report, source);
                println!();
            }

            println!("{}", stats_table(&document.stats, document.skipped_lines));
        }
    }

    Ok(())
}

fn print_source(report: &EvaluationReport, source: &str) {
    if let Some(table) = source_table(report, source) {
        println!("{}", source.bold().green());
        println!("{}", table);
    }
}

fn available_sources(report: &EvaluationReport) -> String {
    let sources: Vec<&str> = report.task_sources().collect();
    if sources.is_empty() {
        "none".to_string()
    } else {
        sources.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_eval_application::{evaluate_records, ScoringEngine};
    use agent_eval_common::AppConfig;
    use agent_eval_infrastructure::{write_metrics, MetricsDocument};
    use agent_eval_testing::synthetic_run;

    fn write_document(dir: &std::path::Path) -> PathBuf {
        let engine = ScoringEngine::default();
        let output = evaluate_records(&engine, &synthetic_run());
        let path = dir.join("metrics.json");
        write_metrics(&path, &MetricsDocument::new(output)).unwrap();
        path
    }

    #[test]
    fn test_available_sources() {
        assert_eq!(available_sources(&EvaluationReport::default()), "none");
    }

    #[tokio::test]
    async fn test_show_known_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_document(dir.path());
        let ctx = CommandContext::new(AppConfig::default(), OutputFormat::Json);

        let result = show(&ctx, Some(path), Some("synthetic_long_qa".to_string())).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_show_unknown_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_document(dir.path());
        let ctx = CommandContext::new(AppConfig::default(), OutputFormat::Table);

        let result = show(&ctx, Some(path), Some("missing".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_show_missing_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = CommandContext::new(AppConfig::default(), OutputFormat::Table);

        let result = show(&ctx, Some(dir.path().join("nope.json")), None).await;
        assert!(result.is_err());
    }
}
