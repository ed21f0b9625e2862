//! Agent Eval CLI
//!
//! Command-line interface for scoring agent run files and inspecting metrics.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use agent_eval_cli::commands::evaluate::EvaluateOptions;
use agent_eval_cli::commands::score::ScoreRequest;
use agent_eval_cli::commands::{config, evaluate, score, show, CommandContext};
use agent_eval_cli::output::OutputFormat;
use agent_eval_common::{init_from_config, AppConfig, TelemetryConfig};
use agent_eval_domain::Metric;

/// Output format for CLI commands
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub enum CliOutputFormat {
    /// JSON output
    Json,
    /// Table output (default)
    #[default]
    Table,
    /// Plain text output
    Plain,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Plain => OutputFormat::Plain,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "agent-eval")]
#[command(author, version, about = "Score agent runs and summarize the results")]
#[command(long_about = "Scores producer outputs in a JSON Lines run file against references, \
    evidence and constraints, then aggregates per-producer and per-task-source means.")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short = 'f', long, global = true, value_enum, default_value = "table")]
    format: CliOutputFormat,

    /// Directory holding default.toml and environment overrides
    #[arg(long, global = true, env = "AGENT_EVAL_CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a run file and write the metrics document
    #[command(alias = "eval")]
    Evaluate {
        /// JSON Lines run file (defaults to eval.input)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Metrics document path (defaults to eval.output)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Number of shards scored in parallel (defaults to eval.shards)
        #[arg(short, long)]
        shards: Option<usize>,
    },

    /// Print the tables of a metrics document
    Show {
        /// Metrics document (defaults to eval.output)
        path: Option<PathBuf>,

        /// Only show one task source
        #[arg(short, long)]
        source: Option<String>,
    },

    /// Compute one metric for a single prediction
    Score {
        /// Metric name, e.g. token_f1 or rouge_l
        #[arg(short, long)]
        metric: Metric,

        /// Predicted text
        #[arg(short, long)]
        prediction: String,

        /// Reference text
        #[arg(short, long)]
        reference: Option<String>,

        /// Evidence snippet or constraint text (repeatable)
        #[arg(short, long)]
        evidence: Vec<String>,
    },

    /// Print the effective configuration
    Config,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "agent-eval", &mut std::io::stdout());
}

/// `--verbose` forces debug logging over the configured level
fn telemetry_settings(mut telemetry: TelemetryConfig, verbose: bool) -> TelemetryConfig {
    if verbose {
        telemetry.log_level = "debug".to_string();
    }
    telemetry
}

async fn run(cli: Cli) -> Result<()> {
    // Handle completions command early (doesn't need config)
    if let Commands::Completions { shell } = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    let mut config = AppConfig::load_from(&cli.config_dir).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            cli.config_dir.display()
        )
    })?;

    config.telemetry = telemetry_settings(config.telemetry, cli.verbose);
    init_from_config(&config.telemetry)?;

    let ctx = CommandContext::new(config, cli.format.into());

    match cli.command {
        Commands::Evaluate {
            input,
            output,
            shards,
        } => {
            evaluate::evaluate(
                &ctx,
                EvaluateOptions {
                    input,
                    output,
                    shards,
                },
            )
            .await
        }

        Commands::Show { path, source } => show::show(&ctx, path, source).await,

        Commands::Score {
            metric,
            prediction,
            reference,
            evidence,
        } => {
            score::score(
                &ctx,
                ScoreRequest {
                    metric,
                    prediction,
                    reference,
                    evidence,
                },
            )
            .await
        }

        Commands::Config => config::show(&ctx).await,

        Commands::Completions { .. } => {
            // Already handled above
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup colored output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let verbose = cli.verbose;

    // Handle errors
    if let Err(e) = run(cli).await {
        use colored::Colorize;
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if verbose {
            eprintln!("\n{}", "Backtrace:".dimmed());
            eprintln!("{:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from([
            "agent-eval",
            "evaluate",
            "--input",
            "runs/a.jsonl",
            "--shards",
            "4",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.format, CliOutputFormat::Json));
        match cli.command {
            Commands::Evaluate { input, shards, output } => {
                assert_eq!(input, Some(PathBuf::from("runs/a.jsonl")));
                assert_eq!(shards, Some(4));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_score_with_repeated_evidence() {
        let cli = Cli::try_parse_from([
            "agent-eval",
            "score",
            "--metric",
            "evidence-coverage",
            "--prediction",
            "see doc a",
            "--evidence",
            "doc a",
            "--evidence",
            "doc b",
        ])
        .unwrap();

        match cli.command {
            Commands::Score {
                metric, evidence, ..
            } => {
                assert_eq!(metric, Metric::EvidenceCoverage);
                assert_eq!(evidence, vec!["doc a".to_string(), "doc b".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_overrides_log_level() {
        let configured = TelemetryConfig {
            log_level: "warn".to_string(),
            ..TelemetryConfig::default()
        };

        assert_eq!(telemetry_settings(configured.clone(), false).log_level, "warn");
        assert_eq!(telemetry_settings(configured, true).log_level, "debug");
    }

    #[test]
    fn test_unknown_metric_rejected() {
        let result = Cli::try_parse_from([
            "agent-eval",
            "score",
            "--metric",
            "bleu",
            "--prediction",
            "x",
        ]);

        assert!(result.is_err());
    }
}
