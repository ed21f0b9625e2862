//! Config command - print the effective configuration

use anyhow::Result;
use colored::Colorize;

use super::CommandContext;
use crate::output::{Formattable, OutputFormat, TableFormatter};

/// Show the configuration after files and environment overrides are applied
pub async fn show(ctx: &CommandContext) -> Result<()> {
    let config = &ctx.config;

    match ctx.format {
        OutputFormat::Json => println!("{}", config.format_json()?),
        OutputFormat::Plain => println!("{}", config.format_plain()?),
        OutputFormat::Table => {
            println!("{}", "Effective Configuration".bold().cyan());
            println!("{}", "=".repeat(60));
            println!();

            let endpoint = config
                .embedding
                .endpoint
                .as_ref()
                .map(|url| url.to_string())
                .unwrap_or_else(|| "(not configured)".to_string());
            let api_key = if config.embedding.api_key().is_some() {
                "set"
            } else {
                "not set"
            };

            println!(
                "{}",
                TableFormatter::key_value(vec![
                    ("eval.input", config.eval.input.display().to_string()),
                    ("eval.output", config.eval.output.display().to_string()),
                    ("eval.shards", config.eval.shards.to_string()),
                    ("embedding.provider_id", config.embedding.provider_id.clone()),
                    ("embedding.endpoint", endpoint),
                    (
                        "embedding.api_key_env",
                        format!("{} ({})", config.embedding.api_key_env, api_key),
                    ),
                    (
                        "embedding.timeout_seconds",
                        config.embedding.timeout_seconds.to_string(),
                    ),
                    ("telemetry.log_level", config.telemetry.log_level.clone()),
                    (
                        "telemetry.json_logging",
                        config.telemetry.json_logging.to_string(),
                    ),
                ])
            );
        }
    }

    Ok(())
}
