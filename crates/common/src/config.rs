//! Configuration management for the evaluator.
//!
//! Settings are loaded from configuration files and environment variables, with
//! later sources overriding earlier ones.
//!
//! ## Example Configuration
//!
//! ```toml
//! [eval]
//! input = "runs/output.jsonl"
//! output = "runs/metrics.json"
//! shards = 4
//!
//! [embedding]
//! provider_id = "sentence-transformers/all-MiniLM-L6-v2"
//! endpoint = "http://localhost:8081/v1"
//!
//! [telemetry]
//! log_level = "info"
//! json_logging = false
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable selecting the environment-specific config file
pub const ENV_VAR: &str = "AGENT_EVAL_ENV";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "AGENT_EVAL";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub eval: EvalConfig,
    pub embedding: EmbeddingSettings,
    pub telemetry: TelemetryConfig,
}

/// Evaluation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// JSON Lines file of run records
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Where the metrics document is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Number of shards scored in parallel (1 = single pass)
    #[serde(default = "default_shards")]
    pub shards: usize,
}

/// Embedding backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Model identifier used as the provider cache key
    #[serde(default = "default_provider_id")]
    pub provider_id: String,

    /// Base URL of an OpenAI-compatible embeddings API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Url>,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_embedding_timeout")]
    pub timeout_seconds: u64,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to log output
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default = "default_json_logging")]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_input() -> PathBuf {
    PathBuf::from("runs/output.jsonl")
}

fn default_output() -> PathBuf {
    PathBuf::from("runs/metrics.json")
}

fn default_shards() -> usize {
    1
}

fn default_provider_id() -> String {
    "sentence-transformers/all-MiniLM-L6-v2".to_string()
}

fn default_api_key_env() -> String {
    "AGENT_EVAL_EMBEDDING_API_KEY".to_string()
}

fn default_embedding_timeout() -> u64 {
    30
}

fn default_service_name() -> String {
    "agent-eval".to_string()
}

fn default_json_logging() -> bool {
    false
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
            shards: default_shards(),
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider_id: default_provider_id(),
            endpoint: None,
            api_key_env: default_api_key_env(),
            timeout_seconds: default_embedding_timeout(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: default_json_logging(),
            log_level: default_log_level(),
        }
    }
}

impl EmbeddingSettings {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Read the API key from the configured environment variable, if set
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }
}

impl AppConfig {
    /// Load configuration from the `config/` directory and environment variables.
    ///
    /// The configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/{environment}.toml (if exists, where environment is from AGENT_EVAL_ENV)
    /// 4. Environment variables (prefixed with AGENT_EVAL_)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use agent_eval_common::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load configuration");
    /// println!("Reading runs from {}", config.eval.input.display());
    /// ```
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config"))
    }

    /// Load configuration using `config_dir` as the directory of TOML files.
    pub fn load_from(config_dir: &Path) -> Result<Self> {
        let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string());

        let default_file = config_dir.join("default");
        let env_file = config_dir.join(&env);

        let config = config::Config::builder()
            // Start with default configuration file
            .add_source(config::File::with_name(&default_file.to_string_lossy()).required(false))
            // Add environment-specific configuration
            .add_source(config::File::with_name(&env_file.to_string_lossy()).required(false))
            // Add environment variables (prefix: AGENT_EVAL_)
            // Example: AGENT_EVAL_EVAL__SHARDS=4
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.eval.shards == 0 {
            anyhow::bail!("Shard count must be greater than 0");
        }

        if self.embedding.provider_id.trim().is_empty() {
            anyhow::bail!("Embedding provider id is required");
        }

        if self.embedding.timeout_seconds == 0 {
            anyhow::bail!("Embedding timeout must be greater than 0");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }
}
