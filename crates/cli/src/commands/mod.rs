//! CLI commands

pub mod config;
pub mod evaluate;
pub mod score;
pub mod show;

use crate::output::OutputFormat;
use agent_eval_application::{ScoringEngine, ScoringEngineBuilder};
use agent_eval_common::AppConfig;
use agent_eval_infrastructure::HttpEmbeddingFactory;
use std::sync::Arc;
use tracing::debug;

/// Context passed to all commands
pub struct CommandContext {
    pub config: AppConfig,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config: AppConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    /// Build a scoring engine backed by the configured embedding endpoint
    pub fn engine(&self) -> ScoringEngine {
        let factory = HttpEmbeddingFactory::from_settings(&self.config.embedding);
        if !factory.is_configured() {
            debug!(
                provider_id = %self.config.embedding.provider_id,
                "No embedding endpoint configured"
            );
        }

        ScoringEngineBuilder::new()
            .provider_id(self.config.embedding.provider_id.clone())
            .embedding_factory(Arc::new(factory))
            .build()
    }
}
