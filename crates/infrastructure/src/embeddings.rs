//! HTTP embedding backend.
//!
//! Talks to any service exposing an OpenAI-compatible `POST /embeddings` endpoint.
//! Calls are blocking; run them off the async executor.

use agent_eval_application::scoring::{
    cosine_similarity, EmbeddingError, EmbeddingProvider, EmbeddingProviderFactory,
};
use agent_eval_common::EmbeddingSettings;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 2],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Embedding provider backed by a remote embeddings API
pub struct HttpEmbeddingProvider {
    provider_id: String,
    url: Url,
    api_key: Option<String>,
    client: Client,
}

impl HttpEmbeddingProvider {
    pub fn new(
        provider_id: impl Into<String>,
        endpoint: &Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let provider_id = provider_id.into();
        let url = embeddings_url(endpoint)
            .map_err(|e| EmbeddingError::unavailable(&provider_id, e.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::unavailable(&provider_id, e.to_string()))?;

        Ok(Self {
            provider_id,
            url,
            api_key,
            client,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn embed_pair(&self, a: &str, b: &str) -> Result<(Vec<f32>, Vec<f32>), EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.provider_id,
            input: [a, b],
        };

        let mut request = self.client.post(self.url.clone()).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| EmbeddingError::Inference(e.to_string()))?;

        let mut parsed: EmbeddingResponse = response
            .json()
            .map_err(|e| EmbeddingError::Inference(format!("invalid embeddings response: {}", e)))?;

        parsed.data.sort_by_key(|datum| datum.index);
        let mut vectors = parsed.data.into_iter().map(|datum| datum.embedding);
        match (vectors.next(), vectors.next()) {
            (Some(left), Some(right)) => Ok((left, right)),
            _ => Err(EmbeddingError::Inference(
                "embeddings response did not contain two vectors".to_string(),
            )),
        }
    }
}

impl EmbeddingProvider for HttpEmbeddingProvider {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    #[instrument(level = "debug", skip(self, a, b), fields(provider_id = %self.provider_id))]
    fn similarity(&self, a: &str, b: &str) -> Result<f64, EmbeddingError> {
        let (left, right) = self.embed_pair(a, b)?;
        let similarity = cosine_similarity(&left, &right)?;
        debug!(dimensions = left.len(), similarity, "Computed embedding similarity");
        Ok(similarity)
    }
}

/// Builds [`HttpEmbeddingProvider`]s from embedding settings
#[derive(Debug, Clone)]
pub struct HttpEmbeddingFactory {
    endpoint: Option<Url>,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpEmbeddingFactory {
    pub fn new(endpoint: Option<Url>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            endpoint,
            api_key,
            timeout,
        }
    }

    pub fn from_settings(settings: &EmbeddingSettings) -> Self {
        Self::new(settings.endpoint.clone(), settings.api_key(), settings.timeout())
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

impl EmbeddingProviderFactory for HttpEmbeddingFactory {
    fn create(&self, provider_id: &str) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        let endpoint = self.endpoint.as_ref().ok_or_else(|| {
            EmbeddingError::unavailable(provider_id, "no embedding endpoint configured")
        })?;

        let provider =
            HttpEmbeddingProvider::new(provider_id, endpoint, self.api_key.clone(), self.timeout)?;
        info!(provider_id, url = %provider.url(), "Embedding provider ready");

        Ok(Arc::new(provider))
    }
}

fn embeddings_url(endpoint: &Url) -> Result<Url, url::ParseError> {
    let base = endpoint.as_str().trim_end_matches('/');
    Url::parse(&format!("{}/embeddings", base))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embeddings_url() {
        let with_slash = Url::parse("http://localhost:8081/v1/").unwrap();
        let without_slash = Url::parse("http://localhost:8081/v1").unwrap();

        assert_eq!(
            embeddings_url(&with_slash).unwrap().as_str(),
            "http://localhost:8081/v1/embeddings"
        );
        assert_eq!(
            embeddings_url(&without_slash).unwrap().as_str(),
            "http://localhost:8081/v1/embeddings"
        );
    }

    #[test]
    fn test_unconfigured_factory_is_unavailable() {
        let factory = HttpEmbeddingFactory::new(None, None, Duration::from_secs(1));

        assert!(!factory.is_configured());
        assert!(matches!(
            factory.create("model"),
            Err(EmbeddingError::Unavailable { .. })
        ));
    }
}
