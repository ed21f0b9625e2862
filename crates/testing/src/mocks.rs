//! Mock embedding backends.
//!
//! Each factory records which provider ids it was asked to construct so tests can
//! check caching and degradation behavior.

use agent_eval_application::scoring::{
    cosine_similarity, EmbeddingError, EmbeddingProvider, EmbeddingProviderFactory,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct CallLog {
    creations: RwLock<Vec<String>>,
    calls: AtomicUsize,
}

impl CallLog {
    fn created(&self, provider_id: &str) {
        self.creations.write().push(provider_id.to_string());
    }

    fn called(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Provider that returns the same similarity for every pair
pub struct StaticEmbeddingProvider {
    provider_id: String,
    similarity: f64,
    log: Arc<CallLog>,
}

impl EmbeddingProvider for StaticEmbeddingProvider {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn similarity(&self, _a: &str, _b: &str) -> Result<f64, EmbeddingError> {
        self.log.called();
        Ok(self.similarity)
    }
}

/// Factory whose providers always answer with a fixed similarity
#[derive(Clone)]
pub struct StaticEmbeddingFactory {
    similarity: f64,
    log: Arc<CallLog>,
}

impl StaticEmbeddingFactory {
    pub fn new(similarity: f64) -> Self {
        Self {
            similarity,
            log: Arc::new(CallLog::default()),
        }
    }

    /// Provider ids constructed so far, in order
    pub fn creations(&self) -> Vec<String> {
        self.log.creations.read().clone()
    }

    pub fn similarity_calls(&self) -> usize {
        self.log.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingProviderFactory for StaticEmbeddingFactory {
    fn create(&self, provider_id: &str) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        self.log.created(provider_id);
        Ok(Arc::new(StaticEmbeddingProvider {
            provider_id: provider_id.to_string(),
            similarity: self.similarity,
            log: Arc::clone(&self.log),
        }))
    }
}

/// Factory that can never construct a provider
#[derive(Clone, Default)]
pub struct FailingEmbeddingFactory {
    log: Arc<CallLog>,
}

impl FailingEmbeddingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        self.log.creations.read().len()
    }
}

impl EmbeddingProviderFactory for FailingEmbeddingFactory {
    fn create(&self, provider_id: &str) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        self.log.created(provider_id);
        Err(EmbeddingError::unavailable(provider_id, "model weights not found"))
    }
}

struct BrokenEmbeddingProvider {
    provider_id: String,
    log: Arc<CallLog>,
}

impl EmbeddingProvider for BrokenEmbeddingProvider {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn similarity(&self, _a: &str, _b: &str) -> Result<f64, EmbeddingError> {
        self.log.called();
        Err(EmbeddingError::Inference("backend returned HTTP 500".to_string()))
    }
}

/// Factory whose providers construct fine but fail on every similarity call
#[derive(Clone, Default)]
pub struct BrokenEmbeddingFactory {
    log: Arc<CallLog>,
}

impl BrokenEmbeddingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn similarity_calls(&self) -> usize {
        self.log.calls.load(Ordering::SeqCst)
    }
}

impl EmbeddingProviderFactory for BrokenEmbeddingFactory {
    fn create(&self, provider_id: &str) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        self.log.created(provider_id);
        Ok(Arc::new(BrokenEmbeddingProvider {
            provider_id: provider_id.to_string(),
            log: Arc::clone(&self.log),
        }))
    }
}

/// Provider embedding texts as lower-cased bag-of-words count vectors
pub struct BagOfWordsProvider;

impl BagOfWordsProvider {
    fn embed(vocabulary: &[String], text: &str) -> Vec<f32> {
        let mut counts: BTreeMap<&str, f32> = BTreeMap::new();
        let lowered = text.to_lowercase();
        for token in lowered.split_whitespace() {
            *counts.entry(token).or_default() += 1.0;
        }
        vocabulary
            .iter()
            .map(|word| counts.get(word.as_str()).copied().unwrap_or(0.0))
            .collect()
    }
}

impl EmbeddingProvider for BagOfWordsProvider {
    fn provider_id(&self) -> &str {
        "bag-of-words"
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f64, EmbeddingError> {
        let mut vocabulary: Vec<String> = format!("{} {}", a, b)
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        vocabulary.sort();
        vocabulary.dedup();

        cosine_similarity(&Self::embed(&vocabulary, a), &Self::embed(&vocabulary, b))
    }
}

/// Factory for [`BagOfWordsProvider`]
#[derive(Clone, Copy, Default)]
pub struct BagOfWordsFactory;

impl EmbeddingProviderFactory for BagOfWordsFactory {
    fn create(&self, _provider_id: &str) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        Ok(Arc::new(BagOfWordsProvider))
    }
}
