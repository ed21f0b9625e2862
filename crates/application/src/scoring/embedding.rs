//! Embedding-backed semantic similarity.
//!
//! Providers are created lazily through an [`EmbeddingProviderFactory`] and cached per
//! provider id in an [`EmbeddingRegistry`]. A provider that cannot be constructed, or
//! that fails while computing a similarity, is marked degraded: every later call for
//! that id scores 0.0 without touching the backend again, and a single warning is logged.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised by embedding backends.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmbeddingError {
    /// The backend could not be constructed or reached
    #[error("Embedding provider '{provider_id}' unavailable: {reason}")]
    Unavailable { provider_id: String, reason: String },

    /// The backend was reachable but failed to embed the input
    #[error("Embedding inference failed: {0}")]
    Inference(String),

    /// The two embeddings have different lengths
    #[error("Embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

impl EmbeddingError {
    pub fn unavailable(provider_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            provider_id: provider_id.into(),
            reason: reason.into(),
        }
    }
}

/// A backend that maps two texts to a cosine similarity in [-1, 1].
pub trait EmbeddingProvider: Send + Sync {
    /// Model identifier this provider serves
    fn provider_id(&self) -> &str;

    /// Cosine similarity between the embeddings of `a` and `b`.
    fn similarity(&self, a: &str, b: &str) -> Result<f64, EmbeddingError>;
}

/// Constructs providers on first use.
pub trait EmbeddingProviderFactory: Send + Sync {
    fn create(&self, provider_id: &str) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError>;
}

/// Factory used when no embedding backend is configured.
///
/// Every construction fails, so semantic similarity degrades to 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableEmbeddingFactory;

impl EmbeddingProviderFactory for UnavailableEmbeddingFactory {
    fn create(&self, provider_id: &str) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
        Err(EmbeddingError::unavailable(
            provider_id,
            "no embedding backend configured",
        ))
    }
}

/// Result of a similarity request made through the registry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimilarityOutcome {
    /// The provider answered; the value is already clamped to [0, 1]
    Computed(f64),
    /// The provider is degraded for this run
    Degraded,
}

impl SimilarityOutcome {
    /// Score to record for this outcome.
    pub fn score(&self) -> f64 {
        match self {
            SimilarityOutcome::Computed(value) => *value,
            SimilarityOutcome::Degraded => 0.0,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, SimilarityOutcome::Degraded)
    }
}

struct ProviderEntry {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    degraded: AtomicBool,
}

impl ProviderEntry {
    fn ready(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider: Some(provider),
            degraded: AtomicBool::new(false),
        }
    }

    fn degraded() -> Self {
        Self {
            provider: None,
            degraded: AtomicBool::new(true),
        }
    }
}

/// Per-run cache of embedding providers keyed by provider id.
///
/// Safe to share across threads. Concurrent first requests for the same id wait on a
/// single construction attempt.
pub struct EmbeddingRegistry {
    factory: Arc<dyn EmbeddingProviderFactory>,
    providers: Mutex<HashMap<String, Arc<OnceCell<ProviderEntry>>>>,
}

impl fmt::Debug for EmbeddingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddingRegistry")
            .field("providers", &self.cached_providers())
            .finish()
    }
}

impl Default for EmbeddingRegistry {
    fn default() -> Self {
        Self::unavailable()
    }
}

impl EmbeddingRegistry {
    pub fn new(factory: Arc<dyn EmbeddingProviderFactory>) -> Self {
        Self {
            factory,
            providers: Mutex::new(HashMap::new()),
        }
    }

    /// Registry whose providers are always degraded.
    pub fn unavailable() -> Self {
        Self::new(Arc::new(UnavailableEmbeddingFactory))
    }

    fn entry(&self, provider_id: &str) -> Arc<OnceCell<ProviderEntry>> {
        let cell = {
            let mut providers = self.providers.lock();
            providers
                .entry(provider_id.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };

        cell.get_or_init(|| match self.factory.create(provider_id) {
            Ok(provider) => {
                debug!(provider_id, "Embedding provider initialized");
                ProviderEntry::ready(provider)
            }
            Err(error) => {
                warn!(
                    provider_id,
                    error = %error,
                    "Embedding provider unavailable, semantic similarity will score 0.0"
                );
                ProviderEntry::degraded()
            }
        });

        cell
    }

    /// Similarity between `a` and `b` using the provider for `provider_id`.
    pub fn similarity(&self, provider_id: &str, a: &str, b: &str) -> SimilarityOutcome {
        let cell = self.entry(provider_id);
        let Some(entry) = cell.get() else {
            return SimilarityOutcome::Degraded;
        };

        if entry.degraded.load(Ordering::Acquire) {
            return SimilarityOutcome::Degraded;
        }

        let Some(provider) = entry.provider.as_ref() else {
            return SimilarityOutcome::Degraded;
        };

        let result = provider.similarity(a, b).and_then(|value| {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(EmbeddingError::Inference(format!(
                    "non-finite similarity {value}"
                )))
            }
        });

        match result {
            Ok(value) => SimilarityOutcome::Computed(value.clamp(0.0, 1.0)),
            Err(error) => {
                if !entry.degraded.swap(true, Ordering::AcqRel) {
                    warn!(
                        provider_id,
                        error = %error,
                        "Embedding provider failed, semantic similarity will score 0.0"
                    );
                }
                SimilarityOutcome::Degraded
            }
        }
    }

    /// Whether the provider for `provider_id` has been marked degraded.
    ///
    /// Returns false for ids that have not been requested yet.
    pub fn is_degraded(&self, provider_id: &str) -> bool {
        let cell = self.providers.lock().get(provider_id).cloned();
        cell.and_then(|cell| cell.get().map(|entry| entry.degraded.load(Ordering::Acquire)))
            .unwrap_or(false)
    }

    /// Provider ids requested so far, sorted.
    pub fn cached_providers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.lock().keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Cosine similarity of two vectors.
///
/// Zero-norm vectors have similarity 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Semantic similarity of a prediction to its reference, clamped to [0, 1].
///
/// A missing reference scores 0.0 without consulting the registry.
pub fn semantic_similarity(
    registry: &EmbeddingRegistry,
    prediction: &str,
    reference: Option<&str>,
    provider_id: &str,
) -> SimilarityOutcome {
    match reference {
        Some(reference) => registry.similarity(provider_id, prediction, reference),
        None => SimilarityOutcome::Computed(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct FixedProvider(f64);

    impl EmbeddingProvider for FixedProvider {
        fn provider_id(&self) -> &str {
            "fixed"
        }

        fn similarity(&self, _a: &str, _b: &str) -> Result<f64, EmbeddingError> {
            Ok(self.0)
        }
    }

    struct CountingFactory {
        value: f64,
        created: AtomicUsize,
    }

    impl EmbeddingProviderFactory for CountingFactory {
        fn create(&self, _provider_id: &str) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(FixedProvider(self.value)))
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-9);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-9);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(EmbeddingError::DimensionMismatch { left: 1, right: 2 })
        ));
    }

    #[test]
    fn test_provider_constructed_once_per_id() {
        let factory = Arc::new(CountingFactory {
            value: 0.8,
            created: AtomicUsize::new(0),
        });
        let registry = EmbeddingRegistry::new(factory.clone());

        for _ in 0..5 {
            assert_eq!(
                registry.similarity("model-a", "x", "y"),
                SimilarityOutcome::Computed(0.8)
            );
        }
        registry.similarity("model-b", "x", "y");

        assert_eq!(factory.created.load(Ordering::SeqCst), 2);
        assert_eq!(registry.cached_providers(), vec!["model-a", "model-b"]);
    }

    #[test]
    fn test_negative_similarity_is_clamped() {
        let registry = EmbeddingRegistry::new(Arc::new(CountingFactory {
            value: -0.4,
            created: AtomicUsize::new(0),
        }));

        assert_eq!(
            registry.similarity("model", "x", "y"),
            SimilarityOutcome::Computed(0.0)
        );
        assert!(!registry.is_degraded("model"));
    }

    #[test]
    fn test_unavailable_registry_degrades() {
        let registry = EmbeddingRegistry::unavailable();
        let outcome = registry.similarity("model", "x", "y");

        assert!(outcome.is_degraded());
        assert_eq!(outcome.score(), 0.0);
        assert!(registry.is_degraded("model"));
    }

    #[test]
    fn test_missing_reference_skips_registry() {
        let registry = EmbeddingRegistry::unavailable();
        let outcome = semantic_similarity(&registry, "prediction", None, "model");

        assert_eq!(outcome, SimilarityOutcome::Computed(0.0));
        assert!(registry.cached_providers().is_empty());
    }
}
