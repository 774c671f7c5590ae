//! Fallback chain for embedding generation.
//!
//! Tries providers in order. Every fallback past the primary is recorded as
//! a `DegradationEvent`.

use std::sync::Mutex;

use tracing::warn;
use waypoint_core::errors::EmbeddingError;
use waypoint_core::models::DegradationEvent;
use waypoint_core::traits::IEmbeddingProvider;

pub struct DegradationChain {
    chain: Vec<Box<dyn IEmbeddingProvider>>,
    events: Mutex<Vec<DegradationEvent>>,
}

impl Default for DegradationChain {
    fn default() -> Self {
        Self::new()
    }
}

impl DegradationChain {
    pub fn new() -> Self {
        Self {
            chain: Vec::new(),
            events: Mutex::new(Vec::new()),
        }
    }

    /// Add a provider to the end of the chain.
    pub fn push(&mut self, provider: Box<dyn IEmbeddingProvider>) {
        self.chain.push(provider);
    }

    /// Embed with the first provider that succeeds. Returns the vector and
    /// the name of the provider that produced it.
    pub async fn embed(&self, text: &str) -> Result<(Vec<f32>, String), EmbeddingError> {
        let mut last_error = None;

        for (i, provider) in self.chain.iter().enumerate() {
            if !provider.is_available() {
                continue;
            }

            match provider.embed(text).await {
                Ok(vec) => {
                    if i > 0 {
                        let primary = self.chain.first().map(|p| p.name()).unwrap_or("unknown");
                        self.record(DegradationEvent::now(
                            "embeddings",
                            format!("{primary} unavailable"),
                            provider.name(),
                        ));
                    }
                    return Ok((vec, provider.name().to_string()));
                }
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        error = %e,
                        "provider failed, trying next in chain"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| EmbeddingError::ProviderUnavailable {
            provider: format!("all {} providers unavailable", self.chain.len()),
        }))
    }

    pub fn record(&self, event: DegradationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    /// Name of the first available provider.
    pub fn active_provider_name(&self) -> &str {
        self.chain
            .iter()
            .find(|p| p.is_available())
            .map(|p| p.name())
            .unwrap_or("none")
    }

    /// Drain accumulated degradation events.
    pub fn drain_events(&self) -> Vec<DegradationEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}
