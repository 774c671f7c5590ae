//! Provider registry.
//!
//! `api` talks to an OpenAI-compatible endpoint; `hashed` is the offline
//! provider and the optional local fallback.

pub mod api_provider;
pub mod hashed_provider;

pub use api_provider::ApiEmbeddingProvider;
pub use hashed_provider::HashedEmbeddingProvider;

use waypoint_core::config::{EmbeddingConfig, ProvidersConfig};
use waypoint_core::errors::ConfigError;
use waypoint_core::traits::IEmbeddingProvider;
use tracing::info;

/// Create the configured provider.
///
/// Fails only on configuration problems such as a missing API key.
pub fn create_provider(
    config: &EmbeddingConfig,
    providers: &ProvidersConfig,
) -> Result<Box<dyn IEmbeddingProvider>, ConfigError> {
    match config.provider.as_str() {
        "api" => {
            let endpoint = &providers.embedding;
            let api_key = endpoint.resolve_api_key("embedding")?;
            info!(provider = "api", model = %endpoint.model, "embedding provider configured");
            Ok(Box::new(ApiEmbeddingProvider::new(
                endpoint,
                api_key,
                config.dimensions,
                config.timeout_ms,
            )))
        }
        "hashed" => {
            info!(provider = "hashed", "using hashed TF-IDF embedding provider");
            Ok(Box::new(HashedEmbeddingProvider::new(config.dimensions)))
        }
        other => Err(ConfigError::UnknownProvider {
            kind: "embedding".to_string(),
            name: other.to_string(),
        }),
    }
}
