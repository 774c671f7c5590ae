use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// An OpenAI-compatible HTTP endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    /// Empty selects the default model for the endpoint's role.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub max_retries: u32,
}

impl EndpointConfig {
    fn with_model(model: &str) -> Self {
        Self {
            base_url: defaults::DEFAULT_API_BASE_URL.to_string(),
            model: model.to_string(),
            api_key_env: defaults::DEFAULT_API_KEY_ENV.to_string(),
            max_retries: defaults::DEFAULT_MAX_RETRIES,
        }
    }

    /// The configured model, or `default` when none is set.
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        if self.model.trim().is_empty() {
            default
        } else {
            &self.model
        }
    }

    /// Read the API key from the configured environment variable.
    pub fn resolve_api_key(&self, provider: &str) -> Result<String, ConfigError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingCredentials {
                provider: provider.to_string(),
                env_var: self.api_key_env.clone(),
            }),
        }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::with_model("")
    }
}

/// External provider endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Used when `embedding.provider = "api"`.
    pub embedding: EndpointConfig,
    /// Completion endpoint for the few-shot tier. `None` disables the tier.
    pub completion: Option<EndpointConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            embedding: EndpointConfig::with_model(defaults::DEFAULT_EMBEDDING_MODEL),
            completion: None,
        }
    }
}
