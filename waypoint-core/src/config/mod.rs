pub mod classifier_config;
pub mod defaults;
pub mod embedding_config;
pub mod few_shot_config;
pub mod observability_config;
pub mod providers_config;
pub mod retrieval_config;
pub mod router_config;
pub mod verifier_config;

use std::path::Path;

pub use classifier_config::ClassifierConfig;
pub use embedding_config::EmbeddingConfig;
pub use few_shot_config::FewShotConfig;
pub use observability_config::ObservabilityConfig;
pub use providers_config::{EndpointConfig, ProvidersConfig};
pub use retrieval_config::RetrievalConfig;
pub use router_config::{FallbackPolicy, RouterConfig};
pub use verifier_config::VerifierConfig;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WaypointConfig {
    pub embedding: EmbeddingConfig,
    pub classifier: ClassifierConfig,
    pub router: RouterConfig,
    pub few_shot: FewShotConfig,
    pub retrieval: RetrievalConfig,
    pub verifier: VerifierConfig,
    pub observability: ObservabilityConfig,
    pub providers: ProvidersConfig,
}

impl WaypointConfig {
    /// Parse from a TOML string. Missing sections and fields take defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ConfigError::InvalidToml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidValue {
            field: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&raw)
    }

    /// Reject values no component can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.dimensions == 0 {
            return Err(invalid("embedding.dimensions", "must be greater than zero"));
        }
        if !matches!(self.embedding.provider.as_str(), "api" | "hashed") {
            return Err(ConfigError::UnknownProvider {
                kind: "embedding".to_string(),
                name: self.embedding.provider.clone(),
            });
        }
        for (field, value) in [
            ("router.classifier_threshold", self.router.classifier_threshold),
            ("router.embedding_threshold", self.router.embedding_threshold),
            ("few_shot.confidence_threshold", self.few_shot.confidence_threshold),
            ("verifier.min_coverage", self.verifier.min_coverage),
            ("verifier.relaxed_coverage", self.verifier.relaxed_coverage),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be within [0, 1]"));
            }
        }
        if self.router.embedding_neighbors == 0 {
            return Err(invalid("router.embedding_neighbors", "must be greater than zero"));
        }
        if self.retrieval.answer_max_tokens == 0
            || self.retrieval.answer_max_tokens > crate::constants::MAX_INSTRUCTION_TOKENS
        {
            return Err(invalid(
                "retrieval.answer_max_tokens",
                "must be within 1..=32000",
            ));
        }
        if self.classifier.learning_rate <= 0.0 {
            return Err(invalid("classifier.learning_rate", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
