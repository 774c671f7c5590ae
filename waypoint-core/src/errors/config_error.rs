/// Configuration errors. Fatal: raised at construction time.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid TOML: {0}")]
    InvalidToml(String),

    #[error("missing credentials for {provider}: environment variable {env_var} is not set")]
    MissingCredentials { provider: String, env_var: String },

    #[error("unknown {kind} provider: {name}")]
    UnknownProvider { kind: String, name: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
