//! Layered configuration for the ingestion-and-RAG engine.
//!
//! Loaded from (later sources override earlier ones):
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. environment variables with the `CLINRAG_` prefix (`__` as the
//!    nesting separator, e.g. `CLINRAG_PROVIDERS__LLM_ENDPOINT`).

pub mod diarization;
pub mod provider;
pub mod retrieval;
pub mod settings;

pub use diarization::DiarizationConfig;
pub use provider::{DeadlineConfig, ProviderConfig, RetryConfig};
pub use retrieval::RetrievalConfig;
pub use settings::{load_settings, IngestConfig, ServerConfig, Settings, StoreConfig, VectorConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for clinrag_core::Error {
    fn from(err: ConfigError) -> Self {
        clinrag_core::Error::Internal(format!("config: {err}"))
    }
}
