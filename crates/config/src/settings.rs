//! Top-level settings tree and the loader that assembles it.

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, DiarizationConfig, ProviderConfig, RetrievalConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_upload_audio_bytes: u64,
    pub max_upload_document_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            max_upload_audio_bytes: 25 * 1024 * 1024,
            max_upload_document_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `sqlite::memory:` for tests, or a `sqlite://path/to/file.db` URL.
    pub database_url: String,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { database_url: "sqlite://clinrag.db".into(), max_connections: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    pub collection: String,
    /// When set, the qdrant-backed index is used; otherwise the
    /// in-process index is used (tests, offline demos).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qdrant_url: Option<String>,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self { collection: "medical_conversations".into(), qdrant_url: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Size of the bounded worker pool.
    pub worker_pool_size: usize,
    /// Bound of the submission queue; submissions past this fail fast
    /// with `Busy`.
    pub queue_capacity: usize,
    pub max_pdf_pages: u32,
    pub min_ocr_confidence: f32,
    pub max_extraction_input_chars: usize,
    pub max_payload_text_chars: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            worker_pool_size: 4,
            queue_capacity: 256,
            max_pdf_pages: 50,
            min_ocr_confidence: 0.60,
            max_extraction_input_chars: 4_000,
            max_payload_text_chars: 8_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub vector: VectorConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub providers: ProviderConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub diarization: DiarizationConfig,
}

/// Load settings from built-in defaults, an optional TOML file, then
/// `CLINRAG_`-prefixed environment variables, in that override order.
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    let defaults = Settings::default();
    let mut builder = Config::builder().add_source(Config::try_from(&defaults)?);

    if let Some(path) = path {
        builder = builder.add_source(File::new(path, FileFormat::Toml).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("CLINRAG").separator("__"));

    let config = builder.build()?;
    config.try_deserialize().map_err(ConfigError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_a_file() {
        let settings = load_settings(None).expect("defaults must build a valid config");
        assert_eq!(settings.ingest.worker_pool_size, 4);
        assert_eq!(settings.retrieval.default_min_score, 0.6);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_settings(Some("/nonexistent/settings.toml"));
        assert!(err.is_err());
    }
}
