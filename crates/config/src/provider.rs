//! Provider endpoint and resilience configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-provider endpoint configuration. Concrete wiring (which struct
/// backs which trait object) happens in the binary, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub asr_endpoint: String,
    pub llm_endpoint: String,
    pub llm_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_api_key: Option<String>,
    pub embedder_endpoint: String,
    pub embedder_model: String,
    pub ocr_endpoint: String,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub deadlines: DeadlineConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            asr_endpoint: "http://localhost:9000".into(),
            llm_endpoint: "http://localhost:11434".into(),
            llm_model: "qwen2.5:7b-instruct-q4_K_M".into(),
            llm_api_key: None,
            embedder_endpoint: "http://localhost:9100".into(),
            embedder_model: "local-minilm".into(),
            ocr_endpoint: "http://localhost:9200".into(),
            retry: RetryConfig::default(),
            deadlines: DeadlineConfig::default(),
        }
    }
}

/// Exponential-backoff retry policy applied inside provider adapters
/// for `RateLimited` and transient `ProviderUnavailable` errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    #[serde(with = "duration_millis")]
    pub base_backoff: Duration,
    #[serde(with = "duration_millis")]
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
        }
    }
}

/// Per-call-kind deadlines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineConfig {
    #[serde(with = "duration_millis")]
    pub asr: Duration,
    #[serde(with = "duration_millis")]
    pub ocr: Duration,
    #[serde(with = "duration_millis")]
    pub llm: Duration,
    #[serde(with = "duration_millis")]
    pub embed: Duration,
    #[serde(with = "duration_millis")]
    pub vector: Duration,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            asr: Duration::from_secs(300),
            ocr: Duration::from_secs(120),
            llm: Duration::from_secs(60),
            embed: Duration::from_secs(30),
            vector: Duration::from_secs(10),
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_defaults_match_spec() {
        let r = RetryConfig::default();
        assert_eq!(r.max_attempts, 3);
        assert_eq!(r.base_backoff, Duration::from_secs(1));
        assert_eq!(r.max_backoff, Duration::from_secs(10));
    }

    #[test]
    fn deadline_defaults_match_spec() {
        let d = DeadlineConfig::default();
        assert_eq!(d.asr, Duration::from_secs(300));
        assert_eq!(d.llm, Duration::from_secs(60));
    }
}
