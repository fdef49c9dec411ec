//! Concrete capability adapters: hosted HTTP providers wired up
//! by the binary. Each adapter performs a single attempt per call, per
//! the capability traits' contract; [`with_retry`] applies the
//! exponential-backoff policy callers are responsible for.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use clinrag_config::{ProviderConfig, RetryConfig};
use clinrag_core::traits::classify_transport_error;
use clinrag_core::{
    Asr, AsrSegment, Embedder, Error, GenerateRequest, GenerateResponse, ImageExtract, LanguageModel, Ocr, PdfExtract, Result,
    TranscribeHints, TranscribeResult,
};

/// Retry a fallible call with exponential backoff, honoring
/// [`Error::is_retryable`]. The capability adapters themselves make a
/// single attempt; this is the caller-side policy the traits' docs
/// describe.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, mut call: F) -> Result<T>
where
F: FnMut() -> Fut,
Fut: std::future::Future<Output = Result<T>>,
{
    let mut backoff = config.base_backoff;
    let mut last_err = None;

    for attempt in 0..config.max_attempts {
        if attempt > 0 {
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(config.max_backoff);
        }
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => last_err = Some(e),
            Err(e) => return Err(e),
        }
    }

    Err(last_err.unwrap_or_else(|| Error::Internal("retry loop exited without an attempt".into())))
}

fn client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

fn transport_error(err: &reqwest::Error) -> Error {
    classify_transport_error(err.is_timeout(), err.is_connect(), err.to_string())
}

/// Classify a non-success HTTP status from a provider backend.
/// `429` is `RateLimited`, `5xx` is `ProviderUnavailable` — both are
/// retried by [`with_retry`] — anything else is `Internal`.
fn status_error(status: reqwest::StatusCode, backend: &str) -> Error {
    if status.as_u16() == 429 {
        Error::RateLimited(format!("{backend} rate-limited the request: {status}"))
    } else if status.is_server_error() {
        Error::ProviderUnavailable(format!("{backend} returned {status}"))
    } else {
        Error::Internal(format!("{backend} returned {status}"))
    }
}

/// Hosted chat-completions backend, Ollama-compatible wire shape
/// (`POST /api/chat`).
pub struct HttpLanguageModel {
    client: Client,
    endpoint: String,
    model: String,
    retry: RetryConfig,
}

impl HttpLanguageModel {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let client = client(timeout).map_err(|e| Error::Internal(format!("llm client: {e}")))?;
        Ok(Self { client, endpoint: config.llm_endpoint.clone(), model: config.llm_model.clone(), retry: config.retry.clone() })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl LanguageModel for HttpLanguageModel {
    async fn complete(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let messages: Vec<ChatMessage> = request
            .messages
            .iter()
            .map(|m| ChatMessage {
                role: match m.role {
                    clinrag_core::Role::System => "system",
                    clinrag_core::Role::User => "user",
                    clinrag_core::Role::Assistant => "assistant",
                },
                content: &m.content,
            })
            .collect();

        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: ChatOptions { temperature: request.params.temperature, num_predict: request.params.max_tokens },
        };

        with_retry(&self.retry, || async {
            let response = self
                .client
                .post(format!("{}/api/chat", self.endpoint))
                .json(&body)
                .send()
                .await
                .map_err(|e| transport_error(&e))?;

            if !response.status().is_success() {
                return Err(status_error(response.status(), "llm backend"));
            }

            let parsed: ChatResponse = response.json().await.map_err(|e| Error::Internal(format!("llm response: {e}")))?;
            Ok(GenerateResponse::text(parsed.message.content))
        })
        .await
    }

    async fn is_available(&self) -> bool {
        self.client.get(format!("{}/api/tags", self.endpoint)).send().await.map(|r| r.status().is_success()).unwrap_or(false)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Hosted embedding backend, Ollama-compatible wire shape
/// (`POST /api/embeddings`).
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    retry: RetryConfig,
}

impl HttpEmbedder {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let client = client(timeout).map_err(|e| Error::Internal(format!("embedder client: {e}")))?;
        Ok(Self { client, endpoint: config.embedder_endpoint.clone(), model: config.embedder_model.clone(), retry: config.retry.clone() })
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let body = EmbedRequest { model: &self.model, prompt: text };
        with_retry(&self.retry, || async {
            let response = self
                .client
                .post(format!("{}/api/embeddings", self.endpoint))
                .json(&body)
                .send()
                .await
                .map_err(|e| transport_error(&e))?;

            if !response.status().is_success() {
                return Err(status_error(response.status(), "embedder"));
            }

            let parsed: EmbedResponse = response.json().await.map_err(|e| Error::Internal(format!("embed response: {e}")))?;
            Ok(parsed.embedding)
        })
        .await
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Hosted ASR backend: a transcription microservice accepting raw audio
/// bytes and returning a JSON transcript.
pub struct HttpAsr {
    client: Client,
    endpoint: String,
    retry: RetryConfig,
}

impl HttpAsr {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let client = client(timeout).map_err(|e| Error::Internal(format!("asr client: {e}")))?;
        Ok(Self { client, endpoint: config.asr_endpoint.clone(), retry: config.retry.clone() })
    }
}

#[derive(Deserialize)]
struct AsrResponse {
    text: String,
    language: String,
    duration_s: f32,
    confidence: f32,
    #[serde(default)]
    segments: Vec<AsrSegmentWire>,
}

#[derive(Deserialize)]
struct AsrSegmentWire {
    t_start: f32,
    t_end: f32,
    text: String,
}

#[async_trait]
impl Asr for HttpAsr {
    async fn transcribe(&self, audio_bytes: &[u8], hints: TranscribeHints) -> Result<TranscribeResult> {
        let mut url = format!("{}/transcribe", self.endpoint);
        if let Some(lang) = &hints.language {
            url.push_str(&format!("?language={lang}"));
        }

        with_retry(&self.retry, || async {
            let response = self
                .client
                .post(url.clone())
                .header("content-type", "application/octet-stream")
                .body(audio_bytes.to_vec())
                .send()
                .await
                .map_err(|e| transport_error(&e))?;

            if !response.status().is_success() {
                let status = response.status();
                return Err(if status.as_u16() == 422 {
                    Error::InvalidMedia(format!("asr rejected audio: {status}"))
                } else {
                    status_error(status, "asr backend")
                });
            }

            let parsed: AsrResponse = response.json().await.map_err(|e| Error::Internal(format!("asr response: {e}")))?;
            Ok(TranscribeResult {
                text: parsed.text,
                language: parsed.language,
                duration_s: parsed.duration_s,
                confidence: parsed.confidence,
                segments: parsed.segments.into_iter().map(|s| AsrSegment { t_start: s.t_start, t_end: s.t_end, text: s.text }).collect(),
            })
        })
        .await
    }

    fn name(&self) -> &str {
        "http-asr"
    }
}

/// Hosted OCR backend: a PDF/image text-extraction microservice.
pub struct HttpOcr {
    client: Client,
    endpoint: String,
    retry: RetryConfig,
}

impl HttpOcr {
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self> {
        let client = client(timeout).map_err(|e| Error::Internal(format!("ocr client: {e}")))?;
        Ok(Self { client, endpoint: config.ocr_endpoint.clone(), retry: config.retry.clone() })
    }

    async fn post(&self, path: &str, bytes: &[u8], query: &[(&str, String)]) -> Result<reqwest::Response> {
        let mut request = self.client.post(format!("{}{path}", self.endpoint)).query(query).body(bytes.to_vec());
        request = request.header("content-type", "application/octet-stream");
        let response = request.send().await.map_err(|e| transport_error(&e))?;
        if !response.status().is_success() {
            return Err(status_error(response.status(), "ocr backend"));
        }
        Ok(response)
    }
}

#[derive(Deserialize)]
struct PdfExtractWire {
    text: String,
    page_count: u32,
}

#[derive(Deserialize)]
struct ImageExtractWire {
    text: String,
    confidence: f32,
}

#[async_trait]
impl Ocr for HttpOcr {
    async fn extract_pdf(&self, bytes: &[u8], max_pages: u32) -> Result<PdfExtract> {
        with_retry(&self.retry, || async {
            let response = self.post("/extract/pdf", bytes, &[("max_pages", max_pages.to_string())]).await?;
            let parsed: PdfExtractWire = response.json().await.map_err(|e| Error::Internal(format!("ocr response: {e}")))?;
            Ok(PdfExtract { text: parsed.text, page_count: parsed.page_count })
        })
        .await
    }

    async fn extract_image(&self, bytes: &[u8], lang: &str) -> Result<ImageExtract> {
        with_retry(&self.retry, || async {
            let response = self.post("/extract/image", bytes, &[("lang", lang.to_string())]).await?;
            let parsed: ImageExtractWire = response.json().await.map_err(|e| Error::Internal(format!("ocr response: {e}")))?;
            Ok(ImageExtract { text: parsed.text, confidence: parsed.confidence })
        })
        .await
    }

    fn name(&self) -> &str {
        "http-ocr"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn retry_gives_up_on_non_retryable_error() {
        let config = RetryConfig { max_attempts: 3, base_backoff: Duration::from_millis(1), max_backoff: Duration::from_millis(5) };
        let calls = AtomicUsize::new(0);
        let result: Result<()> = with_retry(&config, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(Error::InvalidInput("bad".into())) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_succeeds_after_transient_failures() {
        let config = RetryConfig { max_attempts: 3, base_backoff: Duration::from_millis(1), max_backoff: Duration::from_millis(5) };
        let calls = AtomicUsize::new(0);
        let result = with_retry(&config, || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(Error::ProviderUnavailable("down".into()))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
    }
}
