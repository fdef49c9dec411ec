//! Language model capability.

use async_trait::async_trait;

use crate::error::Result;
use crate::llm_types::{GenerateRequest, GenerateResponse};

/// Language model provider capability.
///
/// Implementations:
/// - `OllamaBackend` - local Ollama inference
/// - a hosted chat-completions backend (production)
///
/// # Example
///
/// ```ignore
/// let llm: Box<dyn LanguageModel> = Box::new(OllamaBackend::new(config)?);
/// let request = GenerateRequest::new("You are a clinical assistant.")
///     .with_user_message("What medications were mentioned?");
/// let response = llm.complete(request).await?;
/// println!("{}", response.text);
/// ```
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Generate a completion. Callers retry `RateLimited` and transient
    /// `ProviderUnavailable` errors with exponential backoff; this
    /// method itself performs a single attempt.
    async fn complete(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Check whether the backend is reachable and its model loaded.
    async fn is_available(&self) -> bool;

    /// Model name for logging.
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockLlm;

    #[async_trait]
    impl LanguageModel for MockLlm {
        async fn complete(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse::text("mock response"))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "mock-llm"
        }
    }

    #[tokio::test]
    async fn mock_completes() {
        let llm = MockLlm;
        let req = GenerateRequest::new("system").with_user_message("hello");
        let resp = llm.complete(req).await.unwrap();
        assert_eq!(resp.text, "mock response");
    }
}
