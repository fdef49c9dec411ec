//! Automatic speech recognition capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Caller-supplied hints for a transcription call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscribeHints {
    pub language: Option<String>,
}

/// One word/phrase-level segment inside a transcript, as reported by the
/// ASR provider (distinct from [`crate::speaker::SpeakerSegment`], which
/// is produced later by diarization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsrSegment {
    pub t_start: f32,
    pub t_end: f32,
    pub text: String,
}

/// Result of a transcription call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeResult {
    pub text: String,
    pub language: String,
    pub duration_s: f32,
    pub confidence: f32,
    pub segments: Vec<AsrSegment>,
}

/// Speech-to-text provider capability.
///
/// Implementations:
/// - a hosted ASR HTTP provider (production)
/// - `NullAsr` / test doubles (offline, deterministic)
///
/// # Example
///
/// ```ignore
/// let asr: Box<dyn Asr> = Box::new(HttpAsr::new(config));
/// let result = asr.transcribe(&bytes, TranscribeHints::default()).await?;
/// println!("{}", result.text);
/// ```
#[async_trait]
pub trait Asr: Send + Sync + 'static {
    /// Transcribe raw audio bytes.
    ///
    /// # Errors
    /// `ProviderUnavailable`, `InvalidMedia`, or `Timeout`.
    async fn transcribe(&self, audio_bytes: &[u8], hints: TranscribeHints) -> Result<TranscribeResult>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}

/// Maps a provider-reported status into the capability's error kind.
/// Adapters share this so retry classification stays uniform
/// across provider implementations.
pub fn classify_transport_error(timed_out: bool, status_unavailable: bool, detail: impl Into<String>) -> Error {
    let detail = detail.into();
    if timed_out {
        Error::Timeout(detail)
    } else if status_unavailable {
        Error::ProviderUnavailable(detail)
    } else {
        Error::Internal(detail)
    }
}
