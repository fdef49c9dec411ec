//! Diarization tunables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationConfig {
    /// Weight of the audio-feature score in the combined score.
    pub audio_weight: f32,
    /// Weight of the text-pattern score in the combined score.
    pub text_weight: f32,
    /// `combined` above this decides Promotor.
    pub promotor_threshold: f32,
    /// `combined` below this (magnitude) decides Patient.
    pub patient_threshold: f32,
    /// Confidence bonus when an unambiguous pattern is present.
    pub unambiguous_bonus: f32,
    /// Confidence cap applied when no audio is available.
    pub text_only_confidence_cap: f32,
    /// Segments shorter than this are merged into a neighboring
    /// same-role segment.
    pub min_segment_s: f32,
    /// k for k-means clustering over audio features; fixed at 2 by the
    /// two-hypothesis design and not meant to be tuned, but kept
    /// configurable for tests.
    pub k_clusters: usize,
}

impl Default for DiarizationConfig {
    fn default() -> Self {
        Self {
            audio_weight: 0.3,
            text_weight: 0.7,
            promotor_threshold: 0.2,
            patient_threshold: -0.2,
            unambiguous_bonus: 0.2,
            text_only_confidence_cap: 0.8,
            min_segment_s: 1.0,
            k_clusters: 2,
        }
    }
}
