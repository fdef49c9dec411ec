//! Speaker diarization result types.

use serde::{Deserialize, Serialize};

/// A diarization hypothesis for a segment's speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerRole {
    /// Health promoter / interviewer role in the conversation.
    Promotor,
    Patient,
    Unknown,
    /// More than one speaker detected within a single segment window.
    Multiple,
}

/// One contiguous span of speech attributed to a single role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerSegment {
    pub speaker: SpeakerRole,
    pub text: String,
    pub t_start: f32,
    pub t_end: f32,
    pub confidence: f32,
    pub word_count: u32,
}

impl SpeakerSegment {
    pub fn new(speaker: SpeakerRole, text: impl Into<String>, t_start: f32, t_end: f32, confidence: f32) -> Self {
        let text = text.into();
        let word_count = text.split_whitespace().count() as u32;
        Self {
            speaker,
            text,
            t_start,
            t_end,
            confidence: confidence.clamp(0.0, 1.0),
            word_count,
        }
    }

    pub fn duration(&self) -> f32 {
        self.t_end - self.t_start
    }
}

/// Aggregate per-recording speaker statistics, derived from a segment list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerStats {
    pub promotor_time_s: f32,
    pub patient_time_s: f32,
    pub unknown_time_s: f32,
    /// Number of times the active speaker changed across the timeline.
    pub speaker_changes: u32,
    pub average_segment_s: f32,
}

impl SpeakerStats {
    /// Compute stats from an ordered, non-overlapping segment list.
    pub fn from_segments(segments: &[SpeakerSegment]) -> Self {
        if segments.is_empty() {
            return Self::default();
        }

        let mut stats = Self::default();
        let mut total_duration = 0.0f32;
        let mut last_speaker: Option<SpeakerRole> = None;

        for seg in segments {
            let dur = seg.duration();
            total_duration += dur;
            match seg.speaker {
                SpeakerRole::Promotor => stats.promotor_time_s += dur,
                SpeakerRole::Patient => stats.patient_time_s += dur,
                SpeakerRole::Unknown | SpeakerRole::Multiple => stats.unknown_time_s += dur,
            }
            if let Some(prev) = last_speaker {
                if prev != seg.speaker {
                    stats.speaker_changes += 1;
                }
            }
            last_speaker = Some(seg.speaker);
        }

        stats.average_segment_s = total_duration / segments.len() as f32;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_from_text() {
        let seg = SpeakerSegment::new(SpeakerRole::Patient, "dolor de cabeza", 0.0, 2.0, 0.9);
        assert_eq!(seg.word_count, 3);
    }

    #[test]
    fn stats_sum_within_total() {
        let segs = vec![
            SpeakerSegment::new(SpeakerRole::Promotor, "hola buenas", 0.0, 2.0, 0.9),
            SpeakerSegment::new(SpeakerRole::Patient, "me duele la cabeza", 2.0, 5.0, 0.8),
        ];
        let stats = SpeakerStats::from_segments(&segs);
        assert_eq!(stats.speaker_changes, 1);
        assert!((stats.promotor_time_s + stats.patient_time_s - 5.0).abs() < 1e-4);
    }
}
