//! Diarization entry point: wires feature extraction, clustering,
//! text scoring and role decision into one pass over a transcript.

use clinrag_config::DiarizationConfig;
use clinrag_core::{AsrSegment, SpeakerRole, SpeakerSegment, SpeakerStats};
use unicode_normalization::UnicodeNormalization;

use crate::features::{cluster_two, extract_features};
use crate::segment::{decide_role, merge_short_segments, resolve_cluster_mapping};
use crate::text_score::{has_unambiguous_pattern, text_score};

/// One audio channel, paired with the ASR segment timing it belongs to.
pub struct AudioSegment<'a> {
    pub samples: &'a [f32],
    pub sample_rate: u32,
}

/// Result of a diarization run over one recording. Diarization failure
/// is non-fatal to the enclosing recording; callers that catch an
/// error here should still complete the recording without segments.
pub struct DiarizationOutput {
    pub segments: Vec<SpeakerSegment>,
    pub stats: SpeakerStats,
}

fn normalize(text: &str) -> String {
    let decomposed: String = text.nfd().filter(|c| !matches!(*c as u32, 0x0300..=0x036F)).collect();
    decomposed.to_lowercase()
}

/// Diarize a transcript. `asr_segments` provides per-segment text and
/// timing; `audio` optionally provides the raw samples for each segment
/// in the same order, enabling the audio-feature score.
/// With no ASR segments, the whole transcript is treated as a single
/// segment of `Unknown` role text-scored as a whole.
pub fn diarize(transcript_text: &str, asr_segments: &[AsrSegment], audio: Option<&[AudioSegment]>, config: &DiarizationConfig) -> DiarizationOutput {
    if asr_segments.is_empty() {
        return single_segment_fallback(transcript_text);
    }

    let normalized_texts: Vec<String> = asr_segments.iter().map(|s| normalize(&s.text)).collect();
    let text_scores: Vec<f32> = normalized_texts.iter().map(|t| text_score(t)).collect();
    let unambiguous: Vec<bool> = normalized_texts.iter().map(|t| has_unambiguous_pattern(t)).collect();

    let (cluster_labels, mapping) = match audio {
        Some(audio_segments) if audio_segments.len() == asr_segments.len() => {
            let features: Vec<_> = audio_segments.iter().map(|a| extract_features(a.samples, a.sample_rate)).collect();
            let labels = cluster_two(&features);
            let mapping = resolve_cluster_mapping(&labels, &text_scores);
            (Some(labels), Some(mapping))
        }
        _ => (None, None),
    };

    let mut segments = Vec::with_capacity(asr_segments.len());
    for (i, asr_seg) in asr_segments.iter().enumerate() {
        let audio_label = cluster_labels.as_ref().map(|labels| labels[i]);
        let (role, confidence) = decide_role(text_scores[i], audio_label, mapping, unambiguous[i], config);
        segments.push(SpeakerSegment::new(role, asr_seg.text.clone(), asr_seg.t_start, asr_seg.t_end, confidence));
    }

    let segments = merge_short_segments(segments, config.min_segment_s);
    let stats = SpeakerStats::from_segments(&segments);
    DiarizationOutput { segments, stats }
}

fn single_segment_fallback(transcript_text: &str) -> DiarizationOutput {
    if transcript_text.trim().is_empty() {
        return DiarizationOutput { segments: Vec::new(), stats: SpeakerStats::default() };
    }
    let segment = SpeakerSegment::new(SpeakerRole::Unknown, transcript_text, 0.0, 0.0, 0.0);
    let stats = SpeakerStats::from_segments(std::slice::from_ref(&segment));
    DiarizationOutput { segments: vec![segment], stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str, start: f32, end: f32) -> AsrSegment {
        AsrSegment { t_start: start, t_end: end, text: text.into() }
    }

    #[test]
    fn text_only_pipeline_assigns_roles() {
        let config = DiarizationConfig::default();
        let segments = vec![
            seg("como se siente hoy, me puede contar mas sobre el dolor", 0.0, 4.0),
            seg("me duele mucho la cabeza desde ayer", 4.0, 8.0),
        ];
        let output = diarize("irrelevant for this path", &segments, None, &config);
        assert_eq!(output.segments.len(), 2);
        assert_eq!(output.segments[0].speaker, SpeakerRole::Promotor);
        assert_eq!(output.segments[1].speaker, SpeakerRole::Patient);
        assert!(output.segments.iter().all(|s| s.confidence <= config.text_only_confidence_cap));
    }

    #[test]
    fn no_segments_falls_back_to_single_unknown_segment() {
        let config = DiarizationConfig::default();
        let output = diarize("hola, buenas tardes", &[], None, &config);
        assert_eq!(output.segments.len(), 1);
        assert_eq!(output.segments[0].speaker, SpeakerRole::Unknown);
    }

    #[test]
    fn empty_transcript_produces_no_segments() {
        let config = DiarizationConfig::default();
        let output = diarize("", &[], None, &config);
        assert!(output.segments.is_empty());
    }

    #[test]
    fn audio_features_are_used_when_segment_counts_match() {
        let config = DiarizationConfig::default();
        let segments = vec![seg("hola", 0.0, 1.0), seg("hola", 1.0, 2.0)];

        // Two tracks with clearly different pitch/energy profiles so the
        // audio path, not the (identical) text, drives the clustering.
        let low: Vec<f32> = (0..800).map(|i| (i as f32 * 0.02).sin() * 0.2).collect();
        let high: Vec<f32> = (0..800).map(|i| (i as f32 * 0.2).sin() * 0.8).collect();
        let audio = vec![
            AudioSegment { samples: &low, sample_rate: 8_000 },
            AudioSegment { samples: &high, sample_rate: 8_000 },
        ];

        let output = diarize("hola hola", &segments, Some(&audio), &config);
        assert_eq!(output.segments.len(), 2);
        // Identical text on both segments means the audio-feature clustering is
        // the only thing that can tell them apart.
        assert_ne!(output.segments[0].speaker, output.segments[1].speaker);
    }
}
