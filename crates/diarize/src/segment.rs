//! Role decision and short-segment merging.

use clinrag_config::DiarizationConfig;
use clinrag_core::{SpeakerRole, SpeakerSegment};

/// The two possible audio-cluster-to-role mappings: either
/// cluster 0 maps to Promotor, or cluster 1 does.
#[derive(Debug, Clone, Copy)]
pub struct ClusterMapping {
    pub cluster_zero_is_promotor: bool,
}

/// Resolve the mapping that maximizes agreement between the cluster
/// assignment and the per-segment text score's sign, across the whole
/// recording.
pub fn resolve_cluster_mapping(cluster_labels: &[usize], text_scores: &[f32]) -> ClusterMapping {
    let mut agree_zero_is_promotor = 0i32;
    let mut agree_one_is_promotor = 0i32;
    for (&label, &score) in cluster_labels.iter().zip(text_scores.iter()) {
        if score == 0.0 {
            continue;
        }
        let text_says_promotor = score > 0.0;
        let zero_is_promotor_agrees = (label == 0) == text_says_promotor;
        if zero_is_promotor_agrees {
            agree_zero_is_promotor += 1;
        } else {
            agree_one_is_promotor += 1;
        }
    }
    ClusterMapping { cluster_zero_is_promotor: agree_zero_is_promotor >= agree_one_is_promotor }
}

fn audio_score(cluster_label: usize, mapping: ClusterMapping) -> f32 {
    let is_promotor = (cluster_label == 0) == mapping.cluster_zero_is_promotor;
    if is_promotor {
        1.0
    } else {
        -1.0
    }
}

/// Combined score and resulting role/confidence for one segment.
pub fn decide_role(
    text_score: f32,
    audio_label: Option<usize>,
    mapping: Option<ClusterMapping>,
    has_unambiguous: bool,
    config: &DiarizationConfig,
) -> (SpeakerRole, f32) {
    let combined = match (audio_label, mapping) {
        (Some(label), Some(mapping)) => config.audio_weight * audio_score(label, mapping) + config.text_weight * text_score,
        _ => text_score,
    };

    let role = if combined > config.promotor_threshold {
        SpeakerRole::Promotor
    } else if combined < config.patient_threshold {
        SpeakerRole::Patient
    } else {
        SpeakerRole::Unknown
    };

    let bonus = if has_unambiguous { config.unambiguous_bonus } else { 0.0 };
    let mut confidence = (combined.abs() + bonus).min(1.0);
    if audio_label.is_none() {
        confidence = confidence.min(config.text_only_confidence_cap);
    }
    (role, confidence)
}

/// Merge segments shorter than `min_segment_s` into a neighboring
/// same-role segment. Prefers merging into the previous
/// segment; falls back to the next if there is no previous segment.
pub fn merge_short_segments(mut segments: Vec<SpeakerSegment>, min_segment_s: f32) -> Vec<SpeakerSegment> {
    if segments.len() < 2 {
        return segments;
    }

    let mut merged: Vec<SpeakerSegment> = Vec::with_capacity(segments.len());
    for seg in segments.drain(..) {
        let should_merge_into_previous =
        seg.duration() < min_segment_s && merged.last().map(|prev| prev.speaker == seg.speaker).unwrap_or(false);

        if should_merge_into_previous {
            let prev = merged.last_mut().unwrap();
            prev.text.push(' ');
            prev.text.push_str(&seg.text);
            prev.t_end = seg.t_end;
            prev.word_count += seg.word_count;
            prev.confidence = (prev.confidence + seg.confidence) / 2.0;
        } else {
            merged.push(seg);
        }
    }

    // A short segment that couldn't merge backward (first in the list)
    // merges forward into its only same-role neighbor, if any.
    if let Some(first) = merged.first() {
        if first.duration() < min_segment_s && merged.len() > 1 && merged[1].speaker == first.speaker {
            let short = merged.remove(0);
            let next = &mut merged[0];
            let mut text = short.text;
            text.push(' ');
            text.push_str(&next.text);
            next.text = text;
            next.t_start = short.t_start;
            next.word_count += short.word_count;
            next.confidence = (next.confidence + short.confidence) / 2.0;
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decide_role_promotor_above_threshold() {
        let config = DiarizationConfig::default();
        let (role, _) = decide_role(0.9, None, None, true, &config);
        assert_eq!(role, SpeakerRole::Promotor);
    }

    #[test]
    fn decide_role_patient_below_threshold() {
        let config = DiarizationConfig::default();
        let (role, _) = decide_role(-0.9, None, None, false, &config);
        assert_eq!(role, SpeakerRole::Patient);
    }

    #[test]
    fn decide_role_unknown_in_dead_zone() {
        let config = DiarizationConfig::default();
        let (role, _) = decide_role(0.0, None, None, false, &config);
        assert_eq!(role, SpeakerRole::Unknown);
    }

    #[test]
    fn text_only_confidence_is_capped() {
        let config = DiarizationConfig::default();
        let (_, confidence) = decide_role(1.0, None, None, true, &config);
        assert!(confidence <= config.text_only_confidence_cap);
    }

    #[test]
    fn short_segment_merges_into_previous_same_role() {
        let segments = vec![
            SpeakerSegment::new(SpeakerRole::Promotor, "hola buenas tardes como esta", 0.0, 3.0, 0.9),
            SpeakerSegment::new(SpeakerRole::Promotor, "bien", 3.0, 3.5, 0.8),
        ];
        let merged = merge_short_segments(segments, 1.0);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].text.contains("bien"));
    }

    #[test]
    fn short_segment_does_not_merge_across_roles() {
        let segments = vec![
            SpeakerSegment::new(SpeakerRole::Promotor, "hola buenas tardes", 0.0, 3.0, 0.9),
            SpeakerSegment::new(SpeakerRole::Patient, "ok", 3.0, 3.5, 0.8),
        ];
        let merged = merge_short_segments(segments, 1.0);
        assert_eq!(merged.len(), 2);
    }
}
