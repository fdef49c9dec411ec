//! Confidence scoring: a weighted blend of retrieval similarity,
//! entity coverage, and source count, clamped to `[0.1, 0.95]`.

use clinrag_core::{Entities, RagContext};

const MIN_CONFIDENCE: f32 = 0.1;
const MAX_CONFIDENCE: f32 = 0.95;
const SOURCE_SATURATION: f32 = 3.0;

/// Fraction of observed query entities that appear in at least one
/// retrieved item's metadata or excerpt.
fn entity_hit_ratio(context: &RagContext, entities: &Entities) -> f32 {
    let all_tokens: Vec<&String> = entities
        .patients
        .iter()
        .chain(&entities.conditions)
        .chain(&entities.symptoms)
        .chain(&entities.medications)
        .collect();
    if all_tokens.is_empty() {
        return 0.0;
    }

    let hits = all_tokens
        .iter()
        .filter(|token| {
            let token = token.to_lowercase();
            context.items.iter().any(|item| item.excerpt.to_lowercase().contains(&token))
        })
        .count();
    hits as f32 / all_tokens.len() as f32
}

/// `incomplete` flags runs where the model returned an empty answer
/// that was replaced by the fallback message.
pub fn score(context: &RagContext, entities: &Entities, incomplete: bool) -> f32 {
    let mean_similarity = context.mean_similarity();
    let hit_ratio = entity_hit_ratio(context, entities);
    let source_term = (context.source_count() as f32 / SOURCE_SATURATION).min(1.0);
    let incompleteness_penalty = if incomplete { 0.05 } else { 0.0 };

    let raw = 0.60 * mean_similarity + 0.20 * hit_ratio + 0.15 * source_term - incompleteness_penalty;
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinrag_core::{RankedContext, SourceKind, VectorEntry, VectorMetadata};

    fn item(similarity: f32, excerpt: &str) -> RankedContext {
        RankedContext {
            entry: VectorEntry {
                vector_id: "v".into(),
                source_kind: SourceKind::Recording,
                source_id: "r".into(),
                embedding: vec![0.0; 4],
                payload_text: excerpt.to_string(),
                metadata: VectorMetadata::default(),
            },
            similarity,
            bonuses: 0.0,
            final_score: similarity,
            excerpt: excerpt.to_string(),
        }
    }

    #[test]
    fn empty_context_hits_floor() {
        let ctx = RagContext::default();
        let score = score(&ctx, &Entities::default(), false);
        assert_eq!(score, MIN_CONFIDENCE);
    }

    #[test]
    fn incomplete_flag_reduces_score() {
        let ctx = RagContext { items: vec![item(0.9, "fiebre")] };
        let entities = Entities { symptoms: vec!["fiebre".into()],..Default::default() };
        let with_flag = score(&ctx, &entities, true);
        let without_flag = score(&ctx, &entities, false);
        assert!(with_flag < without_flag);
    }

    #[test]
    fn high_similarity_and_entity_hits_score_above_mid() {
        let ctx = RagContext { items: vec![item(0.95, "fiebre"), item(0.9, "fiebre"), item(0.85, "fiebre")] };
        let entities = Entities { symptoms: vec!["fiebre".into()],..Default::default() };
        let score = score(&ctx, &entities, false);
        assert!(score > 0.7);
    }
}
