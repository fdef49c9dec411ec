//! Post-retrieval ranking: additive entity-hit and recency bonuses
//! on top of cosine similarity, clamped to `[0, 1]`.

use clinrag_config::RankerWeights;
use clinrag_core::{Entities, QueryPlan, RankedContext, ScoredEntry};

use crate::excerpt::build_excerpt;

/// Recency factor: 1.0 for today's entry, decaying linearly to 0 at
/// `recency_horizon_days`, floored at 0. The spec names the `recency`
/// weight but not the horizon; 90 days is the documented resolution.
const RECENCY_HORIZON_DAYS: f32 = 90.0;

fn recency_factor(date: Option<&str>) -> f32 {
    let Some(date) = date else { return 0.0 };
    let Ok(parsed) = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") else { return 0.0 };
    let today = chrono::Utc::now().date_naive();
    let age_days = (today - parsed).num_days().max(0) as f32;
    (1.0 - age_days / RECENCY_HORIZON_DAYS).clamp(0.0, 1.0)
}

fn entity_hit(value: Option<&str>, entities: &[String]) -> bool {
    match value {
        Some(v) => entities.iter().any(|e| v.to_lowercase().contains(&e.to_lowercase())),
        None => false,
    }
}

/// Score and sort one strategy's raw similarity results into ranked
/// contexts, applying the ranker formula and tie-breaking by date desc
/// then id.
pub fn rank(results: Vec<ScoredEntry>, entities: &Entities, weights: &RankerWeights) -> Vec<RankedContext> {
    let mut ranked: Vec<RankedContext> = results
        .into_iter()
        .map(|scored| {
            let metadata = &scored.entry.metadata;
            let patient_hit = entity_hit(metadata.patient_name.as_deref(), &entities.patients);
            let condition_hit = entity_hit(metadata.diagnosis.as_deref(), &entities.conditions)
            || metadata.conditions.iter().any(|c| entities.conditions.iter().any(|e| c.eq_ignore_ascii_case(e)));
            let symptom_hit = metadata.symptoms.iter().any(|s| entities.symptoms.iter().any(|e| s.eq_ignore_ascii_case(e)));

            let mut bonuses = 0.0;
            if patient_hit {
                bonuses += weights.patient_hit;
            }
            if condition_hit {
                bonuses += weights.condition_hit;
            }
            if symptom_hit {
                bonuses += weights.symptom_hit;
            }
            bonuses += weights.recency * recency_factor(metadata.date.as_deref());

            let final_score = (scored.similarity + bonuses).clamp(0.0, 1.0);
            let excerpt = build_excerpt(&scored.entry.payload_text, entities);

            RankedContext { similarity: scored.similarity, bonuses, final_score, excerpt, entry: scored.entry }
        })
        .collect();

    ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.entry.metadata.date.cmp(&a.entry.metadata.date))
                .then_with(|| a.entry.source_id.cmp(&b.entry.source_id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinrag_core::{SourceKind, VectorEntry, VectorMetadata};

    fn entry(id: &str, patient: &str, similarity: f32) -> ScoredEntry {
        ScoredEntry {
            entry: VectorEntry {
                vector_id: format!("v-{id}"),
                source_kind: SourceKind::Recording,
                source_id: id.to_string(),
                embedding: vec![0.0; 4],
                payload_text: format!("patient: {patient}"),
                metadata: VectorMetadata { patient_name: Some(patient.to_string()),..Default::default() },
            },
            similarity,
        }
    }

    #[test]
    fn patient_hit_adds_bonus_and_orders_first() {
        let weights = RankerWeights::default();
        let entities = Entities { patients: vec!["Pepito Gómez".into()],..Default::default() };
        let results = vec![entry("a", "Someone Else", 0.70), entry("b", "Pepito Gómez", 0.65)];
        let ranked = rank(results, &entities, &weights);
        assert_eq!(ranked[0].entry.source_id, "b");
        assert!(ranked[0].final_score > 0.65);
    }

    #[test]
    fn scores_are_clamped_to_one() {
        let weights = RankerWeights { patient_hit: 0.5, condition_hit: 0.5, symptom_hit: 0.5, recency: 0.5 };
        let entities = Entities { patients: vec!["Pepito Gómez".into()],..Default::default() };
        let results = vec![entry("a", "Pepito Gómez", 0.95)];
        let ranked = rank(results, &entities, &weights);
        assert_eq!(ranked[0].final_score, 1.0);
    }
}
