//! Strategy dispatch: picks the retrieval path from the query's
//! intent, then hands raw similarity results to the ranker.

use std::collections::HashSet;

use clinrag_config::RetrievalConfig;
use clinrag_core::{Embedder, QueryPlan, RagContext, Result, ScoredEntry, SearchStrategy};
use clinrag_vector::VectorIndex;

use crate::ranker::rank;

/// Over-fetch factor for `ConditionList` before the per-patient cap is
/// applied, since several hits can belong to the same patient.
const CONDITION_OVERFETCH_FACTOR: usize = 4;

pub async fn retrieve(
    vector: &dyn VectorIndex,
    embedder: &dyn Embedder,
    plan: &QueryPlan,
    config: &RetrievalConfig,
) -> Result<RagContext> {
    use clinrag_core::Intent::*;

    let results = match (plan.intent, plan.entities.patients.first(), plan.entities.conditions.first()) {
        (PatientInfo, Some(patient), _) => {
            vector.search_by_field("patient_name", patient, SearchStrategy::Fuzzy, config.default_max_results).await?
        }
        (ConditionList, _, Some(condition)) => {
            let query_vector = embedder.embed(&format!("diagnóstico {condition} enfermedad")).await?;
            let k = config.default_max_results * CONDITION_OVERFETCH_FACTOR;
            let raw = vector.search(&query_vector, k, &[], 0.0).await?;
            let filtered = raw.into_iter().filter(|r| mentions_condition(r, condition)).collect::<Vec<_>>();
            cap_per_patient(filtered, config.default_max_results)
        }
        _ => {
            let query_vector = embedder.embed(&plan.raw_query).await?;
            vector.search(&query_vector, config.default_max_results, &plan.filters, config.default_min_score).await?
        }
    };

    Ok(RagContext { items: rank(results, &plan.entities, &config.ranker) })
}

fn mentions_condition(result: &ScoredEntry, condition: &str) -> bool {
    let condition = condition.to_lowercase();
    let metadata = &result.entry.metadata;
    metadata.diagnosis.as_deref().is_some_and(|d| d.to_lowercase().contains(&condition))
    || metadata.conditions.iter().any(|c| c.to_lowercase().contains(&condition))
    || metadata.symptoms.iter().any(|s| s.to_lowercase().contains(&condition))
    || result.entry.payload_text.to_lowercase().contains(&condition)
}

/// Keep at most one result per patient, preserving similarity order.
fn cap_per_patient(results: Vec<ScoredEntry>, max_patients: usize) -> Vec<ScoredEntry> {
    let mut seen_patients = HashSet::new();
    let mut capped = Vec::new();
    for result in results {
        let key = result.entry.metadata.patient_name.clone().unwrap_or_else(|| result.entry.source_id.clone());
        if seen_patients.insert(key) {
            capped.push(result);
            if capped.len() >= max_patients {
                break;
            }
        }
    }
    capped
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinrag_core::{SourceKind, VectorEntry, VectorMetadata};

    fn entry(id: &str, patient: &str) -> ScoredEntry {
        ScoredEntry {
            entry: VectorEntry {
                vector_id: format!("v-{id}"),
                source_kind: SourceKind::Recording,
                source_id: id.to_string(),
                embedding: vec![0.0; 4],
                payload_text: "diagnostico diabetes".into(),
                metadata: VectorMetadata { patient_name: Some(patient.to_string()), diagnosis: Some("diabetes".into()),..Default::default() },
            },
            similarity: 0.8,
        }
    }

    #[test]
    fn caps_to_one_per_patient() {
        let results = vec![entry("a", "Ana"), entry("b", "Ana"), entry("c", "Beto")];
        let capped = cap_per_patient(results, 5);
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn mentions_condition_checks_diagnosis_and_payload() {
        let result = entry("a", "Ana");
        assert!(mentions_condition(&result, "diabetes"));
        assert!(!mentions_condition(&result, "asma"));
    }
}
