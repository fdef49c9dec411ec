//! Query analyzer (C7): turns a raw natural-language query into a
//! [`clinrag_core::QueryPlan`] — normalized text, detected intent,
//! extracted entities, and the search-term set fed to the retriever.

mod entities;
mod intent;
mod lexicon;
mod normalize;

pub use entities::extract_entities;
pub use intent::detect_intent;
pub use normalize::normalize;

use std::collections::BTreeSet;

use clinrag_core::QueryPlan;
use lexicon::STOPWORDS;

/// Analyze a raw query end to end.
pub fn analyze(raw_query: &str) -> QueryPlan {
    let normalized = normalize::normalize(raw_query);
    let intent = intent::detect_intent(&normalized);
    let entities = entities::extract_entities(raw_query, &normalized);
    let search_terms = build_search_terms(&normalized, &entities);

    QueryPlan { raw_query: raw_query.to_string(), normalized, intent, entities, filters: Vec::new(), search_terms }
}

/// Search terms: entities ∪ residual non-stopword tokens.
fn build_search_terms(normalized: &str, entities: &clinrag_core::Entities) -> Vec<String> {
    let mut terms: BTreeSet<String> = BTreeSet::new();
    for value in entities.patients.iter().chain(&entities.conditions).chain(&entities.symptoms).chain(&entities.medications).chain(&entities.dates) {
        terms.insert(value.to_lowercase());
    }
    for token in normalized.split_whitespace() {
        let cleaned = token.trim_matches(|c: char| !c.is_alphanumeric());
        if cleaned.len() > 2 && !STOPWORDS.contains(&cleaned) {
            terms.insert(cleaned.to_string());
        }
    }
    terms.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinrag_core::Intent;

    #[test]
    fn analyzes_patient_info_query() {
        let plan = analyze("¿Qué enfermedad tiene Pepito Gómez?");
        assert_eq!(plan.intent, Intent::PatientInfo);
        assert_eq!(plan.entities.patients, vec!["Pepito Gómez".to_string()]);
        assert!(plan.search_terms.contains(&"pepito gómez".to_string()));
    }

    #[test]
    fn analyzes_condition_list_query() {
        let plan = analyze("Listame los pacientes con diabetes");
        assert_eq!(plan.intent, Intent::ConditionList);
        assert!(plan.entities.conditions.contains(&"diabetes".to_string()));
    }
}
