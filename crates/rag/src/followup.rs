//! Follow-up suggestions: an intent-specific templated set,
//! capped at 3, parameterized with observed entities.

use clinrag_core::{Entities, Intent};

const MAX_SUGGESTIONS: usize = 3;

pub fn suggest(intent: Intent, entities: &Entities) -> Vec<String> {
    let mut suggestions = match intent {
        Intent::PatientInfo => entities
            .patients
            .first()
            .map(|patient| {
                vec![
                    format!("¿Qué medicación tiene prescrita {patient}?"),
                    format!("¿Cuál fue la última visita de {patient}?"),
                    format!("¿Qué síntomas reportó {patient}?"),
                ]
            })
            .unwrap_or_default(),
        Intent::ConditionList => entities
            .conditions
            .first()
            .map(|condition| {
                vec![
                    format!("¿Qué medicación se usa para tratar {condition}?"),
                    format!("¿Qué síntomas están asociados a {condition}?"),
                ]
            })
            .unwrap_or_default(),
        Intent::SymptomSearch => entities
            .symptoms
            .first()
            .map(|symptom| vec![format!("¿Qué pacientes reportaron {symptom}?"), format!("¿Qué diagnóstico se asoció a {symptom}?")])
            .unwrap_or_default(),
        Intent::MedicationInfo => entities
            .medications
            .first()
            .map(|medication| vec![format!("¿A qué pacientes se les recetó {medication}?")])
            .unwrap_or_default(),
        Intent::TemporalQuery => vec!["¿Qué ocurrió en la visita más reciente?".to_string()],
        Intent::GeneralQuery | Intent::Unknown => vec![
            "¿Quieres buscar por nombre de paciente?".to_string(),
            "¿Quieres buscar por condición médica?".to_string(),
        ],
    };

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patient_info_suggestions_mention_the_patient() {
        let entities = Entities { patients: vec!["Pepito Gómez".into()],..Default::default() };
        let suggestions = suggest(Intent::PatientInfo, &entities);
        assert!(suggestions.iter().all(|s| s.contains("Pepito Gómez")));
        assert!(suggestions.len() <= 3);
    }

    #[test]
    fn missing_entity_yields_no_suggestions() {
        let suggestions = suggest(Intent::ConditionList, &Entities::default());
        assert!(suggestions.is_empty());
    }

    #[test]
    fn unknown_intent_offers_generic_prompts() {
        let suggestions = suggest(Intent::Unknown, &Entities::default());
        assert_eq!(suggestions.len(), 2);
    }
}
