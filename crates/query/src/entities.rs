//! Entity extraction over a normalized query: closed medical
//! lexicon lookups plus temporal phrase and ISO-date patterns.

use once_cell::sync::Lazy;
use regex::Regex;

use clinrag_core::Entities;

use crate::lexicon::{contains_token, CONDITIONS, MEDICATIONS, SYMPTOMS};

static PATIENT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-ZÁÉÍÓÚÑ][a-záéíóúñ]+(?:\s+[A-ZÁÉÍÓÚÑ][a-záéíóúñ]+)+)\b").expect("static patient name pattern compiles"));

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("static iso date pattern compiles"));

const TEMPORAL_PHRASES: &[&str] = &["ayer", "hoy", "semana pasada", "mes pasado", "ultima semana", "ultimo mes"];

/// Extract entities from `raw_query` (for capitalized patient names,
/// which normalization would destroy) and `normalized` (for lexicon and
/// temporal matches).
pub fn extract_entities(raw_query: &str, normalized: &str) -> Entities {
    let mut entities = Entities::default();

    entities.patients = PATIENT_NAME.find_iter(raw_query).map(|m| m.as_str().to_string()).collect();
    entities.conditions = CONDITIONS.iter().filter(|c| contains_token(normalized, c)).map(|s| s.to_string()).collect();
    entities.symptoms = SYMPTOMS.iter().filter(|s| contains_token(normalized, s)).map(|s| s.to_string()).collect();
    entities.medications = MEDICATIONS.iter().filter(|m| contains_token(normalized, m)).map(|s| s.to_string()).collect();

    entities.dates = ISO_DATE.find_iter(normalized).map(|m| m.as_str().to_string()).collect();
    for phrase in TEMPORAL_PHRASES {
        if normalized.contains(phrase) {
            entities.dates.push(phrase.to_string());
        }
    }

    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn extracts_patient_name_from_raw_query() {
        let raw = "¿Qué enfermedad tiene Pepito Gómez?";
        let entities = extract_entities(raw, &normalize(raw));
        assert_eq!(entities.patients, vec!["Pepito Gómez".to_string()]);
    }

    #[test]
    fn extracts_condition_and_temporal_phrase() {
        let raw = "pacientes con diabetes vistos ayer";
        let entities = extract_entities(raw, &normalize(raw));
        assert_eq!(entities.conditions, vec!["diabetes".to_string()]);
        assert!(entities.dates.contains(&"ayer".to_string()));
    }

    #[test]
    fn extracts_iso_date() {
        let raw = "consultas del 2026-01-15";
        let entities = extract_entities(raw, &normalize(raw));
        assert!(entities.dates.contains(&"2026-01-15".to_string()));
    }
}
