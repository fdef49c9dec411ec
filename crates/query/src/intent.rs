//! Intent detection: an ordered regex ruleset over the normalized
//! query. The first matching rule wins; no match falls back to
//! `GeneralQuery`.

use once_cell::sync::Lazy;
use regex::Regex;

use clinrag_core::Intent;

struct Rule {
    intent: Intent,
    pattern: Regex,
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
        [
            (Intent::ConditionList, r"\b(listame|enumer[ae]|cuantos pacientes|lista de pacientes)\b.*\b(con|que tienen|diagnosticados)\b"),
            (Intent::MedicationInfo, r"\b(que medicament|medicacion|que (toma|esta tomando)|dosis)\b"),
            (Intent::SymptomSearch, r"\b(quien tiene|sintomas de|presenta(n)? sintomas|se queja de)\b"),
            (Intent::PatientInfo, r"\b(que enfermedad tiene|informacion de|historial de|diagnostico de|como esta)\b"),
            (Intent::TemporalQuery, r"\b(ayer|hoy|semana pasada|mes pasado|ultima semana|ultimo mes|desde cuando)\b"),
            ]
            .iter()
            .map(|(intent, pattern)| Rule { intent: *intent, pattern: Regex::new(pattern).expect("static intent pattern compiles") })
            .collect()
});

/// Detect the intent of a normalized query. Falls back to
/// `Intent::GeneralQuery` when no rule matches and the query is
/// non-empty, or `Intent::Unknown` for an empty query.
pub fn detect_intent(normalized: &str) -> Intent {
    if normalized.trim().is_empty() {
        return Intent::Unknown;
    }
    RULES.iter().find(|rule| rule.pattern.is_match(normalized)).map(|rule| rule.intent).unwrap_or(Intent::GeneralQuery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn detects_patient_info() {
        let intent = detect_intent(&normalize("¿Qué enfermedad tiene Pepito Gómez?"));
        assert_eq!(intent, Intent::PatientInfo);
    }

    #[test]
    fn detects_condition_list() {
        let intent = detect_intent(&normalize("Listame los pacientes con diabetes"));
        assert_eq!(intent, Intent::ConditionList);
    }

    #[test]
    fn falls_back_to_general_query() {
        let intent = detect_intent(&normalize("buenas tardes"));
        assert_eq!(intent, Intent::GeneralQuery);
    }

    #[test]
    fn empty_query_is_unknown() {
        assert_eq!(detect_intent(&normalize(" ")), Intent::Unknown);
    }
}
