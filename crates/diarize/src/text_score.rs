//! Text-pattern score per segment: a closed lexicon of
//! Spanish clinical dialogue patterns and keywords.

use once_cell::sync::Lazy;
use regex::Regex;

/// Phrasings that, in Spanish clinical interviews, are characteristically
/// asked by the interviewer rather than the interviewee.
static PROMOTOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"\bcomo se (siente|encuentra)\b",
            r"\bdesde cuando\b",
            r"\bme puede (contar|decir|explicar)\b",
            r"\bcuentame (mas|sobre)\b",
            r"\bha (tomado|estado tomando)\b",
            r"\ble (receto|recomiendo|indico)\b",
            r"\bvamos a (revisar|ver)\b",
            r"\btiene alguna pregunta\b",
            ]
            .iter()
            .map(|p| Regex::new(p).expect("static promotor pattern compiles"))
            .collect()
});

/// Phrasings characteristic of the interviewee describing their own state.
static PATIENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"\bme duele\b",
            r"\bme siento\b",
            r"\bno puedo\b",
            r"\bmi dolor\b",
            r"\bno he podido\b",
            r"\bhace dias que\b",
            r"\bestoy (preocupad[oa]|asustad[oa])\b",
            r"\btengo miedo\b",
            ]
            .iter()
            .map(|p| Regex::new(p).expect("static patient pattern compiles"))
            .collect()
});

const MEDICAL_PROFESSIONAL_KEYWORDS: &[&str] =
&["diagnostico", "tratamiento", "receta", "dosis", "sintomas asociados", "historial clinico", "exploracion"];

const PERSONAL_KEYWORDS: &[&str] = &["mi familia", "en casa", "mi trabajo", "me preocupa", "mi esposo", "mi esposa", "mis hijos"];

/// Score a segment's text in `[-1, +1]`: pattern hits
/// count double keyword hits, promotor evidence is positive, patient
/// evidence is negative, and the raw sum is normalized by the total
/// number of hits so longer segments don't dominate merely by length.
pub fn text_score(normalized_text: &str) -> f32 {
    let promotor_pattern_hits = PROMOTOR_PATTERNS.iter().filter(|p| p.is_match(normalized_text)).count() as f32;
    let patient_pattern_hits = PATIENT_PATTERNS.iter().filter(|p| p.is_match(normalized_text)).count() as f32;
    let medical_keyword_hits = MEDICAL_PROFESSIONAL_KEYWORDS.iter().filter(|k| normalized_text.contains(*k)).count() as f32;
    let personal_keyword_hits = PERSONAL_KEYWORDS.iter().filter(|k| normalized_text.contains(*k)).count() as f32;

    let positive = promotor_pattern_hits + 0.5 * medical_keyword_hits;
    let negative = patient_pattern_hits + 0.5 * personal_keyword_hits;
    let total_hits = promotor_pattern_hits + patient_pattern_hits + medical_keyword_hits + personal_keyword_hits;

    if total_hits == 0.0 {
        return 0.0;
    }
    ((positive - negative) / total_hits).clamp(-1.0, 1.0)
}

/// Whether the text contains at least one unambiguous pattern hit
/// (either role), used for the confidence bonus.
pub fn has_unambiguous_pattern(normalized_text: &str) -> bool {
    PROMOTOR_PATTERNS.iter().any(|p| p.is_match(normalized_text)) || PATIENT_PATTERNS.iter().any(|p| p.is_match(normalized_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotor_phrasing_scores_positive() {
        let score = text_score("como se siente hoy, me puede contar mas sobre el dolor");
        assert!(score > 0.0);
    }

    #[test]
    fn patient_phrasing_scores_negative() {
        let score = text_score("me duele mucho la cabeza, no puedo dormir bien");
        assert!(score < 0.0);
    }

    #[test]
    fn neutral_text_scores_zero() {
        let score = text_score("buenos dias a todos");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn unambiguous_pattern_is_detected() {
        assert!(has_unambiguous_pattern("me duele la espalda"));
        assert!(!has_unambiguous_pattern("buenos dias"));
    }
}
