//! Answer validation: trim, disclaim, and fall back on empty
//! output.

const MAX_ANSWER_CHARS: usize = 2_000;

const DISCLAIMER: &str =
"\n\n---\nEsta respuesta se genera a partir de registros almacenados y no sustituye el criterio de un profesional de la salud.";

const INSUFFICIENT_FALLBACK: &str = "Insufficient information in the stored records to answer.";

/// Trim to the character cap, append the disclaimer, and fall back to
/// the insufficient-information message if the trimmed answer is empty.
pub fn validate_answer(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return INSUFFICIENT_FALLBACK.to_string();
    }

    let capped: String = trimmed.chars().take(MAX_ANSWER_CHARS).collect();
    let capped = capped.trim();
    if capped.is_empty() {
        return INSUFFICIENT_FALLBACK.to_string();
    }

    format!("{capped}{DISCLAIMER}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_answer_falls_back() {
        assert_eq!(validate_answer(" "), INSUFFICIENT_FALLBACK);
    }

    #[test]
    fn answer_gets_disclaimer() {
        let answer = validate_answer("el paciente tiene diabetes");
        assert!(answer.starts_with("el paciente tiene diabetes"));
        assert!(answer.contains("no sustituye"));
    }

    #[test]
    fn long_answer_is_trimmed_before_disclaimer() {
        let long = "a".repeat(3_000);
        let answer = validate_answer(&long);
        let body_len = answer.len() - DISCLAIMER.len();
        assert_eq!(body_len, MAX_ANSWER_CHARS);
    }
}
