//! Strict-JSON parsing of LLM extraction output, with a single stricter
//! retry before falling back to an empty map.

use serde_json::{Map, Value};

/// Sentence boundary characters used by [`truncate_sentence_boundary`].
const SENTENCE_ENDERS: [char; 3] = ['.', '?', '!'];

/// Truncate `text` to at most `max_chars`, preferring to stop at the last
/// sentence boundary before the limit so extraction prompts never end
/// mid-sentence.
pub fn truncate_sentence_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(SENTENCE_ENDERS) {
        Some(idx) if idx > max_chars / 2 => truncated[..=idx].to_string(),
        _ => truncated,
    }
}

/// Parse a model response as a strict JSON object, tolerant of a
/// surrounding code fence (models often wrap JSON in ```json... ```
/// despite instructions not to).
pub fn parse_json_object(raw: &str) -> Option<Map<String, Value>> {
    let candidate = strip_code_fence(raw.trim());
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn strip_code_fence(s: &str) -> &str {
    let s = s.strip_prefix("```json").or_else(|| s.strip_prefix("```")).unwrap_or(s);
    s.strip_suffix("```").unwrap_or(s).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_object() {
        let map = parse_json_object(r#"{"name": "Pepito"}"#).unwrap();
        assert_eq!(map.get("name").unwrap().as_str(), Some("Pepito"));
    }

    #[test]
    fn strips_code_fence() {
        let map = parse_json_object("```json\n{\"name\": \"Pepito\"}\n```").unwrap();
        assert_eq!(map.get("name").unwrap().as_str(), Some("Pepito"));
    }

    #[test]
    fn rejects_non_object() {
        assert!(parse_json_object("[1, 2, 3]").is_none());
        assert!(parse_json_object("not json at all").is_none());
    }

    #[test]
    fn truncates_at_sentence_boundary() {
        let text = "Paciente refiere dolor. Sin antecedentes relevantes. Continua con tratamiento habitual.";
        let truncated = truncate_sentence_boundary(text, 40);
        assert!(truncated.ends_with('.'));
        assert!(truncated.chars().count() <= 40);
    }

    #[test]
    fn short_text_is_untouched() {
        let text = "corto";
        assert_eq!(truncate_sentence_boundary(text, 100), text);
    }
}
