//! Shared retry-then-empty-map extraction driver.

use std::collections::HashMap;

use clinrag_core::{traits::LanguageModel, CompletionParams, FieldMap, GenerateRequest};
use serde_json::Value;
use tracing::warn;

use crate::json::{parse_json_object, truncate_sentence_boundary};
use crate::prompt::STRICT_JSON_REMINDER;

pub const MAX_INPUT_CHARS: usize = 4_000;

/// Run one extraction operation: truncate input, call the model, parse
/// strict JSON, retry once with a stricter reminder on parse failure,
/// and fall back to an empty map (recording a soft error) on the second
/// failure. `allowed_fields` restricts the output to the closed schema;
/// any other key returned by the model is dropped rather than surfaced.
pub async fn extract_fields(
    llm: &dyn LanguageModel,
    system_prompt: &str,
    user_message: impl Fn(&str) -> String,
    text: &str,
    allowed_fields: &[&str],
) -> (FieldMap, bool) {
    let truncated = truncate_sentence_boundary(text, MAX_INPUT_CHARS);

    let first = attempt(llm, system_prompt, &user_message(&truncated), allowed_fields).await;
    if let Some(map) = first {
        return (map, false);
    }

    let reminder_prompt = format!("{system_prompt}\n\n{STRICT_JSON_REMINDER}");
    let second = attempt(llm, &reminder_prompt, &user_message(&truncated), allowed_fields).await;
    match second {
        Some(map) => (map, false),
        None => {
            warn!("extraction: both attempts failed to produce parseable JSON, returning empty map");
            (FieldMap::new(), true)
        }
    }
}

async fn attempt(llm: &dyn LanguageModel, system_prompt: &str, user_message: &str, allowed_fields: &[&str]) -> Option<FieldMap> {
    let request = GenerateRequest::new(system_prompt)
        .with_user_message(user_message)
        .with_params(CompletionParams::default().with_temperature(0.0));
    let response = llm.complete(request).await.ok()?;
    let raw = parse_json_object(&response.text)?;
    Some(filter_allowed(raw, allowed_fields))
}

fn filter_allowed(raw: serde_json::Map<String, Value>, allowed_fields: &[&str]) -> FieldMap {
    let mut out = HashMap::new();
    for (key, value) in raw {
        if allowed_fields.contains(&key.as_str()) && !value.is_null() {
            out.insert(key, value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clinrag_core::{Error, GenerateResponse, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedLlm {
        responses: Vec<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LanguageModel for ScriptedLlm {
        async fn complete(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            let idx = self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(idx)
                .map(|s| GenerateResponse::text(*s))
                .ok_or_else(|| Error::Internal("no more scripted responses".into()))
        }
        async fn is_available(&self) -> bool {
            true
        }
        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn parses_on_first_attempt() {
        let llm = ScriptedLlm { responses: vec![r#"{"name": "Pepito", "age": 42}"#], calls: AtomicUsize::new(0) };
        let (fields, soft_failed) = extract_fields(&llm, "sys", |t| t.to_string(), "hola", &["name", "age"]).await;
        assert!(!soft_failed);
        assert_eq!(fields.get("name").unwrap().as_str(), Some("Pepito"));
    }

    #[tokio::test]
    async fn retries_once_then_succeeds() {
        let llm = ScriptedLlm {
            responses: vec!["esto no es json", r#"{"name": "Maria"}"#],
            calls: AtomicUsize::new(0),
        };
        let (fields, soft_failed) = extract_fields(&llm, "sys", |t| t.to_string(), "hola", &["name"]).await;
        assert!(!soft_failed);
        assert_eq!(fields.get("name").unwrap().as_str(), Some("Maria"));
    }

    #[tokio::test]
    async fn falls_back_to_empty_map_after_two_failures() {
        let llm = ScriptedLlm { responses: vec!["nope", "still nope"], calls: AtomicUsize::new(0) };
        let (fields, soft_failed) = extract_fields(&llm, "sys", |t| t.to_string(), "hola", &["name"]).await;
        assert!(soft_failed);
        assert!(fields.is_empty());
    }

    #[tokio::test]
    async fn drops_fields_outside_closed_schema() {
        let llm = ScriptedLlm { responses: vec![r#"{"name": "Pepito", "unexpected": "value"}"#], calls: AtomicUsize::new(0) };
        let (fields, _) = extract_fields(&llm, "sys", |t| t.to_string(), "hola", &["name"]).await;
        assert!(!fields.contains_key("unexpected"));
    }
}
