//! `ExtractStructured`: canonical medical identity/visit fields.

use clinrag_core::{traits::LanguageModel, domain::STRUCTURED_FIELDS, FieldMap};
use serde_json::Value;

use crate::extractor::extract_fields;
use crate::prompt::{structured_user_message, STRUCTURED_SYSTEM_PROMPT};

/// Extract structured fields from `text`. Returns the field map (possibly
/// empty on soft failure) and whether a soft failure occurred.
pub async fn extract_structured(llm: &dyn LanguageModel, text: &str) -> (FieldMap, bool) {
    let (mut fields, soft_failed) =
    extract_fields(llm, STRUCTURED_SYSTEM_PROMPT, structured_user_message, text, STRUCTURED_FIELDS).await;
    validate_age(&mut fields);
    (fields, soft_failed)
}

/// Drop `age` if it falls outside the recognized 0-150 range.
fn validate_age(fields: &mut FieldMap) {
    let in_range = match fields.get("age") {
        Some(Value::Number(n)) => n.as_f64().map(|v| (0.0..=150.0).contains(&v)).unwrap_or(false),
        Some(_) => false,
        None => return,
    };
    if !in_range {
        fields.remove("age");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clinrag_core::{GenerateRequest, GenerateResponse, Result};

    struct MockLlm(&'static str);

    #[async_trait]
    impl LanguageModel for MockLlm {
        async fn complete(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse::text(self.0))
        }
        async fn is_available(&self) -> bool {
            true
        }
        fn model_name(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn out_of_range_age_is_dropped() {
        let llm = MockLlm(r#"{"name": "Pepito", "age": 220}"#);
        let (fields, _) = extract_structured(&llm, "hola").await;
        assert!(!fields.contains_key("age"));
        assert!(fields.contains_key("name"));
    }

    #[tokio::test]
    async fn in_range_age_is_kept() {
        let llm = MockLlm(r#"{"age": 45}"#);
        let (fields, _) = extract_structured(&llm, "hola").await;
        assert_eq!(fields.get("age").unwrap().as_u64(), Some(45));
    }
}
