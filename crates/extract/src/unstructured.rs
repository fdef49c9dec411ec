//! `ExtractUnstructured`: contextual fields.

use clinrag_core::{traits::LanguageModel, domain::UNSTRUCTURED_FIELDS, FieldMap};
use serde_json::Value;

use crate::extractor::extract_fields;
use crate::prompt::{unstructured_user_message, UNSTRUCTURED_SYSTEM_PROMPT};

const URGENCY_VALUES: [&str; 3] = ["low", "medium", "high"];

pub async fn extract_unstructured(llm: &dyn LanguageModel, text: &str) -> (FieldMap, bool) {
    let (mut fields, soft_failed) =
    extract_fields(llm, UNSTRUCTURED_SYSTEM_PROMPT, unstructured_user_message, text, UNSTRUCTURED_FIELDS).await;
    validate_urgency(&mut fields);
    (fields, soft_failed)
}

fn validate_urgency(fields: &mut FieldMap) {
    let valid = match fields.get("urgency") {
        Some(Value::String(s)) => URGENCY_VALUES.contains(&s.as_str()),
        Some(_) => false,
        None => return,
    };
    if !valid {
        fields.remove("urgency");
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
    async fn invalid_urgency_is_dropped() {
        let llm = MockLlm(r#"{"urgency": "urgentisimo", "symptoms": ["dolor"]}"#);
        let (fields, _) = extract_unstructured(&llm, "hola").await;
        assert!(!fields.contains_key("urgency"));
        assert!(fields.contains_key("symptoms"));
    }

    #[tokio::test]
    async fn valid_urgency_is_kept() {
        let llm = MockLlm(r#"{"urgency": "high"}"#);
        let (fields, _) = extract_unstructured(&llm, "hola").await;
        assert_eq!(fields.get("urgency").unwrap().as_str(), Some("high"));
    }
}
