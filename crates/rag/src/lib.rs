//! RAG generator (C9): builds an intent-specific prompt over a retrieval
//! context, validates and scores the model's answer, and attaches
//! follow-up suggestions.

mod confidence;
mod followup;
mod prompts;
mod validate;

use clinrag_core::{traits::LanguageModel, ChatResult, QueryPlan, RagContext, Result};

const INSUFFICIENT_FALLBACK: &str = "Insufficient information in the stored records to answer.";

/// Generate a `ChatResult` from an analyzed query and its retrieval
/// context. `include_sources` controls whether the ranked contexts are
/// attached for the caller to surface.
pub async fn generate(llm: &dyn LanguageModel, plan: &QueryPlan, context: RagContext, include_sources: bool) -> Result<ChatResult> {
    let request = prompts::build_request(plan.intent, &plan.raw_query, &context);
    let response = llm.complete(request).await?;

    let answer = validate::validate_answer(&response.text);
    let incomplete = answer.starts_with(INSUFFICIENT_FALLBACK);
    let confidence = confidence::score(&context, &plan.entities, incomplete);
    let follow_up = followup::suggest(plan.intent, &plan.entities);

    Ok(ChatResult {
        answer,
        confidence,
        intent: plan.intent,
        follow_up,
        sources: include_sources.then_some(context.items),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clinrag_core::{Entities, GenerateRequest, GenerateResponse, Intent};

    struct StaticLlm(&'static str);

    #[async_trait]
    impl LanguageModel for StaticLlm {
        async fn complete(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse::text(self.0))
        }
        async fn is_available(&self) -> bool {
            true
        }
        fn model_name(&self) -> &str {
            "static"
        }
    }

    #[tokio::test]
    async fn generates_validated_answer_with_follow_up() {
        let llm = StaticLlm("el paciente tiene diabetes controlada");
        let plan = QueryPlan {
            raw_query: "¿qué tiene el paciente?".into(),
            intent: Intent::PatientInfo,
            entities: Entities { patients: vec!["Pepito Gómez".into()], ..Default::default() },
            ..Default::default()
        };
        let result = generate(&llm, &plan, RagContext::default(), false).await.unwrap();
        assert!(result.answer.contains("diabetes"));
        assert!(!result.follow_up.is_empty());
        assert!(result.sources.is_none());
    }

    #[tokio::test]
    async fn empty_model_output_falls_back() {
        let llm = StaticLlm("   ");
        let plan = QueryPlan { raw_query: "hola".into(), ..Default::default() };
        let result = generate(&llm, &plan, RagContext::default(), true).await.unwrap();
        assert_eq!(result.answer, INSUFFICIENT_FALLBACK);
        assert!(result.sources.is_some());
    }
}
