//! Prompt construction: one template per intent, sharing a strict
//! grounding instruction, fed by the ordered excerpts and structured
//! fields of the top retrieval contexts.

use clinrag_core::{CompletionParams, GenerateRequest, Intent, RagContext};

const STRICT_INSTRUCTION: &str = "Responde únicamente con información del contexto proporcionado; \
si el contexto es insuficiente dilo explícitamente; nunca inventes datos.";

const MAX_CONTEXT_CHARS: usize = 4_000;

fn intent_instruction(intent: Intent) -> &'static str {
    match intent {
        Intent::PatientInfo => "El usuario pregunta por el historial de un paciente específico. Resume los hallazgos clínicos relevantes de ese paciente.",
        Intent::ConditionList => "El usuario pregunta por pacientes asociados a una condición. Enumera los pacientes distintos que aparecen en el contexto con esa condición.",
        Intent::SymptomSearch => "El usuario pregunta por síntomas. Describe los síntomas reportados y a qué paciente(s) corresponden.",
        Intent::MedicationInfo => "El usuario pregunta por medicación. Indica los medicamentos mencionados y el contexto clínico en que aparecen.",
        Intent::TemporalQuery => "El usuario hace una pregunta acotada en el tiempo. Prioriza los registros más recientes del contexto.",
        Intent::GeneralQuery | Intent::Unknown => "Responde la pregunta general del usuario usando el contexto disponible.",
    }
}

/// Render the ordered excerpts and structured fields of the top contexts,
/// truncated to `MAX_CONTEXT_CHARS`.
fn render_context(context: &RagContext) -> String {
    let mut rendered = String::new();
    for (i, item) in context.items.iter().enumerate() {
        let metadata = &item.entry.metadata;
        let mut block = format!("[{}] {}\n", i + 1, item.excerpt);
        if let Some(patient) = &metadata.patient_name {
            block.push_str(&format!(" paciente: {patient}\n"));
        }
        if let Some(diagnosis) = &metadata.diagnosis {
            block.push_str(&format!(" diagnóstico: {diagnosis}\n"));
        }
        if !metadata.medications.is_empty() {
            block.push_str(&format!(" medicación: {}\n", metadata.medications.join(", ")));
        }
        if let Some(date) = &metadata.date {
            block.push_str(&format!(" fecha: {date}\n"));
        }

        if rendered.chars().count() + block.chars().count() > MAX_CONTEXT_CHARS {
            break;
        }
        rendered.push_str(&block);
    }
    rendered
}

/// Build the completion request for an analyzed query and its retrieval
/// context.
pub fn build_request(intent: Intent, raw_query: &str, context: &RagContext) -> GenerateRequest {
    let rendered_context = render_context(context);
    let system = if rendered_context.is_empty() {
        format!("{STRICT_INSTRUCTION}\n\n{}\n\nNo hay contexto disponible.", intent_instruction(intent))
    } else {
        format!(
            "{STRICT_INSTRUCTION}\n\n{}\n\n## Contexto\n{rendered_context}",
            intent_instruction(intent)
        )
    };

    GenerateRequest::new(system)
        .with_user_message(raw_query)
        .with_params(CompletionParams::default().with_temperature(0.2).with_max_tokens(600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinrag_core::{RankedContext, SourceKind, VectorEntry, VectorMetadata};

    fn context_with(excerpt: &str, patient: &str) -> RagContext {
        RagContext {
            items: vec![RankedContext {
                    entry: VectorEntry {
                        vector_id: "v1".into(),
                        source_kind: SourceKind::Recording,
                        source_id: "r1".into(),
                        embedding: vec![0.0; 4],
                        payload_text: excerpt.to_string(),
                        metadata: VectorMetadata { patient_name: Some(patient.to_string()),..Default::default() },
                    },
                    similarity: 0.8,
                    bonuses: 0.1,
                    final_score: 0.9,
                    excerpt: excerpt.to_string(),
            }],
        }
    }

    #[test]
    fn empty_context_is_flagged_in_system_prompt() {
        let request = build_request(Intent::GeneralQuery, "hola", &RagContext::default());
        assert!(request.messages[0].content.contains("No hay contexto"));
    }

    #[test]
    fn renders_patient_name_from_metadata() {
        let ctx = context_with("paciente con fiebre", "Pepito Gómez");
        let request = build_request(Intent::PatientInfo, "¿qué tiene Pepito?", &ctx);
        assert!(request.messages[0].content.contains("Pepito Gómez"));
    }
}
