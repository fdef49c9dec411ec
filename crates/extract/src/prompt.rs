//! Fixed prompt templates for the two extraction operations.

pub const STRUCTURED_SYSTEM_PROMPT: &str = r#"Eres un asistente que extrae datos estructurados de conversaciones clínicas en español.
Devuelve EXCLUSIVAMENTE un objeto JSON válido, sin texto adicional, sin explicaciones, sin bloques de código.
Campos reconocidos (omite los que no aparezcan en el texto):
- name: string
- age: number entre 0 y 150
- date: string con formato YYYY-MM-DD
- diagnosis: string
- physician: string
- medications: array de strings
- phone: string
- email: string
Si un campo no aparece en el texto, omítelo del objeto JSON. No inventes valores."#;

pub const UNSTRUCTURED_SYSTEM_PROMPT: &str = r#"Eres un asistente que extrae contexto cualitativo de conversaciones clínicas en español.
Devuelve EXCLUSIVAMENTE un objeto JSON válido, sin texto adicional, sin explicaciones, sin bloques de código.
Campos reconocidos (omite los que no aparezcan en el texto):
- symptoms: array de strings
- context: string
- observations: string
- emotions: array de strings
- urgency: uno de "low", "medium", "high"
- recommendations: array de strings
- questions: array de strings
- answers: array de strings
Si un campo no aparece en el texto, omítelo del objeto JSON. No inventes valores."#;

/// Appended to the system prompt on the single retry after a parse
/// failure.
pub const STRICT_JSON_REMINDER: &str = "RECUERDA: tu respuesta completa debe ser un único objeto JSON válido. Nada de texto antes o después, nada de bloques de código.";

pub fn structured_user_message(text: &str) -> String {
    format!("Texto:\n{text}")
}

pub fn unstructured_user_message(text: &str) -> String {
    format!("Texto:\n{text}")
}
