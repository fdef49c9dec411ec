//! Text preparation for embedding.
//!
//! The embedded `payload_text` is distinct from the raw transcript: it's
//! the source text plus a stable serialization of the medical metadata,
//! so a single embedding captures both the narrative and the
//! structured facts extracted from it.

use clinrag_core::VectorMetadata;

const MAX_PAYLOAD_CHARS: usize = 8_000;

/// Labels are emitted in this fixed order regardless of which fields
/// are present, so identical metadata always serializes identically.
fn labeled_lines(metadata: &VectorMetadata, context: Option<&str>) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(patient) = &metadata.patient_name {
        lines.push(format!("patient: {patient}"));
    }
    if let Some(diagnosis) = &metadata.diagnosis {
        lines.push(format!("diagnosis: {diagnosis}"));
    }
    if !metadata.medications.is_empty() {
        lines.push(format!("medications: {}", metadata.medications.join(", ")));
    }
    if !metadata.symptoms.is_empty() {
        lines.push(format!("symptoms: {}", metadata.symptoms.join(", ")));
    }
    if let Some(context) = context.filter(|c| !c.is_empty()) {
        lines.push(format!("context: {context}"));
    }
    lines
}

/// Build the payload text for a source, truncated at a UTF-8 character
/// boundary so multi-byte sequences are never split.
pub fn build_payload_text(source_text: &str, metadata: &VectorMetadata, context: Option<&str>) -> String {
    let mut text = source_text.to_string();
    let lines = labeled_lines(metadata, context);
    if !lines.is_empty() {
        text.push('\n');
        text.push_str(&lines.join("\n"));
    }
    truncate_utf8_safe(&text, MAX_PAYLOAD_CHARS)
}

/// Truncate to at most `max_chars` Unicode scalar values, never splitting
/// a multi-byte codepoint.
pub fn truncate_utf8_safe(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_order_is_stable() {
        let meta = VectorMetadata {
            patient_name: Some("Pepito Gómez".into()),
            diagnosis: Some("diabetes".into()),
            symptoms: vec!["dolor de cabeza".into()],
            medications: vec!["metformina".into()],
            ..Default::default()
        };
        let text = build_payload_text("hola buenas", &meta, Some("consulta de seguimiento"));
        let diag_pos = text.find("diagnosis:").unwrap();
        let meds_pos = text.find("medications:").unwrap();
        let symptoms_pos = text.find("symptoms:").unwrap();
        let context_pos = text.find("context:").unwrap();
        assert!(diag_pos < meds_pos);
        assert!(meds_pos < symptoms_pos);
        assert!(symptoms_pos < context_pos);
    }

    #[test]
    fn truncation_is_utf8_safe() {
        let text: String = std::iter::repeat('ñ').take(9_000).collect();
        let truncated = truncate_utf8_safe(&text, MAX_PAYLOAD_CHARS);
        assert_eq!(truncated.chars().count(), MAX_PAYLOAD_CHARS);
        assert!(String::from_utf8(truncated.into_bytes()).is_ok());
    }
}
