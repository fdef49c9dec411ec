//! Coerce extracted field maps into the vector index's closed
//! [`clinrag_core::VectorMetadata`] shape.

use clinrag_core::{FieldMap, VectorMetadata};
use serde_json::Value;

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}

fn as_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_string).collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Build embedding metadata from the structured/unstructured field maps
/// produced during extraction.
pub fn metadata_from_fields(structured: Option<&FieldMap>, unstructured: Option<&FieldMap>) -> VectorMetadata {
    let mut metadata = VectorMetadata::default();
    if let Some(fields) = structured {
        metadata.patient_name = fields.get("name").and_then(as_string);
        metadata.diagnosis = fields.get("diagnosis").and_then(as_string);
        metadata.date = fields.get("date").and_then(as_string);
        metadata.medications = fields.get("medications").map(as_string_list).unwrap_or_default();
    }
    if let Some(fields) = unstructured {
        metadata.symptoms = fields.get("symptoms").map(as_string_list).unwrap_or_default();
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn builds_metadata_from_both_maps() {
        let mut structured = HashMap::new();
        structured.insert("name".to_string(), Value::String("Pepito".into()));
        structured.insert("diagnosis".to_string(), Value::String("diabetes".into()));
        structured.insert("medications".to_string(), Value::Array(vec![Value::String("metformina".into())]));
        let mut unstructured = HashMap::new();
        unstructured.insert("symptoms".to_string(), Value::Array(vec![Value::String("fatiga".into())]));

        let metadata = metadata_from_fields(Some(&structured), Some(&unstructured));
        assert_eq!(metadata.patient_name.as_deref(), Some("Pepito"));
        assert_eq!(metadata.medications, vec!["metformina".to_string()]);
        assert_eq!(metadata.symptoms, vec!["fatiga".to_string()]);
    }

    #[test]
    fn missing_maps_yield_empty_metadata() {
        let metadata = metadata_from_fields(None, None);
        assert!(metadata.patient_name.is_none());
        assert!(metadata.symptoms.is_empty());
    }
}
