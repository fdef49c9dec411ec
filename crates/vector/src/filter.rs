//! Metadata filter evaluation shared by both `VectorIndex` backends.

use clinrag_core::{FilterOp, MetadataFilter, VectorMetadata};
use serde_json::Value;

fn field_value(metadata: &VectorMetadata, field: &str) -> Value {
    match field {
        "patient_name" => metadata.patient_name.clone().map(Value::String).unwrap_or(Value::Null),
        "diagnosis" => metadata.diagnosis.clone().map(Value::String).unwrap_or(Value::Null),
        "symptoms" => Value::String(metadata.symptoms.join(", ")),
        "conditions" => Value::String(metadata.conditions.join(", ")),
        "medications" => Value::String(metadata.medications.join(", ")),
        "date" => metadata.date.clone().map(Value::String).unwrap_or(Value::Null),
        "speaker_mix" => metadata.speaker_mix.clone().map(Value::String).unwrap_or(Value::Null),
        "doc_type" => metadata.doc_type.clone().map(Value::String).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

/// Evaluate a single filter against a metadata struct.
pub fn matches(metadata: &VectorMetadata, filter: &MetadataFilter) -> bool {
    let actual = field_value(metadata, &filter.field);
    match filter.op {
        FilterOp::Equals => actual == filter.value,
        FilterOp::NotEquals => actual != filter.value,
        FilterOp::Contains => match (actual.as_str(), filter.value.as_str()) {
            (Some(a), Some(v)) => a.to_lowercase().contains(&v.to_lowercase()),
            _ => false,
        },
        FilterOp::GreaterThan => match (actual.as_f64(), filter.value.as_f64()) {
            (Some(a), Some(v)) => a > v,
            _ => false,
        },
        FilterOp::LessThan => match (actual.as_f64(), filter.value.as_f64()) {
            (Some(a), Some(v)) => a < v,
            _ => false,
        },
    }
}

/// Evaluate a conjunction of filters (all must match).
pub fn matches_all(metadata: &VectorMetadata, filters: &[MetadataFilter]) -> bool {
    filters.iter().all(|f| matches(metadata, f))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_case_insensitive() {
        let meta = VectorMetadata { diagnosis: Some("Diabetes Tipo 2".into()), ..Default::default() };
        let filter = MetadataFilter::contains("diagnosis", "diabetes");
        assert!(matches(&meta, &filter));
    }

    #[test]
    fn missing_field_does_not_match_equals() {
        let meta = VectorMetadata::default();
        let filter = MetadataFilter::eq("patient_name", "Pepito");
        assert!(!matches(&meta, &filter));
    }
}
