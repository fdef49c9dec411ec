//! Vector index entry and query types shared between the indexing side
//! (ingestion) and the read side (retrieval).

use serde::{Deserialize, Serialize};

/// Embedding dimension. A fixed build-time constant; every embedder
/// implementation must produce vectors of exactly this length.
pub const EMBEDDING_DIM: usize = 384;

/// What a [`VectorEntry`] was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Recording,
    Document,
}

/// The closed set of metadata fields carried alongside an embedding.
/// Extending this at runtime is not supported; new fields require a
/// code change here and in the payload builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VectorMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_mix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
}

/// A single embedded entry in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorEntry {
    pub vector_id: String,
    pub source_kind: SourceKind,
    pub source_id: String,
    pub embedding: Vec<f32>,
    /// The text that was actually embedded (distinct from the raw
    /// transcript or extracted text).
    pub payload_text: String,
    pub metadata: VectorMetadata,
}

impl VectorEntry {
    pub fn dimension_ok(&self) -> bool {
        self.embedding.len() == EMBEDDING_DIM
    }
}

/// Strategy for [crate `clinrag-vector`]'s `SearchByField` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    Exact,
    Fuzzy,
}

/// A single metadata filter applied after similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataFilter {
    pub field: String,
    pub op: FilterOp,
    pub value: serde_json::Value,
}

impl MetadataFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self { field: field.into(), op: FilterOp::Equals, value: value.into() }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: FilterOp::Contains,
            value: serde_json::Value::String(value.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum FilterOp {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
}

/// Result of a similarity search, before ranker bonuses are applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEntry {
    pub entry: VectorEntry,
    pub similarity: f32,
}

/// Aggregate stats exposed by the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStats {
    pub count: u64,
    pub dim: usize,
    pub model_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_check() {
        let entry = VectorEntry {
            vector_id: "v1".into(),
            source_kind: SourceKind::Recording,
            source_id: "r1".into(),
            embedding: vec![0.0; EMBEDDING_DIM],
            payload_text: "text".into(),
            metadata: VectorMetadata::default(),
        };
        assert!(entry.dimension_ok());
    }
}
