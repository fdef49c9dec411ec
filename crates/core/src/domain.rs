//! Ingestion record types: [`Recording`] (audio) and [`Document`] (PDF/image).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle status shared by recordings and documents.
///
/// Advances only forward except into [`IngestStatus::Failed`], which is
/// terminal: a failed record is never retried in place, only resubmitted
/// as a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    Pending,
    Transcribing,
    Extracting,
    Diarizing,
    Indexing,
    Completed,
    Failed,
}

impl IngestStatus {
    /// Whether `self -> next` is a legal forward transition.
    pub fn can_advance_to(&self, next: IngestStatus) -> bool {
        use IngestStatus::*;
        if next == Failed {
            return *self != Completed && *self != Failed;
        }
        matches!(
            (self, next),
            (Pending, Transcribing)
            | (Pending, Extracting) // document pipeline skips transcription
            | (Transcribing, Extracting)
            | (Extracting, Diarizing)
            | (Extracting, Indexing) // document pipeline has no diarization stage
            | (Diarizing, Indexing)
            | (Indexing, Completed)
        )
    }
}

/// One transition in a record's audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEvent {
    pub from: IngestStatus,
    pub to: IngestStatus,
    pub at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Kind of document upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Pdf,
    Image,
}

/// Canonical medical fields recognized by structured extraction.
pub const STRUCTURED_FIELDS: &[&str] = &[
    "name",
    "age",
    "date",
    "diagnosis",
    "physician",
    "medications",
    "phone",
    "email",
];

/// Contextual fields recognized by unstructured extraction.
pub const UNSTRUCTURED_FIELDS: &[&str] = &[
    "symptoms",
    "context",
    "observations",
    "emotions",
    "urgency",
    "recommendations",
    "questions",
    "answers",
];

/// A field map produced by the extraction service. Keyed by one of the
/// closed field names above; values are left as JSON so both scalar and
/// array fields can live in the same map.
pub type FieldMap = HashMap<String, serde_json::Value>;

/// An audio ingestion record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub id: String,
    pub filename: String,
    pub size_bytes: u64,
    pub mime: String,
    pub status: IngestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured: Option<FieldMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unstructured: Option<FieldMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_s: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_segments: Option<Vec<crate::speaker::SpeakerSegment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_stats: Option<crate::speaker::SpeakerStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Soft-failure flags: diarization and vector indexing never
    /// fail the enclosing record, but the outcome must be observable.
    #[serde(default)]
    pub diarization_processed: bool,
    #[serde(default)]
    pub vector_stored: bool,

    #[serde(default)]
    pub status_history: Vec<StatusEvent>,
}

impl Recording {
    pub fn new(id: impl Into<String>, filename: impl Into<String>, size_bytes: u64, mime: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            filename: filename.into(),
            size_bytes,
            mime: mime.into(),
            status: IngestStatus::Pending,
            created_at: now,
            updated_at: now,
            transcript_text: None,
            structured: None,
            unstructured: None,
            language: None,
            duration_s: None,
            confidence: None,
            vector_id: None,
            speaker_segments: None,
            speaker_stats: None,
            error: None,
            diarization_processed: false,
            vector_stored: false,
            status_history: Vec::new(),
        }
    }

    /// Invariant check used by tests and by the store before persisting
    /// a `Completed` transition: transcript or extracted fields must
    /// already be present.
    pub fn satisfies_completion_invariant(&self) -> bool {
        self.status != IngestStatus::Completed
        || (self.transcript_text.as_deref().is_some_and(|t| !t.is_empty())
            && (self.structured.is_some() || self.unstructured.is_some()))
    }
}

/// A PDF/image ingestion record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub filename: String,
    pub size_bytes: u64,
    pub mime: String,
    pub file_kind: FileKind,
    pub status: IngestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub procedures: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default)]
    pub vector_stored: bool,
    #[serde(default)]
    pub status_history: Vec<StatusEvent>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        filename: impl Into<String>,
        size_bytes: u64,
        mime: impl Into<String>,
        file_kind: FileKind,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            filename: filename.into(),
            size_bytes,
            mime: mime.into(),
            file_kind,
            status: IngestStatus::Pending,
            created_at: now,
            updated_at: now,
            page_count: None,
            ocr_confidence: None,
            extracted_text: None,
            patient_name: None,
            document_date: None,
            document_type: None,
            conditions: Vec::new(),
            medications: Vec::new(),
            procedures: Vec::new(),
            recording_id: None,
            vector_id: None,
            error: None,
            vector_stored: false,
            status_history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_transitions_only() {
        assert!(IngestStatus::Pending.can_advance_to(IngestStatus::Transcribing));
        assert!(IngestStatus::Indexing.can_advance_to(IngestStatus::Completed));
        assert!(!IngestStatus::Completed.can_advance_to(IngestStatus::Pending));
        assert!(IngestStatus::Transcribing.can_advance_to(IngestStatus::Failed));
        assert!(!IngestStatus::Failed.can_advance_to(IngestStatus::Failed));
    }

    #[test]
    fn completion_invariant() {
        let mut r = Recording::new("r1", "a.wav", 100, "audio/wav");
        r.status = IngestStatus::Completed;
        assert!(!r.satisfies_completion_invariant());
        r.transcript_text = Some("hola".into());
        r.structured = Some(FieldMap::new());
        assert!(r.satisfies_completion_invariant());
    }
}
