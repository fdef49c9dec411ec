//! Document pipeline: validate → OCR → extract → index → link.

use std::sync::Arc;
use uuid::Uuid;

use clinrag_core::{
    Document, Error, FileKind, IngestStatus, Result, SourceKind, VectorEntry, VectorMetadata,
};
use clinrag_extract::extract_structured;
use clinrag_vector::{build_payload_text, fuzzy_name_score};

use crate::deps::IngestDeps;
use crate::validate::validate_document;

/// Validate and create a `Pending` document. Mirrors
/// [`crate::audio_pipeline::submit`].
pub async fn submit(deps: &IngestDeps, bytes: &[u8], filename: &str, mime: &str) -> Result<Document> {
    let kind = validate_document(bytes, filename)?;
    let doc = Document::new(Uuid::new_v4().to_string(), filename, bytes.len() as u64, mime, kind);
    deps.store.create_document(&doc).await?;
    Ok(doc)
}

/// Drive one document through the pipeline to completion or failure.
pub async fn run(deps: Arc<IngestDeps>, id: String, bytes: Vec<u8>) {
    if let Err(e) = run_inner(&deps, &id, &bytes).await {
        fail_document(&deps, &id, &e).await;
    }
}

async fn run_inner(deps: &IngestDeps, id: &str, bytes: &[u8]) -> Result<()> {
    // Stage 2: OCR (document pipeline has no Transcribing/Diarizing stages)
    deps.store.transition_document(id, IngestStatus::Pending, IngestStatus::Extracting, None).await?;
    let doc = deps.store.get_document(id).await?;
    let extracted_text = extract_text(deps, &doc, bytes).await?;

    let mut doc = deps.store.get_document(id).await?;
    doc.extracted_text = Some(extracted_text.clone());
    let expected = doc.updated_at;
    deps.store.update_document(&doc, expected).await?;

    // Stage 3: medical-metadata extraction, scoped to document-relevant fields
    let (fields, _soft_failed) = extract_structured(deps.llm.as_ref(), &extracted_text).await;
    let mut doc = deps.store.get_document(id).await?;
    doc.patient_name = fields.get("name").and_then(|v| v.as_str()).map(str::to_string);
    doc.document_date = fields.get("date").and_then(|v| v.as_str()).map(str::to_string);
    if let Some(diagnosis) = fields.get("diagnosis").and_then(|v| v.as_str()) {
        doc.conditions = vec![diagnosis.to_string()];
    }
    doc.medications = fields
        .get("medications")
        .map(|v| match v {
            serde_json::Value::Array(items) => items.iter().filter_map(|i| i.as_str().map(str::to_string)).collect(),
            serde_json::Value::String(s) => vec![s.clone()],
            _ => Vec::new(),
        })
        .unwrap_or_default();
    let expected = doc.updated_at;
    deps.store.update_document(&doc, expected).await?;

    // Stage 4: embed + upsert (non-fatal on failure)
    deps.store.transition_document(id, IngestStatus::Extracting, IngestStatus::Indexing, None).await?;
    let doc = deps.store.get_document(id).await?;
    let metadata = document_metadata(&doc);
    let payload_text = build_payload_text(&extracted_text, &metadata, None);

    let index_result = index_document(deps, id, &payload_text, metadata).await;
    let mut doc = deps.store.get_document(id).await?;
    match index_result {
        Ok(vector_id) => {
            doc.vector_id = Some(vector_id);
            doc.vector_stored = true;
        }
        Err(e) => {
            tracing::warn!(document_id = %id, error = %e, "vector indexing failed, continuing (soft failure)");
            doc.vector_stored = false;
        }
    }

    // Stage 5: fuzzy-link to an existing Recording
    if let Some(patient_name) = doc.patient_name.clone() {
        if let Some(recording_id) = find_matching_recording(deps, &patient_name).await {
            doc.recording_id = Some(recording_id);
        }
    }
    let expected = doc.updated_at;
    deps.store.update_document(&doc, expected).await?;

    // Stage 6: Complete
    deps.store.transition_document(id, IngestStatus::Indexing, IngestStatus::Completed, None).await?;
    Ok(())
}

async fn extract_text(deps: &IngestDeps, doc: &Document, bytes: &[u8]) -> Result<String> {
    match doc.file_kind {
        FileKind::Pdf => {
            let result = tokio::time::timeout(deps.deadlines.ocr, deps.ocr.extract_pdf(bytes, deps.ingest.max_pdf_pages))
                .await
                .map_err(|_| Error::Timeout("ocr extract_pdf".into()))??;
            Ok(result.text)
        }
        FileKind::Image => {
            let result = tokio::time::timeout(deps.deadlines.ocr, deps.ocr.extract_image(bytes, "es"))
                .await
                .map_err(|_| Error::Timeout("ocr extract_image".into()))??;
            if result.confidence < deps.ingest.min_ocr_confidence {
                return Err(Error::InvalidMedia(format!(
                            "ocr confidence {:.2} below minimum {:.2}",
                            result.confidence, deps.ingest.min_ocr_confidence
                )));
            }
            Ok(result.text)
        }
    }
}

fn document_metadata(doc: &Document) -> VectorMetadata {
    VectorMetadata {
        patient_name: doc.patient_name.clone(),
        diagnosis: doc.conditions.first().cloned(),
        conditions: doc.conditions.clone(),
        date: doc.document_date.clone(),
        medications: doc.medications.clone(),
        ..VectorMetadata::default()
    }
}

async fn index_document(deps: &IngestDeps, id: &str, payload_text: &str, metadata: VectorMetadata) -> Result<String> {
    let embedding = tokio::time::timeout(deps.deadlines.embed, deps.embedder.embed(payload_text))
        .await
        .map_err(|_| Error::Timeout("embed".into()))??;
    let entry = VectorEntry { vector_id: Uuid::new_v4().to_string(), source_kind: SourceKind::Document, source_id: id.to_string(), embedding, payload_text: payload_text.to_string(), metadata };
    tokio::time::timeout(deps.deadlines.vector, deps.vector.upsert(entry)).await.map_err(|_| Error::Timeout("vector upsert".into()))?
}

/// Best fuzzy match among candidate recordings whose structured fields
/// mention `patient_name`, at or above the linking threshold.
async fn find_matching_recording(deps: &IngestDeps, patient_name: &str) -> Option<String> {
    let threshold = deps.retrieval.document_link_threshold;
    let candidates = deps.store.recordings_with_patient_like(patient_name).await.ok()?;
    candidates
        .into_iter()
        .filter_map(|rec| {
            let name = rec.structured.as_ref()?.get("name")?.as_str()?.to_string();
            let score = fuzzy_name_score(patient_name, &name);
            (score >= threshold).then_some((rec.id, score))
        })
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(id, _)| id)
}

async fn fail_document(deps: &IngestDeps, id: &str, error: &Error) {
    let detail = classify_stage_error(error);
    tracing::error!(document_id = %id, error = %error, "document pipeline failed");
    if let Ok(doc) = deps.store.get_document(id).await {
        if doc.status != IngestStatus::Failed && doc.status != IngestStatus::Completed {
            let mut doc = doc;
            doc.error = Some(detail);
            let expected = doc.updated_at;
            let _ = deps.store.update_document(&doc, expected).await;
            let _ = deps.store.transition_document(id, doc.status, IngestStatus::Failed, Some(error.to_string())).await;
        }
    }
}

fn classify_stage_error(error: &Error) -> String {
    match error {
        Error::InvalidMedia(m) => format!("invalid_media: {m}"),
        Error::ProviderUnavailable(m) => format!("provider_unavailable: {m}"),
        Error::Timeout(m) => format!("timeout: {m}"),
        other => format!("internal: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinrag_core::Recording;

    fn recording_with_name(id: &str, name: &str) -> Recording {
        let mut rec = Recording::new(id, "a.wav", 10, "audio/wav");
        let mut fields = std::collections::HashMap::new();
        fields.insert("name".to_string(), serde_json::Value::String(name.to_string()));
        rec.structured = Some(fields);
        rec
    }

    #[test]
    fn document_metadata_pulls_first_condition() {
        let mut doc = Document::new("d1", "scan.pdf", 10, "application/pdf", FileKind::Pdf);
        doc.patient_name = Some("Pepito Gómez".into());
        doc.conditions = vec!["diabetes".into()];
        let metadata = document_metadata(&doc);
        assert_eq!(metadata.diagnosis.as_deref(), Some("diabetes"));
        assert_eq!(metadata.patient_name.as_deref(), Some("Pepito Gómez"));
    }

    #[test]
    fn recording_with_name_helper_sets_structured_name() {
        let rec = recording_with_name("r1", "Pepito Gómez");
        assert_eq!(rec.structured.unwrap().get("name").unwrap().as_str(), Some("Pepito Gómez"));
    }
}
