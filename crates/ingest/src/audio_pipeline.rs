//! Audio pipeline: validate → transcribe → extract → diarize → index.

use std::sync::Arc;
use uuid::Uuid;

use clinrag_core::{
    Error, IngestStatus, Recording, Result, SourceKind, TranscribeHints, VectorEntry,
};
use clinrag_diarize::{decode_wav, diarize, slice_segments, AudioSegment};
use clinrag_extract::{extract_structured, extract_unstructured};
use clinrag_vector::build_payload_text;

use crate::deps::IngestDeps;
use crate::metadata::metadata_from_fields;
use crate::validate::validate_audio;

/// Validate and create a `Pending` recording. Does not run the pipeline;
/// callers spawn [`run`] separately so submission latency doesn't wait
/// on transcription.
pub async fn submit(deps: &IngestDeps, bytes: &[u8], filename: &str, mime: &str) -> Result<Recording> {
    validate_audio(bytes, filename)?;
    let rec = Recording::new(Uuid::new_v4().to_string(), filename, bytes.len() as u64, mime);
    deps.store.create_recording(&rec).await?;
    Ok(rec)
}

/// Drive one recording through the audio pipeline to completion or
/// failure. `bytes` is the raw upload, held only for the lifetime of
/// this call (never persisted).
pub async fn run(deps: Arc<IngestDeps>, id: String, bytes: Vec<u8>) {
    if let Err(e) = run_inner(&deps, &id, &bytes).await {
        fail_recording(&deps, &id, &e).await;
    }
}

async fn run_inner(deps: &IngestDeps, id: &str, bytes: &[u8]) -> Result<()> {
    // Stage 2: Transcribe
    deps.store.transition_recording(id, IngestStatus::Pending, IngestStatus::Transcribing, None).await?;
    let transcript = tokio::time::timeout(deps.deadlines.asr, deps.asr.transcribe(bytes, TranscribeHints::default()))
        .await
        .map_err(|_| Error::Timeout("asr transcribe".into()))??;

    let mut rec = deps.store.get_recording(id).await?;
    rec.transcript_text = Some(transcript.text.clone());
    rec.language = Some(transcript.language.clone());
    rec.duration_s = Some(transcript.duration_s);
    rec.confidence = Some(transcript.confidence);
    let expected = rec.updated_at;
    deps.store.update_recording(&rec, expected).await?;

    // Stage 3: Extract (structured + unstructured in parallel; soft failures only)
    deps.store.transition_recording(id, IngestStatus::Transcribing, IngestStatus::Extracting, None).await?;
    let (structured, unstructured) =
    tokio::join!(extract_structured(deps.llm.as_ref(), &transcript.text), extract_unstructured(deps.llm.as_ref(), &transcript.text));

    let mut rec = deps.store.get_recording(id).await?;
    rec.structured = Some(structured.0);
    rec.unstructured = Some(unstructured.0);
    let expected = rec.updated_at;
    deps.store.update_recording(&rec, expected).await?;

    // Stage 4: Diarize (non-fatal on failure)
    deps.store.transition_recording(id, IngestStatus::Extracting, IngestStatus::Diarizing, None).await?;
    let decoded_audio = decode_wav(bytes);
    let windows: Vec<(f32, f32)> = transcript.segments.iter().map(|s| (s.t_start, s.t_end)).collect();
    let audio_segments: Option<Vec<AudioSegment>> = decoded_audio.as_ref().map(|decoded| {
        slice_segments(decoded, &windows)
            .into_iter()
            .map(|samples| AudioSegment { samples, sample_rate: decoded.sample_rate })
            .collect()
    });
    let output = diarize(&transcript.text, &transcript.segments, audio_segments.as_deref(), &deps.diarization);
    let mut rec = deps.store.get_recording(id).await?;
    rec.speaker_segments = Some(output.segments);
    rec.speaker_stats = Some(output.stats);
    rec.diarization_processed = true;
    let expected = rec.updated_at;
    deps.store.update_recording(&rec, expected).await?;

    // Stage 5: Index (non-fatal on failure)
    deps.store.transition_recording(id, IngestStatus::Diarizing, IngestStatus::Indexing, None).await?;
    let rec = deps.store.get_recording(id).await?;
    let metadata = metadata_from_fields(rec.structured.as_ref(), rec.unstructured.as_ref());
    let payload_text = build_payload_text(&transcript.text, &metadata, None);

    let index_result = index_recording(deps, id, &payload_text, metadata).await;
    let mut rec = deps.store.get_recording(id).await?;
    match index_result {
        Ok(vector_id) => {
            rec.vector_id = Some(vector_id);
            rec.vector_stored = true;
        }
        Err(e) => {
            tracing::warn!(recording_id = %id, error = %e, "vector indexing failed, continuing (soft failure)");
            rec.vector_stored = false;
        }
    }
    let expected = rec.updated_at;
    deps.store.update_recording(&rec, expected).await?;

    // Stage 6: Complete
    deps.store.transition_recording(id, IngestStatus::Indexing, IngestStatus::Completed, None).await?;
    Ok(())
}

async fn index_recording(deps: &IngestDeps, id: &str, payload_text: &str, metadata: clinrag_core::VectorMetadata) -> Result<String> {
    let embedding = tokio::time::timeout(deps.deadlines.embed, deps.embedder.embed(payload_text))
        .await
        .map_err(|_| Error::Timeout("embed".into()))??;
    let entry = VectorEntry { vector_id: Uuid::new_v4().to_string(), source_kind: SourceKind::Recording, source_id: id.to_string(), embedding, payload_text: payload_text.to_string(), metadata };
    tokio::time::timeout(deps.deadlines.vector, deps.vector.upsert(entry)).await.map_err(|_| Error::Timeout("vector upsert".into()))?
}

async fn fail_recording(deps: &IngestDeps, id: &str, error: &Error) {
    let detail = classify_stage_error(error);
    tracing::error!(recording_id = %id, error = %error, "audio pipeline failed");
    if let Ok(rec) = deps.store.get_recording(id).await {
        if rec.status != IngestStatus::Failed && rec.status != IngestStatus::Completed {
            let mut rec = rec;
            rec.error = Some(detail);
            let expected = rec.updated_at;
            let _ = deps.store.update_recording(&rec, expected).await;
            let _ = deps.store.transition_recording(id, rec.status, IngestStatus::Failed, Some(error.to_string())).await;
        }
    }
}

/// Map a stage error to its recorded classification: media,
/// provider, and timeout errors keep their kind; anything else becomes
/// `Internal` with the originating stage name, already embedded in the
/// error's message by the call site.
fn classify_stage_error(error: &Error) -> String {
    match error {
        Error::InvalidMedia(m) => format!("invalid_media: {m}"),
        Error::ProviderUnavailable(m) => format!("provider_unavailable: {m}"),
        Error::Timeout(m) => format!("timeout: {m}"),
        other => format!("internal: {other}"),
    }
}
