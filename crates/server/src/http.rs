//! HTTP router and handlers: the wire form of the API façade.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use clinrag_core::{Document, Error, Recording, SourceKind};

use crate::dto::{ChatRequestDto, DocumentSearchQuery, HealthDto, ListQuery, PageDto, SubmitAck, UploadDocumentMeta, VectorStatusDto};
use crate::error::ApiError;
use crate::health;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/upload-audio", post(upload_audio))
        .route("/transcriptions/:id", get(get_recording))
        .route("/transcriptions/:id", delete(delete_recording))
        .route("/transcriptions", get(list_recordings))
        .route("/upload-document", post(upload_document))
        .route("/documents/:id", get(get_document))
        .route("/documents/:id", delete(delete_document))
        .route("/documents/search", get(search_documents))
        .route("/documents", get(list_documents))
        .route("/chat", post(chat))
        .route("/vector-store/status", get(vector_store_status))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn read_multipart_blob(mut multipart: Multipart, field_name: &str) -> Result<(Vec<u8>, String, String), ApiError> {
    let mut bytes: Option<Vec<u8>> = None;
    let mut filename = format!("{field_name}.bin");
    let mut mime = "application/octet-stream".to_string();

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::InvalidInput(e.to_string()))? {
        if field.name().unwrap_or("") == field_name {
            filename = field.file_name().unwrap_or(&filename).to_string();
            mime = field.content_type().unwrap_or(&mime).to_string();
            bytes = Some(field.bytes().await.map_err(|e| Error::InvalidInput(e.to_string()))?.to_vec());
        }
    }

    let bytes = bytes.ok_or_else(|| Error::InvalidInput(format!("missing multipart field: {field_name}")))?;
    Ok((bytes, filename, mime))
}

async fn upload_audio(State(state): State<AppState>, multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let (bytes, filename, mime) = read_multipart_blob(multipart, "file").await?;
    let rec = state.orchestrator.submit_audio(bytes, &filename, &mime).await?;
    Ok((StatusCode::ACCEPTED, Json(SubmitAck { id: rec.id })))
}

async fn upload_document(State(state): State<AppState>, mut multipart: Multipart) -> Result<impl IntoResponse, ApiError> {
    let mut bytes: Option<Vec<u8>> = None;
    let mut filename = "document".to_string();
    let mut mime = "application/octet-stream".to_string();
    let mut meta = UploadDocumentMeta::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::InvalidInput(e.to_string()))? {
        match field.name().unwrap_or("") {
            "file" => {
                filename = field.file_name().unwrap_or(&filename).to_string();
                mime = field.content_type().unwrap_or(&mime).to_string();
                bytes = Some(field.bytes().await.map_err(|e| Error::InvalidInput(e.to_string()))?.to_vec());
            }
            "patient_name" => meta.patient_name = Some(field.text().await.unwrap_or_default()),
            "document_type" => meta.document_type = Some(field.text().await.unwrap_or_default()),
            "description" => meta.description = Some(field.text().await.unwrap_or_default()),
            _ => {}
        }
    }

    let bytes = bytes.ok_or_else(|| Error::InvalidInput("missing multipart field: file".to_string()))?;
    let mut doc = state.orchestrator.submit_document(bytes, &filename, &mime).await?;

    // document_type is the only upload-time hint with a matching field on
    // `Document`; patient_name and description are left to extraction,
    // which runs on the OCR'd text once the pipeline picks the record up.
    // Best-effort: the pipeline may already have advanced the record by
    // the time this patch lands, in which case the hint is dropped rather
    // than failing the upload.
    if let Some(document_type) = meta.document_type {
        let expected = doc.updated_at;
        doc.document_type = Some(document_type);
        let _ = state.store.update_document(&doc, expected).await;
    }

    Ok((StatusCode::ACCEPTED, Json(SubmitAck { id: doc.id })))
}

async fn get_recording(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Recording>, ApiError> {
    let rec = state.store.get_recording(&id).await.map_err(Error::from)?;
    Ok(Json(rec))
}

async fn list_recordings(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<Json<PageDto<Recording>>, ApiError> {
    let (filter, page) = query.into_filter_and_page();
    let result = state.store.list_recordings(&filter, page).await.map_err(Error::from)?;
    Ok(Json(result.into()))
}

async fn delete_recording(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let _ = state.orchestrator.cancel(&id).await;
    state.vector.delete_by_source(SourceKind::Recording, &id).await?;
    state.store.delete_recording(&id).await.map_err(Error::from)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_document(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Document>, ApiError> {
    let doc = state.store.get_document(&id).await.map_err(Error::from)?;
    Ok(Json(doc))
}

async fn list_documents(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<Json<PageDto<Document>>, ApiError> {
    let (filter, page) = query.into_filter_and_page();
    let result = state.store.list_documents(&filter, page).await.map_err(Error::from)?;
    Ok(Json(result.into()))
}

async fn delete_document(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let _ = state.orchestrator.cancel(&id).await;
    state.vector.delete_by_source(SourceKind::Document, &id).await?;
    state.store.delete_document(&id).await.map_err(Error::from)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn search_documents(State(state): State<AppState>, Query(query): Query<DocumentSearchQuery>) -> Result<Json<Vec<Document>>, ApiError> {
    let plan = clinrag_query::analyze(&query.query);
    let context = clinrag_retrieve::retrieve(state.vector.as_ref(), state.embedder.as_ref(), &plan, &state.settings.retrieval).await?;
    let ids: Vec<String> = context
        .items
        .iter()
        .filter(|item| item.entry.source_kind == SourceKind::Document)
        .map(|item| item.entry.source_id.clone())
        .collect();

    let mut docs = Vec::with_capacity(ids.len());
    for id in ids {
        if let Ok(doc) = state.store.get_document(&id).await {
            docs.push(doc);
        }
    }
    Ok(Json(docs))
}

async fn chat(State(state): State<AppState>, Json(body): Json<ChatRequestDto>) -> Result<Json<clinrag_core::ChatResult>, ApiError> {
    let mut plan = clinrag_query::analyze(&body.query);
    plan.filters = body.filters;

    let mut retrieval_config = state.settings.retrieval.clone();
    if let Some(max_results) = body.max_results {
        retrieval_config.default_max_results = max_results;
    }

    let context = clinrag_retrieve::retrieve(state.vector.as_ref(), state.embedder.as_ref(), &plan, &retrieval_config).await?;
    let result = clinrag_rag::generate(state.llm.as_ref(), &plan, context, body.include_sources).await?;
    Ok(Json(result))
}

async fn vector_store_status(State(state): State<AppState>) -> Result<Json<VectorStatusDto>, ApiError> {
    let stats = state.vector.stats().await?;
    Ok(Json(VectorStatusDto { count: stats.count, dim: stats.dim, model_id: stats.model_id }))
}

async fn health_check(State(state): State<AppState>) -> Json<HealthDto> {
    Json(health::check(&state).await)
}
