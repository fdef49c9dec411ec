//! Wire types for the HTTP surface. Requests are deserialized
//! straight into these, then mapped onto the store/query/retrieve
//! types the rest of the crate already speaks; responses mirror the
//! domain types with no separate projection unless the wire shape
//! needs to diverge (pagination envelopes, the chat request body).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clinrag_core::{IngestStatus, MetadataFilter};
use clinrag_store::{Page, RecordFilter};

/// Query-string parameters for `GET /transcriptions` and `GET /documents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<IngestStatus>,
    pub patient: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ListQuery {
    pub fn into_filter_and_page(self) -> (RecordFilter, Page) {
        let filter = RecordFilter { status: self.status, patient: self.patient, from: self.from, to: self.to };
        let page = Page { page: self.page.unwrap_or(1).max(1), size: self.size.unwrap_or(20).clamp(1, 200) };
        (filter, page)
    }
}

/// A page of results, with the total count the client needs to paginate.
#[derive(Debug, Clone, Serialize)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> From<clinrag_store::PageResult<T>> for PageDto<T> {
    fn from(p: clinrag_store::PageResult<T>) -> Self {
        Self { items: p.items, total: p.total, page: p.page, size: p.size }
    }
}

/// Optional metadata fields accompanying `POST /upload-document`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadDocumentMeta {
    pub patient_name: Option<String>,
    pub document_type: Option<String>,
    pub description: Option<String>,
}

/// `202` response body for both upload endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitAck {
    pub id: String,
}

/// `GET /documents/search?query=…` parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSearchQuery {
    pub query: String,
}

/// `POST /chat` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequestDto {
    pub query: String,
    pub max_results: Option<usize>,
    #[serde(default)]
    pub filters: Vec<MetadataFilter>,
    #[serde(default)]
    pub include_sources: bool,
}

/// `GET /vector-store/status` response body.
#[derive(Debug, Clone, Serialize)]
pub struct VectorStatusDto {
    pub count: u64,
    pub dim: usize,
    pub model_id: String,
}

/// `GET /health` response body -> {component_status}`).
#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub components: std::collections::BTreeMap<String, ComponentHealth>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
