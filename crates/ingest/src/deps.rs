//! Dependency bundle shared by both ingestion pipelines.

use std::sync::Arc;

use clinrag_config::{DeadlineConfig, DiarizationConfig, IngestConfig, RetrievalConfig};
use clinrag_core::{Asr, Embedder, LanguageModel, Ocr};
use clinrag_store::SqliteStore;
use clinrag_vector::VectorIndex;

/// Everything a pipeline stage needs: the capability providers, the
/// record store, the vector index, and the tunables that govern them.
/// Cloning is cheap (everything behind an `Arc`); pipelines are spawned
/// per record and each gets its own clone.
#[derive(Clone)]
pub struct IngestDeps {
    pub asr: Arc<dyn Asr>,
    pub llm: Arc<dyn LanguageModel>,
    pub embedder: Arc<dyn Embedder>,
    pub ocr: Arc<dyn Ocr>,
    pub store: Arc<SqliteStore>,
    pub vector: Arc<dyn VectorIndex>,
    pub diarization: DiarizationConfig,
    pub ingest: IngestConfig,
    pub deadlines: DeadlineConfig,
    pub retrieval: RetrievalConfig,
}
