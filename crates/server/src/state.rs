//! Shared application state: the wiring that turns configured settings
//! into live provider adapters, store and vector handles, and the
//! ingestion orchestrator.

use std::sync::Arc;
use std::time::Duration;

use clinrag_config::Settings;
use clinrag_core::{Asr, Embedder, LanguageModel, Ocr, Result};
use clinrag_ingest::{IngestDeps, Orchestrator};
use clinrag_store::SqliteStore;
use clinrag_vector::{MemoryIndex, QdrantIndex, VectorIndex};

use crate::providers::{HttpAsr, HttpEmbedder, HttpLanguageModel, HttpOcr};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: Arc<SqliteStore>,
    pub vector: Arc<dyn VectorIndex>,
    pub orchestrator: Arc<Orchestrator>,
    pub llm: Arc<dyn LanguageModel>,
    pub embedder: Arc<dyn Embedder>,
    pub asr: Arc<dyn Asr>,
    pub ocr: Arc<dyn Ocr>,
}

impl AppState {
    pub async fn build(settings: Settings) -> Result<Self> {
        let store = SqliteStore::connect(&settings.store.database_url, settings.store.max_connections)
            .await
            .map_err(clinrag_core::Error::from)?;
        let store = Arc::new(store);

        let vector: Arc<dyn VectorIndex> = match &settings.vector.qdrant_url {
            Some(url) => Arc::new(QdrantIndex::connect(url, settings.vector.collection.clone(), settings.providers.embedder_model.clone()).await?),
            None => {
                tracing::warn!("no qdrant_url configured, using in-process vector index");
                Arc::new(MemoryIndex::new(settings.providers.embedder_model.clone()))
            }
        };

        let deadlines = settings.providers.deadlines.clone();
        let llm: Arc<dyn LanguageModel> = Arc::new(HttpLanguageModel::new(&settings.providers, deadlines.llm)?);
        let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(&settings.providers, deadlines.embed)?);
        let asr: Arc<dyn Asr> = Arc::new(HttpAsr::new(&settings.providers, deadlines.asr)?);
        let ocr: Arc<dyn Ocr> = Arc::new(HttpOcr::new(&settings.providers, deadlines.ocr)?);

        let deps = IngestDeps {
            asr: asr.clone(),
            llm: llm.clone(),
            embedder: embedder.clone(),
            ocr: ocr.clone(),
            store: store.clone(),
            vector: vector.clone(),
            diarization: settings.diarization.clone(),
            ingest: settings.ingest.clone(),
            deadlines,
            retrieval: settings.retrieval.clone(),
        };
        let orchestrator = Arc::new(Orchestrator::new(deps));

        Ok(Self { settings: Arc::new(settings), store, vector, orchestrator, llm, embedder, asr, ocr })
    }

    pub fn vector_call_timeout(&self) -> Duration {
        self.settings.providers.deadlines.vector
    }
}
