//! Bounded-worker-pool orchestrator.
//!
//! Submission is split from execution: `submit_*` validates and persists
//! a `Pending` record synchronously, then spawns the matching pipeline
//! onto a pool of `worker_pool_size` concurrent workers. Submissions
//! past `queue_capacity` fail fast with `Busy` rather than queuing
//! unbounded work.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use clinrag_core::{Document, Error, IngestStatus, Recording, Result};

use crate::audio_pipeline;
use crate::deps::IngestDeps;
use crate::document_pipeline;

/// Drives audio and document ingestion across a bounded pool of workers.
pub struct Orchestrator {
    deps: Arc<IngestDeps>,
    semaphore: Arc<Semaphore>,
    inflight: Arc<DashMap<String, JoinHandle<()>>>,
    queue_capacity: usize,
}

impl Orchestrator {
    pub fn new(deps: IngestDeps) -> Self {
        let queue_capacity = deps.ingest.queue_capacity;
        let worker_pool_size = deps.ingest.worker_pool_size;
        Self {
            deps: Arc::new(deps),
            semaphore: Arc::new(Semaphore::new(worker_pool_size)),
            inflight: Arc::new(DashMap::new()),
            queue_capacity,
        }
    }

    /// Number of records currently queued or running.
    pub fn inflight_count(&self) -> usize {
        self.inflight.len()
    }

    fn check_capacity(&self) -> Result<()> {
        if self.inflight.len() >= self.queue_capacity {
            return Err(Error::Busy("ingestion queue is at capacity".into()));
        }
        Ok(())
    }

    pub async fn submit_audio(&self, bytes: Vec<u8>, filename: &str, mime: &str) -> Result<Recording> {
        self.check_capacity()?;
        let rec = audio_pipeline::submit(&self.deps, &bytes, filename, mime).await?;
        self.spawn_audio(rec.id.clone(), bytes);
        Ok(rec)
    }

    pub async fn submit_document(&self, bytes: Vec<u8>, filename: &str, mime: &str) -> Result<Document> {
        self.check_capacity()?;
        let doc = document_pipeline::submit(&self.deps, &bytes, filename, mime).await?;
        self.spawn_document(doc.id.clone(), bytes);
        Ok(doc)
    }

    fn spawn_audio(&self, id: String, bytes: Vec<u8>) {
        let deps = self.deps.clone();
        let semaphore = self.semaphore.clone();
        let inflight = self.inflight.clone();
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("orchestrator semaphore closed");
                audio_pipeline::run(deps, task_id.clone(), bytes).await;
                inflight.remove(&task_id);
        });
        self.inflight.insert(id, handle);
    }

    fn spawn_document(&self, id: String, bytes: Vec<u8>) {
        let deps = self.deps.clone();
        let semaphore = self.semaphore.clone();
        let inflight = self.inflight.clone();
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("orchestrator semaphore closed");
                document_pipeline::run(deps, task_id.clone(), bytes).await;
                inflight.remove(&task_id);
        });
        self.inflight.insert(id, handle);
    }

    /// Abort an in-flight record and mark it `Failed`.
    /// A no-op if the record isn't currently running.
    pub async fn cancel(&self, id: &str) -> Result<()> {
        if let Some((_, handle)) = self.inflight.remove(id) {
            handle.abort();
        }

        if let Ok(rec) = self.deps.store.get_recording(id).await {
            if rec.status != IngestStatus::Failed && rec.status != IngestStatus::Completed {
                let _ = self.deps.store.transition_recording(id, rec.status, IngestStatus::Failed, Some("cancelled".into())).await;
            }
            return Ok(());
        }
        if let Ok(doc) = self.deps.store.get_document(id).await {
            if doc.status != IngestStatus::Failed && doc.status != IngestStatus::Completed {
                let _ = self.deps.store.transition_document(id, doc.status, IngestStatus::Failed, Some("cancelled".into())).await;
            }
            return Ok(());
        }
        Err(Error::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use clinrag_config::{DeadlineConfig, DiarizationConfig, IngestConfig, RetrievalConfig};
    use clinrag_core::{
        AsrSegment, Embedder, Error as CoreError, GenerateRequest, GenerateResponse, ImageExtract, LanguageModel, Ocr, PdfExtract, Result as CoreResult,
        TranscribeHints, TranscribeResult, EMBEDDING_DIM,
    };
    use clinrag_store::SqliteStore;
    use clinrag_vector::MemoryIndex;

    use super::*;

    struct SlowAsr {
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl clinrag_core::Asr for SlowAsr {
        async fn transcribe(&self, _audio_bytes: &[u8], _hints: TranscribeHints) -> CoreResult<TranscribeResult> {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(CoreError::ProviderUnavailable("asr backend down".into()));
            }
            Ok(TranscribeResult {
                    text: "el paciente Pepito Gómez tiene diabetes".into(),
                    language: "es".into(),
                    duration_s: 3.0,
                    confidence: 0.9,
                    segments: vec![AsrSegment { t_start: 0.0, t_end: 3.0, text: "el paciente Pepito Gómez tiene diabetes".into() }],
            })
        }

        fn name(&self) -> &str {
            "slow-asr"
        }
    }

    struct MockLlm;

    #[async_trait]
    impl LanguageModel for MockLlm {
        async fn complete(&self, _request: GenerateRequest) -> CoreResult<GenerateResponse> {
            Ok(GenerateResponse::text(r#"{"name":"Pepito Gómez","diagnosis":"diabetes"}"#))
        }

        async fn is_available(&self) -> bool {
            true
        }

        fn model_name(&self) -> &str {
            "mock-llm"
        }
    }

    struct MockEmbedder;

    #[async_trait]
    impl Embedder for MockEmbedder {
        async fn embed(&self, _text: &str) -> CoreResult<Vec<f32>> {
            Ok(vec![0.1; EMBEDDING_DIM])
        }

        fn model_id(&self) -> &str {
            "mock-embedder"
        }
    }

    struct MockOcr;

    #[async_trait]
    impl Ocr for MockOcr {
        async fn extract_pdf(&self, _bytes: &[u8], max_pages: u32) -> CoreResult<PdfExtract> {
            Ok(PdfExtract { text: "Paciente: Pepito Gómez".into(), page_count: max_pages.min(1) })
        }

        async fn extract_image(&self, _bytes: &[u8], _lang: &str) -> CoreResult<ImageExtract> {
            Ok(ImageExtract { text: "Glucosa 180 mg/dL".into(), confidence: 0.9 })
        }

        fn name(&self) -> &str {
            "mock-ocr"
        }
    }

    fn wav_bytes() -> Vec<u8> {
        let mut b = b"RIFF".to_vec();
        b.extend_from_slice(&[0, 0, 0, 0]);
        b.extend_from_slice(b"WAVE");
        b
    }

    async fn test_deps(asr: SlowAsr) -> IngestDeps {
        let store = SqliteStore::connect("sqlite::memory:", 1).await.expect("in-memory store");
        IngestDeps {
            asr: Arc::new(asr),
            llm: Arc::new(MockLlm),
            embedder: Arc::new(MockEmbedder),
            ocr: Arc::new(MockOcr),
            store: Arc::new(store),
            vector: Arc::new(MemoryIndex::new("mock-embedder")),
            diarization: DiarizationConfig::default(),
            ingest: IngestConfig { worker_pool_size: 2, queue_capacity: 8,..IngestConfig::default() },
            deadlines: DeadlineConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }

    #[tokio::test]
    async fn audio_pipeline_runs_to_completion() {
        let deps = test_deps(SlowAsr { delay: Duration::from_millis(1), fail: false }).await;
        let orchestrator = Orchestrator::new(deps);

        let rec = orchestrator.submit_audio(wav_bytes(), "note.wav", "audio/wav").await.unwrap();

        let mut final_rec = orchestrator.deps.store.get_recording(&rec.id).await.unwrap();
        for _ in 0..50 {
            if matches!(final_rec.status, IngestStatus::Completed | IngestStatus::Failed) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            final_rec = orchestrator.deps.store.get_recording(&rec.id).await.unwrap();
        }

        assert_eq!(final_rec.status, IngestStatus::Completed);
        assert!(final_rec.transcript_text.is_some());
        assert!(final_rec.vector_stored);
    }

    #[tokio::test]
    async fn provider_outage_fails_the_recording() {
        let deps = test_deps(SlowAsr { delay: Duration::from_millis(1), fail: true }).await;
        let orchestrator = Orchestrator::new(deps);

        let rec = orchestrator.submit_audio(wav_bytes(), "note.wav", "audio/wav").await.unwrap();

        let mut final_rec = orchestrator.deps.store.get_recording(&rec.id).await.unwrap();
        for _ in 0..50 {
            if matches!(final_rec.status, IngestStatus::Completed | IngestStatus::Failed) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            final_rec = orchestrator.deps.store.get_recording(&rec.id).await.unwrap();
        }

        assert_eq!(final_rec.status, IngestStatus::Failed);
        assert!(final_rec.error.unwrap().contains("provider_unavailable"));
    }

    #[tokio::test]
    async fn cancellation_fails_the_recording() {
        let deps = test_deps(SlowAsr { delay: Duration::from_secs(30), fail: false }).await;
        let orchestrator = Orchestrator::new(deps);

        let rec = orchestrator.submit_audio(wav_bytes(), "note.wav", "audio/wav").await.unwrap();
        orchestrator.cancel(&rec.id).await.unwrap();

        let final_rec = orchestrator.deps.store.get_recording(&rec.id).await.unwrap();
        assert_eq!(final_rec.status, IngestStatus::Failed);
    }

    #[tokio::test]
    async fn busy_queue_rejects_new_submissions() {
        let deps = test_deps(SlowAsr { delay: Duration::from_secs(30), fail: false }).await;
        let mut deps = deps;
        deps.ingest.queue_capacity = 1;
        let orchestrator = Orchestrator::new(deps);

        orchestrator.submit_audio(wav_bytes(), "a.wav", "audio/wav").await.unwrap();
        let second = orchestrator.submit_audio(wav_bytes(), "b.wav", "audio/wav").await;
        assert!(matches!(second, Err(Error::Busy(_))));
    }
}
