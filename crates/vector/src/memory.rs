//! Deterministic in-process vector index. Backs tests and offline runs;
//! the production path uses [`crate::qdrant::QdrantIndex`].

use async_trait::async_trait;
use clinrag_core::{Error, MetadataFilter, Result, ScoredEntry, SearchStrategy, SourceKind, VectorEntry, VectorStats, EMBEDDING_DIM};
use dashmap::DashMap;

use crate::filter::matches_all;
use crate::fuzzy::fuzzy_name_score;
use crate::index_trait::VectorIndex;

pub struct MemoryIndex {
    model_id: String,
    entries: DashMap<String, VectorEntry>,
}

impl MemoryIndex {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self { model_id: model_id.into(), entries: DashMap::new() }
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&self, entry: VectorEntry) -> Result<String> {
        if entry.embedding.len() != EMBEDDING_DIM {
            return Err(Error::InvalidInput(format!(
                "dimension mismatch: expected {EMBEDDING_DIM}, got {}",
                entry.embedding.len()
            )));
        }
        let id = entry.vector_id.clone();
        self.entries.insert(id.clone(), entry);
        Ok(id)
    }

    async fn delete(&self, vector_id: &str) -> Result<()> {
        self.entries.remove(vector_id);
        Ok(())
    }

    async fn delete_by_source(&self, source_kind: SourceKind, source_id: &str) -> Result<()> {
        self.entries.retain(|_, e| !(e.source_kind == source_kind && e.source_id == source_id));
        Ok(())
    }

    async fn search(&self, query_vector: &[f32], k: usize, filters: &[MetadataFilter], min_score: f32) -> Result<Vec<ScoredEntry>> {
        if query_vector.len() != EMBEDDING_DIM {
            return Err(Error::InvalidInput(format!(
                "dimension mismatch: expected {EMBEDDING_DIM}, got {}",
                query_vector.len()
            )));
        }
        let mut scored: Vec<ScoredEntry> = self
            .entries
            .iter()
            .filter(|e| matches_all(&e.metadata, filters))
            .map(|e| ScoredEntry { entry: e.value().clone(), similarity: cosine_similarity(query_vector, &e.embedding) })
            .filter(|s| s.similarity >= min_score)
            .collect();

        sort_scored(&mut scored);
        scored.truncate(k);
        Ok(scored)
    }

    async fn search_by_field(&self, field: &str, value: &str, strategy: SearchStrategy, k: usize) -> Result<Vec<ScoredEntry>> {
        let mut scored: Vec<ScoredEntry> = self
            .entries
            .iter()
            .filter_map(|e| {
                let candidate = match field {
                    "patient_name" | "patient" => e.metadata.patient_name.clone(),
                    other => {
                        tracing::warn!(field = other, "search_by_field: unsupported field, skipping");
                        None
                    }
                }?;
                let score = match strategy {
                    SearchStrategy::Exact => {
                        if crate::fuzzy::normalize_name(&candidate) == crate::fuzzy::normalize_name(value) {
                            1.0
                        } else {
                            0.0
                        }
                    }
                    SearchStrategy::Fuzzy => fuzzy_name_score(value, &candidate),
                };
                if score >= crate::fuzzy::DEFAULT_THRESHOLD || (strategy == SearchStrategy::Exact && score == 1.0) {
                    Some(ScoredEntry { entry: e.value().clone(), similarity: score })
                } else {
                    None
                }
            })
            .collect();

        sort_scored(&mut scored);
        scored.truncate(k);
        Ok(scored)
    }

    async fn stats(&self) -> Result<VectorStats> {
        Ok(VectorStats { count: self.entries.len() as u64, dim: EMBEDDING_DIM, model_id: self.model_id.clone() })
    }
}

fn sort_scored(scored: &mut [ScoredEntry]) {
    scored.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.entry.metadata.date.cmp(&a.entry.metadata.date))
            .then_with(|| a.entry.source_id.cmp(&b.entry.source_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinrag_core::VectorMetadata;

    fn entry(id: &str, vec_val: f32, patient: &str) -> VectorEntry {
        VectorEntry {
            vector_id: id.into(),
            source_kind: SourceKind::Recording,
            source_id: id.into(),
            embedding: vec![vec_val; EMBEDDING_DIM],
            payload_text: "text".into(),
            metadata: VectorMetadata { patient_name: Some(patient.into()), ..Default::default() },
        }
    }

    #[tokio::test]
    async fn upsert_rejects_wrong_dimension() {
        let index = MemoryIndex::new("test-model");
        let mut e = entry("v1", 1.0, "Pepito");
        e.embedding = vec![0.0; 10];
        let err = index.upsert(e).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn search_orders_by_similarity_desc() {
        let index = MemoryIndex::new("test-model");
        index.upsert(entry("v1", 0.5, "Pepito")).await.unwrap();
        index.upsert(entry("v2", 1.0, "Maria")).await.unwrap();
        let query = vec![1.0; EMBEDDING_DIM];
        let results = index.search(&query, 10, &[], 0.0).await.unwrap();
        assert_eq!(results[0].entry.vector_id, "v2");
    }

    #[tokio::test]
    async fn fuzzy_field_search_finds_close_match() {
        let index = MemoryIndex::new("test-model");
        index.upsert(entry("v1", 1.0, "Pepito Gómez")).await.unwrap();
        let results = index.search_by_field("patient_name", "pepito gomez", SearchStrategy::Fuzzy, 5).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn delete_by_source_removes_matching_entries() {
        let index = MemoryIndex::new("test-model");
        index.upsert(entry("v1", 1.0, "Pepito")).await.unwrap();
        index.delete_by_source(SourceKind::Recording, "v1").await.unwrap();
        let stats = index.stats().await.unwrap();
        assert_eq!(stats.count, 0);
    }
}
