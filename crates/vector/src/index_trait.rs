//! The vector index capability.

use async_trait::async_trait;
use clinrag_core::{MetadataFilter, Result, SearchStrategy, SourceKind, VectorEntry, VectorStats};

/// Similarity search over embedded entries, with metadata filtering and
/// a secondary fuzzy/exact field lookup for patient names.
///
/// Implementations:
/// - `QdrantIndex` - production backend
/// - `MemoryIndex` - deterministic in-process fallback (tests, offline demos)
#[async_trait]
pub trait VectorIndex: Send + Sync + 'static {
    /// Replace any existing entry with the same `vector_id`.
    async fn upsert(&self, entry: VectorEntry) -> Result<String>;

    async fn delete(&self, vector_id: &str) -> Result<()>;

    async fn delete_by_source(&self, source_kind: SourceKind, source_id: &str) -> Result<()>;

    /// Top-k by cosine similarity, after metadata filters are applied.
    /// Ordering: similarity desc, ties broken by `date` desc then
    /// `source_id` asc.
    async fn search(
        &self,
        query_vector: &[f32],
        k: usize,
        filters: &[MetadataFilter],
        min_score: f32,
    ) -> Result<Vec<clinrag_core::ScoredEntry>>;

    /// Patient-name lookup by exact or fuzzy match.
    async fn search_by_field(&self, field: &str, value: &str, strategy: SearchStrategy, k: usize) -> Result<Vec<clinrag_core::ScoredEntry>>;

    async fn stats(&self) -> Result<VectorStats>;
}
