//! Qdrant-backed vector index. The production `VectorIndex` backend.

use async_trait::async_trait;
use clinrag_core::{Error, MetadataFilter, Result, ScoredEntry, SearchStrategy, SourceKind, VectorEntry, VectorMetadata, VectorStats, EMBEDDING_DIM};
use qdrant_client::{
    qdrant::{
        point_id::PointIdOptions, value::Kind, vectors_output::VectorsOptions, with_payload_selector::SelectorOptions, CreateCollectionBuilder,
        Distance, GetPointsBuilder, PointId, PointStruct, PointsIdsList, ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder,
        VectorParamsBuilder, WithPayloadSelector,
    },
    Qdrant,
};
use std::collections::HashMap;

use crate::filter::matches_all;
use crate::fuzzy::fuzzy_name_score;
use crate::index_trait::VectorIndex;

pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    model_id: String,
}

impl QdrantIndex {
    pub async fn connect(endpoint: &str, collection: impl Into<String>, model_id: impl Into<String>) -> Result<Self> {
        let client = Qdrant::from_url(endpoint)
            .build()
            .map_err(|e| Error::ProviderUnavailable(format!("qdrant connect: {e}")))?;
        let index = Self { client, collection: collection.into(), model_id: model_id.into() };
        index.ensure_collection().await?;
        Ok(index)
    }

    /// Auto-initializes the collection on first write.
    async fn ensure_collection(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| Error::ProviderUnavailable(format!("qdrant: {e}")))?;
        if !exists {
            self.client
                .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(EMBEDDING_DIM as u64, Distance::Cosine)),
                )
                .await
                .map_err(|e| Error::ProviderUnavailable(format!("qdrant create_collection: {e}")))?;
        }
        Ok(())
    }

    fn point_payload(entry: &VectorEntry) -> HashMap<String, qdrant_client::qdrant::Value> {
        let mut payload = HashMap::new();
        payload.insert("payload_text".to_string(), entry.payload_text.clone().into());
        payload.insert("source_kind".to_string(), source_kind_str(entry.source_kind).into());
        payload.insert("source_id".to_string(), entry.source_id.clone().into());
        if let Some(v) = &entry.metadata.patient_name {
            payload.insert("patient_name".to_string(), v.clone().into());
        }
        if let Some(v) = &entry.metadata.diagnosis {
            payload.insert("diagnosis".to_string(), v.clone().into());
        }
        if !entry.metadata.symptoms.is_empty() {
            payload.insert("symptoms".to_string(), entry.metadata.symptoms.join(", ").into());
        }
        if !entry.metadata.conditions.is_empty() {
            payload.insert("conditions".to_string(), entry.metadata.conditions.join(", ").into());
        }
        if !entry.metadata.medications.is_empty() {
            payload.insert("medications".to_string(), entry.metadata.medications.join(", ").into());
        }
        if let Some(v) = &entry.metadata.date {
            payload.insert("date".to_string(), v.clone().into());
        }
        if let Some(v) = &entry.metadata.speaker_mix {
            payload.insert("speaker_mix".to_string(), v.clone().into());
        }
        if let Some(v) = &entry.metadata.doc_type {
            payload.insert("doc_type".to_string(), v.clone().into());
        }
        payload
    }

    fn payload_to_entry(vector_id: String, embedding: Vec<f32>, payload: HashMap<String, qdrant_client::qdrant::Value>) -> VectorEntry {
        let get_str = |k: &str| payload.get(k).and_then(|v| if let Some(Kind::StringValue(s)) = &v.kind { Some(s.clone()) } else { None });
        let get_list = |k: &str| get_str(k).map(|s| s.split(", ").map(|x| x.to_string()).collect::<Vec<_>>()).unwrap_or_default();

        VectorEntry {
            vector_id,
            source_kind: get_str("source_kind").map(|s| if s == "document" { SourceKind::Document } else { SourceKind::Recording }).unwrap_or(SourceKind::Recording),
            source_id: get_str("source_id").unwrap_or_default(),
            embedding,
            payload_text: get_str("payload_text").unwrap_or_default(),
            metadata: VectorMetadata {
                patient_name: get_str("patient_name"),
                diagnosis: get_str("diagnosis"),
                symptoms: get_list("symptoms"),
                conditions: get_list("conditions"),
                medications: get_list("medications"),
                date: get_str("date"),
                speaker_mix: get_str("speaker_mix"),
                doc_type: get_str("doc_type"),
            },
        }
    }
}

fn source_kind_str(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Recording => "recording",
        SourceKind::Document => "document",
    }
}

fn point_id_to_string(id: Option<PointId>) -> String {
    match id.and_then(|p| p.point_id_options) {
        Some(PointIdOptions::Uuid(u)) => u,
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn upsert(&self, entry: VectorEntry) -> Result<String> {
        if entry.embedding.len() != EMBEDDING_DIM {
            return Err(Error::InvalidInput(format!("dimension mismatch: expected {EMBEDDING_DIM}, got {}", entry.embedding.len())));
        }
        let id = entry.vector_id.clone();
        let point = PointStruct::new(id.clone(), entry.embedding.clone(), Self::point_payload(&entry));
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, vec![point]))
            .await
            .map_err(|e| Error::ProviderUnavailable(format!("qdrant upsert: {e}")))?;
        Ok(id)
    }

    async fn delete(&self, vector_id: &str) -> Result<()> {
        self.client
            .delete_points(qdrant_client::qdrant::DeletePointsBuilder::new(&self.collection).points(PointsIdsList {
                    ids: vec![PointId::from(vector_id.to_string())],
            }))
            .await
            .map_err(|e| Error::ProviderUnavailable(format!("qdrant delete: {e}")))?;
        Ok(())
    }

    async fn delete_by_source(&self, source_kind: SourceKind, source_id: &str) -> Result<()> {
        // Qdrant point ids are derived from vector_id, not source_id, so
        // scan for matching payloads then delete by id.
        let matches = self.search_by_field("source_id", source_id, SearchStrategy::Exact, 256).await?;
        let ids: Vec<PointId> = matches
            .into_iter()
            .filter(|m| m.entry.source_kind == source_kind)
            .map(|m| PointId::from(m.entry.vector_id))
            .collect();
        if ids.is_empty() {
            return Ok(());
        }
        self.client
            .delete_points(qdrant_client::qdrant::DeletePointsBuilder::new(&self.collection).points(PointsIdsList { ids }))
            .await
            .map_err(|e| Error::ProviderUnavailable(format!("qdrant delete_by_source: {e}")))?;
        Ok(())
    }

    async fn search(&self, query_vector: &[f32], k: usize, filters: &[MetadataFilter], min_score: f32) -> Result<Vec<ScoredEntry>> {
        if query_vector.len() != EMBEDDING_DIM {
            return Err(Error::InvalidInput(format!("dimension mismatch: expected {EMBEDDING_DIM}, got {}", query_vector.len())));
        }
        // Over-fetch and filter client-side: the closed metadata schema
        // is small enough that this stays well within the deadline
        // budget, and it keeps filter semantics identical to `MemoryIndex`.
        let fetch_k = (k * 4).max(50) as u64;
        let results = self
            .client
            .search_points(SearchPointsBuilder::new(&self.collection, query_vector.to_vec(), fetch_k).with_payload(true))
            .await
            .map_err(|e| Error::ProviderUnavailable(format!("qdrant search: {e}")))?;

        let mut scored: Vec<ScoredEntry> = results
            .result
            .into_iter()
            .map(|point| {
                let id = point_id_to_string(point.id);
                let entry = Self::payload_to_entry(id, vec![], point.payload);
                ScoredEntry { entry, similarity: point.score }
            })
            .filter(|s| s.similarity >= min_score && matches_all(&s.entry.metadata, filters))
            .collect();

        scored.sort_by(|a, b| {
                b.similarity
                    .partial_cmp(&a.similarity)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| b.entry.metadata.date.cmp(&a.entry.metadata.date))
                    .then_with(|| a.entry.source_id.cmp(&b.entry.source_id))
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn search_by_field(&self, field: &str, value: &str, strategy: SearchStrategy, k: usize) -> Result<Vec<ScoredEntry>> {
        // Patient-name lookup isn't a similarity search, so scroll the
        // collection and score candidates client-side (mirrors `MemoryIndex`).
        let selector = WithPayloadSelector { selector_options: Some(SelectorOptions::Enable(true)) };
        let points = self
            .client
            .scroll(ScrollPointsBuilder::new(&self.collection).limit(1000).with_payload(selector))
            .await
            .map_err(|e| Error::ProviderUnavailable(format!("qdrant scroll: {e}")))?;

        let mut scored: Vec<ScoredEntry> = points
            .result
            .into_iter()
            .filter_map(|point| {
                let id = point_id_to_string(point.id.clone());
                let entry = Self::payload_to_entry(id, vec![], point.payload);
                let candidate = match field {
                    "patient_name" | "patient" => entry.metadata.patient_name.clone(),
                    "source_id" => Some(entry.source_id.clone()),
                    _ => None,
                }?;
                let score = if field == "source_id" {
                    if candidate == value {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    match strategy {
                        SearchStrategy::Exact => {
                            if crate::fuzzy::normalize_name(&candidate) == crate::fuzzy::normalize_name(value) {
                                1.0
                            } else {
                                0.0
                            }
                        }
                        SearchStrategy::Fuzzy => fuzzy_name_score(value, &candidate),
                    }
                };
                if score >= crate::fuzzy::DEFAULT_THRESHOLD || score == 1.0 {
                    Some(ScoredEntry { entry, similarity: score })
                } else {
                    None
                }
            })
            .collect();

        scored.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn stats(&self) -> Result<VectorStats> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .map_err(|e| Error::ProviderUnavailable(format!("qdrant collection_info: {e}")))?;
        let count = info.result.map(|r| r.points_count.unwrap_or(0)).unwrap_or(0);
        Ok(VectorStats { count, dim: EMBEDDING_DIM, model_id: self.model_id.clone() })
    }
}

// Recover an embedding from a point when needed (search results omit
// vectors by default); kept separate so call sites opt in explicitly.
#[allow(dead_code)]
async fn fetch_vector(client: &Qdrant, collection: &str, id: &str) -> Result<Vec<f32>> {
    let points = client
        .get_points(GetPointsBuilder::new(collection, vec![PointId::from(id.to_string())]).with_vectors(true))
        .await
        .map_err(|e| Error::ProviderUnavailable(format!("qdrant get_points: {e}")))?;
    let point = points.result.into_iter().next().ok_or_else(|| Error::NotFound(id.to_string()))?;
    match point.vectors.and_then(|v| v.vectors_options) {
        Some(VectorsOptions::Vector(v)) => Ok(v.data),
        _ => Ok(vec![]),
    }
}
