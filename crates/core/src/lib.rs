//! Core types and traits shared across the ingestion-and-RAG engine.
//!
//! This crate has no I/O of its own. It defines:
//! - the provider adapter traits: [`traits::Asr`], [`traits::LanguageModel`],
//! [`traits::Embedder`], [`traits::Ocr`],
//! - the record types persisted by the record store: [`domain::Recording`], [`domain::Document`],
//! - the vector index's entry and query types: [`vector::VectorEntry`], [`vector::VectorMetadata`],
//! - the diarization output types: [`speaker::SpeakerSegment`], [`speaker::SpeakerStats`],
//! - the query-side ephemerals: [`query::QueryPlan`], [`query::RagContext`],
//! - the shared error taxonomy: [`error::Error`].

pub mod domain;
pub mod error;
pub mod llm_types;
pub mod query;
pub mod speaker;
pub mod traits;
pub mod vector;

pub use domain::{Document, FieldMap, FileKind, IngestStatus, Recording, StatusEvent};
pub use error::{Error, Result};
pub use llm_types::{CompletionParams, GenerateRequest, GenerateResponse, Message, Role};
pub use query::{ChatResult, Entities, Intent, QueryPlan, RagContext, RankedContext};
pub use speaker::{SpeakerRole, SpeakerSegment, SpeakerStats};
pub use traits::{Asr, AsrSegment, Embedder, ImageExtract, LanguageModel, Ocr, PdfExtract, TranscribeHints, TranscribeResult};
pub use vector::{FilterOp, MetadataFilter, ScoredEntry, SearchStrategy, SourceKind, VectorEntry, VectorMetadata, VectorStats, EMBEDDING_DIM};
