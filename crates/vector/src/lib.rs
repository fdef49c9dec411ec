//! Vector index (C3): embeds and retrieves conversation/document excerpts
//! with medical metadata filtering and fuzzy patient-name lookup.

mod filter;
mod fuzzy;
mod index_trait;
mod memory;
mod payload;
mod qdrant;

pub use filter::{matches, matches_all};
pub use fuzzy::{fuzzy_name_score, normalize_name, DEFAULT_THRESHOLD};
pub use index_trait::VectorIndex;
pub use memory::MemoryIndex;
pub use payload::{build_payload_text, truncate_utf8_safe};
pub use qdrant::QdrantIndex;
