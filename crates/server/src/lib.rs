//! API façade (C10): the HTTP surface over the ingestion orchestrator
//! and the query/retrieve/generate pipeline.

pub mod dto;
pub mod error;
pub mod health;
pub mod http;
pub mod providers;
pub mod state;

pub use http::create_router;
pub use state::AppState;
