//! Durable, transactional metadata store for ingestion records.

pub mod record;
pub mod sqlite;

pub use record::{Page, PageResult, RecordFilter};
pub use sqlite::SqliteStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("compare-and-swap conflict: {0}")]
    Conflict(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl From<StoreError> for clinrag_core::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => clinrag_core::Error::NotFound(id),
            StoreError::Conflict(id) => clinrag_core::Error::Conflict(id),
            StoreError::Connection(msg) => clinrag_core::Error::Internal(format!("store connection: {msg}")),
            StoreError::Corrupt(msg) => clinrag_core::Error::Internal(format!("store corrupt row: {msg}")),
        }
    }
}
