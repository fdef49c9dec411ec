//! SQLite-backed record store.
//!
//! Recordings and documents each get their own table; structured data
//! that has no natural relational shape (the field maps, speaker
//! segments, status history) is stored as JSON text columns, following
//! the same "typed struct in, JSON column out" approach the vector
//! index's metadata payload uses.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use clinrag_core::{Document, FileKind, IngestStatus, Recording};
use dashmap::DashMap;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use tokio::sync::Mutex as AsyncMutex;

use crate::record::{Page, PageResult, RecordFilter};
use crate::StoreError;

/// Serializes mutations per record id in-process, on top of the CAS
/// guarantee the SQL statements themselves provide.
type LockRegistry = DashMap<String, Arc<AsyncMutex<()>>>;

pub struct SqliteStore {
    pool: SqlitePool,
    locks: LockRegistry,
}

impl SqliteStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let store = Self { pool, locks: DashMap::new() };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS recordings (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                size_bytes INTEGER NOT NULL,
                mime TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                transcript_text TEXT,
                structured TEXT,
                unstructured TEXT,
                language TEXT,
                duration_s REAL,
                confidence REAL,
                vector_id TEXT,
                speaker_segments TEXT,
                speaker_stats TEXT,
                error TEXT,
                diarization_processed INTEGER NOT NULL DEFAULT 0,
                vector_stored INTEGER NOT NULL DEFAULT 0,
                status_history TEXT NOT NULL DEFAULT '[]'
            );
            CREATE INDEX IF NOT EXISTS idx_recordings_status ON recordings(status);
            CREATE INDEX IF NOT EXISTS idx_recordings_created_at ON recordings(created_at DESC);
            "#,
            )
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                size_bytes INTEGER NOT NULL,
                mime TEXT NOT NULL,
                file_kind TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                page_count INTEGER,
                ocr_confidence REAL,
                extracted_text TEXT,
                patient_name TEXT,
                document_date TEXT,
                document_type TEXT,
                conditions TEXT NOT NULL DEFAULT '[]',
                medications TEXT NOT NULL DEFAULT '[]',
                procedures TEXT NOT NULL DEFAULT '[]',
                recording_id TEXT,
                vector_id TEXT,
                error TEXT,
                vector_stored INTEGER NOT NULL DEFAULT 0,
                status_history TEXT NOT NULL DEFAULT '[]'
            );
            CREATE INDEX IF NOT EXISTS idx_documents_status ON documents(status);
            CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents(created_at DESC);
            CREATE INDEX IF NOT EXISTS idx_documents_patient_name ON documents(patient_name);
            "#,
            )
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn lock_for(&self, id: &str) -> Arc<AsyncMutex<()>> {
        self.locks.entry(id.to_string()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
    }

    // ---- Recordings ----------------------------------------------------

    pub async fn create_recording(&self, rec: &Recording) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO recordings
            (id, filename, size_bytes, mime, status, created_at, updated_at, status_history)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(&rec.id)
            .bind(&rec.filename)
            .bind(rec.size_bytes as i64)
            .bind(&rec.mime)
            .bind(status_str(rec.status))
            .bind(rec.created_at.to_rfc3339())
            .bind(rec.updated_at.to_rfc3339())
            .bind(serde_json::to_string(&rec.status_history).unwrap_or_else(|_| "[]".into()))
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }

    pub async fn get_recording(&self, id: &str) -> Result<Recording, StoreError> {
        let row = sqlx::query("SELECT * FROM recordings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row_to_recording(&row)
    }

    pub async fn list_recordings(&self, filter: &RecordFilter, page: Page) -> Result<PageResult<Recording>, StoreError> {
        let mut where_clauses = Vec::new();
        if filter.status.is_some() {
            where_clauses.push("status = ?");
        }
        if filter.from.is_some() {
            where_clauses.push("created_at >= ?");
        }
        if filter.to.is_some() {
            where_clauses.push("created_at <= ?");
        }
        let where_sql = if where_clauses.is_empty() { String::new() } else { format!("WHERE {}", where_clauses.join(" AND ")) };

        let count_sql = format!("SELECT COUNT(*) as c FROM recordings {where_sql}");
        let mut count_query = sqlx::query(&count_sql);
        count_query = bind_filter(count_query, filter);
        let total: i64 = count_query.fetch_one(&self.pool).await.map_err(|e| StoreError::Connection(e.to_string()))?.get("c");

        let list_sql = format!("SELECT * FROM recordings {where_sql} ORDER BY created_at DESC, id ASC LIMIT ? OFFSET ?");
        let mut list_query = sqlx::query(&list_sql);
        list_query = bind_filter(list_query, filter);
        list_query = list_query.bind(page.limit()).bind(page.offset());

        let rows = list_query.fetch_all(&self.pool).await.map_err(|e| StoreError::Connection(e.to_string()))?;
        let items = rows.iter().map(row_to_recording).collect::<Result<Vec<_>, _>>()?;

        Ok(PageResult { items, total: total.max(0) as u64, page: page.page, size: page.size })
    }

    /// Compare-and-swap update on `updated_at`: fails with `Conflict` if
    /// the row's current `updated_at` doesn't match `expected_updated_at`.
    pub async fn update_recording(&self, rec: &Recording, expected_updated_at: DateTime<Utc>) -> Result<(), StoreError> {
        let _guard = self.lock_for(&rec.id).await.lock_owned().await;
        let now = Utc::now();
        let result = sqlx::query(
            r#"UPDATE recordings SET
            status = ?, updated_at = ?, transcript_text = ?, structured = ?, unstructured = ?,
            language = ?, duration_s = ?, confidence = ?, vector_id = ?, speaker_segments = ?,
            speaker_stats = ?, error = ?, diarization_processed = ?, vector_stored = ?, status_history = ?
            WHERE id = ? AND updated_at = ?"#,
            )
            .bind(status_str(rec.status))
            .bind(now.to_rfc3339())
            .bind(&rec.transcript_text)
            .bind(rec.structured.as_ref().map(|m| serde_json::to_string(m).unwrap_or_default()))
            .bind(rec.unstructured.as_ref().map(|m| serde_json::to_string(m).unwrap_or_default()))
            .bind(&rec.language)
            .bind(rec.duration_s)
            .bind(rec.confidence)
            .bind(&rec.vector_id)
            .bind(rec.speaker_segments.as_ref().map(|s| serde_json::to_string(s).unwrap_or_default()))
            .bind(rec.speaker_stats.as_ref().map(|s| serde_json::to_string(s).unwrap_or_default()))
            .bind(&rec.error)
            .bind(rec.diarization_processed)
            .bind(rec.vector_stored)
            .bind(serde_json::to_string(&rec.status_history).unwrap_or_else(|_| "[]".into()))
            .bind(&rec.id)
            .bind(expected_updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(rec.id.clone()));
        }
        Ok(())
    }

    /// `Transition(id, from, to)`: rejects if the current status isn't
    /// `from`, serialized per id.
    pub async fn transition_recording(
        &self,
        id: &str,
        from: IngestStatus,
        to: IngestStatus,
        detail: Option<String>,
    ) -> Result<Recording, StoreError> {
        let _guard = self.lock_for(id).await.lock_owned().await;
        let mut rec = self.get_recording(id).await?;
        if rec.status != from {
            return Err(StoreError::Conflict(format!("{id}: expected {from:?}, found {:?}", rec.status)));
        }
        let expected_updated_at = rec.updated_at;
        rec.status = to;
        rec.status_history.push(clinrag_core::StatusEvent { from, to, at: Utc::now(), detail });
        self.update_recording(&rec, expected_updated_at).await?;
        rec.updated_at = Utc::now();
        Ok(rec)
    }

    pub async fn delete_recording(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM recordings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.locks.remove(id);
        Ok(())
    }

    // ---- Documents -------------------------------------------------------

    pub async fn create_document(&self, doc: &Document) -> Result<(), StoreError> {
        sqlx::query(
            r#"INSERT INTO documents
            (id, filename, size_bytes, mime, file_kind, status, created_at, updated_at, status_history)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(&doc.id)
            .bind(&doc.filename)
            .bind(doc.size_bytes as i64)
            .bind(&doc.mime)
            .bind(file_kind_str(doc.file_kind))
            .bind(status_str(doc.status))
            .bind(doc.created_at.to_rfc3339())
            .bind(doc.updated_at.to_rfc3339())
            .bind(serde_json::to_string(&doc.status_history).unwrap_or_else(|_| "[]".into()))
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }

    pub async fn get_document(&self, id: &str) -> Result<Document, StoreError> {
        let row = sqlx::query("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        row_to_document(&row)
    }

    pub async fn list_documents(&self, filter: &RecordFilter, page: Page) -> Result<PageResult<Document>, StoreError> {
        let mut where_clauses = Vec::new();
        if filter.status.is_some() {
            where_clauses.push("status = ?");
        }
        if filter.patient.is_some() {
            where_clauses.push("patient_name LIKE ?");
        }
        let where_sql = if where_clauses.is_empty() { String::new() } else { format!("WHERE {}", where_clauses.join(" AND ")) };

        let count_sql = format!("SELECT COUNT(*) as c FROM documents {where_sql}");
        let mut count_query = sqlx::query(&count_sql);
        count_query = bind_document_filter(count_query, filter);
        let total: i64 = count_query.fetch_one(&self.pool).await.map_err(|e| StoreError::Connection(e.to_string()))?.get("c");

        let list_sql = format!("SELECT * FROM documents {where_sql} ORDER BY created_at DESC, id ASC LIMIT ? OFFSET ?");
        let mut list_query = sqlx::query(&list_sql);
        list_query = bind_document_filter(list_query, filter);
        list_query = list_query.bind(page.limit()).bind(page.offset());

        let rows = list_query.fetch_all(&self.pool).await.map_err(|e| StoreError::Connection(e.to_string()))?;
        let items = rows.iter().map(row_to_document).collect::<Result<Vec<_>, _>>()?;

        Ok(PageResult { items, total: total.max(0) as u64, page: page.page, size: page.size })
    }

    pub async fn update_document(&self, doc: &Document, expected_updated_at: DateTime<Utc>) -> Result<(), StoreError> {
        let _guard = self.lock_for(&doc.id).await.lock_owned().await;
        let now = Utc::now();
        let result = sqlx::query(
            r#"UPDATE documents SET
            status = ?, updated_at = ?, page_count = ?, ocr_confidence = ?, extracted_text = ?,
            patient_name = ?, document_date = ?, document_type = ?, conditions = ?, medications = ?,
            procedures = ?, recording_id = ?, vector_id = ?, error = ?, vector_stored = ?, status_history = ?
            WHERE id = ? AND updated_at = ?"#,
            )
            .bind(status_str(doc.status))
            .bind(now.to_rfc3339())
            .bind(doc.page_count)
            .bind(doc.ocr_confidence)
            .bind(&doc.extracted_text)
            .bind(&doc.patient_name)
            .bind(&doc.document_date)
            .bind(&doc.document_type)
            .bind(serde_json::to_string(&doc.conditions).unwrap_or_else(|_| "[]".into()))
            .bind(serde_json::to_string(&doc.medications).unwrap_or_else(|_| "[]".into()))
            .bind(serde_json::to_string(&doc.procedures).unwrap_or_else(|_| "[]".into()))
            .bind(&doc.recording_id)
            .bind(&doc.vector_id)
            .bind(&doc.error)
            .bind(doc.vector_stored)
            .bind(serde_json::to_string(&doc.status_history).unwrap_or_else(|_| "[]".into()))
            .bind(&doc.id)
            .bind(expected_updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict(doc.id.clone()));
        }
        Ok(())
    }

    pub async fn transition_document(
        &self,
        id: &str,
        from: IngestStatus,
        to: IngestStatus,
        detail: Option<String>,
    ) -> Result<Document, StoreError> {
        let _guard = self.lock_for(id).await.lock_owned().await;
        let mut doc = self.get_document(id).await?;
        if doc.status != from {
            return Err(StoreError::Conflict(format!("{id}: expected {from:?}, found {:?}", doc.status)));
        }
        let expected_updated_at = doc.updated_at;
        doc.status = to;
        doc.status_history.push(clinrag_core::StatusEvent { from, to, at: Utc::now(), detail });
        self.update_document(&doc, expected_updated_at).await?;
        doc.updated_at = Utc::now();
        Ok(doc)
    }

    pub async fn delete_document(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.locks.remove(id);
        Ok(())
    }

    /// Best-effort fuzzy patient lookup across recordings, used by the
    /// document pipeline's auto-link step. Actual scoring
    /// is delegated to the caller; this just returns candidates.
    pub async fn recordings_with_patient_like(&self, needle: &str) -> Result<Vec<Recording>, StoreError> {
        let rows = sqlx::query("SELECT * FROM recordings WHERE structured LIKE ?")
            .bind(format!("%{needle}%"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        rows.iter().map(row_to_recording).collect()
    }
}

fn bind_filter<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    filter: &'q RecordFilter,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    if let Some(status) = filter.status {
        q = q.bind(status_str(status));
    }
    if let Some(from) = filter.from {
        q = q.bind(from.to_rfc3339());
    }
    if let Some(to) = filter.to {
        q = q.bind(to.to_rfc3339());
    }
    q
}

fn bind_document_filter<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    filter: &'q RecordFilter,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    if let Some(status) = filter.status {
        q = q.bind(status_str(status));
    }
    if let Some(patient) = &filter.patient {
        q = q.bind(format!("%{patient}%"));
    }
    q
}

fn status_str(status: IngestStatus) -> &'static str {
    match status {
        IngestStatus::Pending => "pending",
        IngestStatus::Transcribing => "transcribing",
        IngestStatus::Extracting => "extracting",
        IngestStatus::Diarizing => "diarizing",
        IngestStatus::Indexing => "indexing",
        IngestStatus::Completed => "completed",
        IngestStatus::Failed => "failed",
    }
}

fn parse_status(s: &str) -> Result<IngestStatus, StoreError> {
    Ok(match s {
            "pending" => IngestStatus::Pending,
            "transcribing" => IngestStatus::Transcribing,
            "extracting" => IngestStatus::Extracting,
            "diarizing" => IngestStatus::Diarizing,
            "indexing" => IngestStatus::Indexing,
            "completed" => IngestStatus::Completed,
            "failed" => IngestStatus::Failed,
            other => return Err(StoreError::Corrupt(format!("unknown status {other}"))),
    })
}

fn file_kind_str(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Pdf => "pdf",
        FileKind::Image => "image",
    }
}

fn parse_file_kind(s: &str) -> Result<FileKind, StoreError> {
    Ok(match s {
            "pdf" => FileKind::Pdf,
            "image" => FileKind::Image,
            other => return Err(StoreError::Corrupt(format!("unknown file_kind {other}"))),
    })
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s).map(|d| d.with_timezone(&Utc)).map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn row_to_recording(row: &sqlx::sqlite::SqliteRow) -> Result<Recording, StoreError> {
    Ok(Recording {
            id: row.try_get("id").map_err(row_err)?,
            filename: row.try_get("filename").map_err(row_err)?,
            size_bytes: row.try_get::<i64, _>("size_bytes").map_err(row_err)? as u64,
            mime: row.try_get("mime").map_err(row_err)?,
            status: parse_status(&row.try_get::<String, _>("status").map_err(row_err)?)?,
            created_at: parse_rfc3339(&row.try_get::<String, _>("created_at").map_err(row_err)?)?,
            updated_at: parse_rfc3339(&row.try_get::<String, _>("updated_at").map_err(row_err)?)?,
            transcript_text: row.try_get("transcript_text").ok(),
            structured: row.try_get::<Option<String>, _>("structured").map_err(row_err)?.and_then(|s| serde_json::from_str(&s).ok()),
            unstructured: row.try_get::<Option<String>, _>("unstructured").map_err(row_err)?.and_then(|s| serde_json::from_str(&s).ok()),
            language: row.try_get("language").ok(),
            duration_s: row.try_get("duration_s").ok(),
            confidence: row.try_get("confidence").ok(),
            vector_id: row.try_get("vector_id").ok(),
            speaker_segments: row.try_get::<Option<String>, _>("speaker_segments").map_err(row_err)?.and_then(|s| serde_json::from_str(&s).ok()),
            speaker_stats: row.try_get::<Option<String>, _>("speaker_stats").map_err(row_err)?.and_then(|s| serde_json::from_str(&s).ok()),
            error: row.try_get("error").ok(),
            diarization_processed: row.try_get("diarization_processed").map_err(row_err)?,
            vector_stored: row.try_get("vector_stored").map_err(row_err)?,
            status_history: serde_json::from_str(&row.try_get::<String, _>("status_history").map_err(row_err)?).unwrap_or_default(),
    })
}

fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Result<Document, StoreError> {
    Ok(Document {
            id: row.try_get("id").map_err(row_err)?,
            filename: row.try_get("filename").map_err(row_err)?,
            size_bytes: row.try_get::<i64, _>("size_bytes").map_err(row_err)? as u64,
            mime: row.try_get("mime").map_err(row_err)?,
            file_kind: parse_file_kind(&row.try_get::<String, _>("file_kind").map_err(row_err)?)?,
            status: parse_status(&row.try_get::<String, _>("status").map_err(row_err)?)?,
            created_at: parse_rfc3339(&row.try_get::<String, _>("created_at").map_err(row_err)?)?,
            updated_at: parse_rfc3339(&row.try_get::<String, _>("updated_at").map_err(row_err)?)?,
            page_count: row.try_get::<Option<i64>, _>("page_count").map_err(row_err)?.map(|v| v as u32),
            ocr_confidence: row.try_get("ocr_confidence").ok(),
            extracted_text: row.try_get("extracted_text").ok(),
            patient_name: row.try_get("patient_name").ok(),
            document_date: row.try_get("document_date").ok(),
            document_type: row.try_get("document_type").ok(),
            conditions: serde_json::from_str(&row.try_get::<String, _>("conditions").map_err(row_err)?).unwrap_or_default(),
            medications: serde_json::from_str(&row.try_get::<String, _>("medications").map_err(row_err)?).unwrap_or_default(),
            procedures: serde_json::from_str(&row.try_get::<String, _>("procedures").map_err(row_err)?).unwrap_or_default(),
            recording_id: row.try_get("recording_id").ok(),
            vector_id: row.try_get("vector_id").ok(),
            error: row.try_get("error").ok(),
            vector_stored: row.try_get("vector_stored").map_err(row_err)?,
            status_history: serde_json::from_str(&row.try_get::<String, _>("status_history").map_err(row_err)?).unwrap_or_default(),
    })
}

fn row_err(e: sqlx::Error) -> StoreError {
    StoreError::Corrupt(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteStore {
        SqliteStore::connect("sqlite::memory:", 1).await.expect("in-memory store")
    }

    #[tokio::test]
    async fn create_and_get_roundtrip() {
        let store = store().await;
        let rec = Recording::new("r1", "a.wav", 1000, "audio/wav");
        store.create_recording(&rec).await.unwrap();
        let fetched = store.get_recording("r1").await.unwrap();
        assert_eq!(fetched.status, IngestStatus::Pending);
    }

    #[tokio::test]
    async fn transition_rejects_wrong_from_state() {
        let store = store().await;
        let rec = Recording::new("r2", "b.wav", 1000, "audio/wav");
        store.create_recording(&rec).await.unwrap();
        let err = store.transition_recording("r2", IngestStatus::Extracting, IngestStatus::Diarizing, None).await;
        assert!(matches!(err, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn transition_advances_and_records_history() {
        let store = store().await;
        let rec = Recording::new("r3", "c.wav", 1000, "audio/wav");
        store.create_recording(&rec).await.unwrap();
        let updated = store.transition_recording("r3", IngestStatus::Pending, IngestStatus::Transcribing, None).await.unwrap();
        assert_eq!(updated.status, IngestStatus::Transcribing);
        assert_eq!(updated.status_history.len(), 1);
    }

    #[tokio::test]
    async fn list_orders_by_created_at_desc() {
        let store = store().await;
        for i in 0..3 {
            let rec = Recording::new(format!("r{i}"), "x.wav", 1, "audio/wav");
            store.create_recording(&rec).await.unwrap();
        }
        let page = store.list_recordings(&RecordFilter::default(), Page::default()).await.unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.total, 3);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let store = store().await;
        let err = store.delete_recording("nope").await;
        assert!(matches!(err, Err(StoreError::NotFound(_))));
    }
}
