//! Schema migrations (§6 persisted state). One idempotent `CREATE TABLE IF
//! NOT EXISTS` pass, run once per `DatabaseManager::open*`; no migration
//! versioning table yet since the schema has never changed shape.

use rusqlite::Connection;

use crate::connection::StorageError;

pub fn run(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS user_sessions (
            session_id TEXT PRIMARY KEY,
            user_agent TEXT NOT NULL,
            ip_hash TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS documents (
            document_id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES user_sessions(session_id),
            format TEXT NOT NULL,
            content_type TEXT NOT NULL,
            byte_size INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_documents_session ON documents(session_id);

        CREATE TABLE IF NOT EXISTS analyses (
            analysis_id TEXT PRIMARY KEY,
            document_id TEXT NOT NULL REFERENCES documents(document_id),
            status TEXT NOT NULL,
            started_at INTEGER NOT NULL,
            completed_at INTEGER,
            threshold_fingerprint TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_analyses_document ON analyses(document_id);

        CREATE TABLE IF NOT EXISTS violations (
            violation_id TEXT PRIMARY KEY,
            analysis_id TEXT NOT NULL REFERENCES analyses(analysis_id),
            rule_id TEXT NOT NULL,
            severity TEXT NOT NULL,
            confidence REAL NOT NULL,
            start INTEGER NOT NULL,
            end INTEGER NOT NULL,
            line INTEGER NOT NULL,
            column INTEGER NOT NULL,
            message TEXT NOT NULL,
            suggestion TEXT,
            context_before TEXT,
            context_after TEXT,
            meta_json TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_violations_analysis ON violations(analysis_id);

        CREATE TABLE IF NOT EXISTS feedback (
            feedback_id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES user_sessions(session_id),
            violation_id TEXT NOT NULL,
            feedback_kind TEXT NOT NULL,
            confidence_rating REAL,
            user_reason TEXT,
            ip_hash TEXT NOT NULL,
            ua TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_feedback_session ON feedback(session_id);
        CREATE INDEX IF NOT EXISTS idx_feedback_created_at ON feedback(created_at);
        ",
    )?;
    Ok(())
}
