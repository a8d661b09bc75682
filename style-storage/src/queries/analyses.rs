//! `analyses` table queries (§6).

use rusqlite::{params, Connection};

use crate::connection::StorageError;

#[derive(Debug, Clone)]
pub struct AnalysisRow {
    pub analysis_id: String,
    pub document_id: String,
    pub status: String,
    pub started_at: i64,
    pub completed_at: Option<i64>,
    pub threshold_fingerprint: String,
}

pub fn insert_started(
    conn: &Connection,
    analysis_id: &str,
    document_id: &str,
    started_at: i64,
    threshold_fingerprint: &str,
) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO analyses (analysis_id, document_id, status, started_at, completed_at, threshold_fingerprint)
         VALUES (?1, ?2, 'running', ?3, NULL, ?4)",
    )?
    .execute(params![analysis_id, document_id, started_at, threshold_fingerprint])?;
    Ok(())
}

pub fn complete(conn: &Connection, analysis_id: &str, status: &str, completed_at: i64) -> Result<(), StorageError> {
    conn.prepare_cached("UPDATE analyses SET status = ?2, completed_at = ?3 WHERE analysis_id = ?1")?
        .execute(params![analysis_id, status, completed_at])?;
    Ok(())
}

pub fn get(conn: &Connection, analysis_id: &str) -> Result<Option<AnalysisRow>, StorageError> {
    conn.prepare_cached(
        "SELECT analysis_id, document_id, status, started_at, completed_at, threshold_fingerprint
         FROM analyses WHERE analysis_id = ?1",
    )?
    .query_row(params![analysis_id], |row| {
        Ok(AnalysisRow {
            analysis_id: row.get(0)?,
            document_id: row.get(1)?,
            status: row.get(2)?,
            started_at: row.get(3)?,
            completed_at: row.get(4)?,
            threshold_fingerprint: row.get(5)?,
        })
    })
    .map(Some)
    .or_else(|err| match err {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(StorageError::from(other)),
    })
}
