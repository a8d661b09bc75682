//! `documents` table queries (§6).

use rusqlite::{params, Connection};

use crate::batch::commands::DocumentRow;
use crate::connection::StorageError;

pub fn insert(conn: &Connection, row: &DocumentRow) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO documents (document_id, session_id, format, content_type, byte_size, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?
    .execute(params![
        row.document_id,
        row.session_id,
        row.format,
        row.content_type,
        row.byte_size,
        row.created_at,
    ])?;
    Ok(())
}

pub fn get(conn: &Connection, document_id: &str) -> Result<Option<DocumentRow>, StorageError> {
    conn.prepare_cached(
        "SELECT document_id, session_id, format, content_type, byte_size, created_at
         FROM documents WHERE document_id = ?1",
    )?
    .query_row(params![document_id], |row| {
        Ok(DocumentRow {
            document_id: row.get(0)?,
            session_id: row.get(1)?,
            format: row.get(2)?,
            content_type: row.get(3)?,
            byte_size: row.get(4)?,
            created_at: row.get(5)?,
        })
    })
    .map(Some)
    .or_else(|err| match err {
        rusqlite::Error::QueryReturnedNoRows => Ok(None),
        other => Err(StorageError::from(other)),
    })
}
