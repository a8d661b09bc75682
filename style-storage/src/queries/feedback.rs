//! `feedback` table queries (§6, §4.7).

use rusqlite::{params, Connection};

use style_core::model::session::{Feedback, FeedbackKind};

use crate::connection::StorageError;

pub fn insert(conn: &Connection, feedback_id: &str, feedback: &Feedback) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO feedback
         (feedback_id, session_id, violation_id, feedback_kind, confidence_rating,
          user_reason, ip_hash, ua, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?
    .execute(params![
        feedback_id,
        feedback.session_id,
        feedback.violation_id,
        feedback.feedback_kind.name(),
        feedback.confidence_rating,
        feedback.user_reason,
        feedback.ip_hash,
        feedback.user_agent,
        feedback.timestamp,
    ])?;
    Ok(())
}

pub fn for_session(conn: &Connection, session_id: &str) -> Result<Vec<Feedback>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT session_id, violation_id, feedback_kind, confidence_rating, user_reason, ip_hash, ua, created_at
         FROM feedback WHERE session_id = ?1 ORDER BY created_at",
    )?;
    let rows = stmt
        .query_map(params![session_id], row_to_feedback)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// All feedback with `created_at >= since_millis`, for `insights(days_back)`.
pub fn since(conn: &Connection, since_millis: i64) -> Result<Vec<Feedback>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT session_id, violation_id, feedback_kind, confidence_rating, user_reason, ip_hash, ua, created_at
         FROM feedback WHERE created_at >= ?1",
    )?;
    let rows = stmt
        .query_map(params![since_millis], row_to_feedback)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete(conn: &Connection, session_id: &str, feedback_id: &str) -> Result<bool, StorageError> {
    let affected = conn
        .prepare_cached("DELETE FROM feedback WHERE session_id = ?1 AND feedback_id = ?2")?
        .execute(params![session_id, feedback_id])?;
    Ok(affected > 0)
}

fn row_to_feedback(row: &rusqlite::Row<'_>) -> rusqlite::Result<Feedback> {
    let kind_str: String = row.get(2)?;
    Ok(Feedback {
        session_id: row.get(0)?,
        violation_id: row.get(1)?,
        error_type: String::new(),
        error_message: String::new(),
        feedback_kind: FeedbackKind::parse_str(&kind_str).unwrap_or(FeedbackKind::Incorrect),
        confidence_rating: row.get(3)?,
        user_reason: row.get(4)?,
        ip_hash: row.get(5)?,
        user_agent: row.get(6)?,
        timestamp: row.get(7)?,
    })
}
