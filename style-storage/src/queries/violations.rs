//! `violations` table queries (§6).

use rusqlite::{params, Connection};

use crate::batch::commands::ViolationRow;
use crate::connection::StorageError;

pub fn insert_many(conn: &Connection, rows: &[ViolationRow]) -> Result<usize, StorageError> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO violations
         (violation_id, analysis_id, rule_id, severity, confidence, start, end, line, column,
          message, suggestion, context_before, context_after, meta_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )?;

    let mut count = 0;
    for row in rows {
        stmt.execute(params![
            row.violation_id,
            row.analysis_id,
            row.rule_id,
            row.severity,
            row.confidence,
            row.start,
            row.end,
            row.line,
            row.column,
            row.message,
            row.suggestion,
            row.context_before,
            row.context_after,
            row.meta_json,
        ])?;
        count += 1;
    }
    Ok(count)
}

pub fn for_analysis(conn: &Connection, analysis_id: &str) -> Result<Vec<ViolationRow>, StorageError> {
    let mut stmt = conn.prepare_cached(
        "SELECT violation_id, analysis_id, rule_id, severity, confidence, start, end, line, column,
                message, suggestion, context_before, context_after, meta_json
         FROM violations WHERE analysis_id = ?1 ORDER BY line, column",
    )?;
    let rows = stmt
        .query_map(params![analysis_id], |row| {
            Ok(ViolationRow {
                violation_id: row.get(0)?,
                analysis_id: row.get(1)?,
                rule_id: row.get(2)?,
                severity: row.get(3)?,
                confidence: row.get(4)?,
                start: row.get(5)?,
                end: row.get(6)?,
                line: row.get(7)?,
                column: row.get(8)?,
                message: row.get(9)?,
                suggestion: row.get(10)?,
                context_before: row.get(11)?,
                context_after: row.get(12)?,
                meta_json: row.get(13)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
