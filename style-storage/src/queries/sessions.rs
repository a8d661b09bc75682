//! `user_sessions` table queries (§6).

use rusqlite::{params, Connection};

use crate::connection::StorageError;

pub fn upsert(conn: &Connection, session_id: &str, user_agent: &str, ip_hash: &str, created_at: i64) -> Result<(), StorageError> {
    conn.prepare_cached(
        "INSERT INTO user_sessions (session_id, user_agent, ip_hash, created_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(session_id) DO UPDATE SET user_agent = excluded.user_agent",
    )?
    .execute(params![session_id, user_agent, ip_hash, created_at])?;
    Ok(())
}

pub fn exists(conn: &Connection, session_id: &str) -> Result<bool, StorageError> {
    let count: i64 = conn
        .prepare_cached("SELECT count(*) FROM user_sessions WHERE session_id = ?1")?
        .query_row(params![session_id], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_then_upsert_again_updates_in_place() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run(&conn).unwrap();
        upsert(&conn, "s1", "agent-a", "hash", 0).unwrap();
        upsert(&conn, "s1", "agent-b", "hash", 0).unwrap();

        let count: i64 = conn.query_row("SELECT count(*) FROM user_sessions", [], |row| row.get(0)).unwrap();
        assert_eq!(count, 1);
        assert!(exists(&conn, "s1").unwrap());
    }
}
