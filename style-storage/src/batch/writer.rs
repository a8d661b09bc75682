//! Dedicated writer thread with a `crossbeam_channel` bounded(1024) inbox;
//! batches writes into single transactions for throughput (§5: one worker
//! pool per concern, cooperative I/O at the external boundary).

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use rusqlite::{params, Connection};

use crate::connection::StorageError;
use crate::queries;

use super::commands::BatchCommand;

const CHANNEL_BOUND: usize = 1024;
const BATCH_SIZE: usize = 500;
const FLUSH_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Default, Clone)]
pub struct WriteStats {
    pub sessions_upserted: usize,
    pub documents_inserted: usize,
    pub analyses_started: usize,
    pub analyses_completed: usize,
    pub violation_rows: usize,
    pub flushes: usize,
}

/// Accepts `BatchCommand`s via a channel and writes them in batched
/// transactions on a dedicated thread; `conn` is moved to that thread.
pub struct BatchWriter {
    tx: Sender<BatchCommand>,
    handle: Option<JoinHandle<Result<WriteStats, StorageError>>>,
}

impl BatchWriter {
    pub fn new(conn: Connection) -> Self {
        let (tx, rx) = bounded(CHANNEL_BOUND);
        let handle = thread::Builder::new()
            .name("style-storage-batch-writer".to_string())
            .spawn(move || writer_loop(conn, rx))
            .expect("failed to spawn batch writer thread");
        Self { tx, handle: Some(handle) }
    }

    pub fn send(&self, cmd: BatchCommand) -> Result<(), StorageError> {
        self.tx.send(cmd).map_err(|_| StorageError::Unavailable {
            message: "batch writer channel disconnected".to_string(),
        })
    }

    /// Fire-and-forget flush.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.send(BatchCommand::Flush)
    }

    /// Flush and block until the writer thread confirms the commit.
    pub fn flush_sync(&self) -> Result<(), StorageError> {
        let (tx, rx) = std::sync::mpsc::sync_channel(0);
        self.send(BatchCommand::FlushSync(tx))?;
        rx.recv().map_err(|_| StorageError::Unavailable {
            message: "batch writer thread did not respond to flush_sync".to_string(),
        })
    }

    pub fn shutdown(mut self) -> Result<WriteStats, StorageError> {
        let _ = self.tx.send(BatchCommand::Shutdown);
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| StorageError::Unavailable {
                message: "batch writer thread panicked".to_string(),
            })?,
            None => Ok(WriteStats::default()),
        }
    }
}

impl Drop for BatchWriter {
    fn drop(&mut self) {
        let _ = self.tx.send(BatchCommand::Shutdown);
    }
}

fn writer_loop(conn: Connection, rx: Receiver<BatchCommand>) -> Result<WriteStats, StorageError> {
    let mut buffer: Vec<BatchCommand> = Vec::with_capacity(BATCH_SIZE);
    let mut stats = WriteStats::default();

    loop {
        match rx.recv_timeout(FLUSH_TIMEOUT) {
            Ok(BatchCommand::Shutdown) => {
                flush_buffer(&conn, &mut buffer, &mut stats)?;
                break;
            }
            Ok(BatchCommand::Flush) => {
                flush_buffer(&conn, &mut buffer, &mut stats)?;
            }
            Ok(BatchCommand::FlushSync(done_tx)) => {
                flush_buffer(&conn, &mut buffer, &mut stats)?;
                let _ = done_tx.send(());
            }
            Ok(cmd) => {
                buffer.push(cmd);
                if buffer.len() >= BATCH_SIZE {
                    flush_buffer(&conn, &mut buffer, &mut stats)?;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if !buffer.is_empty() {
                    flush_buffer(&conn, &mut buffer, &mut stats)?;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                flush_buffer(&conn, &mut buffer, &mut stats)?;
                break;
            }
        }
    }

    Ok(stats)
}

fn flush_buffer(conn: &Connection, buffer: &mut Vec<BatchCommand>, stats: &mut WriteStats) -> Result<(), StorageError> {
    if buffer.is_empty() {
        return Ok(());
    }

    let tx = conn.unchecked_transaction()?;
    let mut batch_stats = WriteStats::default();

    for cmd in buffer.iter() {
        match cmd {
            BatchCommand::UpsertSession { session_id, user_agent, ip_hash, created_at } => {
                tx.prepare_cached(
                    "INSERT INTO user_sessions (session_id, user_agent, ip_hash, created_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(session_id) DO UPDATE SET user_agent = excluded.user_agent",
                )?
                .execute(params![session_id, user_agent, ip_hash, created_at])?;
                batch_stats.sessions_upserted += 1;
            }
            BatchCommand::InsertDocument(row) => {
                queries::documents::insert(&tx, row)?;
                batch_stats.documents_inserted += 1;
            }
            BatchCommand::InsertAnalysisStarted { analysis_id, document_id, started_at, threshold_fingerprint } => {
                queries::analyses::insert_started(&tx, analysis_id, document_id, *started_at, threshold_fingerprint)?;
                batch_stats.analyses_started += 1;
            }
            BatchCommand::CompleteAnalysis { analysis_id, status, completed_at } => {
                queries::analyses::complete(&tx, analysis_id, status, *completed_at)?;
                batch_stats.analyses_completed += 1;
            }
            BatchCommand::InsertViolations(rows) => {
                queries::violations::insert_many(&tx, rows)?;
                batch_stats.violation_rows += rows.len();
            }
            BatchCommand::Flush | BatchCommand::FlushSync(_) | BatchCommand::Shutdown => {}
        }
    }

    tx.commit()?;

    stats.sessions_upserted += batch_stats.sessions_upserted;
    stats.documents_inserted += batch_stats.documents_inserted;
    stats.analyses_started += batch_stats.analyses_started;
    stats.analyses_completed += batch_stats.analyses_completed;
    stats.violation_rows += batch_stats.violation_rows;
    stats.flushes += 1;
    buffer.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::DatabaseManager;

    #[test]
    fn flush_sync_blocks_until_rows_are_visible() {
        let db = DatabaseManager::open_in_memory().unwrap();
        let conn = db.open_batch_connection().unwrap();
        let writer = BatchWriter::new(conn);

        writer
            .send(BatchCommand::UpsertSession {
                session_id: "s1".to_string(),
                user_agent: "test-agent".to_string(),
                ip_hash: "hash".to_string(),
                created_at: 0,
            })
            .unwrap();
        writer.flush_sync().unwrap();

        let count: i64 = db
            .with_reader(|conn| {
                conn.query_row("SELECT count(*) FROM user_sessions", [], |row| row.get(0))
                    .map_err(StorageError::from)
            })
            .unwrap();
        assert_eq!(count, 1);
    }
}
