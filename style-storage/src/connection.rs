//! `DatabaseManager` — single write connection + a small read pool over one
//! SQLite file in WAL mode (§4.8 persisted state, §5: "the feedback store is
//! the only persistent shared mutable resource; writes serialize under a
//! single lock, reads are concurrent").

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::Connection;

use crate::migrations;

const DEFAULT_READER_POOL_SIZE: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    Sqlite { message: String },
    #[error("storage unavailable: {message}")]
    Unavailable { message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sqlite { message: err.to_string() }
    }
}

struct ReaderPool {
    readers: Vec<Mutex<Connection>>,
    next: std::sync::atomic::AtomicUsize,
}

impl ReaderPool {
    fn open(path: &ConnTarget, size: usize) -> Result<Self, StorageError> {
        let mut readers = Vec::with_capacity(size);
        for _ in 0..size {
            let conn = path.open()?;
            conn.pragma_update(None, "query_only", true)?;
            readers.push(Mutex::new(conn));
        }
        Ok(Self {
            readers,
            next: std::sync::atomic::AtomicUsize::new(0),
        })
    }

    fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let index = self.next.fetch_add(1, std::sync::atomic::Ordering::Relaxed) % self.readers.len();
        let conn = self.readers[index].lock().unwrap();
        f(&conn)
    }
}

enum ConnTarget {
    File(PathBuf),
    /// A shared-cache in-memory database identified by a unique name so a
    /// reader pool actually sees the writer's data — plain `:memory:`
    /// connections each get their own private database, which would make
    /// the reader pool read an empty database.
    Memory(String),
}

impl ConnTarget {
    fn new_memory() -> Self {
        static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        Self::Memory(format!("file:style_storage_mem_{id}?mode=memory&cache=shared"))
    }

    fn open(&self) -> Result<Connection, StorageError> {
        let conn = match self {
            Self::File(path) => Connection::open(path)?,
            Self::Memory(uri) => Connection::open_with_flags(
                uri,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                    | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI,
            )?,
        };
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(conn)
    }
}

/// Owns the one writer connection (behind a `Mutex`, §5's single lock) and a
/// small round-robin pool of read-only connections. Opening runs migrations
/// once, on the writer connection.
pub struct DatabaseManager {
    target: ConnTarget,
    path: Option<PathBuf>,
    writer: Mutex<Connection>,
    readers: ReaderPool,
}

impl DatabaseManager {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Self::open_target(ConnTarget::File(path.to_path_buf()), Some(path.to_path_buf()))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::open_target(ConnTarget::new_memory(), None)
    }

    fn open_target(target: ConnTarget, path: Option<PathBuf>) -> Result<Self, StorageError> {
        let writer_conn = target.open()?;
        migrations::run(&writer_conn)?;
        let readers = ReaderPool::open(&target, DEFAULT_READER_POOL_SIZE)?;
        Ok(Self {
            target,
            path,
            writer: Mutex::new(writer_conn),
            readers,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Serialized write access — the only mutation path into the database.
    pub fn with_writer<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let conn = self.writer.lock().unwrap();
        f(&conn)
    }

    /// Concurrent read access via the round-robin reader pool.
    pub fn with_reader<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        self.readers.with_reader(f)
    }

    /// A dedicated connection handed off to `BatchWriter`'s writer thread.
    pub fn open_batch_connection(&self) -> Result<Connection, StorageError> {
        self.target.open()
    }

    pub fn checkpoint(&self) -> Result<(), StorageError> {
        let conn = self.writer.lock().unwrap();
        conn.pragma_update(None, "wal_checkpoint", "TRUNCATE")?;
        Ok(())
    }
}
