//! `BatchCommand` — the write operations the batch writer thread accepts.

use std::sync::mpsc::SyncSender;

/// A violation row as prepared for insertion (§6 persisted-state layout).
#[derive(Debug, Clone)]
pub struct ViolationRow {
    pub violation_id: String,
    pub analysis_id: String,
    pub rule_id: String,
    pub severity: String,
    pub confidence: f64,
    pub start: i64,
    pub end: i64,
    pub line: i64,
    pub column: i64,
    pub message: String,
    pub suggestion: Option<String>,
    pub context_before: Option<String>,
    pub context_after: Option<String>,
    pub meta_json: String,
}

/// A document row as prepared for insertion.
#[derive(Debug, Clone)]
pub struct DocumentRow {
    pub document_id: String,
    pub session_id: String,
    pub format: String,
    pub content_type: String,
    pub byte_size: i64,
    pub created_at: i64,
}

#[derive(Debug)]
pub enum BatchCommand {
    UpsertSession { session_id: String, user_agent: String, ip_hash: String, created_at: i64 },
    InsertDocument(DocumentRow),
    InsertAnalysisStarted { analysis_id: String, document_id: String, started_at: i64, threshold_fingerprint: String },
    CompleteAnalysis { analysis_id: String, status: String, completed_at: i64 },
    InsertViolations(Vec<ViolationRow>),
    /// Flush any pending writes immediately (fire-and-forget).
    Flush,
    /// Flush and signal completion via the provided sender (synchronous).
    FlushSync(SyncSender<()>),
    /// Shut down the writer thread.
    Shutdown,
}
