//! `SqliteFeedbackStore` — the persisted `FeedbackStorage` implementation
//! (§4.7). Feedback writes go straight through `DatabaseManager::with_writer`
//! rather than the batch writer: the interface promises a synchronous id
//! back to the caller, and §5 already serializes feedback writes under one
//! lock, so there is nothing a batch would buy here.

use style_analysis::feedback::insights::{self, Insights};
use style_analysis::feedback::storage::{feedback_id as compute_feedback_id, FeedbackStorage, SessionStats, StorageError as FeedbackStorageError};
use style_core::ids::{FeedbackId, SessionId};
use style_core::model::session::{Feedback, FeedbackKind};

use crate::connection::{DatabaseManager, StorageError};
use crate::queries;

pub struct SqliteFeedbackStore {
    db: DatabaseManager,
}

impl SqliteFeedbackStore {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

fn to_feedback_storage_error(err: StorageError) -> FeedbackStorageError {
    FeedbackStorageError::Unavailable { message: err.to_string() }
}

impl FeedbackStorage for SqliteFeedbackStore {
    fn store(&self, feedback: &Feedback) -> Result<FeedbackId, FeedbackStorageError> {
        let id = compute_feedback_id(&feedback.session_id, &feedback.violation_id, feedback.timestamp);
        self.db
            .with_writer(|conn| {
                queries::sessions::upsert(conn, &feedback.session_id, &feedback.user_agent, &feedback.ip_hash, feedback.timestamp)?;
                queries::feedback::insert(conn, id.as_str(), feedback)
            })
            .map_err(to_feedback_storage_error)?;
        Ok(id)
    }

    fn stats_for_session(&self, session_id: &SessionId) -> Result<SessionStats, FeedbackStorageError> {
        let rows = self
            .db
            .with_reader(|conn| queries::feedback::for_session(conn, session_id.as_str()))
            .map_err(to_feedback_storage_error)?;

        let mut stats = SessionStats::default();
        for row in &rows {
            stats.total += 1;
            match row.feedback_kind {
                FeedbackKind::Correct => stats.correct += 1,
                FeedbackKind::Incorrect => stats.incorrect += 1,
                FeedbackKind::PartiallyCorrect => stats.partially_correct += 1,
            }
        }
        Ok(stats)
    }

    fn session_feedback(&self, session_id: &SessionId) -> Result<Vec<Feedback>, FeedbackStorageError> {
        self.db
            .with_reader(|conn| queries::feedback::for_session(conn, session_id.as_str()))
            .map_err(to_feedback_storage_error)
    }

    fn insights(&self, days_back: u32) -> Result<Insights, FeedbackStorageError> {
        let since_millis = current_unix_millis() - days_back as i64 * 24 * 60 * 60 * 1000;
        let rows = self
            .db
            .with_reader(|conn| queries::feedback::since(conn, since_millis))
            .map_err(to_feedback_storage_error)?;
        Ok(insights::compute(&rows, |_| None))
    }

    fn delete(&self, session_id: &SessionId, feedback_id: &FeedbackId) -> Result<bool, FeedbackStorageError> {
        self.db
            .with_writer(|conn| queries::feedback::delete(conn, session_id.as_str(), feedback_id.as_str()))
            .map_err(to_feedback_storage_error)
    }
}

fn current_unix_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
