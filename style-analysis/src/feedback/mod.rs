//! Feedback Service (J, §4.7): validates submissions, assigns privacy-
//! preserving ids, persists via the injected `FeedbackStorage`, and emits
//! `feedback_notification`/`feedback_error` events onto the session fabric.

pub mod insights;
pub mod storage;
pub mod validation;

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use style_core::errors::EngineError;
use style_core::ids::{FeedbackId, SessionId};
use style_core::model::session::Feedback;
use style_session::{EventType, SessionDirectory};

use insights::Insights;
use storage::{feedback_id, ip_hash, FeedbackStorage, SessionStats, StorageError};
use validation::{validate, FeedbackSubmission};

/// Ties validation, id/ip hashing, storage, and notification together
/// (§4.7). `privacy_salt` is the keyed-hash salt the spec asks to come from
/// config; the caller is responsible for sourcing it there.
pub struct FeedbackService {
    storage: Arc<dyn FeedbackStorage>,
    directory: Option<Arc<SessionDirectory>>,
    privacy_salt: String,
}

impl FeedbackService {
    pub fn new(storage: Arc<dyn FeedbackStorage>, directory: Option<Arc<SessionDirectory>>, privacy_salt: impl Into<String>) -> Self {
        Self {
            storage,
            directory,
            privacy_salt: privacy_salt.into(),
        }
    }

    fn emit(&self, session_id: &SessionId, event_type: EventType, payload: serde_json::Value) {
        if let Some(directory) = &self.directory {
            directory.emit(Some(session_id), event_type, payload);
        }
    }

    /// Validates, hashes, stores, and notifies. Returns the new id and
    /// `violation_id`/`timestamp` echo expected by the HTTP adapter's
    /// `201 {feedback_id, violation_id, timestamp}` response (§6).
    pub fn submit(&self, submission: FeedbackSubmission) -> Result<(FeedbackId, String, i64), EngineError> {
        let kind = validate(&submission).map_err(|err| {
            let session_id = SessionId::new(submission.session_id.clone());
            self.emit(
                &session_id,
                EventType::FeedbackError,
                serde_json::json!({ "message": err.to_string() }),
            );
            err
        })?;

        let timestamp = current_unix_millis();
        let id = feedback_id(&submission.session_id, &submission.violation_id, timestamp);
        let feedback = Feedback {
            session_id: submission.session_id.clone(),
            violation_id: submission.violation_id.clone(),
            error_type: submission.error_type,
            error_message: submission.error_message,
            feedback_kind: kind,
            confidence_rating: submission.confidence_rating,
            user_reason: submission.user_reason,
            ip_hash: ip_hash(&submission.client_ip, &self.privacy_salt),
            user_agent: submission.user_agent,
            timestamp,
        };

        let session_id = SessionId::new(submission.session_id.clone());
        self.storage.store(&feedback).map_err(|err| {
            let message = err.to_string();
            self.emit(&session_id, EventType::FeedbackError, serde_json::json!({ "message": message }));
            EngineError::storage_unavailable(message)
        })?;

        self.emit(
            &session_id,
            EventType::FeedbackNotification,
            serde_json::json!({ "feedback_id": id.as_str(), "violation_id": feedback.violation_id, "feedback_kind": feedback.feedback_kind.name() }),
        );

        Ok((id, submission.violation_id, timestamp))
    }

    pub fn stats_for_session(&self, session_id: &SessionId) -> Result<SessionStats, StorageError> {
        self.storage.stats_for_session(session_id)
    }

    pub fn session_feedback(&self, session_id: &SessionId) -> Result<Vec<Feedback>, StorageError> {
        self.storage.session_feedback(session_id)
    }

    pub fn insights(&self, days_back: u32) -> Result<Insights, StorageError> {
        self.storage.insights(days_back)
    }

    pub fn delete(&self, session_id: &SessionId, feedback_id: &FeedbackId) -> Result<bool, StorageError> {
        self.storage.delete(session_id, feedback_id)
    }
}

fn current_unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct InMemoryStorage(Mutex<Vec<Feedback>>);

    impl FeedbackStorage for InMemoryStorage {
        fn store(&self, feedback: &Feedback) -> Result<FeedbackId, StorageError> {
            self.0.lock().unwrap().push(feedback.clone());
            Ok(feedback_id(&feedback.session_id, &feedback.violation_id, feedback.timestamp))
        }

        fn stats_for_session(&self, session_id: &SessionId) -> Result<SessionStats, StorageError> {
            let items = self.0.lock().unwrap();
            let mut stats = SessionStats::default();
            for item in items.iter().filter(|f| f.session_id == session_id.as_str()) {
                stats.total += 1;
                match item.feedback_kind {
                    style_core::model::session::FeedbackKind::Correct => stats.correct += 1,
                    style_core::model::session::FeedbackKind::Incorrect => stats.incorrect += 1,
                    style_core::model::session::FeedbackKind::PartiallyCorrect => stats.partially_correct += 1,
                }
            }
            Ok(stats)
        }

        fn session_feedback(&self, session_id: &SessionId) -> Result<Vec<Feedback>, StorageError> {
            Ok(self.0.lock().unwrap().iter().filter(|f| f.session_id == session_id.as_str()).cloned().collect())
        }

        fn insights(&self, _days_back: u32) -> Result<Insights, StorageError> {
            let items = self.0.lock().unwrap();
            Ok(insights::compute(&items, |_| None))
        }

        fn delete(&self, session_id: &SessionId, feedback_id: &FeedbackId) -> Result<bool, StorageError> {
            let mut items = self.0.lock().unwrap();
            let before = items.len();
            items.retain(|f| {
                !(f.session_id == session_id.as_str()
                    && storage::feedback_id(&f.session_id, &f.violation_id, f.timestamp).as_str() == feedback_id.as_str())
            });
            Ok(items.len() != before)
        }
    }

    fn submission() -> FeedbackSubmission {
        FeedbackSubmission {
            session_id: "s1".to_string(),
            violation_id: "v1".to_string(),
            error_type: "grammar.subject_verb_agreement".to_string(),
            error_message: "subject and verb disagree".to_string(),
            feedback_kind: "correct".to_string(),
            confidence_rating: Some(0.8),
            user_reason: None,
            client_ip: "203.0.113.7".to_string(),
            user_agent: "test-agent".to_string(),
        }
    }

    #[test]
    fn valid_submission_is_stored_and_returns_an_id() {
        let service = FeedbackService::new(Arc::new(InMemoryStorage(Mutex::new(Vec::new()))), None, "pepper");
        let (id, violation_id, _timestamp) = service.submit(submission()).unwrap();
        assert_eq!(id.as_str().len(), 12);
        assert_eq!(violation_id, "v1");
    }

    #[test]
    fn invalid_submission_is_rejected_before_storage() {
        let service = FeedbackService::new(Arc::new(InMemoryStorage(Mutex::new(Vec::new()))), None, "pepper");
        let mut bad = submission();
        bad.feedback_kind = "nonsense".to_string();
        assert!(service.submit(bad).is_err());
    }

    #[test]
    fn stored_feedback_never_carries_the_raw_ip() {
        let storage = Arc::new(InMemoryStorage(Mutex::new(Vec::new())));
        let service = FeedbackService::new(storage.clone(), None, "pepper");
        service.submit(submission()).unwrap();
        let stored = &storage.0.lock().unwrap()[0];
        assert!(!stored.ip_hash.contains("203"));
    }

    #[test]
    fn stats_for_session_counts_by_kind() {
        let storage = Arc::new(InMemoryStorage(Mutex::new(Vec::new())));
        let service = FeedbackService::new(storage, None, "pepper");
        service.submit(submission()).unwrap();
        let mut incorrect = submission();
        incorrect.feedback_kind = "incorrect".to_string();
        service.submit(incorrect).unwrap();

        let stats = service.stats_for_session(&SessionId::new("s1")).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.incorrect, 1);
    }
}
