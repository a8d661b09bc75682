//! The feedback storage interface (§4.7) and the privacy-preserving id/hash
//! helpers every implementation shares. `style-storage` provides the
//! persisted (SQLite-backed) implementation; this crate only defines the
//! contract and the pure hashing rules.

use sha2::{Digest, Sha256};

use style_core::ids::{FeedbackId, SessionId};
use style_core::model::session::Feedback;

use super::insights::Insights;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("feedback storage unavailable: {message}")]
    Unavailable { message: String },
    #[error("feedback not found: session={session_id} feedback_id={feedback_id}")]
    NotFound { session_id: String, feedback_id: String },
}

/// Per-session accuracy snapshot returned by `stats_for_session`.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SessionStats {
    pub total: u64,
    pub correct: u64,
    pub incorrect: u64,
    pub partially_correct: u64,
}

/// `store/stats_for_session/session_feedback/insights/delete` (§4.7). All
/// methods are blocking; implementations must be safe under concurrent calls
/// from a serialized write lock and unconstrained read fan-out (§5).
pub trait FeedbackStorage: Send + Sync {
    fn store(&self, feedback: &Feedback) -> Result<FeedbackId, StorageError>;
    fn stats_for_session(&self, session_id: &SessionId) -> Result<SessionStats, StorageError>;
    fn session_feedback(&self, session_id: &SessionId) -> Result<Vec<Feedback>, StorageError>;
    fn insights(&self, days_back: u32) -> Result<Insights, StorageError>;
    fn delete(&self, session_id: &SessionId, feedback_id: &FeedbackId) -> Result<bool, StorageError>;
}

/// Lowercase 12-hex-char prefix of SHA-256 over `session_id|violation_id|timestamp`
/// (§4.7 privacy).
pub fn feedback_id(session_id: &str, violation_id: &str, timestamp: i64) -> FeedbackId {
    let mut hasher = Sha256::new();
    hasher.update(session_id.as_bytes());
    hasher.update(b"|");
    hasher.update(violation_id.as_bytes());
    hasher.update(b"|");
    hasher.update(timestamp.to_string().as_bytes());
    let digest = hasher.finalize();
    FeedbackId::from_hex(hex_prefix(&digest, 6))
}

/// Keyed one-way hash of a client IP, stable within a process (§4.7
/// privacy): SHA-256 over `salt|client_ip`, truncated the same way as
/// `feedback_id`. Never reversible; never logs the raw IP.
pub fn ip_hash(client_ip: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"|");
    hasher.update(client_ip.as_bytes());
    let digest = hasher.finalize();
    hex_prefix(&digest, 16)
}

fn hex_prefix(digest: &[u8], bytes: usize) -> String {
    digest
        .iter()
        .take(bytes)
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_id_is_twelve_lowercase_hex_chars() {
        let id = feedback_id("session-1", "violation-1", 1_700_000_000);
        assert_eq!(id.as_str().len(), 12);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn feedback_id_is_deterministic() {
        let a = feedback_id("s", "v", 1);
        let b = feedback_id("s", "v", 1);
        assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn ip_hash_never_contains_the_raw_ip() {
        let hash = ip_hash("203.0.113.7", "pepper");
        assert!(!hash.contains("203"));
        assert_eq!(hash.len(), 32);
    }

    #[test]
    fn ip_hash_is_salt_dependent() {
        let a = ip_hash("203.0.113.7", "pepper-a");
        let b = ip_hash("203.0.113.7", "pepper-b");
        assert_ne!(a, b);
    }
}
