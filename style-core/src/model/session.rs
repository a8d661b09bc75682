//! Session and Feedback (§3, §4.6, §4.7).

use serde::{Deserialize, Serialize};

use crate::ids::SessionId;
use crate::FxHashSet;

/// Event channels a session may subscribe to (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Progress,
    StationProgress,
    Completion,
    FeedbackNotification,
    ConfidenceUpdate,
    Insights,
}

/// A client-scoped event channel; not a persistence boundary (§3, GLOSSARY).
/// Created on client connect or auto-registered on first emit.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub subscriptions: FxHashSet<Channel>,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            subscriptions: FxHashSet::default(),
        }
    }

    pub fn subscribe(&mut self, channel: Channel) {
        self.subscriptions.insert(channel);
    }

    pub fn is_subscribed(&self, channel: Channel) -> bool {
        self.subscriptions.contains(&channel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Correct,
    Incorrect,
    PartiallyCorrect,
}

impl FeedbackKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
            Self::PartiallyCorrect => "partially_correct",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "correct" => Some(Self::Correct),
            "incorrect" => Some(Self::Incorrect),
            "partially_correct" => Some(Self::PartiallyCorrect),
            _ => None,
        }
    }
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A human judgment on a detected issue (§3, §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    pub session_id: String,
    pub violation_id: String,
    pub error_type: String,
    pub error_message: String,
    pub feedback_kind: FeedbackKind,
    pub confidence_rating: Option<f64>,
    pub user_reason: Option<String>,
    /// Keyed one-way hash of the client IP; salt from config (§4.7 privacy).
    pub ip_hash: String,
    pub user_agent: String,
    pub timestamp: i64,
}
