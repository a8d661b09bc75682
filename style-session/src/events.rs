//! Event and EventType — the payload shape flowing from the analyzer and
//! rewriter through the session fabric to subscribers (§4.6, §6).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-to-client event types (§6). `name()`/`parse_str()` mirror the
/// teacher's enum vocabulary pattern (`PatternCategory`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Connected,
    AnalysisStart,
    ProgressUpdate,
    StationProgressUpdate,
    BlockProcessingStart,
    BlockProcessingComplete,
    BlockProcessingError,
    AnalysisComplete,
    AnalysisFailed,
    FeedbackNotification,
    FeedbackError,
    ConfidenceUpdate,
    ConfidenceInsights,
    ValidationProgress,
    ThresholdChanged,
    Error,
}

impl EventType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::AnalysisStart => "analysis_start",
            Self::ProgressUpdate => "progress_update",
            Self::StationProgressUpdate => "station_progress_update",
            Self::BlockProcessingStart => "block_processing_start",
            Self::BlockProcessingComplete => "block_processing_complete",
            Self::BlockProcessingError => "block_processing_error",
            Self::AnalysisComplete => "analysis_complete",
            Self::AnalysisFailed => "analysis_failed",
            Self::FeedbackNotification => "feedback_notification",
            Self::FeedbackError => "feedback_error",
            Self::ConfidenceUpdate => "confidence_update",
            Self::ConfidenceInsights => "confidence_insights",
            Self::ValidationProgress => "validation_progress",
            Self::ThresholdChanged => "threshold_changed",
            Self::Error => "error",
        }
    }

    /// High-frequency progress-type events the back-pressure policy (§4.6)
    /// is allowed to drop the oldest of when a session's queue is full.
    /// Completion, failure, and notification events are never dropped.
    pub fn is_droppable(&self) -> bool {
        matches!(
            self,
            Self::ProgressUpdate | Self::StationProgressUpdate | Self::ValidationProgress
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An event as delivered to a subscriber. Every field is JSON-serializable
/// (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// `None` when broadcast to every session (§4.6 `emit`).
    pub session_id: Option<String>,
    pub timestamp: i64,
    pub event_type: EventType,
    pub payload: Value,
}

impl Event {
    pub fn new(session_id: Option<String>, event_type: EventType, payload: Value) -> Self {
        Self {
            session_id,
            timestamp: current_unix_millis(),
            event_type,
            payload,
        }
    }
}

fn current_unix_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
