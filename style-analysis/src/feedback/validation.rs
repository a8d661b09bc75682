//! Feedback submission validation (§4.7): a raw submission fails with
//! `InvalidFeedback` before it is ever turned into a stored `Feedback`.

use style_core::errors::EngineError;
use style_core::model::session::FeedbackKind;

const MAX_USER_REASON_BYTES: usize = 1000;

/// The untrusted shape a client submits; `FeedbackService::submit` converts
/// a validated one into `style_core::model::session::Feedback`.
#[derive(Debug, Clone)]
pub struct FeedbackSubmission {
    pub session_id: String,
    pub violation_id: String,
    pub error_type: String,
    pub error_message: String,
    pub feedback_kind: String,
    pub confidence_rating: Option<f64>,
    pub user_reason: Option<String>,
    pub client_ip: String,
    pub user_agent: String,
}

/// Validates required fields, `feedback_kind`, `confidence_rating` range,
/// and `user_reason` length (§4.7). Returns the parsed `FeedbackKind` on
/// success so the caller doesn't re-parse it.
pub fn validate(submission: &FeedbackSubmission) -> Result<FeedbackKind, EngineError> {
    if submission.session_id.is_empty() {
        return Err(EngineError::validation("session_id is required"));
    }
    if submission.violation_id.is_empty() {
        return Err(EngineError::validation("violation_id (error identifier) is required"));
    }
    if submission.error_type.is_empty() {
        return Err(EngineError::validation("error_type is required"));
    }
    if submission.error_message.is_empty() {
        return Err(EngineError::validation("error_message is required"));
    }
    let kind = FeedbackKind::parse_str(&submission.feedback_kind)
        .ok_or_else(|| EngineError::validation(format!("feedback_kind '{}' is not one of correct, incorrect, partially_correct", submission.feedback_kind)))?;

    if let Some(rating) = submission.confidence_rating {
        if !(0.0..=1.0).contains(&rating) {
            return Err(EngineError::validation(format!("confidence_rating {rating} is outside [0.0, 1.0]")));
        }
    }

    if let Some(reason) = &submission.user_reason {
        if reason.len() > MAX_USER_REASON_BYTES {
            return Err(EngineError::validation(format!(
                "user_reason is {} bytes, exceeds the {MAX_USER_REASON_BYTES}-byte limit",
                reason.len()
            )));
        }
    }

    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> FeedbackSubmission {
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
    fn accepts_a_well_formed_submission() {
        assert!(validate(&valid_submission()).is_ok());
    }

    #[test]
    fn rejects_missing_session_id() {
        let mut submission = valid_submission();
        submission.session_id.clear();
        assert!(validate(&submission).is_err());
    }

    #[test]
    fn rejects_unknown_feedback_kind() {
        let mut submission = valid_submission();
        submission.feedback_kind = "maybe".to_string();
        assert!(validate(&submission).is_err());
    }

    #[test]
    fn rejects_out_of_range_confidence_rating() {
        let mut submission = valid_submission();
        submission.confidence_rating = Some(1.5);
        assert!(validate(&submission).is_err());
    }

    #[test]
    fn rejects_oversized_user_reason() {
        let mut submission = valid_submission();
        submission.user_reason = Some("x".repeat(1001));
        assert!(validate(&submission).is_err());
    }

    #[test]
    fn accepts_user_reason_at_the_boundary() {
        let mut submission = valid_submission();
        submission.user_reason = Some("x".repeat(1000));
        assert!(validate(&submission).is_ok());
    }
}
