//! Insights (§4.7): a pure function over stored feedback for a lookback
//! window. No I/O here — `style-storage` is responsible for windowing by
//! `days_back` before calling `compute`.

use style_core::model::error::RuleCategory;
use style_core::model::session::{Feedback, FeedbackKind};
use style_core::FxHashMap;

/// `{[0.0,0.5), [0.5,0.7), [0.7,1.0]}` (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ConfidenceBucket {
    Low,
    Medium,
    High,
}

impl ConfidenceBucket {
    fn for_rating(rating: f64) -> Self {
        if rating < 0.5 {
            Self::Low
        } else if rating < 0.7 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct AccuracyCounts {
    pub correct: u64,
    pub total: u64,
}

impl AccuracyCounts {
    fn accuracy_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }

    fn record(&mut self, is_correct: bool) {
        self.total += 1;
        if is_correct {
            self.correct += 1;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Insights {
    pub accuracy_rate: f64,
    pub by_confidence_bucket: FxHashMap<String, AccuracyCounts>,
    pub by_rule_category: FxHashMap<String, AccuracyCounts>,
    pub unique_sessions: u64,
    pub total_feedback: u64,
}

/// Computes the aggregate over an already-windowed slice of feedback.
/// `category_of` maps a feedback's error identifier back to a rule
/// category — the store doesn't know rule categories, only the caller
/// joining against the analysis that produced the violation does.
pub fn compute(feedback: &[Feedback], category_of: impl Fn(&Feedback) -> Option<RuleCategory>) -> Insights {
    let mut overall = AccuracyCounts::default();
    let mut by_bucket: FxHashMap<String, AccuracyCounts> = FxHashMap::default();
    let mut by_category: FxHashMap<String, AccuracyCounts> = FxHashMap::default();
    let mut sessions = style_core::FxHashSet::default();

    for item in feedback {
        let is_correct = item.feedback_kind == FeedbackKind::Correct;
        overall.record(is_correct);
        sessions.insert(item.session_id.clone());

        if let Some(rating) = item.confidence_rating {
            let bucket = ConfidenceBucket::for_rating(rating);
            by_bucket.entry(bucket_label(bucket).to_string()).or_default().record(is_correct);
        }

        if let Some(category) = category_of(item) {
            by_category.entry(category.name().to_string()).or_default().record(is_correct);
        }
    }

    Insights {
        accuracy_rate: overall.accuracy_rate(),
        by_confidence_bucket: by_bucket,
        by_rule_category: by_category,
        unique_sessions: sessions.len() as u64,
        total_feedback: feedback.len() as u64,
    }
}

fn bucket_label(bucket: ConfidenceBucket) -> &'static str {
    match bucket {
        ConfidenceBucket::Low => "0.0-0.5",
        ConfidenceBucket::Medium => "0.5-0.7",
        ConfidenceBucket::High => "0.7-1.0",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feedback(session_id: &str, kind: FeedbackKind, rating: Option<f64>) -> Feedback {
        Feedback {
            session_id: session_id.to_string(),
            violation_id: "v1".to_string(),
            error_type: "grammar.subject_verb_agreement".to_string(),
            error_message: "test".to_string(),
            feedback_kind: kind,
            confidence_rating: rating,
            user_reason: None,
            ip_hash: "deadbeef".to_string(),
            user_agent: "test-agent".to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn accuracy_rate_divides_correct_by_total() {
        let items = vec![
            feedback("s1", FeedbackKind::Correct, Some(0.9)),
            feedback("s1", FeedbackKind::Incorrect, Some(0.9)),
        ];
        let insights = compute(&items, |_| None);
        assert_eq!(insights.accuracy_rate, 0.5);
        assert_eq!(insights.total_feedback, 2);
    }

    #[test]
    fn unique_sessions_deduplicates_by_session_id() {
        let items = vec![
            feedback("s1", FeedbackKind::Correct, None),
            feedback("s1", FeedbackKind::Correct, None),
            feedback("s2", FeedbackKind::Correct, None),
        ];
        let insights = compute(&items, |_| None);
        assert_eq!(insights.unique_sessions, 2);
    }

    #[test]
    fn buckets_confidence_rating_into_three_ranges() {
        let items = vec![
            feedback("s1", FeedbackKind::Correct, Some(0.2)),
            feedback("s2", FeedbackKind::Correct, Some(0.6)),
            feedback("s3", FeedbackKind::Correct, Some(0.95)),
        ];
        let insights = compute(&items, |_| None);
        assert_eq!(insights.by_confidence_bucket["0.0-0.5"].total, 1);
        assert_eq!(insights.by_confidence_bucket["0.5-0.7"].total, 1);
        assert_eq!(insights.by_confidence_bucket["0.7-1.0"].total, 1);
    }

    #[test]
    fn empty_input_yields_zero_accuracy_without_panicking() {
        let insights = compute(&[], |_| None);
        assert_eq!(insights.accuracy_rate, 0.0);
        assert_eq!(insights.unique_sessions, 0);
    }
}
