//! Cross-module integration tests for the six end-to-end scenarios in
//! spec.md §8 (S1-S6), driven entirely through each crate's public API
//! rather than any single module's internals.

use std::sync::{Arc, Mutex};

use style_analysis::confidence::ConfidencePipeline;
use style_analysis::feedback::storage::{feedback_id, FeedbackStorage, SessionStats, StorageError};
use style_analysis::feedback::validation::FeedbackSubmission;
use style_analysis::feedback::{insights, FeedbackService};
use style_analysis::rewrite::transform::{Constraints, TextTransform, TransformError, TransformOutput};
use style_analysis::rules::{builtin, Registry};
use style_analysis::toolkit::DegradedToolkit;
use style_analysis::{AnalyzeRequest, AssemblyLineRewriter, StyleAnalyzer};

use style_core::model::document::{ContentType, FormatHint};
use style_core::model::error::{ConfidenceBreakdown, RuleCategory, Severity};
use style_core::model::rewrite::RewriteJob;
use style_core::model::session::Feedback;
use style_core::config::AdjustmentFactors;
use style_core::model::analysis::ContentTypeModifier;
use style_core::ids::{FeedbackId, SessionId};
use style_session::{EventType, SessionDirectory};

fn full_registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(Box::new(builtin::FirstMentionProductName)).unwrap();
    registry.register(Box::new(builtin::GenericLinkText)).unwrap();
    registry.register(Box::new(builtin::InvalidVersionPrefix)).unwrap();
    registry.register(Box::new(builtin::GeographicCapitalization)).unwrap();
    registry.register(Box::new(builtin::NamesAndTitles::default())).unwrap();
    registry
}

fn analyzer() -> StyleAnalyzer {
    let pipeline = Arc::new(ConfidencePipeline::new(
        Arc::new(style_analysis::rules::default_rule_reliability()),
        Arc::new(ContentTypeModifier::default()),
        0.35,
        AdjustmentFactors::default(),
        1000,
    ));
    StyleAnalyzer::new(full_registry(), pipeline, Arc::new(DegradedToolkit), None)
}

fn analyze(text: &str) -> style_core::model::AnalysisResult {
    analyzer().analyze(AnalyzeRequest {
        text,
        format_hint: FormatHint::Plain,
        content_type_override: Some(ContentType::General),
        threshold_override: None,
        session_id: None,
    })
}

fn only_error(result: &style_core::model::AnalysisResult) -> &style_core::model::Error {
    let errors: Vec<_> = result.errors_by_block.values().flatten().collect();
    assert_eq!(errors.len(), 1, "expected exactly one error, got {errors:?}");
    errors[0]
}

/// S1 — first mention of a product.
#[test]
fn s1_first_mention_of_product() {
    let result = analyze("Watson supports many languages.");
    let error = only_error(&result);
    assert_eq!(error.rule_id, "references.product_names.first_mention");
    assert_eq!(error.severity, style_core::model::Severity::High);
    assert!(error.suggestions[0].text().contains("IBM Watson"));
    assert!(error.confidence >= 0.60);
    assert!(error.confidence_provenance.rule_reliability >= 0.75);
}

/// S2 — generic link text.
#[test]
fn s2_generic_link_text() {
    let result = analyze("Click here to learn more.");
    let error = only_error(&result);
    assert_eq!(error.rule_id, "references.citations.generic_link_text");
    assert_eq!(error.severity, style_core::model::Severity::High);
    assert!(error.suggestions[0].text().contains("descriptive"));
    assert!(error.confidence_provenance.meets_threshold);
}

/// S3 — version prefix.
#[test]
fn s3_version_prefix() {
    let result = analyze("Install V2.1 today.");
    let error = only_error(&result);
    assert_eq!(error.rule_id, "references.product_versions.invalid_prefix");
    assert_eq!(error.severity, style_core::model::Severity::Medium);
    assert_eq!(error.suggestions.len(), 1);
    assert_eq!(error.suggestions[0].text(), "Install 2.1 today.");
}

/// S4 — directional capitalization.
#[test]
fn s4_directional_capitalization() {
    let result = analyze("We operate in northern california.");
    let error = only_error(&result);
    assert_eq!(error.rule_id, "references.geographic_locations");
    assert_eq!(error.suggestions[0].text(), "Northern California");
}

/// A deterministic stand-in transform used in place of the real
/// LLM-backed text-transformation capability (§1 Non-goals).
struct MarkingTransform;

impl TextTransform for MarkingTransform {
    fn transform(&self, instruction: &str, text: &str, _constraints: &Constraints) -> Result<TransformOutput, TransformError> {
        let _ = instruction;
        Ok(TransformOutput {
            text: text.to_string(),
            deltas: Vec::new(),
        })
    }
}

fn passive_voice_error() -> style_core::model::Error {
    style_core::model::Error {
        rule_id: "grammar.passive_voice".to_string(),
        category: RuleCategory::Grammar,
        sentence_index: 0,
        sentence: "The report was written by the team.".to_string(),
        start: 0,
        end: 36,
        message: "prefer active voice".to_string(),
        severity: Severity::Medium,
        suggestions: Vec::new(),
        confidence: 0.8,
        confidence_provenance: ConfidenceBreakdown {
            signal: 0.8,
            rule_reliability: 0.8,
            content_modifier: 1.0,
            evidence_score: None,
            evidence_weight: 0.0,
            model_weight: 1.0,
            raw_confidence: 0.8,
            floor_guard_triggered: false,
            final_confidence: 0.8,
            universal_threshold: 0.35,
            meets_threshold: true,
        },
        content_type: ContentType::General,
        linguistic_analysis: serde_json::Value::Null,
    }
}

struct RecordingSink(Mutex<Vec<style_session::Event>>);

impl style_session::EventSink for RecordingSink {
    fn send(&self, event: style_session::Event) {
        self.0.lock().unwrap().push(event);
    }
}

/// S5 — rewrite progress: a block with a `passive_voice` (grammar) error
/// runs through the assembly line and emits, in order, a block-processing
/// start, the `urgent_grammar` station transitioning processing -> complete,
/// and a terminal block-processing-complete event.
#[test]
fn s5_rewrite_progress_event_order() {
    let directory = Arc::new(SessionDirectory::new());
    let sink = Arc::new(RecordingSink(Mutex::new(Vec::new())));
    let session_id = SessionId::new("s5");
    directory.register(session_id.clone(), sink.clone());

    let rewriter = AssemblyLineRewriter::new(Arc::new(MarkingTransform), Some(directory), 8);
    let job = RewriteJob::new("block-1", "The report was written by the team.", 1);
    let finished = rewriter.run(job, vec![passive_voice_error()], false, Some(&session_id), |_| Vec::new());

    assert_eq!(finished.applicable_stations, vec!["urgent_grammar".to_string()]);
    assert!(finished.final_text.is_some());
    assert_eq!(finished.errors_fixed, 1);

    // Give the per-session dispatcher thread a moment to drain.
    std::thread::sleep(std::time::Duration::from_millis(20));
    let events = sink.0.lock().unwrap();
    let kinds: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(
        kinds,
        vec![
            EventType::BlockProcessingStart,
            EventType::ProgressUpdate,
            EventType::StationProgressUpdate,
            EventType::StationProgressUpdate,
            EventType::BlockProcessingComplete,
        ]
    );
    assert_eq!(events[2].payload["status"], "processing");
    assert_eq!(events[3].payload["status"], "complete");
}

struct InMemoryStorage(Mutex<Vec<Feedback>>);

impl InMemoryStorage {
    fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }
}

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

    fn insights(&self, _days_back: u32) -> Result<insights::Insights, StorageError> {
        Ok(insights::compute(&self.0.lock().unwrap(), |f| {
            f.error_type.split('.').next().map(|prefix| match prefix {
                "grammar" => style_core::model::error::RuleCategory::Grammar,
                other => style_core::model::error::RuleCategory::Other(other.to_string()),
            })
        }))
    }

    fn delete(&self, session_id: &SessionId, feedback_id: &FeedbackId) -> Result<bool, StorageError> {
        let mut items = self.0.lock().unwrap();
        let before = items.len();
        items.retain(|f| {
            !(f.session_id == session_id.as_str()
                && style_analysis::feedback::storage::feedback_id(&f.session_id, &f.violation_id, f.timestamp).as_str()
                    == feedback_id.as_str())
        });
        Ok(items.len() != before)
    }
}

fn submission(kind: &str) -> FeedbackSubmission {
    FeedbackSubmission {
        session_id: "S".to_string(),
        violation_id: "grammar.subject_verb-1".to_string(),
        error_type: "grammar.subject_verb".to_string(),
        error_message: "subject and verb disagree".to_string(),
        feedback_kind: kind.to_string(),
        confidence_rating: Some(0.8),
        user_reason: None,
        client_ip: "203.0.113.9".to_string(),
        user_agent: "integration-test".to_string(),
    }
}

/// S6 — feedback ingestion and stats: three feedbacks for the same rule,
/// {correct, incorrect, correct}, yield total=3, distribution {2, 1}, and a
/// 2/3 per-rule accuracy.
#[test]
fn s6_feedback_ingestion_and_stats() {
    let service = FeedbackService::new(Arc::new(InMemoryStorage::new()), None, "integration-salt");

    service.submit(submission("correct")).unwrap();
    service.submit(submission("incorrect")).unwrap();
    service.submit(submission("correct")).unwrap();

    let session_id = SessionId::new("S");
    let stats = service.stats_for_session(&session_id).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.correct, 2);
    assert_eq!(stats.incorrect, 1);

    let aggregate = service.insights(1).unwrap();
    let per_rule = aggregate
        .by_rule_category
        .get("grammar")
        .expect("grammar category should have an accuracy entry");
    assert_eq!(per_rule.total, 3);
    assert!(((per_rule.correct as f64 / per_rule.total as f64) - (2.0 / 3.0)).abs() < 1e-9);
}
