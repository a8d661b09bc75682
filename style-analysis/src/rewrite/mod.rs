//! Assembly-Line Rewriter (G, §4.5): runs a `RewriteJob` through the
//! applicable stations in canonical order, one or more passes, emitting
//! progress through a `ProgressTracker` and onto the session fabric.

pub mod pool;
pub mod station;
pub mod transform;

use std::sync::Arc;
use std::time::Instant;

use style_core::ids::SessionId;
use style_core::model::error::Error;
use style_core::model::rewrite::{RewriteJob, StationOutput};
use style_session::{EventType, SessionDirectory};

use crate::progress::ProgressTracker;
use station::applicable_stations;
use transform::{Constraints, TextTransform};

/// Owns the process-lifetime collaborators a rewrite job needs: the text
/// transformation capability and (optionally) the session fabric.
pub struct AssemblyLineRewriter {
    transform: Arc<dyn TextTransform>,
    directory: Option<Arc<SessionDirectory>>,
    max_stations: usize,
    constraints: Constraints,
}

impl AssemblyLineRewriter {
    pub fn new(transform: Arc<dyn TextTransform>, directory: Option<Arc<SessionDirectory>>, max_stations: usize) -> Self {
        Self {
            transform,
            directory,
            max_stations,
            constraints: Constraints::default(),
        }
    }

    fn emit(&self, session_id: Option<&SessionId>, event_type: EventType, payload: serde_json::Value) {
        if let Some(directory) = &self.directory {
            directory.emit(session_id, event_type, payload);
        }
    }

    /// Runs `job` to completion. `initial_errors` are the block's errors at
    /// job start; `reanalyze` is called between passes to ask whether the
    /// station list addressed everything (Open Question decision #1: the
    /// re-check uses the caller's own threshold, since `reanalyze` is
    /// expected to already filter by it — this function never re-normalizes).
    pub fn run(
        &self,
        mut job: RewriteJob,
        initial_errors: Vec<Error>,
        second_pass_opt_in: bool,
        session_id: Option<&SessionId>,
        reanalyze: impl Fn(&str) -> Vec<Error>,
    ) -> RewriteJob {
        let stations = applicable_stations(&initial_errors, self.max_stations);
        job.applicable_stations = stations.iter().map(|s| s.id.to_string()).collect();

        self.emit(
            session_id,
            EventType::BlockProcessingStart,
            serde_json::json!({ "block_id": job.block_id, "stations": job.applicable_stations }),
        );

        let tracker = ProgressTracker::init(&job.applicable_stations, job.total_passes);
        let mut current_text = job.block_content.clone();
        let mut current_errors = initial_errors;
        let mut pass = 1u32;

        loop {
            if pass > job.total_passes || stations.is_empty() {
                break;
            }
            job.current_pass = pass;
            tracker.start_pass(pass, &format!("Pass {pass}"));
            self.emit(
                session_id,
                EventType::ProgressUpdate,
                serde_json::json!({ "block_id": job.block_id, "pass": pass, "percent": tracker.overall_percent() }),
            );

            for station in &stations {
                job.current_station = Some(station.id.to_string());
                let matching = station.count_matching(&current_errors);

                tracker.start_station(station.id, station.name, matching);
                self.emit(
                    session_id,
                    EventType::StationProgressUpdate,
                    serde_json::json!({ "block_id": job.block_id, "station": station.id, "status": "processing" }),
                );

                let started = Instant::now();
                match station.run(&current_text, &current_errors, self.transform.as_ref(), &self.constraints) {
                    Ok((new_text, deltas)) => {
                        current_text = new_text.clone();
                        job.station_outputs.push(StationOutput {
                            station_id: station.id.to_string(),
                            duration: started.elapsed(),
                            text_after: new_text,
                            deltas,
                            errors_fixed: matching,
                        });
                        job.errors_fixed += matching;
                        tracker.complete_station(station.id, matching, &job.station_outputs.last().unwrap().deltas);
                        self.emit(
                            session_id,
                            EventType::StationProgressUpdate,
                            serde_json::json!({ "block_id": job.block_id, "station": station.id, "status": "complete" }),
                        );
                    }
                    Err(err) => {
                        tracing::warn!(station_id = station.id, error = %err, "rewrite station failed");
                        tracker.record_error(Some(station.id));
                        job.partial_success = true;
                        self.emit(
                            session_id,
                            EventType::BlockProcessingError,
                            serde_json::json!({ "block_id": job.block_id, "station": station.id, "message": err.to_string() }),
                        );
                    }
                }
            }
            tracker.complete_pass(pass);

            if pass >= job.total_passes || !second_pass_opt_in {
                break;
            }
            let remaining = reanalyze(&current_text);
            if remaining.is_empty() {
                break;
            }
            current_errors = remaining;
            pass += 1;
        }

        job.final_text = Some(current_text);
        job.improvements = tracker.improvements_so_far();

        self.emit(
            session_id,
            EventType::BlockProcessingComplete,
            serde_json::json!({ "block_id": job.block_id, "errors_fixed": job.errors_fixed, "percent": 100 }),
        );

        job
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use style_core::model::document::ContentType;
    use style_core::model::error::{ConfidenceBreakdown, RuleCategory, Severity};
    use transform::{Constraints as TransformConstraints, IdentityTransform, TextTransform, TransformError, TransformOutput};

    /// A transform that always fails, for exercising the RewriteError path
    /// (§7: "the station transitions to error; subsequent stations proceed
    /// on the last-good text; the job completes with a partial-success flag").
    struct FailingTransform;

    impl TextTransform for FailingTransform {
        fn transform(&self, _instruction: &str, _text: &str, _constraints: &TransformConstraints) -> Result<TransformOutput, TransformError> {
            Err(TransformError::CapabilityFailed { message: "capability unavailable".to_string() })
        }
    }

    fn grammar_error() -> Error {
        Error {
            rule_id: "test.grammar".to_string(),
            category: RuleCategory::Grammar,
            sentence_index: 0,
            sentence: "Some text.".to_string(),
            start: 0,
            end: 4,
            message: "test".to_string(),
            severity: Severity::Medium,
            suggestions: Vec::new(),
            confidence: 0.9,
            confidence_provenance: ConfidenceBreakdown {
                signal: 0.9,
                rule_reliability: 0.9,
                content_modifier: 1.0,
                evidence_score: None,
                evidence_weight: 0.0,
                model_weight: 1.0,
                raw_confidence: 0.9,
                floor_guard_triggered: false,
                final_confidence: 0.9,
                universal_threshold: 0.35,
                meets_threshold: true,
            },
            content_type: ContentType::General,
            linguistic_analysis: serde_json::Value::Null,
        }
    }

    #[test]
    fn single_pass_job_completes_with_final_text() {
        let rewriter = AssemblyLineRewriter::new(Arc::new(IdentityTransform), None, 8);
        let job = RewriteJob::new("block-1", "Some text.", 1);
        let result = rewriter.run(job, vec![grammar_error()], false, None, |_| Vec::new());
        assert_eq!(result.final_text.as_deref(), Some("Some text."));
        assert_eq!(result.applicable_stations, vec!["urgent_grammar".to_string()]);
        assert_eq!(result.errors_fixed, 1);
    }

    #[test]
    fn second_pass_skipped_when_not_opted_in() {
        let rewriter = AssemblyLineRewriter::new(Arc::new(IdentityTransform), None, 8);
        let job = RewriteJob::new("block-1", "Some text.", 2);
        let result = rewriter.run(job, vec![grammar_error()], false, None, |_| vec![grammar_error()]);
        assert_eq!(result.current_pass, 1);
    }

    #[test]
    fn second_pass_runs_when_reanalysis_still_finds_errors() {
        let rewriter = AssemblyLineRewriter::new(Arc::new(IdentityTransform), None, 8);
        let job = RewriteJob::new("block-1", "Some text.", 2);
        let result = rewriter.run(job, vec![grammar_error()], true, None, |_| vec![grammar_error()]);
        assert_eq!(result.current_pass, 2);
    }

    #[test]
    fn second_pass_stops_early_when_reanalysis_is_clean() {
        let rewriter = AssemblyLineRewriter::new(Arc::new(IdentityTransform), None, 8);
        let job = RewriteJob::new("block-1", "Some text.", 3);
        let result = rewriter.run(job, vec![grammar_error()], true, None, |_| Vec::new());
        assert_eq!(result.current_pass, 1);
    }

    #[test]
    fn station_failure_marks_job_partial_success_and_keeps_last_good_text() {
        let rewriter = AssemblyLineRewriter::new(Arc::new(FailingTransform), None, 8);
        let job = RewriteJob::new("block-1", "Some text.", 1);
        let result = rewriter.run(job, vec![grammar_error()], false, None, |_| Vec::new());
        assert!(result.partial_success);
        assert_eq!(result.final_text.as_deref(), Some("Some text."));
        assert_eq!(result.errors_fixed, 0);
    }

    #[test]
    fn successful_job_is_not_partial() {
        let rewriter = AssemblyLineRewriter::new(Arc::new(IdentityTransform), None, 8);
        let job = RewriteJob::new("block-1", "Some text.", 1);
        let result = rewriter.run(job, vec![grammar_error()], false, None, |_| Vec::new());
        assert!(!result.partial_success);
    }

    #[test]
    fn no_applicable_stations_leaves_text_unchanged() {
        let rewriter = AssemblyLineRewriter::new(Arc::new(IdentityTransform), None, 8);
        let job = RewriteJob::new("block-1", "Clean text.", 1);
        let result = rewriter.run(job, Vec::new(), false, None, |_| Vec::new());
        assert_eq!(result.final_text.as_deref(), Some("Clean text."));
        assert!(result.applicable_stations.is_empty());
    }
}
