//! Bounded rewrite-job worker pool (§5: "one worker pool for rewrite jobs,
//! bounded, default = 4, each job internally sequential across stations").
//!
//! `AssemblyLineRewriter::run` is already sequential within one job; this
//! just fans a batch of jobs out across a dedicated `rayon` pool sized
//! independently of the global pool the Style Analyzer uses for blocks.

use style_core::ids::SessionId;
use style_core::model::error::Error;
use style_core::model::rewrite::RewriteJob;

use super::AssemblyLineRewriter;

/// One job submitted to the pool: the job itself, its initial errors, and
/// whether a second pass is opted in.
pub struct PoolJob {
    pub job: RewriteJob,
    pub initial_errors: Vec<Error>,
    pub second_pass_opt_in: bool,
    pub session_id: Option<SessionId>,
}

pub struct RewritePool {
    pool: rayon::ThreadPool,
}

impl RewritePool {
    /// `max_workers` mirrors `RuntimeConfig::max_rewrite_workers` (default 4,
    /// `MAX_REWRITE_WORKERS` override).
    pub fn new(max_workers: usize) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_workers.max(1))
            .thread_name(|i| format!("rewrite-worker-{i}"))
            .build()
            .expect("failed to build rewrite worker pool");
        Self { pool }
    }

    /// Runs every job to completion, bounded to this pool's worker count.
    /// `reanalyze` is shared read-only across all jobs (it closes over the
    /// analyzer and the universal threshold, not over any job-local state).
    pub fn run_all(
        &self,
        rewriter: &AssemblyLineRewriter,
        jobs: Vec<PoolJob>,
        reanalyze: &(dyn Fn(&str) -> Vec<Error> + Sync),
    ) -> Vec<RewriteJob> {
        self.pool.install(|| {
            use rayon::prelude::*;
            jobs.into_par_iter()
                .map(|pool_job| {
                    rewriter.run(
                        pool_job.job,
                        pool_job.initial_errors,
                        pool_job.second_pass_opt_in,
                        pool_job.session_id.as_ref(),
                        reanalyze,
                    )
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::transform::IdentityTransform;
    use std::sync::Arc;
    use style_core::model::document::ContentType;
    use style_core::model::error::{ConfidenceBreakdown, RuleCategory, Severity};

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
    fn runs_every_job_and_returns_them_all() {
        let rewriter = AssemblyLineRewriter::new(Arc::new(IdentityTransform), None, 8);
        let pool = RewritePool::new(2);
        let jobs = vec![
            PoolJob {
                job: RewriteJob::new("block-1", "Some text.", 1),
                initial_errors: vec![grammar_error()],
                second_pass_opt_in: false,
                session_id: None,
            },
            PoolJob {
                job: RewriteJob::new("block-2", "Other text.", 1),
                initial_errors: Vec::new(),
                second_pass_opt_in: false,
                session_id: None,
            },
        ];

        let results = pool.run_all(&rewriter, jobs, &|_| Vec::new());
        assert_eq!(results.len(), 2);
        assert!(results.iter().any(|r| r.block_id == "block-1" && r.errors_fixed == 1));
        assert!(results.iter().any(|r| r.block_id == "block-2" && r.errors_fixed == 0));
    }
}
