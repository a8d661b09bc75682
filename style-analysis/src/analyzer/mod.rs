//! Style Analyzer (F, §4.4): orchestrates the structural parser, the rule
//! registry, and the confidence pipeline into one `analyze` call, emitting
//! progress onto the session fabric as it goes.

mod compliance;
pub mod stats;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use style_core::ids::{DocumentId, SessionId};
use style_core::model::document::ContentType;
use style_core::model::error::Error;
use style_core::model::{AnalysisResult, Document, FormatHint, StructuralBlock};
use style_core::FxHashMap;
use style_session::{EventType, SessionDirectory};

use crate::confidence::{classify, ConfidencePipeline};
use crate::rules::helpers::SentenceMemo;
use crate::rules::{Registry, RuleContext};
use crate::toolkit::{split_sentences_by_punctuation, LinguisticToolkit};

/// A single `analyze` invocation's parameters (§4.4 contract). Grouped into
/// a struct because every field beyond `text` is optional and the teacher's
/// analyzer entry points (`ScanRequest`-shaped) take a request object rather
/// than a long positional argument list.
pub struct AnalyzeRequest<'a> {
    pub text: &'a str,
    pub format_hint: FormatHint,
    pub content_type_override: Option<ContentType>,
    pub threshold_override: Option<f64>,
    pub session_id: Option<SessionId>,
}

/// Owns the shared, process-lifetime collaborators an analysis run needs:
/// the rule registry, the confidence pipeline, the linguistic toolkit, and
/// (optionally) the session fabric to emit progress onto.
pub struct StyleAnalyzer {
    registry: Registry,
    pipeline: Arc<ConfidencePipeline>,
    toolkit: Arc<dyn LinguisticToolkit>,
    directory: Option<Arc<SessionDirectory>>,
    max_errors_per_rule_per_block: usize,
}

impl StyleAnalyzer {
    pub fn new(
        registry: Registry,
        pipeline: Arc<ConfidencePipeline>,
        toolkit: Arc<dyn LinguisticToolkit>,
        directory: Option<Arc<SessionDirectory>>,
    ) -> Self {
        Self::with_max_errors_per_rule_per_block(
            registry,
            pipeline,
            toolkit,
            directory,
            style_core::config::PerformanceSettings::default().max_errors_per_rule_per_block,
        )
    }

    /// Same as `new`, but with an explicit per-(block, rule) error cap
    /// (§8 boundary behavior: "a rule that returns 10,000 errors on one
    /// sentence is capped at a configurable max (default 500)").
    pub fn with_max_errors_per_rule_per_block(
        registry: Registry,
        pipeline: Arc<ConfidencePipeline>,
        toolkit: Arc<dyn LinguisticToolkit>,
        directory: Option<Arc<SessionDirectory>>,
        max_errors_per_rule_per_block: usize,
    ) -> Self {
        Self {
            registry,
            pipeline,
            toolkit,
            directory,
            max_errors_per_rule_per_block,
        }
    }

    fn emit(&self, session_id: Option<&SessionId>, event_type: EventType, payload: serde_json::Value) {
        if let Some(directory) = &self.directory {
            directory.emit(session_id, event_type, payload);
        }
    }

    /// Runs the full §4.4 algorithm over `request.text`.
    pub fn analyze(&self, request: AnalyzeRequest<'_>) -> AnalysisResult {
        let started = Instant::now();
        let session_id = request.session_id;

        // Step 1: hand text to the Structural Parser.
        let document = Document::new(request.text, request.format_hint);
        let document_id: DocumentId = document.id().clone();
        let blocks = crate::parser::parse(&document_id, document.text(), document.format_hint());

        // Step 2: analysis_start at 10%.
        self.emit(
            session_id.as_ref(),
            EventType::AnalysisStart,
            serde_json::json!({ "percent": 10, "block_count": blocks.len() }),
        );

        // Step 3: document-wide content-type classification (Open Question
        // decision #2), unless the caller already supplied one.
        let content_type = request
            .content_type_override
            .unwrap_or_else(|| classify(document.text()));

        // Step 4: per-block rule execution. Blocks may run in parallel;
        // rules within one block never do (they share one SentenceMemo).
        let prose_blocks: Vec<&StructuralBlock> = blocks.iter().filter(|b| b.block_type.is_prose()).collect();
        let total_prose_blocks = prose_blocks.len().max(1);
        let completed = AtomicUsize::new(0);

        let per_block_results: Vec<(String, Vec<Error>, Vec<String>)> = prose_blocks
            .par_iter()
            .map(|&block| {
                let (errors, sentences) = self.analyze_block(block, content_type, request.threshold_override);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                let percent = 40 + (30 * done / total_prose_blocks).min(30);
                self.emit(
                    session_id.as_ref(),
                    EventType::ProgressUpdate,
                    serde_json::json!({ "percent": percent, "blocks_done": done, "blocks_total": total_prose_blocks }),
                );
                (block.id.as_str().to_string(), errors, sentences)
            })
            .collect();

        let mut errors_by_block: FxHashMap<String, Vec<Error>> = FxHashMap::default();
        let mut errors_by_category: FxHashMap<String, Vec<Error>> = FxHashMap::default();
        let mut prose_sentences: Vec<Vec<String>> = Vec::with_capacity(per_block_results.len());
        for (block_id, mut errors, sentences) in per_block_results {
            errors.sort_by(|a, b| {
                a.sentence_index
                    .cmp(&b.sentence_index)
                    .then_with(|| a.start.cmp(&b.start))
                    .then_with(|| a.rule_id.cmp(&b.rule_id))
            });
            let errors = cap_errors_per_rule(errors, self.max_errors_per_rule_per_block);
            for error in &errors {
                errors_by_category
                    .entry(error.category.name().to_string())
                    .or_default()
                    .push(error.clone());
            }
            errors_by_block.insert(block_id, errors);
            prose_sentences.push(sentences);
        }

        // Step 5: document statistics.
        let paragraph_count = stats::count_prose_paragraphs(&blocks);
        let document_stats = stats::compute(&prose_sentences, paragraph_count);

        // Step 6: modular compliance.
        let compliance_errors = compliance::check(&blocks, content_type, &self.pipeline);
        if !compliance_errors.is_empty() {
            errors_by_category
                .entry(compliance_errors[0].category.name().to_string())
                .or_default()
                .extend(compliance_errors.iter().cloned());
            errors_by_block
                .entry("document".to_string())
                .or_default()
                .extend(compliance_errors);
        }

        let result = AnalysisResult {
            blocks,
            errors_by_block,
            errors_by_category,
            stats: document_stats,
            processing_time: started.elapsed(),
            threshold_fingerprint: threshold_fingerprint(request.threshold_override, &self.pipeline),
        };

        // Step 7: analysis_complete at 100%.
        self.emit(
            session_id.as_ref(),
            EventType::AnalysisComplete,
            serde_json::json!({
                "percent": 100,
                "total_errors": result.total_errors(),
                "content_type": content_type.name(),
            }),
        );

        result
    }

    /// Analyzes one block: splits it into sentences, asks the registry for
    /// applicable rules, and scores every raw match. Returns the block's
    /// errors plus the raw sentence strings (fed into document stats).
    fn analyze_block(
        &self,
        block: &StructuralBlock,
        content_type: ContentType,
        threshold_override: Option<f64>,
    ) -> (Vec<Error>, Vec<String>) {
        let sentences = match self.toolkit.analyze(&block.text) {
            Ok(output) => output.sentences,
            Err(failure) => {
                tracing::warn!(
                    block_id = block.id.as_str(),
                    message = %failure.message,
                    "toolkit failed splitting block into sentences, degrading to punctuation split"
                );
                split_sentences_by_punctuation(&block.text)
            }
        };

        let mut context = RuleContext::new(content_type, block.block_type.name());
        context.confidence_threshold_override = threshold_override;

        let memo = SentenceMemo::new();
        let mut errors = Vec::new();
        let mut cursor = 0usize;
        for (index, sentence_text) in sentences.iter().enumerate() {
            let sentence_start = block
                .text
                .get(cursor..)
                .and_then(|rest| rest.find(sentence_text.as_str()))
                .map(|offset| cursor + offset)
                .unwrap_or(cursor);
            cursor = sentence_start + sentence_text.len();

            let parsed = memo.get_or_parse(index, sentence_text, self.toolkit.as_ref());
            let view = crate::rules::SentenceView {
                index,
                text: sentence_text,
                start: block.start + sentence_start,
                tokens: &parsed.tokens,
            };
            errors.extend(self.registry.analyze_sentence(&view, &context, &self.pipeline));
        }

        (errors, sentences)
    }
}

/// A short fingerprint of the thresholding configuration this result was
/// produced under, so two `AnalysisResult`s can be compared for
/// threshold-comparability without serializing the whole config (§3).
fn threshold_fingerprint(threshold_override: Option<f64>, pipeline: &ConfidencePipeline) -> String {
    let marker = format!("{:?}|{:p}", threshold_override, pipeline);
    format!("{:016x}", xxhash_rust::xxh3::xxh3_64(marker.as_bytes()))
}

/// Caps the number of errors kept per (block, rule) at `max_per_rule`
/// (§8 boundary behavior, §4.2 "a rule that exceeds... is allowed to finish
/// but..."; here: "a rule that returns 10,000 errors on one sentence is
/// capped at a configurable max (default 500) per (block, rule)"). `errors`
/// is already sorted by `(sentence_index, start, rule_id)`, so the kept
/// errors for a given rule are its earliest matches in the block.
fn cap_errors_per_rule(errors: Vec<Error>, max_per_rule: usize) -> Vec<Error> {
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    errors
        .into_iter()
        .filter(|error| {
            let count = counts.entry(error.rule_id.clone()).or_insert(0);
            if *count >= max_per_rule {
                false
            } else {
                *count += 1;
                true
            }
        })
        .collect()
}
