//! Rule Registry (D, §4.2): discovers, groups, and dispatches rules.
//! Grounded on `detectors/registry.rs`'s `Vec<Box<dyn Trait>>` +
//! `HashSet<String>` disabled-set shape, extended with the category
//! grouping and deterministic ordering §4.2 requires.

use std::time::Instant;

use style_core::model::document::ContentType;
use style_core::FxHashSet;

use super::{Rule, RuleContext, SentenceView};
use style_core::model::error::Error;

/// Raised by `register` on a duplicate rule id (§4.2).
#[derive(Debug, thiserror::Error)]
#[error("rule id '{0}' is already registered")]
pub struct DuplicateRule(pub String);

pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
    disabled: FxHashSet<String>,
    confidence_threshold: Option<f64>,
    soft_budget: std::time::Duration,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            disabled: FxHashSet::default(),
            confidence_threshold: None,
            soft_budget: std::time::Duration::from_millis(250),
        }
    }

    pub fn with_soft_budget(mut self, budget: std::time::Duration) -> Self {
        self.soft_budget = budget;
        self
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) -> Result<(), DuplicateRule> {
        let id = rule.rule_id();
        if self.rules.iter().any(|r| r.rule_id() == id) {
            return Err(DuplicateRule(id.to_string()));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn disable(&mut self, rule_id: &str) {
        self.disabled.insert(rule_id.to_string());
    }

    pub fn enable(&mut self, rule_id: &str) {
        self.disabled.remove(rule_id);
    }

    /// Broadcast threshold override consumed by the confidence pipeline
    /// (§4.2 "set_confidence_threshold").
    pub fn set_confidence_threshold(&mut self, threshold: f64) {
        self.confidence_threshold = Some(threshold);
    }

    pub fn confidence_threshold(&self) -> Option<f64> {
        self.confidence_threshold
    }

    /// Filters by `applies_to`, then sorts by (category, rule_id) for
    /// deterministic output (§4.2).
    pub fn rules_for(&self, block_type: &str, content_type: ContentType) -> Vec<&dyn Rule> {
        let mut applicable: Vec<&dyn Rule> = self
            .rules
            .iter()
            .filter(|r| !self.disabled.contains(r.rule_id()))
            .filter(|r| r.applies_to(block_type, content_type))
            .map(|r| r.as_ref())
            .collect();
        applicable.sort_by(|a, b| {
            a.category()
                .name()
                .cmp(b.category().name())
                .then_with(|| a.rule_id().cmp(b.rule_id()))
        });
        applicable
    }

    pub fn for_category(&self, category: &style_core::model::error::RuleCategory) -> Vec<&dyn Rule> {
        self.rules
            .iter()
            .filter(|r| !self.disabled.contains(r.rule_id()) && &r.category() == category)
            .map(|r| r.as_ref())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every applicable rule over one sentence, catching panics so one
    /// rule's failure never aborts the block (§4.2 failure semantics), and
    /// flagging rules that blow the soft time budget as `slow_rule`.
    pub fn analyze_sentence(
        &self,
        sentence: &SentenceView<'_>,
        context: &RuleContext,
        pipeline: &crate::confidence::ConfidencePipeline,
    ) -> Vec<Error> {
        let mut errors = Vec::new();
        for rule in self.rules_for(&context.block_type, context.content_type) {
            let started = Instant::now();
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                rule.analyze(sentence, context)
            }));
            let elapsed = started.elapsed();
            if elapsed > self.soft_budget {
                tracing::warn!(rule_id = rule.rule_id(), elapsed_ms = elapsed.as_millis() as u64, "slow_rule");
            }
            match result {
                Ok(raw_matches) => {
                    for raw in raw_matches {
                        let scored = super::make_error(rule, pipeline, sentence, raw, context);
                        if scored.confidence_provenance.meets_threshold {
                            errors.push(scored);
                        }
                    }
                }
                Err(_) => {
                    tracing::warn!(
                        rule_id = rule.rule_id(),
                        sentence_index = sentence.index,
                        "rule panicked during analysis"
                    );
                }
            }
        }
        errors.sort_by(|a, b| {
            a.sentence_index
                .cmp(&b.sentence_index)
                .then_with(|| a.start.cmp(&b.start))
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        errors
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
