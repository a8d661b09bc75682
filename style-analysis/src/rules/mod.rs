//! Rule Contract & Registry (C, D, §4.2).

pub mod builtin;
pub mod helpers;
pub mod registry;

use serde_json::Value;
use style_core::model::analysis::RuleReliability;
use style_core::model::document::ContentType;
use style_core::model::error::{Error, Severity, Suggestion};
use style_core::FxHashMap;

use crate::toolkit::Token;

pub use registry::Registry;

/// Reliability coefficients for the bundled builtin rules, used to seed
/// `rule_reliability.yaml` when the operator hasn't shipped their own
/// (§4.3 step 2: unknown ids otherwise default to a conservative 0.5, which
/// would under-rate a rule this engine ships and already trusts).
pub fn default_rule_reliability() -> RuleReliability {
    let mut map = FxHashMap::default();
    map.insert("references.product_names.first_mention".to_string(), 0.85);
    map.insert("references.citations.generic_link_text".to_string(), 0.70);
    map.insert("references.product_versions.invalid_prefix".to_string(), 0.65);
    map.insert("references.geographic_locations".to_string(), 0.60);
    map.insert("references.names_and_titles".to_string(), 0.55);
    RuleReliability(map)
}

/// Per-call context threaded into every rule (§4.2): "a mapping carrying at
/// minimum content_type, block_type, domain, confidence_threshold_override,
/// and a sub-mapping of rule-local options".
#[derive(Debug, Clone)]
pub struct RuleContext {
    pub content_type: ContentType,
    pub block_type: String,
    pub domain: Option<String>,
    pub confidence_threshold_override: Option<f64>,
    pub options: FxHashMap<String, Value>,
}

impl RuleContext {
    pub fn new(content_type: ContentType, block_type: impl Into<String>) -> Self {
        Self {
            content_type,
            block_type: block_type.into(),
            domain: None,
            confidence_threshold_override: None,
            options: FxHashMap::default(),
        }
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }
}

/// One analyzed sentence, as handed to a rule (§4.2). `tokens` is empty when
/// the toolkit degraded for this sentence.
pub struct SentenceView<'a> {
    pub index: usize,
    pub text: &'a str,
    pub start: usize,
    pub tokens: &'a [Token],
}

/// The rule contract (§4.2): `rule_id() → string`, `category() → RuleCategory`,
/// `default_severity() → severity`, plus an applicability predicate and the
/// analysis entry point. Rules MUST be deterministic with respect to
/// (inputs, context, toolkit version) — no rule may read wall-clock time,
/// randomness, or mutable shared state.
pub trait Rule: Send + Sync {
    fn rule_id(&self) -> &'static str;

    fn category(&self) -> style_core::model::error::RuleCategory;

    fn default_severity(&self) -> Severity;

    /// Declares which (block_type, content_type) pairs this rule runs for.
    /// Must be side-effect-free (§8 property 7).
    fn applies_to(&self, block_type: &str, content_type: ContentType) -> bool {
        let _ = content_type;
        let _ = block_type;
        true
    }

    /// Scans one sentence and returns raw matches (pre-confidence). The
    /// registry turns each returned `RawMatch` into an `Error` via
    /// `make_error` (§4.2), which is where the confidence pipeline runs.
    fn analyze(&self, sentence: &SentenceView<'_>, context: &RuleContext) -> Vec<RawMatch>;
}

/// What a rule finds before confidence scoring is attached.
pub struct RawMatch {
    pub start: usize,
    pub end: usize,
    pub message: String,
    pub suggestions: Vec<Suggestion>,
    pub severity: Option<Severity>,
    pub signal: f64,
    pub evidence_score: Option<f64>,
    pub linguistic_analysis: Value,
}

impl RawMatch {
    pub fn new(start: usize, end: usize, message: impl Into<String>, signal: f64) -> Self {
        Self {
            start,
            end,
            message: message.into(),
            suggestions: Vec::new(),
            severity: None,
            signal,
            evidence_score: None,
            linguistic_analysis: Value::Null,
        }
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_evidence(mut self, evidence: f64) -> Self {
        self.evidence_score = Some(evidence);
        self
    }
}

/// Turns a rule's raw match into a fully-scored `Error` by invoking the
/// confidence pipeline exactly once (§4.2: "invokes the confidence pipeline
/// exactly once to fill confidence and confidence_provenance").
#[allow(clippy::too_many_arguments)]
pub fn make_error(
    rule: &dyn Rule,
    pipeline: &crate::confidence::ConfidencePipeline,
    sentence: &SentenceView<'_>,
    raw: RawMatch,
    context: &RuleContext,
) -> Error {
    let severity = raw.severity.unwrap_or_else(|| rule.default_severity());
    let scored = pipeline.score(crate::confidence::ScoreInput {
        rule_id: rule.rule_id(),
        category: rule.category(),
        content_type: context.content_type,
        signal: raw.signal,
        evidence_score: raw.evidence_score,
        threshold_override: context.confidence_threshold_override,
    });

    Error {
        rule_id: rule.rule_id().to_string(),
        category: rule.category(),
        sentence_index: sentence.index,
        sentence: sentence.text.to_string(),
        start: sentence.start + raw.start,
        end: sentence.start + raw.end,
        message: raw.message,
        severity,
        suggestions: raw.suggestions,
        confidence: scored.final_confidence,
        confidence_provenance: scored,
        content_type: context.content_type,
        linguistic_analysis: raw.linguistic_analysis,
    }
}
