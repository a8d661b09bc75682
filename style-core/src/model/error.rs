//! Error (detected issue), its severity/suggestion/category vocabulary, and
//! the confidence provenance record (§3, §4.3 step 10).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Coarse rule grouping (§3), used for station applicability and analytics.
/// `Other` keeps the set open for rules in categories this model doesn't
/// name explicitly, matching the "..." in the source enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Grammar,
    Punctuation,
    WordUsage,
    Tone,
    Commands,
    Claims,
    Pronouns,
    References,
    Structure,
    Other(String),
}

impl RuleCategory {
    pub fn name(&self) -> &str {
        match self {
            Self::Grammar => "grammar",
            Self::Punctuation => "punctuation",
            Self::WordUsage => "word_usage",
            Self::Tone => "tone",
            Self::Commands => "commands",
            Self::Claims => "claims",
            Self::Pronouns => "pronouns",
            Self::References => "references",
            Self::Structure => "structure",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered suggestion: either a concrete replacement for the matched span
/// or a free-form prose instruction for the rewriter (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    Replacement { text: String },
    Instruction { text: String },
}

impl Suggestion {
    pub fn text(&self) -> &str {
        match self {
            Self::Replacement { text } | Self::Instruction { text } => text,
        }
    }
}

/// The per-error confidence provenance record (§4.3 step 10). Every field is
/// present; `None` only where the pipeline step that fills it never ran.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub signal: f64,
    pub rule_reliability: f64,
    pub content_modifier: f64,
    pub evidence_score: Option<f64>,
    pub evidence_weight: f64,
    pub model_weight: f64,
    pub raw_confidence: f64,
    pub floor_guard_triggered: bool,
    pub final_confidence: f64,
    pub universal_threshold: f64,
    pub meets_threshold: bool,
}

impl ConfidenceBreakdown {
    /// Human-readable one-line rendering for UI tooltips (§11 supplement).
    /// Ambient convenience over the structured record above, not a new
    /// confidence computation.
    pub fn render_explanation(&self) -> String {
        let evidence_clause = match self.evidence_score {
            Some(e) => format!(", evidence {e:.2} (weight {:.2})", self.evidence_weight),
            None => String::new(),
        };
        let floor_clause = if self.floor_guard_triggered {
            " (floor guard applied)"
        } else {
            ""
        };
        format!(
            "signal {:.2} x reliability {:.2} x modifier {:.2}{evidence_clause} -> {:.2}{floor_clause}, threshold {:.2} ({})",
            self.signal,
            self.rule_reliability,
            self.content_modifier,
            self.final_confidence,
            self.universal_threshold,
            if self.meets_threshold { "visible" } else { "suppressed" }
        )
    }
}

/// A detected issue (§3). Created by a rule, owned by the `AnalysisResult`,
/// never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    pub rule_id: String,
    pub category: RuleCategory,
    pub sentence_index: usize,
    pub sentence: String,
    pub start: usize,
    pub end: usize,
    pub message: String,
    pub severity: Severity,
    pub suggestions: Vec<Suggestion>,
    pub confidence: f64,
    pub confidence_provenance: ConfidenceBreakdown,
    pub content_type: crate::model::document::ContentType,
    /// Opaque linguistic-analysis bag (morphological features, dependency
    /// pattern labels) for UI and rewrite consumption.
    pub linguistic_analysis: serde_json::Value,
}
