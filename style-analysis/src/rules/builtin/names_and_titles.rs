//! Professional titles directly preceding a personal name should be
//! capitalized ("director Smith" -> "Director Smith"), mirroring the
//! original's title/name appositive check without a real dependency parser:
//! a lowercase title word immediately followed by a capitalized token is
//! treated as a name-bound title and flagged.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use style_core::config::{ConfidenceWeightsConfig, LinguisticAnchorsConfig};
use style_core::model::document::ContentType;
use style_core::model::error::{RuleCategory, Severity, Suggestion};

use crate::rules::helpers::{combine_anchor_adjustment, combine_component_signals};
use crate::rules::{RawMatch, Rule, RuleContext, SentenceView};

const TITLES: &[&str] = &[
    "director", "manager", "engineer", "architect", "analyst", "specialist", "coordinator",
    "supervisor", "professor", "president",
];

const FORMAL_INDICATORS: &[&str] = &["appointed", "promoted", "named", "elected", "announced"];

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternation = TITLES.join("|");
        Regex::new(&format!(r"\b({alternation})\s+([A-Z][a-zA-Z]*)\b")).unwrap()
    })
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn has_formal_indicator(text: &str) -> bool {
    let lower = text.to_lowercase();
    FORMAL_INDICATORS.iter().any(|word| lower.contains(word))
}

/// Grounded on `references/names_and_titles_rule.py`'s title-with-name
/// capitalization check; the weight-bucket/anchor combination machinery it
/// exercises is described in SPEC_FULL.md §11/§12 decision 5.
pub struct NamesAndTitles {
    weights: Arc<ConfidenceWeightsConfig>,
    anchors: Arc<LinguisticAnchorsConfig>,
}

impl NamesAndTitles {
    pub fn new(weights: Arc<ConfidenceWeightsConfig>, anchors: Arc<LinguisticAnchorsConfig>) -> Self {
        Self { weights, anchors }
    }
}

impl Default for NamesAndTitles {
    fn default() -> Self {
        Self::new(
            Arc::new(ConfidenceWeightsConfig::default()),
            Arc::new(LinguisticAnchorsConfig::default()),
        )
    }
}

impl Rule for NamesAndTitles {
    fn rule_id(&self) -> &'static str {
        "references.names_and_titles"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::References
    }

    fn default_severity(&self) -> Severity {
        Severity::Medium
    }

    fn applies_to(&self, _block_type: &str, _content_type: ContentType) -> bool {
        true
    }

    fn analyze(&self, sentence: &SentenceView<'_>, context: &RuleContext) -> Vec<RawMatch> {
        let Some(captures) = pattern().captures(sentence.text) else {
            return Vec::new();
        };
        let whole = captures.get(0).unwrap();
        let title = captures.get(1).unwrap().as_str();
        let name = captures.get(2).unwrap().as_str();

        // Four distinct evidence sources the original weighed by a
        // configurable morphological/contextual/domain/discourse mix
        // (§11 supplement) rather than a flat average.
        let morphological = 0.85;
        let contextual = if whole.start() == 0 { 0.5 } else { 0.8 };
        let domain = match context.content_type {
            ContentType::Technical | ContentType::Procedural => 0.85,
            _ => 0.6,
        };
        let discourse = if has_formal_indicator(sentence.text) { 0.9 } else { 0.55 };

        let signal = combine_component_signals(
            &self.weights,
            self.rule_id(),
            context.content_type,
            [morphological, contextual, domain, discourse],
        );

        let anchor_adjustment = combine_anchor_adjustment(&self.anchors, &["title_with_name"]);
        let evidence = (0.75 + anchor_adjustment).clamp(0.0, 1.0);

        vec![RawMatch::new(
            whole.start(),
            whole.end(),
            "a professional title directly preceding a name should be capitalized",
            signal,
        )
        .with_suggestion(Suggestion::Replacement {
            text: format!("{} {}", capitalize_first(title), name),
        })
        .with_severity(Severity::Medium)
        .with_evidence(evidence)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_title_bound_to_a_name() {
        let rule = NamesAndTitles::default();
        let sentence = SentenceView {
            index: 0,
            text: "Our director Smith will present the roadmap.",
            start: 0,
            tokens: &[],
        };
        let context = RuleContext::new(ContentType::General, "paragraph");
        let matches = rule.analyze(&sentence, &context);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].suggestions[0].text(), "Director Smith");
    }

    #[test]
    fn ignores_already_capitalized_title() {
        let rule = NamesAndTitles::default();
        let sentence = SentenceView {
            index: 0,
            text: "Director Smith will present the roadmap.",
            start: 0,
            tokens: &[],
        };
        let context = RuleContext::new(ContentType::General, "paragraph");
        assert!(rule.analyze(&sentence, &context).is_empty());
    }

    #[test]
    fn ignores_standalone_generic_title() {
        let rule = NamesAndTitles::default();
        let sentence = SentenceView {
            index: 0,
            text: "The director manages the team.",
            start: 0,
            tokens: &[],
        };
        let context = RuleContext::new(ContentType::General, "paragraph");
        assert!(rule.analyze(&sentence, &context).is_empty());
    }

    #[test]
    fn formal_announcement_context_raises_the_discourse_component() {
        let rule = NamesAndTitles::default();
        let announced = SentenceView {
            index: 0,
            text: "The board announced director Smith as the new lead.",
            start: 0,
            tokens: &[],
        };
        let plain = SentenceView {
            index: 0,
            text: "Our director Smith runs the weekly standup.",
            start: 0,
            tokens: &[],
        };
        let context = RuleContext::new(ContentType::General, "paragraph");
        let announced_signal = rule.analyze(&announced, &context)[0].signal;
        let plain_signal = rule.analyze(&plain, &context)[0].signal;
        assert!(announced_signal > plain_signal);
    }
}
