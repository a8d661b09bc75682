//! S1: bare "Watson" on first mention should read "IBM Watson".

use std::sync::OnceLock;

use regex::Regex;
use style_core::model::document::ContentType;
use style_core::model::error::{RuleCategory, Severity, Suggestion};

use crate::rules::{RawMatch, Rule, RuleContext, SentenceView};

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\bWatson\b").unwrap())
}

pub struct FirstMentionProductName;

impl Rule for FirstMentionProductName {
    fn rule_id(&self) -> &'static str {
        "references.product_names.first_mention"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::References
    }

    fn default_severity(&self) -> Severity {
        Severity::High
    }

    fn applies_to(&self, _block_type: &str, _content_type: ContentType) -> bool {
        true
    }

    fn analyze(&self, sentence: &SentenceView<'_>, _context: &RuleContext) -> Vec<RawMatch> {
        let Some(found) = pattern().find(sentence.text) else {
            return Vec::new();
        };
        let already_qualified = sentence.text[..found.start()].trim_end().ends_with("IBM");
        if already_qualified {
            return Vec::new();
        }
        vec![RawMatch::new(
            found.start(),
            found.end(),
            "first mention of a product name should use its full brand form",
            0.80,
        )
        .with_suggestion(Suggestion::Replacement {
            text: "IBM Watson".to_string(),
        })
        .with_severity(Severity::High)
        .with_evidence(0.9)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::SentenceView;

    #[test]
    fn flags_bare_watson() {
        let rule = FirstMentionProductName;
        let sentence = SentenceView {
            index: 0,
            text: "Watson supports many languages.",
            start: 0,
            tokens: &[],
        };
        let context = RuleContext::new(ContentType::General, "paragraph");
        let matches = rule.analyze(&sentence, &context);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].suggestions[0].text(), "IBM Watson");
    }

    #[test]
    fn ignores_already_qualified_mention() {
        let rule = FirstMentionProductName;
        let sentence = SentenceView {
            index: 0,
            text: "IBM Watson supports many languages.",
            start: 0,
            tokens: &[],
        };
        let context = RuleContext::new(ContentType::General, "paragraph");
        assert!(rule.analyze(&sentence, &context).is_empty());
    }
}
