//! S4: directional + place-name pairs ("northern california") should be
//! capitalized as a proper compound ("Northern California").

use std::sync::OnceLock;

use regex::Regex;
use style_core::model::document::ContentType;
use style_core::model::error::{RuleCategory, Severity, Suggestion};

use crate::rules::{RawMatch, Rule, RuleContext, SentenceView};

const DIRECTIONS: &[&str] = &["northern", "southern", "eastern", "western", "north", "south", "east", "west"];

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternation = DIRECTIONS.join("|");
        Regex::new(&format!(r"\b(?i:{alternation})\s+[a-z][a-z-]*\b")).unwrap()
    })
}

pub struct GeographicCapitalization;

impl Rule for GeographicCapitalization {
    fn rule_id(&self) -> &'static str {
        "references.geographic_locations"
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

    fn analyze(&self, sentence: &SentenceView<'_>, _context: &RuleContext) -> Vec<RawMatch> {
        let Some(found) = pattern().find(sentence.text) else {
            return Vec::new();
        };
        let matched = found.as_str();
        let capitalized = matched
            .split_whitespace()
            .map(capitalize_first)
            .collect::<Vec<_>>()
            .join(" ");

        vec![RawMatch::new(
            found.start(),
            found.end(),
            "directional geographic references should be capitalized",
            0.70,
        )
        .with_suggestion(Suggestion::Replacement { text: capitalized })
        .with_severity(Severity::Medium)]
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_both_tokens() {
        let rule = GeographicCapitalization;
        let sentence = SentenceView {
            index: 0,
            text: "We operate in northern california.",
            start: 0,
            tokens: &[],
        };
        let context = RuleContext::new(ContentType::General, "paragraph");
        let matches = rule.analyze(&sentence, &context);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].suggestions[0].text(), "Northern California");
    }
}
