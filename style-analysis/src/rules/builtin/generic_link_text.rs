//! S2: generic link text ("click here", "read more", ...) should be replaced
//! with a descriptive phrase.

use std::sync::OnceLock;

use regex::Regex;
use style_core::model::document::ContentType;
use style_core::model::error::{RuleCategory, Severity, Suggestion};

use crate::rules::{RawMatch, Rule, RuleContext, SentenceView};

const GENERIC_PHRASES: &[&str] = &["click here", "read more", "learn more", "see more", "this link"];

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternation = GENERIC_PHRASES.join("|");
        Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).unwrap()
    })
}

pub struct GenericLinkText;

impl Rule for GenericLinkText {
    fn rule_id(&self) -> &'static str {
        "references.citations.generic_link_text"
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
        vec![RawMatch::new(
            found.start(),
            found.end(),
            "link text should describe its destination, not just invite a click",
            0.75,
        )
        .with_suggestion(Suggestion::Instruction {
            text: "replace with descriptive link text naming the destination".to_string(),
        })
        .with_severity(Severity::High)]
    }
}
