//! S3: a bare `V` prefix on a version number ("V2.1") should be stripped.

use std::sync::OnceLock;

use regex::Regex;
use style_core::model::document::ContentType;
use style_core::model::error::{RuleCategory, Severity, Suggestion};

use crate::rules::{RawMatch, Rule, RuleContext, SentenceView};

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\bV(\d+(?:\.\d+)*)\b").unwrap())
}

pub struct InvalidVersionPrefix;

impl Rule for InvalidVersionPrefix {
    fn rule_id(&self) -> &'static str {
        "references.product_versions.invalid_prefix"
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
        let Some(captures) = pattern().captures(sentence.text) else {
            return Vec::new();
        };
        let whole = captures.get(0).unwrap();
        let version = captures.get(1).unwrap().as_str();
        let corrected = format!("{}{}{}", &sentence.text[..whole.start()], version, &sentence.text[whole.end()..]);

        vec![RawMatch::new(
            whole.start(),
            whole.end(),
            "version numbers should not carry a leading 'V'",
            0.70,
        )
        .with_suggestion(Suggestion::Replacement { text: corrected })
        .with_severity(Severity::Medium)]
    }
}
