//! Document-wide content-type classification (§4.3 step 3, Open Question
//! decision #2: computed once for the whole document, never block-local).

use style_core::model::document::ContentType;

const TECHNICAL: &[&str] = &["api", "function", "configure", "parameter", "database", "server", "protocol", "algorithm"];
const PROCEDURAL: &[&str] = &["step", "first", "next", "then", "click", "select", "navigate", "install"];
const NARRATIVE: &[&str] = &["story", "once", "remember", "felt", "journey", "experience"];
const LEGAL: &[&str] = &["shall", "liability", "warranty", "agreement", "herein", "pursuant", "jurisdiction"];
const MARKETING: &[&str] = &["amazing", "best-in-class", "revolutionary", "unlock", "discover", "exclusive", "transform"];

/// Classifies by a frequency-weighted keyword profile across the six content
/// buckets (§4.3 step 3); ties and empty matches fall back to `General`.
pub fn classify(text: &str) -> ContentType {
    let lower = text.to_lowercase();
    let score = |keywords: &[&str]| -> usize { keywords.iter().filter(|kw| lower.contains(*kw)).count() };

    let scores = [
        (ContentType::Technical, score(TECHNICAL)),
        (ContentType::Procedural, score(PROCEDURAL)),
        (ContentType::Narrative, score(NARRATIVE)),
        (ContentType::Legal, score(LEGAL)),
        (ContentType::Marketing, score(MARKETING)),
    ];

    scores
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .max_by_key(|(_, count)| *count)
        .map(|(content_type, _)| content_type)
        .unwrap_or(ContentType::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_keywords_win() {
        let text = "First, click the button. Next, select the option, then navigate to settings.";
        assert_eq!(classify(text), ContentType::Procedural);
    }

    #[test]
    fn no_keywords_falls_back_to_general() {
        assert_eq!(classify("The cat sat on the mat."), ContentType::General);
    }

    #[test]
    fn legal_keywords_win() {
        let text = "This agreement shall bind both parties pursuant to the warranty herein.";
        assert_eq!(classify(text), ContentType::Legal);
    }
}
