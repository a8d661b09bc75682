//! Linguistic Toolkit Interface (A), a narrow capability consumed by rules
//! (§6). Morphological parsing, POS tagging, and NER are out of scope (§1);
//! this module only defines the contract and the degraded fallback used
//! when the real toolkit is unavailable or fails on a sentence (§7 ToolkitError).

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One analyzed token (§6 toolkit capability).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: String,
    pub tag: String,
    pub dep: String,
    pub head_index: usize,
    pub morph: smallvec::SmallVec<[(String, String); 4]>,
    pub ent_type: Option<String>,
    pub is_punct: bool,
    pub like_num: bool,
    pub sent_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
    pub tokens: SmallVec<[usize; 8]>,
}

/// The result of running the toolkit over one document (§6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolkitOutput {
    pub sentences: Vec<String>,
    pub tokens: Vec<Token>,
    pub entities: Vec<Entity>,
}

/// Raised when the real toolkit cannot analyze a sentence (§7 ToolkitError).
#[derive(Debug, thiserror::Error)]
#[error("toolkit failed on sentence {sentence_index}: {message}")]
pub struct ToolkitFailure {
    pub sentence_index: usize,
    pub message: String,
}

/// The narrow capability every rule consumes (A). Implementations wrap a
/// real NLP backend; tests and the degraded path below satisfy it directly.
pub trait LinguisticToolkit: Send + Sync {
    fn analyze(&self, text: &str) -> Result<ToolkitOutput, ToolkitFailure>;
}

/// Degrades to punctuation-based sentence splitting and skips morphological
/// rules when the real toolkit is unavailable (§6, §7: "non-fatal; the
/// analyzer degrades to sentence-splitting by punctuation").
pub struct DegradedToolkit;

impl LinguisticToolkit for DegradedToolkit {
    fn analyze(&self, text: &str) -> Result<ToolkitOutput, ToolkitFailure> {
        Ok(ToolkitOutput {
            sentences: split_sentences_by_punctuation(text),
            tokens: Vec::new(),
            entities: Vec::new(),
        })
    }
}

/// Wraps a real toolkit, falling back to `DegradedToolkit` per-sentence on
/// failure rather than aborting analysis (§7: "caught per-sentence; the
/// sentence is processed by a degraded path").
pub struct FallbackToolkit<T: LinguisticToolkit> {
    inner: T,
}

impl<T: LinguisticToolkit> FallbackToolkit<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: LinguisticToolkit> LinguisticToolkit for FallbackToolkit<T> {
    fn analyze(&self, text: &str) -> Result<ToolkitOutput, ToolkitFailure> {
        match self.inner.analyze(text) {
            Ok(output) => Ok(output),
            Err(failure) => {
                tracing::warn!(
                    sentence_index = failure.sentence_index,
                    message = %failure.message,
                    "toolkit failed on sentence, degrading to punctuation split"
                );
                DegradedToolkit.analyze(text)
            }
        }
    }
}

/// Splits text into sentences at `.`, `!`, `?` boundaries, collapsing
/// whitespace. Used by the degraded path and as the parser's own sentence
/// splitter when no toolkit sentence boundaries are available.
pub fn split_sentences_by_punctuation(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_terminal_punctuation() {
        let sentences = split_sentences_by_punctuation("Hello there. How are you? Fine!");
        assert_eq!(sentences, vec!["Hello there.", "How are you?", "Fine!"]);
    }

    #[test]
    fn degraded_toolkit_never_fails() {
        let output = DegradedToolkit.analyze("One. Two.").unwrap();
        assert_eq!(output.sentences.len(), 2);
        assert!(output.tokens.is_empty());
    }
}
