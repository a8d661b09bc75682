//! The text-transformation capability (consumed by the rewriter, §6): a
//! narrow interface over an external rewrite engine. This crate defines the
//! contract and a deterministic no-op implementation used by tests; a real
//! LLM-backed implementation lives outside this engine (§1 Non-goals: "no
//! LLM inference is specified here").

use style_core::model::rewrite::Delta;

/// Guards the station's result against breaking block semantics (§4.5:
/// "code spans inside the block remain byte-identical; heading level is
/// unchanged").
#[derive(Debug, Clone, Copy)]
pub struct Constraints {
    pub preserve_code_spans: bool,
    pub preserve_heading_level: bool,
    pub max_length_ratio: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            preserve_code_spans: true,
            preserve_heading_level: true,
            max_length_ratio: 1.3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub text: String,
    pub deltas: Vec<Delta>,
}

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("transform exceeded max_length_ratio {limit}: produced ratio {actual}")]
    LengthRatioExceeded { limit: f64, actual: f64 },
    #[error("transform capability failed: {message}")]
    CapabilityFailed { message: String },
}

/// `transform(instruction, text, constraints) -> {text, deltas}` (§6).
pub trait TextTransform: Send + Sync {
    fn transform(&self, instruction: &str, text: &str, constraints: &Constraints) -> Result<TransformOutput, TransformError>;
}

/// Validates the length-ratio constraint common to every real
/// implementation; stations call this after invoking the capability so a
/// misbehaving backend can't silently balloon a block.
pub fn enforce_length_ratio(original: &str, produced: &str, constraints: &Constraints) -> Result<(), TransformError> {
    if original.is_empty() {
        return Ok(());
    }
    let ratio = produced.len() as f64 / original.len() as f64;
    if ratio > constraints.max_length_ratio {
        return Err(TransformError::LengthRatioExceeded {
            limit: constraints.max_length_ratio,
            actual: ratio,
        });
    }
    Ok(())
}

/// A deterministic stand-in that returns the input unchanged (no deltas).
/// Used by tests and as the default when no real capability is wired up;
/// never applies a station's instruction.
pub struct IdentityTransform;

impl TextTransform for IdentityTransform {
    fn transform(&self, _instruction: &str, text: &str, _constraints: &Constraints) -> Result<TransformOutput, TransformError> {
        Ok(TransformOutput {
            text: text.to_string(),
            deltas: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_a_no_op() {
        let output = IdentityTransform.transform("fix grammar", "Some text.", &Constraints::default()).unwrap();
        assert_eq!(output.text, "Some text.");
        assert!(output.deltas.is_empty());
    }

    #[test]
    fn length_ratio_rejects_excessive_growth() {
        let constraints = Constraints {
            max_length_ratio: 1.1,
            ..Default::default()
        };
        let err = enforce_length_ratio("short", "a very much longer replacement text indeed", &constraints);
        assert!(err.is_err());
    }

    #[test]
    fn length_ratio_accepts_similar_length() {
        let constraints = Constraints::default();
        assert!(enforce_length_ratio("hello there", "hello friend", &constraints).is_ok());
    }
}
