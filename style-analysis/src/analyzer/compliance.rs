//! Modular compliance (§4.4 step 6): a handful of structural expectations
//! checked against the document-wide content type, independent of the rule
//! registry. These are structural, not linguistic, so they bypass per-rule
//! applicability and run once over the whole block list.

use std::sync::Arc;

use style_core::model::document::ContentType;
use style_core::model::error::{Error, RuleCategory, Severity};
use style_core::model::{BlockType, StructuralBlock};

use crate::confidence::{ConfidencePipeline, ScoreInput};

const RULE_ID: &str = "structure.modular_compliance.procedure_missing_ordered_list";

/// Procedural content without a single ordered list step is very likely a
/// narrative description masquerading as a procedure.
pub fn check(blocks: &[StructuralBlock], content_type: ContentType, pipeline: &Arc<ConfidencePipeline>) -> Vec<Error> {
    if content_type != ContentType::Procedural {
        return Vec::new();
    }
    let has_ordered_list = blocks.iter().any(|b| b.block_type == BlockType::OrderedListItem);
    if has_ordered_list {
        return Vec::new();
    }

    let scored = pipeline.score(ScoreInput {
        rule_id: RULE_ID,
        category: RuleCategory::Structure,
        content_type,
        signal: 0.9,
        evidence_score: None,
        threshold_override: None,
    });

    vec![Error {
        rule_id: RULE_ID.to_string(),
        category: RuleCategory::Structure,
        sentence_index: 0,
        sentence: String::new(),
        start: 0,
        end: 0,
        message: "procedural content should contain at least one ordered list step".to_string(),
        severity: Severity::Medium,
        suggestions: Vec::new(),
        confidence: scored.final_confidence,
        confidence_provenance: scored,
        content_type,
        linguistic_analysis: serde_json::Value::Null,
    }]
}
