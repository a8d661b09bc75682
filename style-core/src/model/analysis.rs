//! AnalysisResult, document statistics, and the two static confidence-pipeline
//! inputs (RuleReliability, ContentTypeModifier) (§3).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::model::block::StructuralBlock;
use crate::model::document::ContentType;
use crate::model::error::{Error, RuleCategory};
use crate::FxHashMap;

/// A coefficient in [0.0, 1.0] per rule id describing historical precision.
/// Static per process; hot-reloaded with config (§3).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleReliability(pub FxHashMap<String, f64>);

impl RuleReliability {
    /// Unknown rule ids get the conservative default of 0.5 (§4.3 step 2).
    pub fn lookup(&self, rule_id: &str) -> f64 {
        self.0.get(rule_id).copied().unwrap_or(0.5)
    }
}

/// A multiplier in [0.5, 1.5] indexed by (content_type, rule_category).
/// Every pair must resolve; a missing entry defaults to 1.0 (§3, §8 property 6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentTypeModifier(pub FxHashMap<(ContentType, String), f64>);

impl ContentTypeModifier {
    pub fn lookup(&self, content_type: ContentType, category: &RuleCategory) -> f64 {
        self.0
            .get(&(content_type, category.name().to_string()))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn set(&mut self, content_type: ContentType, category: impl Into<String>, modifier: f64) {
        self.0.insert((content_type, category.into()), modifier);
    }
}

/// Document-level statistics computed in Style Analyzer step 5 (§4.4).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DocumentStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub average_sentence_length: f64,
    pub passive_voice_ratio: f64,
    pub complex_word_ratio: f64,
    pub vocabulary_diversity: f64,
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub gunning_fog: f64,
    pub smog: f64,
}

/// Result of analyzing one (document, content-type, threshold-config) triple
/// (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub blocks: Vec<StructuralBlock>,
    pub errors_by_block: FxHashMap<String, Vec<Error>>,
    pub errors_by_category: FxHashMap<String, Vec<Error>>,
    pub stats: DocumentStats,
    #[serde(with = "duration_millis")]
    pub processing_time: Duration,
    pub threshold_fingerprint: String,
}

impl AnalysisResult {
    pub fn total_errors(&self) -> usize {
        self.errors_by_block.values().map(Vec::len).sum()
    }
}

mod duration_millis {
    use super::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (value.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
