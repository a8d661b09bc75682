//! `confidence_weights.yaml` (§4.8) plus the adjustment-factor and
//! calculation-settings supplements pulled from the original's
//! `confidence_weights_config.py` (§11).

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::FxHashMap;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// The four weight buckets a confidence combination draws from. Must sum to
/// 1.0 (tolerance 1e-3) within any one section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBucket {
    pub morphological: f64,
    pub contextual: f64,
    pub domain: f64,
    pub discourse: f64,
}

impl WeightBucket {
    pub const fn uniform_default() -> Self {
        Self {
            morphological: 0.35,
            contextual: 0.30,
            domain: 0.20,
            discourse: 0.15,
        }
    }

    fn sum(&self) -> f64 {
        self.morphological + self.contextual + self.domain + self.discourse
    }

    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        for (name, value) in [
            ("morphological", self.morphological),
            ("contextual", self.contextual),
            ("domain", self.domain),
            ("discourse", self.discourse),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    key: format!("{section}.{name}"),
                    message: format!("must be within [0.0, 1.0], got {value}"),
                });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::Validation {
                section: section.to_string(),
                message: format!("weights must sum to 1.0, got {sum:.6}"),
            });
        }
        Ok(())
    }
}

impl Default for WeightBucket {
    fn default() -> Self {
        Self::uniform_default()
    }
}

/// How the four weight buckets combine into one raw signal (§11).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationMethod {
    #[default]
    WeightedAverage,
    GeometricMean,
    HarmonicMean,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentFactors {
    pub high_certainty_boost: f64,
    pub ambiguity_penalty: f64,
    pub adjustment_threshold: f64,
    pub max_confidence: f64,
    pub min_confidence: f64,
}

impl Default for AdjustmentFactors {
    fn default() -> Self {
        Self {
            high_certainty_boost: 1.1,
            ambiguity_penalty: 0.9,
            adjustment_threshold: 0.5,
            max_confidence: 0.95,
            min_confidence: 0.05,
        }
    }
}

impl AdjustmentFactors {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_confidence > self.max_confidence {
            return Err(ConfigError::Validation {
                section: "adjustment_factors".to_string(),
                message: format!(
                    "min_confidence ({}) must not exceed max_confidence ({})",
                    self.min_confidence, self.max_confidence
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) || !(0.0..=1.0).contains(&self.max_confidence)
        {
            return Err(ConfigError::OutOfRange {
                key: "adjustment_factors.min_confidence|max_confidence".to_string(),
                message: "bounds must be within [0.0, 1.0]".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationSettings {
    pub combination_method: CombinationMethod,
    pub normalize_weights: bool,
    pub precision: u32,
    pub enable_caching: bool,
    pub cache_ttl_secs: u64,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            combination_method: CombinationMethod::default(),
            normalize_weights: true,
            precision: 3,
            enable_caching: true,
            cache_ttl_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackWeights {
    pub unknown_rule: WeightBucket,
    pub unknown_content: WeightBucket,
}

/// Typed form of `confidence_weights.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceWeightsConfig {
    pub default_weights: WeightBucket,
    pub rule_specific_weights: FxHashMap<String, WeightBucket>,
    pub content_type_weights: FxHashMap<String, WeightBucket>,
    pub fallback_weights: FallbackWeights,
    pub adjustment_factors: AdjustmentFactors,
    pub calculation_settings: CalculationSettings,
}

impl ConfidenceWeightsConfig {
    /// Resolves the weight bucket for a (rule_id, content_type) pair,
    /// falling back to rule-specific, then content-type, then the default.
    pub fn weights_for(&self, rule_id: &str, content_type: &str) -> WeightBucket {
        if let Some(w) = self.rule_specific_weights.get(rule_id) {
            return *w;
        }
        if let Some(w) = self.content_type_weights.get(content_type) {
            return *w;
        }
        self.default_weights
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_weights.validate("default_weights")?;
        for (rule_id, w) in &self.rule_specific_weights {
            w.validate(&format!("rule_specific_weights.{rule_id}"))?;
        }
        for (content_type, w) in &self.content_type_weights {
            w.validate(&format!("content_type_weights.{content_type}"))?;
        }
        self.fallback_weights
            .unknown_rule
            .validate("fallback_weights.unknown_rule")?;
        self.fallback_weights
            .unknown_content
            .validate("fallback_weights.unknown_content")?;
        self.adjustment_factors.validate()?;
        Ok(())
    }
}
