//! Confidence Pipeline (E, §4.3): turns a rule's raw signal into a single
//! calibrated score against the universal threshold, with full provenance.

pub mod cache;
pub mod content_type;

use std::sync::Arc;

use style_core::config::AdjustmentFactors;
use style_core::model::analysis::{ContentTypeModifier, RuleReliability};
use style_core::model::document::ContentType;
use style_core::model::error::{ConfidenceBreakdown, RuleCategory};

use cache::ConfidenceCache;

pub use content_type::classify;

/// What a rule's raw match contributes to one score computation (§4.3 steps
/// 1-5); everything else is looked up by the pipeline itself.
pub struct ScoreInput<'a> {
    pub rule_id: &'a str,
    pub category: RuleCategory,
    pub content_type: ContentType,
    pub signal: f64,
    pub evidence_score: Option<f64>,
    pub threshold_override: Option<f64>,
}

pub struct ConfidencePipeline {
    rule_reliability: Arc<RuleReliability>,
    content_modifiers: Arc<ContentTypeModifier>,
    universal_threshold: f64,
    adjustment_factors: AdjustmentFactors,
    cache: ConfidenceCache,
}

impl ConfidencePipeline {
    pub fn new(
        rule_reliability: Arc<RuleReliability>,
        content_modifiers: Arc<ContentTypeModifier>,
        universal_threshold: f64,
        adjustment_factors: AdjustmentFactors,
        cache_capacity: u64,
    ) -> Self {
        Self {
            rule_reliability,
            content_modifiers,
            universal_threshold,
            adjustment_factors,
            cache: ConfidenceCache::new(cache_capacity),
        }
    }

    /// Drops every cached score; called when any config layer reloads
    /// (§4.3 "Caching").
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    /// Runs the full pipeline (§4.3 steps 1-10) for one raw error.
    pub fn score(&self, input: ScoreInput<'_>) -> ConfidenceBreakdown {
        let threshold = input.threshold_override.unwrap_or(self.universal_threshold);
        let signal = sanitize(input.signal);
        let evidence = input.evidence_score.map(sanitize);

        self.cache.get_or_insert_with(
            input.rule_id,
            input.content_type,
            threshold,
            signal,
            evidence,
            || self.compute(input.rule_id, &input.category, input.content_type, signal, evidence, threshold),
        )
    }

    fn compute(
        &self,
        rule_id: &str,
        category: &RuleCategory,
        content_type: ContentType,
        signal: f64,
        evidence: Option<f64>,
        threshold: f64,
    ) -> ConfidenceBreakdown {
        // Step 2: rule reliability, unknown ids default to 0.5.
        let reliability = self.rule_reliability.lookup(rule_id);
        // Step 4: content modifier, missing pair defaults to 1.0.
        let content_modifier = self.content_modifiers.lookup(content_type, category);

        // Step 6: blending.
        let (raw, evidence_weight, model_weight) = match evidence {
            None => ((signal * reliability * content_modifier).min(1.0), 0.0, 1.0),
            Some(e) => {
                let evidence_weight = (0.2 + 0.55 * e).clamp(0.2, 0.7);
                let model_weight = 1.0 - evidence_weight;
                let blended = e * evidence_weight + signal * model_weight;
                ((blended * reliability * content_modifier).min(1.0), evidence_weight, model_weight)
            }
        };

        // Step 7: floor guard — both evidence AND reliability must clear 0.85
        // (Open Question decision #3; a reliability-only trigger is not
        // implemented).
        let floor_guard_triggered = evidence.is_some_and(|e| e >= 0.85) && reliability >= 0.85;
        let mut final_confidence = if floor_guard_triggered { raw.max(0.75) } else { raw };

        // §11 supplement: adjustment factors apply after the floor guard,
        // before the final clamp.
        let factors = &self.adjustment_factors;
        if final_confidence >= factors.adjustment_threshold {
            final_confidence *= factors.high_certainty_boost;
        } else {
            final_confidence *= factors.ambiguity_penalty;
        }
        final_confidence = final_confidence.clamp(factors.min_confidence, factors.max_confidence);

        // Step 8: clamp to [0, 1] (the adjustment-factor bounds above are
        // narrower and already enforce this, but keep the spec's own clamp
        // explicit).
        final_confidence = final_confidence.clamp(0.0, 1.0);

        let meets_threshold = final_confidence >= threshold;

        ConfidenceBreakdown {
            signal,
            rule_reliability: reliability,
            content_modifier,
            evidence_score: evidence,
            evidence_weight,
            model_weight,
            raw_confidence: raw,
            floor_guard_triggered,
            final_confidence,
            universal_threshold: threshold,
            meets_threshold,
        }
    }
}

/// Non-finite or negative inputs are sanitized to 0.0 (§4.3 edge cases).
fn sanitize(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        0.0
    } else {
        value
    }
}
