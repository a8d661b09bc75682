//! Property tests for the Confidence Pipeline's quantified invariants
//! (spec.md §8: confidence bounds, determinism) driven through the crate's
//! public API only.

use std::sync::Arc;

use proptest::prelude::*;

use style_analysis::confidence::{ConfidencePipeline, ScoreInput};
use style_core::config::AdjustmentFactors;
use style_core::model::analysis::{ContentTypeModifier, RuleReliability};
use style_core::model::document::ContentType;
use style_core::model::error::RuleCategory;

fn content_type_strategy() -> impl Strategy<Value = ContentType> {
    prop_oneof![
        Just(ContentType::Technical),
        Just(ContentType::Procedural),
        Just(ContentType::Narrative),
        Just(ContentType::Legal),
        Just(ContentType::Marketing),
        Just(ContentType::General),
    ]
}

fn category_strategy() -> impl Strategy<Value = RuleCategory> {
    prop_oneof![
        Just(RuleCategory::Grammar),
        Just(RuleCategory::Punctuation),
        Just(RuleCategory::WordUsage),
        Just(RuleCategory::Structure),
        Just(RuleCategory::Tone),
        Just(RuleCategory::Claims),
        Just(RuleCategory::References),
        Just(RuleCategory::Pronouns),
        Just(RuleCategory::Commands),
    ]
}

fn pipeline_with_reliability(reliability: f64) -> ConfidencePipeline {
    let mut table = RuleReliability::default();
    table.0.insert("proptest.rule".to_string(), reliability);
    ConfidencePipeline::new(
        Arc::new(table),
        Arc::new(ContentTypeModifier::default()),
        0.35,
        AdjustmentFactors::default(),
        1000,
    )
}

proptest! {
    /// §8 property: every score is within [0, 1] and carries a fully
    /// populated provenance record, for arbitrary signal/evidence/reliability
    /// combinations (NaN and negative values included — §4.3 edge cases).
    #[test]
    fn final_confidence_is_always_bounded(
        signal in -2.0f64..2.0,
        evidence in prop::option::of(-2.0f64..2.0),
        reliability in 0.0f64..1.0,
        category in category_strategy(),
        content_type in content_type_strategy(),
    ) {
        let pipeline = pipeline_with_reliability(reliability);
        let score = pipeline.score(ScoreInput {
            rule_id: "proptest.rule",
            category,
            content_type,
            signal,
            evidence_score: evidence,
            threshold_override: None,
        });

        prop_assert!(score.final_confidence >= 0.0 && score.final_confidence <= 1.0);
        prop_assert!(score.raw_confidence >= 0.0 && score.raw_confidence <= 1.0);
        prop_assert!(score.signal >= 0.0);
        if let Some(e) = score.evidence_score {
            prop_assert!(e >= 0.0);
        }
        prop_assert_eq!(score.meets_threshold, score.final_confidence >= score.universal_threshold);
    }

    /// With the default `AdjustmentFactors`, the post-adjustment clamp is
    /// narrower than the full unit interval: every score must land inside
    /// `[min_confidence, max_confidence]` (0.05..=0.95 by default, §11).
    #[test]
    fn final_confidence_respects_adjustment_factor_clamp(
        signal in 0.0f64..1.0,
        evidence in prop::option::of(0.0f64..1.0),
        reliability in 0.0f64..1.0,
        category in category_strategy(),
    ) {
        let factors = AdjustmentFactors::default();
        let pipeline = pipeline_with_reliability(reliability);
        let score = pipeline.score(ScoreInput {
            rule_id: "proptest.rule",
            category,
            content_type: ContentType::General,
            signal,
            evidence_score: evidence,
            threshold_override: None,
        });
        prop_assert!(score.final_confidence >= factors.min_confidence - 1e-9);
        prop_assert!(score.final_confidence <= factors.max_confidence + 1e-9);
    }

    /// §8 property: the pipeline is a pure function of its inputs — two
    /// independently constructed pipelines with identical configuration
    /// given the same `ScoreInput` produce byte-identical `ConfidenceBreakdown`s.
    #[test]
    fn scoring_is_deterministic_across_independent_pipelines(
        signal in 0.0f64..1.0,
        evidence in prop::option::of(0.0f64..1.0),
        reliability in 0.0f64..1.0,
        category in category_strategy(),
        content_type in content_type_strategy(),
    ) {
        let input = || ScoreInput {
            rule_id: "proptest.rule",
            category: category.clone(),
            content_type,
            signal,
            evidence_score: evidence,
            threshold_override: None,
        };

        let a = pipeline_with_reliability(reliability).score(input());
        let b = pipeline_with_reliability(reliability).score(input());

        prop_assert_eq!(a.signal, b.signal);
        prop_assert_eq!(a.rule_reliability, b.rule_reliability);
        prop_assert_eq!(a.content_modifier, b.content_modifier);
        prop_assert_eq!(a.evidence_score, b.evidence_score);
        prop_assert_eq!(a.evidence_weight, b.evidence_weight);
        prop_assert_eq!(a.model_weight, b.model_weight);
        prop_assert_eq!(a.raw_confidence, b.raw_confidence);
        prop_assert_eq!(a.floor_guard_triggered, b.floor_guard_triggered);
        prop_assert_eq!(a.final_confidence, b.final_confidence);
        prop_assert_eq!(a.meets_threshold, b.meets_threshold);
    }

    /// Repeating the identical score request against the *same* pipeline
    /// (exercising the moka cache hit path) must not change the result.
    #[test]
    fn repeated_scoring_on_one_pipeline_is_stable(
        signal in 0.0f64..1.0,
        evidence in prop::option::of(0.0f64..1.0),
        reliability in 0.0f64..1.0,
        category in category_strategy(),
    ) {
        let pipeline = pipeline_with_reliability(reliability);
        let input = || ScoreInput {
            rule_id: "proptest.rule",
            category: category.clone(),
            content_type: ContentType::General,
            signal,
            evidence_score: evidence,
            threshold_override: None,
        };

        let first = pipeline.score(input());
        let second = pipeline.score(input());
        prop_assert_eq!(first.final_confidence, second.final_confidence);
        prop_assert_eq!(first.meets_threshold, second.meets_threshold);
    }

    /// §8 property: the floor guard only ever raises confidence, and only
    /// when both evidence and reliability clear 0.85 (Open Question decision
    /// #3) — it never fires on reliability or evidence alone.
    #[test]
    fn floor_guard_never_triggers_on_a_single_strong_input(
        signal in 0.0f64..1.0,
        strong_evidence in 0.85f64..1.0,
        weak_reliability in 0.0f64..0.85,
    ) {
        let pipeline = pipeline_with_reliability(weak_reliability);
        let score = pipeline.score(ScoreInput {
            rule_id: "proptest.rule",
            category: RuleCategory::Grammar,
            content_type: ContentType::General,
            signal,
            evidence_score: Some(strong_evidence),
            threshold_override: None,
        });
        prop_assert!(!score.floor_guard_triggered);
    }
}
