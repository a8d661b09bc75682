//! Base helpers available to every rule (§4.2): sentence-structure
//! memoization and morphological utilities over `Token`.

use std::cell::RefCell;
use std::sync::Arc;

use style_core::config::{CombinationMethod, ConfidenceWeightsConfig, LinguisticAnchorsConfig};
use style_core::model::document::ContentType;
use style_core::FxHashMap;

use crate::toolkit::{LinguisticToolkit, Token};

/// One sentence's toolkit output, cheap to share across rules within the
/// same block (§4.2: "memoized per sentence per analysis").
#[derive(Debug, Default, Clone)]
pub struct ParsedSentence {
    pub tokens: Vec<Token>,
}

/// Per-analysis memo keyed by sentence index. Not `Sync`; one instance lives
/// on the thread analyzing a given block (blocks may run on separate worker
/// threads, §4.4).
#[derive(Default)]
pub struct SentenceMemo {
    cache: RefCell<FxHashMap<usize, Arc<ParsedSentence>>>,
}

impl SentenceMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// `analyze_sentence_structure(sentence, toolkit)` (§4.2). Subsequent
    /// calls for the same `index` return the cached value without
    /// re-invoking the toolkit.
    pub fn get_or_parse(
        &self,
        index: usize,
        sentence_text: &str,
        toolkit: &dyn LinguisticToolkit,
    ) -> Arc<ParsedSentence> {
        if let Some(parsed) = self.cache.borrow().get(&index) {
            return Arc::clone(parsed);
        }
        let tokens = toolkit
            .analyze(sentence_text)
            .map(|output| output.tokens)
            .unwrap_or_default();
        let parsed = Arc::new(ParsedSentence { tokens });
        self.cache.borrow_mut().insert(index, Arc::clone(&parsed));
        parsed
    }
}

/// Tokens whose `pos` field equals `pos`, in order.
pub fn tokens_with_pos<'a>(tokens: &'a [Token], pos: &str) -> impl Iterator<Item = &'a Token> {
    tokens.iter().filter(move |t| t.pos == pos)
}

/// Walks dependency arcs `(token, head)` for every non-root token.
pub fn dependency_arcs(tokens: &[Token]) -> impl Iterator<Item = (&Token, &Token)> {
    tokens
        .iter()
        .filter(move |t| t.head_index < tokens.len())
        .map(move |t| (t, &tokens[t.head_index]))
}

/// True if any token carries the named morphological feature, regardless of
/// its value (e.g. `has_morph_feature(tokens, "Voice")` for passive detection
/// once the real toolkit populates `morph`).
pub fn has_morph_feature(tokens: &[Token], feature: &str) -> bool {
    tokens.iter().any(|t| t.morph.iter().any(|(k, _)| k == feature))
}

/// Folds a rule's four component sub-signals (morphological, contextual,
/// domain, discourse) into the single raw `signal` the confidence pipeline's
/// §4.3 step 1 expects, per the weight bucket resolved for
/// `(rule_id, content_type)` and the configured `combination_method`
/// (§11 supplement — a rule with more than one distinct evidence source
/// combines them here before calling `RawMatch::new`; rules with only one
/// signal skip this and pass it straight through).
pub fn combine_component_signals(
    weights: &ConfidenceWeightsConfig,
    rule_id: &str,
    content_type: ContentType,
    components: [f64; 4],
) -> f64 {
    let bucket = weights.weights_for(rule_id, content_type.name());
    let mut factors = [bucket.morphological, bucket.contextual, bucket.domain, bucket.discourse];
    if weights.calculation_settings.normalize_weights {
        let sum: f64 = factors.iter().sum();
        if sum > 0.0 {
            for factor in &mut factors {
                *factor /= sum;
            }
        }
    }

    let combined = match weights.calculation_settings.combination_method {
        CombinationMethod::WeightedAverage => components
            .iter()
            .zip(factors.iter())
            .map(|(signal, weight)| signal * weight)
            .sum(),
        CombinationMethod::GeometricMean => components
            .iter()
            .zip(factors.iter())
            .map(|(signal, weight)| signal.max(1e-9).powf(*weight))
            .product(),
        CombinationMethod::HarmonicMean => {
            let denominator: f64 = components
                .iter()
                .zip(factors.iter())
                .map(|(signal, weight)| weight / signal.max(1e-9))
                .sum();
            if denominator > 0.0 {
                1.0 / denominator
            } else {
                0.0
            }
        }
    };
    combined.clamp(0.0, 1.0)
}

/// Looks up the named anchor groups and folds their matched magnitudes with
/// diminishing returns (§4.8, §9 "Diminishing-returns combination of
/// anchors"). Unknown group names contribute nothing rather than erroring —
/// anchors are an optional calibration layer, not a required one.
pub fn combine_anchor_adjustment(anchors: &LinguisticAnchorsConfig, matched_groups: &[&str]) -> f64 {
    let magnitudes: Vec<f64> = matched_groups
        .iter()
        .filter_map(|name| anchors.groups.get(*name))
        .map(|group| group.magnitude)
        .collect();
    anchors.combine(&magnitudes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolkit::DegradedToolkit;

    #[test]
    fn memoizes_per_sentence_index() {
        let memo = SentenceMemo::new();
        let a = memo.get_or_parse(0, "Hello there.", &DegradedToolkit);
        let b = memo.get_or_parse(0, "Hello there.", &DegradedToolkit);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn weighted_average_combination_matches_manual_sum() {
        let weights = ConfidenceWeightsConfig::default();
        let bucket = weights.default_weights;
        let combined = combine_component_signals(&weights, "unknown.rule", ContentType::General, [1.0, 0.0, 0.0, 0.0]);
        assert!((combined - bucket.morphological).abs() < 1e-9);
    }

    #[test]
    fn geometric_mean_combination_is_never_above_weighted_average() {
        let mut weights = ConfidenceWeightsConfig::default();
        weights.calculation_settings.combination_method = CombinationMethod::GeometricMean;
        let combined = combine_component_signals(&weights, "unknown.rule", ContentType::General, [0.9, 0.2, 0.6, 0.4]);
        assert!((0.0..=1.0).contains(&combined));
    }

    #[test]
    fn unknown_anchor_groups_contribute_nothing() {
        let anchors = LinguisticAnchorsConfig::default();
        let adjustment = combine_anchor_adjustment(&anchors, &["no_such_group"]);
        assert_eq!(adjustment, 0.0);
    }
}
