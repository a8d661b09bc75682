//! `linguistic_anchors.yaml` (§4.8): named pattern groups that boost or
//! penalize confidence within a context window, combined with diminishing
//! returns (§9 Design Notes).

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorGroup {
    /// Positive = boost, negative = penalty.
    pub magnitude: f64,
    /// Number of tokens either side of a match considered part of the anchor.
    pub context_window: usize,
}

impl Default for AnchorGroup {
    fn default() -> Self {
        Self {
            magnitude: 0.0,
            context_window: 3,
        }
    }
}

/// Typed form of `linguistic_anchors.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinguisticAnchorsConfig {
    pub groups: FxHashMap<String, AnchorGroup>,
    pub max_boost: f64,
    pub max_penalty: f64,
}

impl LinguisticAnchorsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_boost < 0.0 {
            return Err(ConfigError::OutOfRange {
                key: "max_boost".to_string(),
                message: "must be non-negative".to_string(),
            });
        }
        if self.max_penalty < 0.0 {
            return Err(ConfigError::OutOfRange {
                key: "max_penalty".to_string(),
                message: "must be non-negative".to_string(),
            });
        }
        Ok(())
    }

    pub fn effective_max_boost(&self) -> f64 {
        if self.max_boost > 0.0 {
            self.max_boost
        } else {
            0.30
        }
    }

    pub fn effective_max_penalty(&self) -> f64 {
        if self.max_penalty > 0.0 {
            self.max_penalty
        } else {
            0.35
        }
    }

    /// Combines the magnitudes of matched anchor groups with diminishing
    /// returns: sorted by magnitude descending, each subsequent contribution
    /// multiplied by 0.8 with a floor of 0.2, summed and capped at the
    /// configured max for its sign (§9).
    pub fn combine(&self, matched: &[f64]) -> f64 {
        let mut boosts: Vec<f64> = matched.iter().copied().filter(|m| *m > 0.0).collect();
        let mut penalties: Vec<f64> = matched
            .iter()
            .copied()
            .map(|m| -m)
            .filter(|m| *m > 0.0)
            .collect();
        boosts.sort_by(|a, b| b.partial_cmp(a).unwrap());
        penalties.sort_by(|a, b| b.partial_cmp(a).unwrap());

        let boost = diminishing_fold(&boosts).min(self.effective_max_boost());
        let penalty = diminishing_fold(&penalties).min(self.effective_max_penalty());
        boost - penalty
    }
}

fn diminishing_fold(sorted_desc: &[f64]) -> f64 {
    let mut total = 0.0;
    let mut factor = 1.0;
    for value in sorted_desc {
        total += value * factor;
        factor = (factor * 0.8).max(0.2);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diminishing_fold_applies_decay() {
        let sum = diminishing_fold(&[0.1, 0.1, 0.1]);
        assert!(sum < 0.3);
        assert!(sum > 0.1);
    }

    #[test]
    fn combine_caps_at_max_boost() {
        let cfg = LinguisticAnchorsConfig {
            max_boost: 0.3,
            ..Default::default()
        };
        let combined = cfg.combine(&[0.5, 0.5, 0.5]);
        assert!(combined <= 0.3);
    }
}
