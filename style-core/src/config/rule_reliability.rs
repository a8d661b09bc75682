//! `rule_reliability.yaml`: per-rule-id reliability coefficients consumed by
//! the confidence pipeline (§4.3 step 2). Not named as a file in spec.md, but
//! the pipeline's "looked up by rule id" language implies a config-backed
//! table rather than a value baked into each rule; modeled the same way as
//! the other three core configs (§4.8 pattern, generalized).

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::model::analysis::RuleReliability;
use crate::FxHashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, transparent)]
pub struct RuleReliabilityConfig(pub FxHashMap<String, f64>);

impl RuleReliabilityConfig {
    pub fn to_model(&self) -> RuleReliability {
        RuleReliability(self.0.clone())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (rule_id, value) in &self.0 {
            if !(0.0..=1.0).contains(value) {
                return Err(ConfigError::OutOfRange {
                    key: format!("rule_reliability.{rule_id}"),
                    message: format!("must be within [0.0, 1.0], got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rule_defaults_to_half() {
        let cfg = RuleReliabilityConfig::default();
        assert_eq!(cfg.to_model().lookup("grammar.unknown"), 0.5);
    }
}
