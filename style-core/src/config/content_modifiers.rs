//! `content_modifiers.yaml`: the (content_type, rule_category) → modifier
//! matrix consumed by the confidence pipeline (§4.3 step 4, §8 property 6).
//! Stored on disk as nested maps (content_type -> category -> modifier)
//! since a tuple key has no natural YAML mapping-key representation; the
//! loader flattens it into the model's `ContentTypeModifier` lookup table.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::model::analysis::ContentTypeModifier;
use crate::model::document::ContentType;
use crate::FxHashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, transparent)]
pub struct ContentModifiersConfig(pub FxHashMap<String, FxHashMap<String, f64>>);

impl ContentModifiersConfig {
    pub fn to_model(&self) -> ContentTypeModifier {
        let mut modifier = ContentTypeModifier::default();
        for (content_type_name, categories) in &self.0 {
            let Some(content_type) = ContentType::parse_str(content_type_name) else {
                continue;
            };
            for (category, value) in categories {
                modifier.set(content_type, category.clone(), *value);
            }
        }
        modifier
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (content_type_name, categories) in &self.0 {
            if ContentType::parse_str(content_type_name).is_none() {
                return Err(ConfigError::Validation {
                    section: "content_modifiers".to_string(),
                    message: format!("unknown content_type '{content_type_name}'"),
                });
            }
            for (category, value) in categories {
                if !(0.5..=1.5).contains(value) {
                    return Err(ConfigError::OutOfRange {
                        key: format!("content_modifiers.{content_type_name}.{category}"),
                        message: format!("must be within [0.5, 1.5], got {value}"),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_pair_defaults_to_one() {
        let cfg = ContentModifiersConfig::default();
        let model = cfg.to_model();
        assert_eq!(
            model.lookup(ContentType::Technical, &crate::model::error::RuleCategory::Grammar),
            1.0
        );
    }
}
