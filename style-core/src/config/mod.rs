pub mod confidence_weights;
pub mod content_modifiers;
pub mod error;
pub mod linguistic_anchors;
pub mod loader;
pub mod rule_reliability;
pub mod validation_thresholds;

pub use confidence_weights::{
    AdjustmentFactors, CalculationSettings, CombinationMethod, ConfidenceWeightsConfig,
    FallbackWeights, WeightBucket,
};
pub use content_modifiers::ContentModifiersConfig;
pub use error::ConfigError;
pub use linguistic_anchors::{AnchorGroup, LinguisticAnchorsConfig};
pub use loader::{ConfigLoader, RuntimeConfig};
pub use rule_reliability::RuleReliabilityConfig;
pub use validation_thresholds::{PerformanceSettings, ValidationThresholdsConfig};
