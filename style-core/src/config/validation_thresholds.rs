//! `validation_thresholds.yaml` (§4.8): the universal threshold plus the
//! performance knobs referenced throughout §4 and §5.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSettings {
    pub confidence_cache_size: usize,
    pub config_cache_ttl_secs: u64,
    pub rule_soft_budget_ms: u64,
    pub max_errors_per_rule_per_block: usize,
    pub block_soft_timeout_secs: u64,
    pub station_timeout_secs: u64,
    pub job_timeout_secs: u64,
    pub feedback_api_deadline_secs: u64,
    pub session_queue_capacity: usize,
    pub max_stations: usize,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            confidence_cache_size: 1000,
            config_cache_ttl_secs: 300,
            rule_soft_budget_ms: 250,
            max_errors_per_rule_per_block: 500,
            block_soft_timeout_secs: 10,
            station_timeout_secs: 30,
            job_timeout_secs: 120,
            feedback_api_deadline_secs: 5,
            session_queue_capacity: 256,
            max_stations: 8,
        }
    }
}

/// Typed form of `validation_thresholds.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationThresholdsConfig {
    /// The universal threshold (§4.3 step 9): final confidence below this is
    /// filtered from user-visible results but retained in diagnostics.
    pub universal_threshold: f64,
    pub performance: PerformanceSettings,
}

impl Default for ValidationThresholdsConfig {
    fn default() -> Self {
        Self {
            universal_threshold: 0.35,
            performance: PerformanceSettings::default(),
        }
    }
}

impl ValidationThresholdsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.universal_threshold) {
            return Err(ConfigError::OutOfRange {
                key: "universal_threshold".to_string(),
                message: format!(
                    "must be within (0.0, 1.0), got {}",
                    self.universal_threshold
                ),
            });
        }
        if self.performance.max_stations == 0 {
            return Err(ConfigError::OutOfRange {
                key: "performance.max_stations".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_is_point_three_five() {
        let cfg = ValidationThresholdsConfig::default();
        assert_eq!(cfg.universal_threshold, 0.35);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_threshold_of_one() {
        let cfg = ValidationThresholdsConfig {
            universal_threshold: 1.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
