//! Typed, cached, schema-validated config loading (§4.8, §10.3).
//!
//! Sources merge built-in defaults → YAML file on disk → environment
//! overrides, later layers winning. Each loaded value is cached behind a TTL
//! plus a content hash of the backing file; a changed file invalidates the
//! cache on next access even before the TTL expires. Mirrors the teacher's
//! `ScanConfig` `Option<T>` + `effective_*()` idiom, generalized into one
//! reusable cache for the three core config types.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use super::confidence_weights::ConfidenceWeightsConfig;
use super::content_modifiers::ContentModifiersConfig;
use super::error::ConfigError;
use super::linguistic_anchors::LinguisticAnchorsConfig;
use super::rule_reliability::RuleReliabilityConfig;
use super::validation_thresholds::ValidationThresholdsConfig;

const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct CachedEntry<T> {
    value: Arc<T>,
    content_hash: u64,
    loaded_at: Instant,
}

/// One TTL+hash-invalidated config slot, generic over the config type.
struct Cached<T> {
    file_name: &'static str,
    ttl: Duration,
    entry: RwLock<Option<CachedEntry<T>>>,
}

impl<T> Cached<T>
where
    T: Default + Clone + serde::de::DeserializeOwned,
{
    fn new(file_name: &'static str, ttl: Duration) -> Self {
        Self {
            file_name,
            ttl,
            entry: RwLock::new(None),
        }
    }

    fn get(
        &self,
        config_dir: &Path,
        validate: impl Fn(&T) -> Result<(), ConfigError>,
    ) -> Result<Arc<T>, ConfigError> {
        let path = config_dir.join(self.file_name);
        let (bytes, content_hash) = read_and_hash(&path)?;

        if let Some(cached) = self.entry.read().unwrap().as_ref() {
            if cached.content_hash == content_hash && cached.loaded_at.elapsed() < self.ttl {
                return Ok(Arc::clone(&cached.value));
            }
        }

        let value: T = match bytes {
            Some(bytes) => serde_yaml::from_slice(&bytes).map_err(|err| ConfigError::Parse {
                path: path.display().to_string(),
                message: err.to_string(),
            })?,
            None => T::default(),
        };
        validate(&value)?;

        let value = Arc::new(value);
        *self.entry.write().unwrap() = Some(CachedEntry {
            value: Arc::clone(&value),
            content_hash,
            loaded_at: Instant::now(),
        });
        Ok(value)
    }
}

fn read_and_hash(path: &Path) -> Result<(Option<Vec<u8>>, u64), ConfigError> {
    match fs::read(path) {
        Ok(bytes) => {
            let hash = xxhash_rust::xxh3::xxh3_64(&bytes);
            Ok((Some(bytes), hash))
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok((None, 0)),
        Err(err) => Err(ConfigError::Load {
            path: path.display().to_string(),
            message: err.to_string(),
        }),
    }
}

/// Worker-pool sizing, sourced from environment only (§5, §6 env vars).
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    pub max_analysis_workers: usize,
    pub max_rewrite_workers: usize,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            max_analysis_workers: env_usize("MAX_ANALYSIS_WORKERS").unwrap_or(cpu_count),
            max_rewrite_workers: env_usize("MAX_REWRITE_WORKERS").unwrap_or(4),
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_f64(key: &str) -> Option<f64> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Owns the three core config caches plus environment-derived runtime
/// settings, rooted at `CONFIG_DIR` (default `./config`).
pub struct ConfigLoader {
    config_dir: PathBuf,
    confidence_weights: Cached<ConfidenceWeightsConfig>,
    linguistic_anchors: Cached<LinguisticAnchorsConfig>,
    validation_thresholds: Cached<ValidationThresholdsConfig>,
    rule_reliability: Cached<RuleReliabilityConfig>,
    content_modifiers: Cached<ContentModifiersConfig>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        let config_dir = env::var("CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./config"));
        Self::with_config_dir(config_dir)
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            confidence_weights: Cached::new("confidence_weights.yaml", DEFAULT_TTL),
            linguistic_anchors: Cached::new("linguistic_anchors.yaml", DEFAULT_TTL),
            validation_thresholds: Cached::new("validation_thresholds.yaml", DEFAULT_TTL),
            rule_reliability: Cached::new("rule_reliability.yaml", DEFAULT_TTL),
            content_modifiers: Cached::new("content_modifiers.yaml", DEFAULT_TTL),
        }
    }

    pub fn confidence_weights(&self) -> Result<Arc<ConfidenceWeightsConfig>, ConfigError> {
        self.confidence_weights
            .get(&self.config_dir, ConfidenceWeightsConfig::validate)
    }

    pub fn linguistic_anchors(&self) -> Result<Arc<LinguisticAnchorsConfig>, ConfigError> {
        self.linguistic_anchors
            .get(&self.config_dir, LinguisticAnchorsConfig::validate)
    }

    /// Validation thresholds with the `CONFIDENCE_THRESHOLD` environment
    /// override applied last (§4.8, §6).
    pub fn validation_thresholds(&self) -> Result<Arc<ValidationThresholdsConfig>, ConfigError> {
        let loaded = self
            .validation_thresholds
            .get(&self.config_dir, ValidationThresholdsConfig::validate)?;
        match env_f64("CONFIDENCE_THRESHOLD") {
            Some(threshold) => {
                let mut overridden = (*loaded).clone();
                overridden.universal_threshold = threshold;
                overridden.validate()?;
                Ok(Arc::new(overridden))
            }
            None => Ok(loaded),
        }
    }

    pub fn rule_reliability(&self) -> Result<Arc<RuleReliabilityConfig>, ConfigError> {
        self.rule_reliability
            .get(&self.config_dir, RuleReliabilityConfig::validate)
    }

    pub fn content_modifiers(&self) -> Result<Arc<ContentModifiersConfig>, ConfigError> {
        self.content_modifiers
            .get(&self.config_dir, ContentModifiersConfig::validate)
    }

    pub fn runtime(&self) -> RuntimeConfig {
        RuntimeConfig::from_env()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ConfigLoader::with_config_dir(dir.path().to_path_buf());
        let cfg = loader.validation_thresholds().unwrap();
        assert_eq!(cfg.universal_threshold, 0.35);
    }

    #[test]
    fn reload_picks_up_file_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validation_thresholds.yaml");
        std::fs::write(&path, "universal_threshold: 0.5\n").unwrap();

        let loader = ConfigLoader::with_config_dir(dir.path().to_path_buf());
        assert_eq!(loader.validation_thresholds().unwrap().universal_threshold, 0.5);

        let mut file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.write_all(b"universal_threshold: 0.6\n").unwrap();
        drop(file);

        assert_eq!(loader.validation_thresholds().unwrap().universal_threshold, 0.6);
    }
}
