//! Bounded LRU for confidence scores (§4.3 "Caching"), keyed on the tuple
//! named in spec: "(text, position, rule_id, content_type, threshold,
//! evidence)". `signal` is a pure function of (text, position, rule_id) by
//! the time it reaches the pipeline, so it stands in for the (text,
//! position) pair in the cache key without the pipeline needing to retain
//! either.

use moka::sync::Cache;
use style_core::model::document::ContentType;
use style_core::model::error::ConfidenceBreakdown;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    rule_id: String,
    content_type: ContentType,
    threshold_bits: u64,
    signal_bits: u64,
    evidence_bits: Option<u64>,
}

pub struct ConfidenceCache {
    inner: Cache<CacheKey, ConfidenceBreakdown>,
}

impl ConfidenceCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get_or_insert_with(
        &self,
        rule_id: &str,
        content_type: ContentType,
        threshold: f64,
        signal: f64,
        evidence: Option<f64>,
        compute: impl FnOnce() -> ConfidenceBreakdown,
    ) -> ConfidenceBreakdown {
        let key = CacheKey {
            rule_id: rule_id.to_string(),
            content_type,
            threshold_bits: threshold.to_bits(),
            signal_bits: signal.to_bits(),
            evidence_bits: evidence.map(f64::to_bits),
        };
        self.inner.get_with(key, compute)
    }

    /// Invalidated wholesale on config reload (§4.3 "TTL-based invalidation
    /// when any config layer reloads").
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}
