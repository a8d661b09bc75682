//! Stable identifier newtypes shared across crates.
//!
//! Mirrors the teacher's `types::identifiers` pattern (`ClassId`, `FileId`, ...):
//! thin `String`/hash wrappers with `Display`, used as map keys and in
//! JSON-serialized payloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content-addressed document id: lowercase hex of an xxh3-128 hash over the
/// document's bytes. Two documents with byte-identical content share an id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn from_content(bytes: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(bytes);
        Self(format!("{hash:032x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Block id, stable within one analysis run. Not stable across re-parses of
/// edited text — blocks are recomputed from scratch per analysis (§3).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(document_id: &DocumentId, sequence: usize) -> Self {
        Self(format!("{document_id}-b{sequence}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-scoped session id (§3 Session). Created on connect or auto-registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Feedback id: lowercase 12-hex-char prefix of SHA-256 over
/// `(session_id | violation_id | timestamp)` (§4.7). Computed in
/// `style-analysis::feedback`; this newtype only carries the rendered value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedbackId(String);

impl FeedbackId {
    pub fn from_hex(hex: String) -> Self {
        debug_assert_eq!(hex.len(), 12, "feedback id must be a 12-hex-char prefix");
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable rule identifier, e.g. `references.product_names.first_mention`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuleId(String);

impl RuleId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
