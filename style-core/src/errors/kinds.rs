//! The seven error kinds from the error-handling design (§7), modeled as
//! variants of one top-level enum so every crate can convert its local error
//! type into something the session fabric and HTTP adapter can render
//! uniformly.

use super::error_code::{self, ErrorCode};
use crate::config::ConfigError;

/// Top-level error crossing a component boundary.
///
/// Crate-local errors (`ParserError`, `RuleError`, `RewriteError`,
/// `FeedbackError`, `StorageError` in `style-analysis`/`style-storage`)
/// convert into this via `#[from]` at the point where a result is handed to
/// a consumer in another crate. Most failures are recovered locally (§7
/// propagation policy) and never reach this type at all.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Malformed input from a client. Not logged at `warn`; surfaced as a
    /// 400-class response with `error_code()` as the machine-readable code.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Missing/invalid config file or schema. Fatal at startup; recoverable
    /// during hot-reload (previous good config retained).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The linguistic toolkit failed on a sentence; caught per-sentence.
    #[error("toolkit error: {message}")]
    Toolkit { message: String },

    /// A rule raised during `analyze`; caught per-(block, rule).
    #[error("rule '{rule_id}' failed: {message}")]
    Rule { rule_id: String, message: String },

    /// A rewrite station failed or the transform capability timed out.
    #[error("rewrite station '{station_id}' failed: {message}")]
    Rewrite { station_id: String, message: String },

    /// Feedback persistence is offline; ingestion returns 503 and the
    /// submission is not queued (§7, explicit: we lose it).
    #[error("storage unavailable: {message}")]
    StorageUnavailable { message: String },

    /// Out-of-memory, unrecoverable I/O. The process is expected to exit and
    /// be restarted by its supervisor.
    #[error("fatal error: {message}")]
    Fatal { message: String },
}

impl ErrorCode for EngineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => error_code::VALIDATION_ERROR,
            Self::Config(e) => e.error_code(),
            Self::Toolkit { .. } => error_code::TOOLKIT_ERROR,
            Self::Rule { .. } => error_code::RULE_ERROR,
            Self::Rewrite { .. } => error_code::REWRITE_ERROR,
            Self::StorageUnavailable { .. } => error_code::STORAGE_UNAVAILABLE,
            Self::Fatal { .. } => error_code::FATAL_ERROR,
        }
    }
}

impl EngineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn toolkit(message: impl Into<String>) -> Self {
        Self::Toolkit {
            message: message.into(),
        }
    }

    pub fn rule(rule_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rule {
            rule_id: rule_id.into(),
            message: message.into(),
        }
    }

    pub fn rewrite(station_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Rewrite {
            station_id: station_id.into(),
            message: message.into(),
        }
    }

    pub fn storage_unavailable(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }
}
