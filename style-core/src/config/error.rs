use crate::errors::error_code::{self, ErrorCode};

/// Errors raised while loading or validating one of the three core configs
/// (§4.8). Mirrors `ContextError`'s shape: one enum, `#[error]` per variant.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Load { path: String, message: String },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid config at {section}: {message}")]
    Validation { section: String, message: String },

    #[error("missing required config key: {key}")]
    MissingKey { key: String },

    #[error("config value out of range at {key}: {message}")]
    OutOfRange { key: String, message: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } | Self::Parse { .. } => error_code::CONFIG_LOAD_ERROR,
            Self::Validation { .. } | Self::MissingKey { .. } | Self::OutOfRange { .. } => {
                error_code::CONFIG_VALIDATION_ERROR
            }
        }
    }
}
