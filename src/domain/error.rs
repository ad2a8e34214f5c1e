//! Domain error types.
//!
//! All computation errors surface immediately to the caller; retries belong
//! to whatever produced the price data, never to the analytics core.

use chrono::{DateTime, Utc};

/// Top-level error type for pondera.
#[derive(Debug, thiserror::Error)]
pub enum PonderaError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no price data for {asset}")]
    NoData { asset: String },

    #[error("series misaligned: {reason}")]
    Alignment { reason: String },

    #[error("all weights collapsed to zero at {timestamp}")]
    DegenerateWeights { timestamp: DateTime<Utc> },

    #[error("division by zero computing {metric}")]
    DivisionByZero { metric: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PonderaError> for std::process::ExitCode {
    fn from(err: &PonderaError) -> Self {
        let code: u8 = match err {
            PonderaError::Io(_) => 1,
            PonderaError::ConfigParse { .. }
            | PonderaError::ConfigMissing { .. }
            | PonderaError::ConfigInvalid { .. } => 2,
            PonderaError::Data { .. } | PonderaError::NoData { .. } => 3,
            PonderaError::Alignment { .. } => 4,
            PonderaError::DegenerateWeights { .. } | PonderaError::DivisionByZero { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
