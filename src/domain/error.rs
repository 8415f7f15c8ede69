//! Domain error types.

use crate::domain::allocation::AllocationError;
use crate::domain::universe::UniverseError;

/// Top-level error type for momentum.
#[derive(Debug, thiserror::Error)]
pub enum MomentumError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("failed to fetch {symbol}: {reason}")]
    Fetch { symbol: String, reason: String },

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

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("no price data: {reason}")]
    NoData { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MomentumError {
    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&MomentumError> for std::process::ExitCode {
    fn from(err: &MomentumError) -> Self {
        let code: u8 = match err {
            MomentumError::Io(_) => 1,
            MomentumError::ConfigParse { .. }
            | MomentumError::ConfigMissing { .. }
            | MomentumError::ConfigInvalid { .. } => 2,
            MomentumError::DataSource { .. } | MomentumError::Fetch { .. } => 3,
            MomentumError::Universe(_) | MomentumError::Allocation(_) => 4,
            MomentumError::NoData { .. } => 5,
            MomentumError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
