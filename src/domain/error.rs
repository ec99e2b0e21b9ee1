//! Domain error types.

/// Top-level error type for quantsim.
#[derive(Debug, thiserror::Error)]
pub enum QuantsimError {
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("market data not found for ticker: {ticker}")]
    TickerNotFound { ticker: String },

    #[error("unknown strategy type: {name}")]
    UnknownStrategy { name: String },

    #[error("decimal overflow while {operation}")]
    Overflow { operation: String },

    #[error("invalid price series for {ticker}: {reason}")]
    InvalidSeries { ticker: String, reason: String },

    #[error("data load error: {reason}")]
    DataLoad { reason: String },

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
    Io(#[from] std::io::Error),
}

impl QuantsimError {
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        QuantsimError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn overflow(operation: impl Into<String>) -> Self {
        QuantsimError::Overflow {
            operation: operation.into(),
        }
    }
}

impl From<&QuantsimError> for std::process::ExitCode {
    fn from(err: &QuantsimError) -> Self {
        let code: u8 = match err {
            QuantsimError::Io(_) => 1,
            QuantsimError::ConfigParse { .. }
            | QuantsimError::ConfigMissing { .. }
            | QuantsimError::ConfigInvalid { .. } => 2,
            QuantsimError::DataLoad { .. }
            | QuantsimError::InvalidSeries { .. }
            | QuantsimError::Overflow { .. } => 3,
            QuantsimError::InvalidParameter { .. } | QuantsimError::UnknownStrategy { .. } => 4,
            QuantsimError::TickerNotFound { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
