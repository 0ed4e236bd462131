//! Domain error types.

/// Top-level error type for stratlab.
#[derive(Debug, thiserror::Error)]
pub enum StratlabError {
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    #[error("unknown strategy kind: {kind}")]
    UnknownStrategy { kind: String },

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

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {context}: have {bars} bars, need {minimum}")]
    InsufficientData {
        context: String,
        bars: usize,
        minimum: usize,
    },

    #[error("price data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StratlabError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        StratlabError::Configuration {
            reason: reason.into(),
        }
    }

    pub fn data(reason: impl Into<String>) -> Self {
        StratlabError::Data {
            reason: reason.into(),
        }
    }

    /// True for every variant that means "the run was configured wrongly".
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StratlabError::Configuration { .. }
                | StratlabError::UnknownStrategy { .. }
                | StratlabError::ConfigParse { .. }
                | StratlabError::ConfigMissing { .. }
                | StratlabError::ConfigInvalid { .. }
        )
    }
}

impl From<&StratlabError> for std::process::ExitCode {
    fn from(err: &StratlabError) -> Self {
        let code: u8 = match err {
            StratlabError::Io(_) | StratlabError::Serialization(_) => 1,
            StratlabError::Configuration { .. }
            | StratlabError::UnknownStrategy { .. }
            | StratlabError::ConfigParse { .. }
            | StratlabError::ConfigMissing { .. }
            | StratlabError::ConfigInvalid { .. } => 2,
            StratlabError::Data { .. } => 3,
            StratlabError::NoData { .. } | StratlabError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
