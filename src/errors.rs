/// Error types for the calculator.
/// Pricing inputs are validated up front, so a bad parameter surfaces here
/// instead of as a NaN in the output.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("unsupported option kind: {0}")]
    UnsupportedOptionKind(String),

    #[error("quote source error: {0}")]
    QuoteSource(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Parse(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
