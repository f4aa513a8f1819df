use thiserror::Error;

/// Terminal failures of an analysis request.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("no market data available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("campaign data failed validation: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("bad timestamp on row {row}: {value}")]
    BadTimestamp { row: usize, value: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub fn data_unavailable(symbol: &str, reason: impl ToString) -> Self {
        AnalysisError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Failures talking to the text-generation provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InsightError {
    #[error("rate limited by provider")]
    RateLimited,

    #[error("request timed out")]
    Timeout,

    #[error("provider returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("gave up after {attempts} rate-limited attempts")]
    Exhausted { attempts: u32 },
}
