use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised while talking to the data provider or converting its
/// payloads into typed market data.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure before a response arrived.
    #[error("request to provider failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The provider did not answer within the configured timeout.
    #[error("request to provider timed out")]
    Timeout,

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// The provider payload did not match the expected shape.
    #[error("malformed provider payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A bar failed the price/volume sanity checks. `index` is the bar's
    /// position in the provider payload.
    #[error("invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    /// The provider returned no usable `results` for the symbol.
    #[error("no candle data returned for {symbol}")]
    NoData { symbol: String },

    /// A caller-supplied parameter was rejected before any request was made.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An environment variable required by the client is not set.
    #[error("missing environment variable: {0}")]
    MissingEnvVar(String),
}

impl Error {
    /// Whether the caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout | Error::Request(_) => true,
            Error::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Error::Decode(_)
            | Error::InvalidBar { .. }
            | Error::NoData { .. }
            | Error::InvalidParameter(_)
            | Error::MissingEnvVar(_) => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if let Some(status) = err.status() {
            Error::Status {
                status,
                message: err.to_string(),
            }
        } else {
            Error::Request(err)
        }
    }
}

/// Errors raised by indicator calculators for unusable parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("invalid period {0}: must be at least 1")]
    InvalidPeriod(usize),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
