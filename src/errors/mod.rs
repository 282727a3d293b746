use thiserror::Error;

/// Why an outbound request did not produce a usable response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(String),
}

#[derive(Error, Debug)]
pub enum CounterError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Link errors
    #[error("Malformed URL, expected scheme://host: {0}")]
    MalformedUrl(String),

    #[error("Not a recognized link: {0}")]
    NoMatchingSource(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // Network errors
    #[error("Fetch failed for {url}: {reason}")]
    FetchFailed { url: String, reason: FetchFailure },

    // Parsing errors
    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(Box<CounterError>),

    // Bot API errors from the telegram library
    #[error("Telegram error: {0}")]
    Telegram(String),
}

impl CounterError {
    /// The innermost error, skipping stage context
    pub fn root(&self) -> &CounterError {
        match self {
            CounterError::Retrieval(inner) => inner.root(),
            other => other,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self.root(),
            CounterError::FetchFailed {
                reason: FetchFailure::Timeout,
                ..
            }
        )
    }
}

impl From<telegram::TelegramError> for CounterError {
    fn from(err: telegram::TelegramError) -> Self {
        CounterError::Telegram(err.to_string())
    }
}

impl From<serde_json::Error> for CounterError {
    fn from(err: serde_json::Error) -> Self {
        CounterError::DecodeFailed(err.to_string())
    }
}

pub type CounterResult<T> = Result<T, CounterError>;
