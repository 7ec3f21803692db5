use thiserror::Error;

/// Why a single lookup failed.
///
/// The `Display` form is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Invalid city name")]
    InvalidInput,

    #[error("City '{0}' not found")]
    NotFound(String),

    #[error("Invalid API key")]
    Unauthorized,

    #[error("Too many requests. Please try again later")]
    RateLimited,

    #[error("API Error: {0}")]
    ApiError(u16),

    #[error("Request timed out. Check your internet connection")]
    Timeout,

    #[error("Connection error. Check your internet")]
    ConnectionFailed,

    #[error("Error: {0}")]
    Unknown(String),
}

impl LookupError {
    /// Map a non-200 HTTP status to its error kind.
    pub fn from_status(status: u16, city: &str) -> Self {
        match status {
            404 => LookupError::NotFound(city.to_string()),
            401 => LookupError::Unauthorized,
            429 => LookupError::RateLimited,
            other => LookupError::ApiError(other),
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LookupError::Timeout
        } else if err.is_connect() {
            LookupError::ConnectionFailed
        } else {
            LookupError::Unknown(err.to_string())
        }
    }
}
