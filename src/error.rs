// Error types for orgscope.
// Separates lookup failures raised by the client from transport failures raised by the fetcher.

use thiserror::Error;

/// Failure raised by a `FetchJson` collaborator.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum Error {
    /// A nested lookup step failed; carries the offending key only.
    #[error("Key not found: {0:?}")]
    KeyNotFound(String),

    #[error("Invalid path: a lookup path needs at least one key")]
    InvalidPath,

    #[error("Missing field in payload: {0:?}")]
    MissingField(String),

    #[error("Fetch failed for {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Cached value {0:?} was requested with a different type")]
    CacheType(&'static str),
}

impl Error {
    pub(crate) fn fetch(url: impl Into<String>, source: impl Into<FetchError>) -> Self {
        Error::FetchFailed {
            url: url.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
