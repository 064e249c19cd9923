// JSON fetch collaborator.
// The only I/O boundary the organization client depends on.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::error::FetchError;

/// Performs an HTTP GET on an absolute URL and returns the parsed JSON body.
///
/// Transport failures, error statuses and non-JSON bodies are all reported
/// as [`FetchError`]. Implementations must not retry on the caller's behalf.
pub trait FetchJson: Send + Sync {
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<Value, FetchError>> + Send;
}

impl<T: FetchJson> FetchJson for Arc<T> {
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<Value, FetchError>> + Send {
        (**self).fetch_json(url)
    }
}

impl<T: FetchJson> FetchJson for &T {
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<Value, FetchError>> + Send {
        (**self).fetch_json(url)
    }
}
