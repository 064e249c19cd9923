// orgscope: GitHub organization client.
// Nested JSON access, per-instance memoization, and an organization repository reader.

pub mod config;
pub mod error;
pub mod github;
pub mod memo;
pub mod nested;

pub use config::ClientConfig;
pub use error::{Error, FetchError, Result};
pub use github::{FetchJson, HttpFetcher, OrgClient, OrgRecord, RateLimit, RepoRecord, has_license};
pub use memo::MemoCache;
pub use nested::{access_nested, lookup_nested};
