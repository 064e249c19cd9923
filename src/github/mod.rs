// GitHub API module.
// Provides the JSON fetcher, payload types and the organization client.

pub mod client;
pub mod fetch;
pub mod org;
pub mod types;

pub use client::HttpFetcher;
pub use fetch::FetchJson;
pub use org::{OrgClient, has_license};
pub use types::*;
