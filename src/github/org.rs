// Organization client.
// Resolves an organization's metadata and repository listing, memoizing each step.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, FetchError, Result};
use crate::memo::MemoCache;

use super::fetch::FetchJson;
use super::types::{OrgRecord, RepoRecord};

const ORG_KEY: &str = "org";
const REPOS_URL_KEY: &str = "public_repos_url";
const REPOS_PAYLOAD_KEY: &str = "repos_payload";

/// Client for a single GitHub organization.
///
/// Each lookup in the chain org -> repos_url -> repository list is fetched
/// at most once per client; later calls are served from the instance's
/// own cache. Create a new client to observe fresh data.
pub struct OrgClient<F> {
    org_name: String,
    org_url: String,
    fetcher: F,
    cache: MemoCache,
}

impl<F: FetchJson> OrgClient<F> {
    /// Create a client for `org_name` against the public GitHub API.
    pub fn new(org_name: impl Into<String>, fetcher: F) -> Self {
        Self::from_config(&ClientConfig::default(), org_name, fetcher)
    }

    /// Create a client using the API root from `config`.
    pub fn from_config(config: &ClientConfig, org_name: impl Into<String>, fetcher: F) -> Self {
        let org_name = org_name.into();
        Self {
            org_url: config.org_url(&org_name),
            org_name,
            fetcher,
            cache: MemoCache::new(),
        }
    }

    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    /// Organization endpoint this client reads from.
    pub fn org_url(&self) -> &str {
        &self.org_url
    }

    /// Organization metadata.
    pub async fn org(&self) -> Result<Arc<OrgRecord>> {
        self.cache
            .get_or_try_init(ORG_KEY, || self.fetch(&self.org_url))
            .await
    }

    /// URL of the organization's repository listing, taken from [`Self::org`].
    pub async fn public_repos_url(&self) -> Result<String> {
        let url = self
            .cache
            .get_or_try_init(REPOS_URL_KEY, || async {
                let org = self.org().await?;
                Ok(org.repos_url()?.to_string())
            })
            .await?;
        Ok(url.to_string())
    }

    /// Raw repository listing, in the order the API returned it.
    pub async fn repos_payload(&self) -> Result<Arc<Vec<RepoRecord>>> {
        self.cache
            .get_or_try_init(REPOS_PAYLOAD_KEY, || async {
                let url = self.public_repos_url().await?;
                self.fetch(&url).await
            })
            .await
    }

    /// Names of the organization's repositories in listing order.
    ///
    /// With `license`, only repositories whose `license.key` equals it are
    /// kept; repositories without a license never match.
    pub async fn public_repos(&self, license: Option<&str>) -> Result<Vec<String>> {
        let repos = self.repos_payload().await?;

        repos
            .iter()
            .filter(|repo| license.is_none_or(|key| repo.has_license(key)))
            .map(|repo| repo.name().map(str::to_string))
            .collect()
    }

    /// Fetch `url` and decode the body; any failure is reported against `url`.
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body: Value = self
            .fetcher
            .fetch_json(url)
            .await
            .map_err(|e| Error::fetch(url, e))?;

        serde_json::from_value(body).map_err(|e| Error::fetch(url, FetchError::Json(e)))
    }
}

/// Whether `repo` declares the license `license_key`.
pub fn has_license(repo: &RepoRecord, license_key: &str) -> bool {
    repo.has_license(license_key)
}
