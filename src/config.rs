// Client configuration.
// Layers defaults, an optional TOML file, and environment variables.

use std::fmt;
use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root; the organization endpoint is `{api_base}/orgs/{org}`.
    pub api_base: String,
    pub token: Option<String>,
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            user_agent: "orgscope".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration, falling back to defaults on parse errors.
    ///
    /// Later sources win: defaults, then `file` if it exists, then
    /// `ORGSCOPE_*` variables, then `GITHUB_TOKEN`.
    pub fn load(file: Option<&Path>) -> Self {
        match Self::figment(file).extract() {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "config parse error, using defaults");
                Self::default()
            }
        }
    }

    fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(path) = file.filter(|path| path.exists()) {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("ORGSCOPE_")).merge(
            Env::raw()
                .only(&["GITHUB_TOKEN"])
                .map(|_| "token".into()),
        )
    }

    /// Organization endpoint for `org`.
    pub fn org_url(&self, org: &str) -> String {
        format!("{}/orgs/{}", self.api_base.trim_end_matches('/'), org)
    }
}
