// GitHub API response types.
// Wraps organization and repository payloads and exposes the fields the client reads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::nested::{access_nested, lookup_nested};

/// Organization metadata.
///
/// Holds the whole JSON object as returned; fields are resolved on access
/// so that a payload lacking `repos_url` still parses and fails only when
/// the URL is asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct OrgRecord(Value);

impl OrgRecord {
    pub fn login(&self) -> Option<&str> {
        lookup_nested(&self.0, &["login"]).and_then(Value::as_str)
    }

    /// URL of the organization's repository listing.
    pub fn repos_url(&self) -> Result<&str> {
        required_str(&self.0, "repos_url")
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl TryFrom<Value> for OrgRecord {
    type Error = &'static str;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err("organization payload is not a JSON object")
        }
    }
}

impl From<OrgRecord> for Value {
    fn from(record: OrgRecord) -> Self {
        record.0
    }
}

/// One entry of a repository listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct RepoRecord(Value);

impl RepoRecord {
    pub fn name(&self) -> Result<&str> {
        required_str(&self.0, "name")
    }

    /// Declared license key, e.g. `"mit"`.
    ///
    /// `None` when the repository has no license object, the object is
    /// `null`, or it carries no string `key`.
    pub fn license_key(&self) -> Option<&str> {
        lookup_nested(&self.0, &["license", "key"]).and_then(Value::as_str)
    }

    pub fn has_license(&self, license_key: &str) -> bool {
        self.license_key() == Some(license_key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl TryFrom<Value> for RepoRecord {
    type Error = &'static str;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err("repository entry is not a JSON object")
        }
    }
}

impl From<RepoRecord> for Value {
    fn from(record: RepoRecord) -> Self {
        record.0
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

/// Top-level string field; absence or a non-string value is a missing field.
fn required_str<'a>(payload: &'a Value, field: &str) -> Result<&'a str> {
    access_nested(payload, &[field])
        .map_err(|e| match e {
            Error::KeyNotFound(key) => Error::MissingField(key),
            other => other,
        })?
        .as_str()
        .ok_or_else(|| Error::MissingField(field.to_string()))
}
