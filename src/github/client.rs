// GitHub API HTTP fetcher.
// Handles authentication headers, rate limit tracking, and status mapping.

use std::sync::{Mutex, PoisonError};

use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::FetchError;

use super::fetch::FetchJson;
use super::types::RateLimit;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// `FetchJson` implementation backed by `reqwest`.
pub struct HttpFetcher {
    client: Client,
    rate_limit: Mutex<RateLimit>,
}

impl HttpFetcher {
    /// Create a fetcher from configuration. A token, if present, is sent as a bearer token.
    pub fn new(config: &ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .default_headers(default_headers(config)?)
            .build()?;

        Ok(Self {
            client,
            rate_limit: Mutex::new(RateLimit::default()),
        })
    }

    /// Snapshot of the rate limit reported by the most recent response.
    pub fn rate_limit(&self) -> RateLimit {
        *self.rate_limit.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        debug!(url, "GET");
        let response = self.client.get(url).send().await?;

        let rate_limit = {
            let mut current = self.rate_limit.lock().unwrap_or_else(PoisonError::into_inner);
            update_rate_limit(&mut current, response.headers());
            *current
        };
        debug!(
            url,
            status = %response.status(),
            remaining = rate_limit.remaining,
            "response"
        );

        check_response(response, rate_limit).await
    }
}

impl FetchJson for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.get(url).await?;
        decode_json(response).await
    }
}

/// Parse the body as JSON; a body that is not JSON is a `FetchError::Json`.
async fn decode_json(response: Response) -> Result<Value, FetchError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn default_headers(config: &ClientConfig) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();

    if let Some(token) = &config.token {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| FetchError::Other(e.to_string()))?,
        );
    }
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_static(GITHUB_API_VERSION),
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent).map_err(|e| FetchError::Other(e.to_string()))?,
    );

    Ok(headers)
}

/// Update rate limit from response headers, keeping fields that are absent.
fn update_rate_limit(rate_limit: &mut RateLimit, headers: &HeaderMap) {
    let header = |name: &str| -> Option<u64> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    };

    if let Some(limit) = header("x-ratelimit-limit") {
        rate_limit.limit = limit;
    }
    if let Some(remaining) = header("x-ratelimit-remaining") {
        rate_limit.remaining = remaining;
    }
    if let Some(reset) = header("x-ratelimit-reset") {
        rate_limit.reset = reset;
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response, rate_limit: RateLimit) -> Result<Response, FetchError> {
    match response.status() {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => Ok(response),
        StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
        StatusCode::NOT_FOUND => Err(FetchError::NotFound(response.url().to_string())),
        // GitHub reports an exhausted quota as 403
        StatusCode::FORBIDDEN if rate_limit.remaining == 0 => Err(FetchError::RateLimited {
            reset_at: format_reset(rate_limit.reset),
        }),
        StatusCode::FORBIDDEN => Err(FetchError::Other(format!(
            "Forbidden: {}",
            response.text().await.unwrap_or_default()
        ))),
        status => Err(FetchError::Other(format!(
            "HTTP {}: {}",
            status,
            response.text().await.unwrap_or_default()
        ))),
    }
}

fn format_reset(reset: u64) -> String {
    chrono::DateTime::from_timestamp(reset as i64, 0)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let config = ClientConfig {
            token: Some("ghp_abc".to_string()),
            ..ClientConfig::default()
        };
        let headers = default_headers(&config).unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer ghp_abc");
        assert_eq!(headers[ACCEPT], "application/vnd.github+json");
        assert_eq!(headers["X-GitHub-Api-Version"], GITHUB_API_VERSION);
        assert_eq!(headers[USER_AGENT], "orgscope");
    }

    #[test]
    fn test_anonymous_headers() {
        let headers = default_headers(&ClientConfig::default()).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_invalid_token_rejected() {
        let config = ClientConfig {
            token: Some("bad\ntoken".to_string()),
            ..ClientConfig::default()
        };
        assert!(matches!(
            HttpFetcher::new(&config),
            Err(FetchError::Other(_))
        ));
    }

    #[test]
    fn test_update_rate_limit() {
        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-limit", HeaderValue::from_static("60"));
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("x-ratelimit-reset", HeaderValue::from_static("1700000000"));

        let mut rate_limit = RateLimit::default();
        update_rate_limit(&mut rate_limit, &headers);
        assert_eq!(
            rate_limit,
            RateLimit {
                limit: 60,
                remaining: 0,
                reset: 1_700_000_000,
            }
        );

        // Missing or malformed headers leave previous values in place
        let mut partial = HeaderMap::new();
        partial.insert("x-ratelimit-remaining", HeaderValue::from_static("oops"));
        update_rate_limit(&mut rate_limit, &partial);
        assert_eq!(rate_limit.limit, 60);
        assert_eq!(rate_limit.remaining, 0);
    }

    #[test]
    fn test_format_reset() {
        assert_eq!(format_reset(0), "00:00:00");
        assert_eq!(format_reset(3_661), "01:01:01");
    }

    fn response(status: u16, body: &'static str) -> Response {
        Response::from(
            http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    fn limited(remaining: u64) -> RateLimit {
        RateLimit {
            limit: 60,
            remaining,
            reset: 0,
        }
    }

    #[tokio::test]
    async fn test_success_statuses_pass_through() {
        for status in [200, 201, 202] {
            let checked = check_response(response(status, "{}"), limited(10)).await;
            assert_eq!(checked.unwrap().status().as_u16(), status);
        }
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let err = check_response(response(401, ""), limited(10)).await.unwrap_err();
        assert!(matches!(err, FetchError::Unauthorized));
    }

    #[tokio::test]
    async fn test_not_found() {
        let err = check_response(response(404, ""), limited(10)).await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_forbidden_with_exhausted_quota_is_rate_limited() {
        let err = check_response(response(403, ""), limited(0)).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::RateLimited { ref reset_at } if reset_at == "00:00:00"
        ));
    }

    #[tokio::test]
    async fn test_forbidden_with_quota_left() {
        let err = check_response(response(403, "no access"), limited(5))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Other(ref msg) if msg == "Forbidden: no access"));
    }

    #[tokio::test]
    async fn test_other_status() {
        let err = check_response(response(500, "boom"), limited(10))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Other(ref msg) if msg == "HTTP 500 Internal Server Error: boom"
        ));
    }

    #[tokio::test]
    async fn test_decode_json() {
        let body = decode_json(response(200, r#"{"repos_url": "x"}"#)).await.unwrap();
        assert_eq!(body, serde_json::json!({"repos_url": "x"}));
    }

    #[tokio::test]
    async fn test_non_json_body_is_json_error() {
        let err = decode_json(response(200, "<html>oops</html>")).await.unwrap_err();
        assert!(matches!(err, FetchError::Json(_)));
    }

    #[test]
    fn test_new_fetcher_starts_without_rate_limit() {
        let fetcher = HttpFetcher::new(&ClientConfig::default()).unwrap();
        assert_eq!(fetcher.rate_limit(), RateLimit::default());
    }
}
