//! HTTP client resolving bearer tokens to GitHub accounts.
//!
//! Wraps `GET /user` with timeouts, redirect limits, and error
//! categorization. The token is forwarded exactly as received and never
//! logged.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};

use crate::error::{GithubError, Result};

/// GitHub REST API version header sent with every request.
const API_VERSION: &str = "2022-11-28";

/// Media type GitHub expects REST callers to accept.
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Longest response body excerpt preserved in error values.
const MAX_ERROR_BODY: usize = 1024;

/// Configuration for the identity client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the GitHub API.
    pub api_base: String,
    /// Default timeout for HTTP requests.
    pub timeout: Duration,
    /// User agent (product identifier) presented to the API.
    pub user_agent: String,
    /// Maximum number of redirects to follow.
    pub max_redirects: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            timeout: Duration::from_secs(10),
            user_agent: format!("MSDevPlatform/{}", env!("CARGO_PKG_VERSION")),
            max_redirects: 3,
        }
    }
}

/// Account resolved from a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubUser {
    /// Account login, interpolated into the reply greeting.
    pub login: String,
    /// Numeric account id.
    pub id: u64,
}

/// Capability of resolving a bearer token to the caller's account.
///
/// The webhook handler depends on this trait rather than on the concrete
/// client, so tests can substitute a canned identity without network I/O.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the account behind `token`.
    ///
    /// The token is presented unmodified as a bearer credential. Callers
    /// treat [`GithubError::is_auth_failure`] results as the caller's
    /// authentication failure and everything else as an upstream fault.
    async fn current_user(&self, token: &str) -> Result<GithubUser>;
}

/// HTTP client for the GitHub REST API.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl GithubClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `GithubError::Configuration` if the HTTP client cannot be
    /// built with the provided settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects as usize))
            .build()
            .map_err(|e| GithubError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Creates a client with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ClientConfig::default())
    }
}

#[async_trait]
impl IdentityProvider for GithubClient {
    async fn current_user(&self, token: &str) -> Result<GithubUser> {
        let url = format!("{}/user", self.config.api_base.trim_end_matches('/'));
        let span = info_span!("resolve_identity", url = %url);

        async move {
            tracing::debug!("Resolving caller identity");

            let response = match self
                .client
                .get(&url)
                .bearer_auth(token)
                .header("Accept", GITHUB_MEDIA_TYPE)
                .header("X-GitHub-Api-Version", API_VERSION)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!("Identity request failed: {}", e);

                    if e.is_timeout() {
                        return Err(GithubError::timeout(self.config.timeout.as_secs()));
                    }
                    if e.is_connect() {
                        return Err(GithubError::network(format!("connection failed: {e}")));
                    }
                    return Err(GithubError::network(e.to_string()));
                },
            };

            let status = response.status();
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                tracing::warn!(status = status.as_u16(), "Identity provider rejected token");
                return Err(GithubError::unauthorized(status.as_u16()));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), "Unexpected identity provider response");
                return Err(GithubError::unexpected_status(status.as_u16(), truncate_body(&body)));
            }

            let user: GithubUser =
                response.json().await.map_err(|e| GithubError::decode(e.to_string()))?;

            tracing::debug!(login = %user.login, "Caller identity resolved");
            Ok(user)
        }
        .instrument(span)
        .await
    }
}

/// Clamps a response body excerpt for error values.
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }

    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &body[..end])
}

#[cfg(test)]
mod tests {
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> GithubClient {
        GithubClient::new(ClientConfig {
            api_base: server.uri(),
            timeout: Duration::from_secs(1),
            user_agent: "test-agent/1.0".to_string(),
            max_redirects: 3,
        })
        .expect("client builds")
    }

    #[tokio::test]
    async fn resolves_account_from_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/user"))
            .and(matchers::header("Authorization", "Bearer gho_test_token"))
            .and(matchers::header("Accept", GITHUB_MEDIA_TYPE))
            .and(matchers::header("X-GitHub-Api-Version", API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "alice",
                "id": 12345,
                "node_id": "MDQ6VXNlcjE=",
                "type": "User",
                "site_admin": false,
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let user = client.current_user("gho_test_token").await.expect("identity resolves");

        assert_eq!(user.login, "alice");
        assert_eq!(user.id, 12345);
    }

    #[tokio::test]
    async fn presents_configured_user_agent() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/user"))
            .and(matchers::header("User-Agent", "test-agent/1.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"login": "bob", "id": 2})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.current_user("token").await.is_ok());
    }

    #[tokio::test]
    async fn rejected_token_maps_to_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Bad credentials",
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.current_user("bad-token").await.expect_err("token rejected");

        assert!(error.is_auth_failure());
        assert!(matches!(error, GithubError::Unauthorized { status_code: 401 }));
    }

    #[tokio::test]
    async fn forbidden_also_maps_to_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/user"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.current_user("token").await.expect_err("token rejected");

        assert!(error.is_auth_failure());
    }

    #[tokio::test]
    async fn server_error_maps_to_unexpected_status() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/user"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.current_user("token").await.expect_err("upstream failure");

        assert!(!error.is_auth_failure());
        assert!(
            matches!(error, GithubError::UnexpectedStatus { status_code: 500, ref body } if body == "boom")
        );
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_decode_error() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.current_user("token").await.expect_err("undecodable body");

        assert!(matches!(error, GithubError::Decode { .. }));
    }

    #[tokio::test]
    async fn slow_provider_maps_to_timeout() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/user"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"login": "slow", "id": 3}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let error = client.current_user("token").await.expect_err("request times out");

        assert!(matches!(error, GithubError::Timeout { timeout_seconds: 1 }));
    }

    #[test]
    fn error_bodies_are_truncated() {
        let long_body = "x".repeat(MAX_ERROR_BODY * 2);
        let truncated = truncate_body(&long_body);

        assert!(truncated.ends_with("... (truncated)"));
        assert!(truncated.len() < long_body.len());
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn default_config_targets_public_api() {
        let config = ClientConfig::default();

        assert_eq!(config.api_base, "https://api.github.com");
        assert!(config.user_agent.starts_with("MSDevPlatform/"));
    }
}
