//! Test infrastructure and utilities for deterministic testing.
//!
//! Provides router construction with injected fakes, HTTP mocking for the
//! GitHub identity API, signature helpers, and deterministic time control.
//! Tests drive the real router and real wire formats; only the identity
//! provider and the clock are substituted.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use axum::Router;
use copilot_api::{create_router, AppState, WebhookConfig};
use copilot_core::TestClock;
use copilot_github::{ClientConfig, GithubClient, IdentityProvider};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub mod identity;

pub use identity::{FailingIdentity, StaticIdentity};

/// Epoch seconds the test clock starts at.
///
/// Streamed chunks carry this value in `created`, making timestamp
/// assertions exact instead of range checks.
pub const TEST_EPOCH_SECS: u64 = 1_700_000_000;

/// Test environment wiring the production router with injected fakes.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use copilot_testing::{StaticIdentity, TestEnv};
///
/// let env = TestEnv::new(Arc::new(StaticIdentity::new("alice"))).with_secret("s3cr3t");
/// let app = env.router();
/// ```
pub struct TestEnv {
    /// Deterministic clock backing chunk timestamps.
    pub clock: Arc<TestClock>,
    webhook: WebhookConfig,
    identity: Arc<dyn IdentityProvider>,
}

impl TestEnv {
    /// Creates an environment around the given identity provider.
    ///
    /// The clock starts pinned to [`TEST_EPOCH_SECS`]. No webhook secret
    /// is configured until [`TestEnv::with_secret`] sets one.
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        init_test_tracing();

        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(TEST_EPOCH_SECS);
        let clock = Arc::new(TestClock::with_start_time(start));

        Self { clock, webhook: WebhookConfig::default(), identity }
    }

    /// Configures the webhook signing secret.
    #[must_use]
    pub fn with_secret(mut self, secret: &str) -> Self {
        self.webhook.secret = Some(secret.to_string());
        self
    }

    /// Builds the production router over this environment's state.
    pub fn router(&self) -> Router {
        let state =
            AppState::new(self.webhook.clone(), self.identity.clone(), self.clock.clone());
        create_router(state, Duration::from_secs(30))
    }
}

/// Computes the signature header value for `payload` under `secret`.
///
/// Matches what a correctly configured sender would attach, prefix
/// included.
pub fn sign_payload(payload: &[u8], secret: &str) -> String {
    copilot_api::crypto::expected_signature(payload, secret)
        .expect("HMAC-SHA256 accepts any key length")
}

/// Mounts a GitHub `/user` mock that resolves `token` to `login`.
///
/// The mock matches the bearer token exactly, so requests carrying a
/// different token fall through to the server's default 404.
pub async fn mock_github_user(server: &MockServer, token: &str, login: &str) {
    Mock::given(method("GET"))
        .and(path("/user"))
        .and(header("Authorization", format!("Bearer {token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "login": login,
            "id": 1,
        })))
        .mount(server)
        .await;
}

/// Builds a real identity client pointed at a mock server.
pub fn github_client_for(server: &MockServer) -> GithubClient {
    let config = ClientConfig { api_base: server.uri(), ..ClientConfig::default() };
    GithubClient::new(config).expect("mock client config is valid")
}

/// Initializes test tracing, keeping output quiet unless `RUST_LOG` is set.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .with_test_writer()
        .try_init();
}
