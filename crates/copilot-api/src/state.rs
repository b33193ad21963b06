//! Shared application state threaded through the router.

use std::sync::Arc;

use copilot_core::Clock;
use copilot_github::IdentityProvider;

/// Webhook authentication settings.
#[derive(Debug, Clone, Default)]
pub struct WebhookConfig {
    /// Shared secret for signature verification; `None` disables it.
    ///
    /// Configuration loading normalizes an empty string to `None` before
    /// this value is constructed, so an empty secret never reaches the
    /// verifier.
    pub secret: Option<String>,
}

/// State shared by every handler.
///
/// Cloning is cheap: all fields are reference-counted handles.
#[derive(Clone)]
pub struct AppState {
    /// Webhook authentication settings.
    pub webhook: Arc<WebhookConfig>,
    /// Capability for resolving the caller's identity.
    pub identity: Arc<dyn IdentityProvider>,
    /// Time source for chunk timestamps and health reporting.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Builds state from its parts.
    pub fn new(
        webhook: WebhookConfig,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { webhook: Arc::new(webhook), identity, clock }
    }
}
