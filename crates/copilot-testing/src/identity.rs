//! Identity provider fakes for handler and router tests.

use async_trait::async_trait;
use copilot_github::{GithubError, GithubUser, IdentityProvider};

/// Identity provider resolving every acceptable token to a fixed user.
///
/// By default any token resolves. [`StaticIdentity::expecting_token`]
/// narrows it to one token and rejects the rest the way GitHub would.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    user: GithubUser,
    expected_token: Option<String>,
}

impl StaticIdentity {
    /// Creates a provider resolving any token to `login`.
    pub fn new(login: &str) -> Self {
        Self { user: GithubUser { login: login.to_string(), id: 1 }, expected_token: None }
    }

    /// Restricts resolution to `token`; other tokens get 401.
    #[must_use]
    pub fn expecting_token(mut self, token: &str) -> Self {
        self.expected_token = Some(token.to_string());
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self, token: &str) -> Result<GithubUser, GithubError> {
        match &self.expected_token {
            Some(expected) if expected != token => Err(GithubError::unauthorized(401)),
            _ => Ok(self.user.clone()),
        }
    }
}

/// Identity provider failing every call with a fixed error.
///
/// Covers the paths where GitHub is unreachable or rejects the token.
#[derive(Debug, Clone)]
pub struct FailingIdentity {
    error: GithubError,
}

impl FailingIdentity {
    /// Creates a provider that always returns a clone of `error`.
    pub fn new(error: GithubError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl IdentityProvider for FailingIdentity {
    async fn current_user(&self, _token: &str) -> Result<GithubUser, GithubError> {
        Err(self.error.clone())
    }
}
