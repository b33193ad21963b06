//! Error types for identity resolution.
//!
//! Distinguishes "the token is bad" from "the provider is unreachable":
//! the first is the caller's authentication failure, the second is an
//! upstream outage, and the HTTP layer maps them to different statuses.

use thiserror::Error;

/// Result type alias for identity operations.
pub type Result<T> = std::result::Result<T, GithubError>;

/// Errors raised while resolving the account behind a bearer token.
#[derive(Debug, Clone, Error)]
pub enum GithubError {
    /// The identity provider rejected the presented token.
    #[error("identity provider rejected the token: HTTP {status_code}")]
    Unauthorized {
        /// HTTP status code returned (401 or 403)
        status_code: u16,
    },

    /// Network-level connectivity failure.
    #[error("network connection failed: {message}")]
    Network {
        /// Error message describing the network failure
        message: String,
    },

    /// HTTP request timeout exceeded.
    #[error("request timeout after {timeout_seconds}s")]
    Timeout {
        /// Seconds before the request timed out
        timeout_seconds: u64,
    },

    /// The provider answered with a status outside the expected set.
    #[error("unexpected identity provider response: HTTP {status_code}")]
    UnexpectedStatus {
        /// HTTP status code of the response
        status_code: u16,
        /// Response body content (truncated)
        body: String,
    },

    /// The response body could not be decoded into a user.
    #[error("undecodable identity response: {message}")]
    Decode {
        /// Decoding error message
        message: String,
    },

    /// The client could not be built from its configuration.
    #[error("invalid client configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl GithubError {
    /// Creates an unauthorized error from the provider's status code.
    pub fn unauthorized(status_code: u16) -> Self {
        Self::Unauthorized { status_code }
    }

    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Creates an unexpected-status error from an HTTP response.
    pub fn unexpected_status(status_code: u16, body: impl Into<String>) -> Self {
        Self::UnexpectedStatus { status_code, body: body.into() }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode { message: message.into() }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// True when the failure means the presented token is bad, as opposed
    /// to the provider being unreachable or broken.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_identified_correctly() {
        assert!(GithubError::unauthorized(401).is_auth_failure());
        assert!(GithubError::unauthorized(403).is_auth_failure());

        assert!(!GithubError::network("connection refused").is_auth_failure());
        assert!(!GithubError::timeout(10).is_auth_failure());
        assert!(!GithubError::unexpected_status(500, "oops").is_auth_failure());
        assert!(!GithubError::decode("missing field").is_auth_failure());
        assert!(!GithubError::configuration("bad url").is_auth_failure());
    }

    #[test]
    fn error_display_format() {
        let error = GithubError::timeout(10);
        assert_eq!(error.to_string(), "request timeout after 10s");

        let unauthorized = GithubError::unauthorized(401);
        assert_eq!(unauthorized.to_string(), "identity provider rejected the token: HTTP 401");
    }
}
