//! Error taxonomy for the copilot webhook.
//!
//! Every failure that can occur before streaming starts maps to a single
//! HTTP error response here. Once streaming has begun the response status
//! is already on the wire, so later failures terminate the connection
//! instead of passing through this type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use copilot_github::GithubError;
use serde_json::json;
use thiserror::Error;

/// Result type alias using `CopilotError`.
pub type Result<T> = std::result::Result<T, CopilotError>;

/// Failures raised while authenticating and resolving a chat request.
#[derive(Debug, Error)]
pub enum CopilotError {
    /// Request body is not declared as JSON.
    #[error("event does not have a JSON content type")]
    UnsupportedContentType,

    /// Webhook signature missing, unexpected, repeated, or wrong.
    #[error("webhook signature verification failed")]
    SignatureRejected,

    /// No bearer token header present.
    #[error("bearer token header missing")]
    TokenMissing,

    /// Bearer token header repeated or unreadable.
    #[error("bearer token header must carry exactly one value")]
    TokenAmbiguous,

    /// Identity resolution against GitHub failed.
    #[error(transparent)]
    Identity(#[from] GithubError),
}

impl CopilotError {
    /// Returns the HTTP status this error surfaces as.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::SignatureRejected | Self::TokenMissing | Self::TokenAmbiguous => {
                StatusCode::UNAUTHORIZED
            },
            Self::Identity(err) if err.is_auth_failure() => StatusCode::UNAUTHORIZED,
            Self::Identity(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Returns the machine-readable error category for response bodies.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::UnsupportedContentType => "invalid_request_error",
            Self::SignatureRejected | Self::TokenMissing | Self::TokenAmbiguous => {
                "authentication_error"
            },
            Self::Identity(err) if err.is_auth_failure() => "authentication_error",
            Self::Identity(_) => "upstream_error",
        }
    }
}

impl IntoResponse for CopilotError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "type": self.error_type(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use copilot_github::GithubError;

    use super::*;

    #[test]
    fn auth_failures_map_to_unauthorized() {
        assert_eq!(CopilotError::SignatureRejected.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(CopilotError::TokenMissing.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(CopilotError::TokenAmbiguous.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn content_type_maps_to_unsupported_media_type() {
        assert_eq!(
            CopilotError::UnsupportedContentType.status_code(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }

    #[test]
    fn github_rejection_stays_unauthorized() {
        let err = CopilotError::from(GithubError::unauthorized(401));
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_type(), "authentication_error");
    }

    #[test]
    fn github_outage_maps_to_bad_gateway() {
        let timeout = CopilotError::from(GithubError::timeout(10));
        assert_eq!(timeout.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(timeout.error_type(), "upstream_error");

        let flaky = CopilotError::from(GithubError::unexpected_status(500, "boom".to_string()));
        assert_eq!(flaky.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn response_body_carries_message_and_type() {
        let response = CopilotError::TokenMissing.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(parsed["error"]["message"], "bearer token header missing");
        assert_eq!(parsed["error"]["type"], "authentication_error");
    }
}
