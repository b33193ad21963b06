//! Copilot chat handler with authentication and reply streaming.
//!
//! Accepts the webhook invocation, validates content type and signature,
//! resolves the caller against GitHub, and streams the greeting reply as
//! server-sent events.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use copilot_core::InvocationId;
use tracing::{debug, info, instrument, warn};

use crate::{
    crypto::verify_signature,
    error::CopilotError,
    headers::{bearer_token, HeaderLookup, SIGNATURE_HEADER},
    state::AppState,
    streaming::reply_stream,
};

/// Handles a copilot chat invocation.
///
/// The request moves through a linear pipeline:
/// 1. Content type must declare JSON.
/// 2. The webhook signature is verified over the raw body.
/// 3. Exactly one bearer token is extracted.
/// 4. The token is resolved to a GitHub login.
/// 5. The greeting reply is streamed as server-sent events.
///
/// A request failing an early stage never reaches a later one, and no
/// reply record is written until every stage has passed. Failures after
/// streaming starts tear down the connection instead of changing status.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 415: Content type is not JSON
/// - 401: Signature or bearer token rejected, or GitHub rejected the token
/// - 502: GitHub unreachable or misbehaving
#[instrument(name = "copilot_chat", skip(state, headers, body), fields(content_length = body.len()))]
pub async fn copilot_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, CopilotError> {
    info!("Processing copilot chat request");

    if !has_json_content_type(&headers) {
        warn!("Rejecting request without JSON content type");
        return Err(CopilotError::UnsupportedContentType);
    }

    let signature = HeaderLookup::from_headers(&headers, SIGNATURE_HEADER);
    if !verify_signature(state.webhook.secret.as_deref(), &signature, &body) {
        warn!("Webhook signature verification failed");
        return Err(CopilotError::SignatureRejected);
    }

    let token = bearer_token(&headers)?;
    debug!("Request authenticated, resolving caller identity");

    let user = state.identity.current_user(&token).await?;
    info!(login = %user.login, "Caller identity resolved, streaming reply");

    let invocation = InvocationId::new();
    let created = state.clock.unix_timestamp();
    let greeting = format!("Hello {}, I am the Developer Platform AI.", user.login);

    Ok(reply_stream(invocation, created, vec![greeting]).into_response())
}

/// Returns whether the request declares a JSON body.
///
/// Accepts `application/json` with optional parameters and any media type
/// with a `+json` structured suffix. Only the declared media type is
/// inspected; the body itself is never parsed.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let media_type = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();

    media_type == "application/json" || media_type.ends_with("+json")
}
