//! Tagged header extraction for credential headers.
//!
//! Both auth headers must carry exactly one value. A repeated header is
//! not the same thing as an absent one: a duplicated credential is
//! rejected, never collapsed into "missing" or silently first-wins.

use axum::http::HeaderMap;

use crate::error::CopilotError;

/// Header carrying the caller's bearer credential.
pub const TOKEN_HEADER: &str = "x-github-token";

/// Header carrying the webhook payload signature.
pub const SIGNATURE_HEADER: &str = "x-github-signature";

/// Outcome of looking up a header that must carry exactly one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLookup {
    /// Header absent from the request.
    Missing,
    /// Exactly one well-formed value.
    Single(String),
    /// Header repeated across multiple values.
    Multiple,
    /// Value present but not readable as visible ASCII.
    Malformed,
}

impl HeaderLookup {
    /// Looks up `name`, insisting on a single well-formed value.
    pub fn from_headers(headers: &HeaderMap, name: &str) -> Self {
        let mut values = headers.get_all(name).iter();

        let Some(first) = values.next() else {
            return Self::Missing;
        };
        if values.next().is_some() {
            return Self::Multiple;
        }

        match first.to_str() {
            Ok(value) => Self::Single(value.to_string()),
            Err(_) => Self::Malformed,
        }
    }
}

/// Extracts the caller's bearer token from [`TOKEN_HEADER`].
///
/// Exactly one value must be present; zero or several is an
/// authentication failure with no fallback credential. The value is
/// returned unmodified for the identity provider.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, CopilotError> {
    match HeaderLookup::from_headers(headers, TOKEN_HEADER) {
        HeaderLookup::Single(token) => Ok(token),
        HeaderLookup::Missing => Err(CopilotError::TokenMissing),
        HeaderLookup::Multiple | HeaderLookup::Malformed => Err(CopilotError::TokenAmbiguous),
    }
}
