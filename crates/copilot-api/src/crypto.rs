//! Webhook signature verification.
//!
//! HMAC-SHA256 over the raw request body in the GitHub header format
//! `sha256=<lowercase hex>`. The decision table is strict in both
//! directions: a configured secret makes the signature mandatory, and a
//! signature presented without a configured secret is rejected as
//! anomalous rather than ignored.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::headers::HeaderLookup;

type HmacSha256 = Hmac<Sha256>;

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Signature computation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Invalid secret key.
    InvalidSecret,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSecret => write!(f, "invalid secret key"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Decides whether a request is authentic.
///
/// `secret` is `None` when verification is disabled; configuration
/// normalizes empty strings to `None` before this point. The payload must
/// be the raw body bytes exactly as received, since any re-serialization
/// would change the digest.
///
/// | secret | header          | result                     |
/// |--------|-----------------|----------------------------|
/// | none   | missing         | accept                     |
/// | none   | anything else   | reject (unexpected)        |
/// | some   | single value    | constant-time HMAC compare |
/// | some   | anything else   | reject                     |
///
/// Repeated or unreadable header values never reach the comparison.
/// Pure function: same inputs, same answer, no side effects.
pub fn verify_signature(secret: Option<&str>, header: &HeaderLookup, payload: &[u8]) -> bool {
    match (secret, header) {
        (None, HeaderLookup::Missing) => true,
        (None, _) => false,
        (Some(secret), HeaderLookup::Single(provided)) => {
            let Ok(expected) = expected_signature(payload, secret) else {
                return false;
            };
            timing_safe_eq(provided, &expected)
        },
        (Some(_), _) => false,
    }
}

/// Computes the signature header value a sender would attach to `payload`.
///
/// Lowercase hex HMAC-SHA256 under `secret`, prefixed with `sha256=`.
///
/// # Errors
///
/// Returns `SignatureError::InvalidSecret` if the MAC rejects the key,
/// which HMAC-SHA256 does for no key length in practice.
pub fn expected_signature(payload: &[u8], secret: &str) -> Result<String, SignatureError> {
    Ok(format!("{SIGNATURE_PREFIX}{}", generate_hmac_hex(payload, secret)?))
}

/// Generates the HMAC-SHA256 of `payload` as a lowercase hex string.
///
/// # Errors
///
/// Returns `SignatureError::InvalidSecret` if the secret key is invalid.
pub fn generate_hmac_hex(payload: &[u8], secret: &str) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidSecret)?;

    mac.update(payload);
    let result = mac.finalize();
    Ok(hex::encode(result.into_bytes()))
}

/// Timing-safe string comparison to prevent timing attacks.
///
/// Uses constant-time comparison to avoid leaking information about the
/// expected signature through timing analysis.
fn timing_safe_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;
    for (a_byte, b_byte) in a_bytes.iter().zip(b_bytes.iter()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(value: &str) -> HeaderLookup {
        HeaderLookup::Single(value.to_string())
    }

    #[test]
    fn accepts_without_secret_or_header() {
        assert!(verify_signature(None, &HeaderLookup::Missing, b"anything"));
        assert!(verify_signature(None, &HeaderLookup::Missing, b""));
    }

    #[test]
    fn rejects_unexpected_signature_when_no_secret() {
        let header = single("sha256=abc123");
        assert!(!verify_signature(None, &header, b"payload"));
    }

    #[test]
    fn rejects_missing_signature_when_secret_configured() {
        assert!(!verify_signature(Some("s3cr3t"), &HeaderLookup::Missing, b"payload"));
    }

    #[test]
    fn accepts_valid_signature() {
        let payload = b"{\"any\":\"json\"}";
        let secret = "s3cr3t";

        let header = single(&expected_signature(payload, secret).unwrap());
        assert!(verify_signature(Some(secret), &header, payload));
    }

    #[test]
    fn rejects_wrong_signature() {
        let payload = b"{\"x\":1}";
        let header =
            single("sha256=0000000000000000000000000000000000000000000000000000000000000000");

        assert!(!verify_signature(Some("s3cr3t"), &header, payload));
    }

    #[test]
    fn rejects_tampered_payload() {
        let secret = "s3cr3t";
        let header = single(&expected_signature(b"{\"x\":1}", secret).unwrap());

        assert!(!verify_signature(Some(secret), &header, b"{\"x\":2}"));
    }

    #[test]
    fn rejects_signature_under_different_key() {
        let payload = b"payload";
        let header = single(&expected_signature(payload, "key-one").unwrap());

        assert!(!verify_signature(Some("key-two"), &header, payload));
    }

    #[test]
    fn rejects_repeated_or_unreadable_header() {
        assert!(!verify_signature(Some("s3cr3t"), &HeaderLookup::Multiple, b"payload"));
        assert!(!verify_signature(Some("s3cr3t"), &HeaderLookup::Malformed, b"payload"));
        assert!(!verify_signature(None, &HeaderLookup::Multiple, b"payload"));
        assert!(!verify_signature(None, &HeaderLookup::Malformed, b"payload"));
    }

    #[test]
    fn rejects_hex_without_prefix() {
        let payload = b"payload";
        let secret = "s3cr3t";

        let bare_hex = generate_hmac_hex(payload, secret).unwrap();
        assert!(!verify_signature(Some(secret), &single(&bare_hex), payload));
    }

    #[test]
    fn expected_signature_has_prefixed_lowercase_hex() {
        let signature = expected_signature(b"payload", "secret").unwrap();

        let hex_part = signature.strip_prefix(SIGNATURE_PREFIX).unwrap();
        assert_eq!(hex_part.len(), 64);
        assert!(hex_part.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hmac_matches_known_answer() {
        // RFC 4231 test case 2
        let hex = generate_hmac_hex(b"what do ya want for nothing?", "Jefe").unwrap();
        assert_eq!(hex, "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
    }

    #[test]
    fn generate_hmac_hex_consistent() {
        let sig1 = generate_hmac_hex(b"test payload", "secret").unwrap();
        let sig2 = generate_hmac_hex(b"test payload", "secret").unwrap();

        assert_eq!(sig1, sig2);
        assert_eq!(sig1.len(), 64); // SHA256 hex is 64 chars
    }

    #[test]
    fn empty_key_and_empty_payload_still_sign() {
        // The verifier never sees an empty configured secret, but the
        // primitive itself accepts any key length.
        assert!(generate_hmac_hex(b"", "").is_ok());
    }

    #[test]
    fn timing_safe_eq_same() {
        assert!(timing_safe_eq("hello", "hello"));
    }

    #[test]
    fn timing_safe_eq_different() {
        assert!(!timing_safe_eq("hello", "world"));
    }

    #[test]
    fn timing_safe_eq_different_length() {
        assert!(!timing_safe_eq("hello", "hello_world"));
    }
}
