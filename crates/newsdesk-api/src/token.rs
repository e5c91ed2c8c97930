//! Bearer token inspection.
//!
//! The backend issues JWTs. The client never verifies signatures; it only
//! reads the `exp` claim to decide whether a stored token is still worth
//! sending.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Clock-skew buffer applied before the `exp` claim, in milliseconds.
pub const EXPIRY_SKEW_MS: i64 = 30_000;

/// Why a token could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Token is not three dot-separated segments.
    #[error("Malformed token")]
    Malformed,
    /// Payload segment is not valid base64url.
    #[error("Invalid token encoding")]
    Encoding,
    /// Payload is not a JSON claims object.
    #[error("Invalid token claims: {0}")]
    Claims(String),
}

/// The subset of JWT claims the client reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued-at, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Decodes the claims segment of a JWT without verifying it.
///
/// # Errors
///
/// Returns an error if the token is not a well-formed JWT.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| TokenError::Encoding)?;

    serde_json::from_slice(&bytes).map_err(|e| TokenError::Claims(e.to_string()))
}

/// Returns true if the token must be treated as expired at `now`.
///
/// A token is expired once `now >= exp * 1000 - 30_000` (milliseconds).
/// Undecodable tokens and tokens without `exp` count as expired.
#[must_use]
pub fn is_token_expired_at(token: &str, now: DateTime<Utc>) -> bool {
    let Ok(claims) = decode_claims(token) else {
        return true;
    };
    let Some(exp) = claims.exp else {
        return true;
    };
    now.timestamp_millis() >= exp.saturating_mul(1000).saturating_sub(EXPIRY_SKEW_MS)
}

/// Returns true if the token must be treated as expired right now.
#[must_use]
pub fn is_token_expired(token: &str) -> bool {
    is_token_expired_at(token, Utc::now())
}

/// Builds an unsigned token carrying the given `exp`, for tests and fixtures.
#[must_use]
pub fn unsigned_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}
