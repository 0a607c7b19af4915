/// Signed, expiring tokens (HS256)
///
/// Two token families share one claims shape and one server secret:
///
/// - **Session**: carried in a cookie, binds requests to a logged-in
///   user until logout or expiry.
/// - **Password reset**: embedded in an emailed link, authorizes one
///   password change without an active session.
///
/// Verification checks the signature first; expiry is a separate,
/// additional condition. Any tampering with the user id or timestamps
/// breaks the signature. There is no revocation list: a reset token
/// stays valid until its window elapses.
///
/// # Example
///
/// ```
/// use uzduotys_shared::auth::token::{issue_reset_token, verify_reset_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let token = issue_reset_token(7, secret, 1800)?;
/// assert_eq!(verify_reset_token(&token, secret)?, 7);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const ISSUER: &str = "uzduotys";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to create token
    #[error("failed to create token: {0}")]
    Create(String),

    /// Malformed token, bad signature, or wrong purpose
    #[error("invalid token")]
    Invalid,

    /// Signature verified but the expiry window has elapsed
    #[error("token has expired")]
    Expired,
}

/// What a token authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    /// Session cookie credential
    Session,

    /// One password change without a session
    PasswordReset,
}

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: i64,

    /// Issuer, always "uzduotys"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Which flow this token belongs to
    pub purpose: TokenPurpose,
}

impl Claims {
    fn new(user_id: i64, purpose: TokenPurpose, ttl_secs: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::seconds(ttl_secs);

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            purpose,
        }
    }
}

fn issue(user_id: i64, purpose: TokenPurpose, secret: &str, ttl_secs: i64) -> Result<String, TokenError> {
    let claims = Claims::new(user_id, purpose, ttl_secs);
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, &claims, &key).map_err(|e| TokenError::Create(e.to_string()))
}

fn verify(token: &str, purpose: TokenPurpose, secret: &str) -> Result<i64, TokenError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    // No grace period: expired means expired
    validation.leeway = 0;

    let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Invalid,
    })?;

    if data.claims.purpose != purpose {
        return Err(TokenError::Invalid);
    }

    Ok(data.claims.sub)
}

/// Issues a session token for a logged-in user
pub fn issue_session_token(user_id: i64, secret: &str, ttl_secs: i64) -> Result<String, TokenError> {
    issue(user_id, TokenPurpose::Session, secret, ttl_secs)
}

/// Resolves a session token to a user id
pub fn verify_session_token(token: &str, secret: &str) -> Result<i64, TokenError> {
    verify(token, TokenPurpose::Session, secret)
}

/// Issues a password-reset token for the given user
pub fn issue_reset_token(user_id: i64, secret: &str, ttl_secs: i64) -> Result<String, TokenError> {
    issue(user_id, TokenPurpose::PasswordReset, secret, ttl_secs)
}

/// Verifies a password-reset token and returns the embedded user id
pub fn verify_reset_token(token: &str, secret: &str) -> Result<i64, TokenError> {
    verify(token, TokenPurpose::PasswordReset, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_reset_token_roundtrip() {
        let token = issue_reset_token(42, SECRET, 1800).unwrap();
        assert_eq!(verify_reset_token(&token, SECRET).unwrap(), 42);
    }

    #[test]
    fn test_session_token_roundtrip() {
        let token = issue_session_token(7, SECRET, 3600).unwrap();
        assert_eq!(verify_session_token(&token, SECRET).unwrap(), 7);
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue_reset_token(42, SECRET, 1800).unwrap();
        let result = verify_reset_token(&token, "a-completely-different-secret-key");
        assert!(matches!(result, Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token() {
        // Already past its window when issued
        let token = issue_reset_token(42, SECRET, -5).unwrap();
        let result = verify_reset_token(&token, SECRET);
        assert!(matches!(result, Err(TokenError::Expired)));
    }

    #[test]
    fn test_any_single_byte_tamper_is_invalid() {
        let token = issue_reset_token(42, SECRET, 1800).unwrap();
        let bytes = token.as_bytes();

        for i in 0..bytes.len() {
            let mut tampered = bytes.to_vec();
            // Flip to a different base64url-ish character
            tampered[i] = if tampered[i] == b'A' { b'B' } else { b'A' };
            if tampered == bytes {
                continue;
            }
            let tampered = String::from_utf8(tampered).unwrap();
            assert!(
                verify_reset_token(&tampered, SECRET).is_err(),
                "tampering byte {} was accepted",
                i
            );
        }
    }

    #[test]
    fn test_malformed_tokens_are_invalid() {
        for garbage in ["", "not-a-token", "a.b", "a.b.c.d"] {
            assert!(matches!(
                verify_reset_token(garbage, SECRET),
                Err(TokenError::Invalid)
            ));
        }
    }

    #[test]
    fn test_purpose_is_enforced() {
        // A session token must not authorize a password reset
        let session = issue_session_token(42, SECRET, 3600).unwrap();
        assert!(matches!(
            verify_reset_token(&session, SECRET),
            Err(TokenError::Invalid)
        ));

        // And a reset token must not establish a session
        let reset = issue_reset_token(42, SECRET, 1800).unwrap();
        assert!(matches!(
            verify_session_token(&reset, SECRET),
            Err(TokenError::Invalid)
        ));
    }
}
