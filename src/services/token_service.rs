//! Stateless bearer tokens.
//!
//! A token is `hex(claims) "." hex(HMAC-SHA256(claims))`, where `claims` is
//! the JSON encoding of [`Claims`]. Nothing is stored server-side: a token is
//! valid if and only if its signature matches under the server secret and its
//! expiry is in the future.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac, digest::InvalidLength};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Data carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id the token was issued to
    pub sub: i64,

    /// Issued-at, seconds since the Unix epoch
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

/// Reasons a token is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,
}

/// Reasons a token cannot be issued.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("token expiry is out of range")]
    ExpiryOutOfRange,

    #[error("failed to encode claims: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Issues and validates signed tokens.
#[derive(Clone)]
pub struct TokenService {
    mac: HmacSha256,
    ttl: Duration,
}

impl TokenService {
    /// Create a service signing with `secret`; tokens live for `ttl`.
    pub fn new(secret: &[u8], ttl: Duration) -> Result<Self, InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret)?,
            ttl,
        })
    }

    /// Issue a token for `user_id`, valid from now until now + ttl.
    pub fn issue(&self, user_id: i64) -> Result<String, IssueError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: i64, now: DateTime<Utc>) -> Result<String, IssueError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(IssueError::ExpiryOutOfRange)?;
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        let payload = serde_json::to_vec(&claims)?;

        let mut mac = self.mac.clone();
        mac.update(&payload);
        let signature = mac.finalize().into_bytes();

        Ok(format!("{}.{}", hex::encode(payload), hex::encode(signature)))
    }

    /// Validate a token and return its claims.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let (payload_hex, signature_hex) = token.split_once('.').ok_or(TokenError::Malformed)?;
        let payload = hex::decode(payload_hex).map_err(|_| TokenError::Malformed)?;
        let signature = hex::decode(signature_hex).map_err(|_| TokenError::Malformed)?;

        // Constant-time comparison
        let mut mac = self.mac.clone();
        mac.update(&payload);
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
