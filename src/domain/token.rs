//! Signed bearer token codec.
//!
//! Tokens are stateless JWTs: subject (email), issue time, and expiry,
//! signed HS512 with a process-wide secret. Nothing is persisted; validity
//! is re-established from the signature on every request. Signature and
//! expiry are checked separately so the auth gate can distinguish a forged
//! token from a merely stale one.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use super::credentials::Email;

const BEARER_PREFIX: &str = "Bearer ";

/// Failure while encoding or decoding a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Token is malformed, carries a bad signature, or could not be built.
    #[error("invalid bearer token: {message}")]
    Invalid { message: String },
}

impl TokenError {
    /// Create an invalid-token error with the given message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// Encoded, signed token as handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedToken(String);

impl SignedToken {
    /// Borrow the encoded form.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume into the encoded form.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SignedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SignedToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user's email.
    sub: String,
    /// Issued at (seconds since epoch).
    iat: i64,
    /// Expiry (seconds since epoch).
    exp: i64,
}

/// Process-wide token configuration, read-only after startup.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenConfig {
    /// Construct a configuration from the shared secret and token lifetime.
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

/// Issues and verifies signed bearer tokens.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    /// Build a codec from process configuration.
    pub fn new(config: TokenConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&config.secret),
            decoding: DecodingKey::from_secret(&config.secret),
            ttl: config.ttl,
        }
    }

    /// Issue a token for the given subject, expiring after the configured TTL.
    pub fn issue(&self, subject: &Email) -> Result<SignedToken, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.as_ref().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding)
            .map(SignedToken)
            .map_err(|e| TokenError::invalid(e.to_string()))
    }

    /// Recover the subject from a token, checking shape and signature only.
    ///
    /// Expiry is deliberately not checked here; see [`TokenCodec::is_expired`].
    pub fn verify_subject(&self, token: &str) -> Result<Email, TokenError> {
        let claims = self.decode_claims(token)?;
        Email::new(claims.sub).map_err(|e| TokenError::invalid(format!("token subject: {e}")))
    }

    /// Compare the embedded expiry against the current time.
    pub fn is_expired(&self, token: &str) -> Result<bool, TokenError> {
        let claims = self.decode_claims(token)?;
        Ok(claims.exp < Utc::now().timestamp())
    }

    /// Strip the literal `"Bearer "` prefix from an authorization header
    /// value; `None` when the header is empty or differently shaped.
    pub fn extract_bearer(header: &str) -> Option<&str> {
        let token = header.strip_prefix(BEARER_PREFIX)?;
        if token.is_empty() { None } else { Some(token) }
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        // Expiry is evaluated separately so stale tokens are still readable.
        validation.validate_exp = false;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| TokenError::invalid(e.to_string()))
    }
}
