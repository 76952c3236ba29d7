//! Authentication primitives: validated email and password values and the
//! argon2 hashing helpers used to store and check credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;
use std::sync::OnceLock;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Minimum allowed password length.
pub const PASSWORD_MIN: usize = 5;
/// Maximum allowed password length.
pub const PASSWORD_MAX: usize = 10;

/// Domain error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not look like a mailbox address.
    InvalidEmail,
    /// Password is shorter than [`PASSWORD_MIN`] characters.
    PasswordTooShort { min: usize },
    /// Password is longer than [`PASSWORD_MAX`] characters.
    PasswordTooLong { max: usize },
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // local@domain.tld; full RFC parsing is the mail server's problem.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email address used as the authentication key.
///
/// ## Invariants
/// - Trimmed of surrounding whitespace and non-empty.
/// - Matches a basic `local@domain.tld` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`] from raw input.
    pub fn new(email: impl Into<String>) -> Result<Self, CredentialValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, CredentialValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(CredentialValidationError::EmptyEmail);
        }
        if !email_regex().is_match(normalized) {
            return Err(CredentialValidationError::InvalidEmail);
        }
        Ok(Self(normalized.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = CredentialValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Validated plaintext password held only for the duration of a request.
///
/// ## Invariants
/// - Length between [`PASSWORD_MIN`] and [`PASSWORD_MAX`] characters.
/// - Retains caller-provided whitespace to avoid surprising credential
///   comparisons; the backing buffer is zeroed on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and construct a [`Password`] from raw input.
    pub fn new(password: impl Into<String>) -> Result<Self, CredentialValidationError> {
        let password = password.into();
        let length = password.chars().count();
        if length < PASSWORD_MIN {
            return Err(CredentialValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(CredentialValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(password)))
    }

    /// Password string provided by the caller.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated login/registration credentials used by account services.
///
/// # Examples
/// ```
/// use keepsake::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("ada@example.com", "secret1").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: Email,
    password: Password,
}

impl Credentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            password: Password::new(password)?,
        })
    }

    /// Email suitable for user lookups.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Failure while producing an argon2 hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

impl PasswordHashError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Hash a password with argon2 and a fresh random salt, returning the PHC
/// string to persist alongside the user record.
pub fn hash_password(password: &Password) -> Result<String, PasswordHashError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| PasswordHashError::new(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordHashError::new(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| PasswordHashError::new(e.to_string()))?
        .to_string();
    Ok(phc)
}

/// Check a password against a stored PHC hash string.
///
/// Unparseable hashes verify as false rather than erroring; a corrupt stored
/// hash must never authenticate anyone.
pub fn verify_password(hash: &str, password: &Password) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        let argon2 = Argon2::default();
        argon2
            .verify_password(password.as_str().as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}
