//! Driving port for registration and login use-cases.
//!
//! Inbound adapters call this port to create accounts and authenticate
//! credentials without knowing (or importing) the backing infrastructure,
//! so HTTP handler tests can substitute a test double instead of wiring
//! persistence and hashing.

use async_trait::async_trait;

use crate::domain::{Credentials, Error, SignedToken};

/// Domain use-case port for account registration and login.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create a new account and return a bearer token for it.
    ///
    /// Fails with `AlreadyExists` when the email is taken.
    async fn register(&self, credentials: &Credentials) -> Result<SignedToken, Error>;

    /// Authenticate credentials and return a bearer token.
    ///
    /// Fails with `NotFound` when the email is unknown or the password does
    /// not verify; the two cases are deliberately indistinguishable.
    async fn login(&self, credentials: &Credentials) -> Result<SignedToken, Error>;
}
