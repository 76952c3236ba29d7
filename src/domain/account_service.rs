//! Account service: registration and login against the credential store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{AccountService, UserPersistenceError, UserRepository};
use crate::domain::token::TokenCodec;
use crate::domain::{Credentials, Error, SignedToken, User, UserId, hash_password, verify_password};

const ALREADY_REGISTERED: &str = "User already registered with given email";
const USER_NOT_FOUND: &str = "User not found";

/// Credential-store-backed [`AccountService`] implementation.
#[derive(Clone)]
pub struct AccountServiceImpl {
    users: Arc<dyn UserRepository>,
    codec: Arc<TokenCodec>,
}

impl AccountServiceImpl {
    /// Create a new service backed by a user repository and token codec.
    pub fn new(users: Arc<dyn UserRepository>, codec: Arc<TokenCodec>) -> Self {
        Self { users, codec }
    }

    fn issue_token(&self, user: &User) -> Result<SignedToken, Error> {
        self.codec
            .issue(user.email())
            .map_err(|err| Error::internal(format!("token issue failed: {err}")))
    }
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::DuplicateEmail { .. } => Error::already_exists(ALREADY_REGISTERED),
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn register(&self, credentials: &Credentials) -> Result<SignedToken, Error> {
        let existing = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?;
        if existing.is_some() {
            return Err(Error::already_exists(ALREADY_REGISTERED));
        }

        let password_hash = hash_password(credentials.password())
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = User::new(UserId::random(), credentials.email().clone(), password_hash);

        // The store also enforces uniqueness; a concurrent registration loses
        // here rather than on the probe above.
        self.users
            .insert(&user)
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %user.id(), "user registered");
        self.issue_token(&user)
    }

    async fn login(&self, credentials: &Credentials) -> Result<SignedToken, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;

        if !verify_password(user.password_hash(), credentials.password()) {
            return Err(Error::not_found(USER_NOT_FOUND));
        }

        self.issue_token(&user)
    }
}
