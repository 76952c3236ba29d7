//! Port abstraction for the credential store and its errors.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{Email, User};

/// Persistence errors raised by credential store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Store connection could not be established.
    #[error("user store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("user store query failed: {message}")]
    Query { message: String },

    /// A user record already exists for the email.
    #[error("user already stored for email {email}")]
    DuplicateEmail { email: String },
}

impl UserPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create a duplicate-email error for the given address.
    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }
}

/// Driven port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record; duplicates by email are rejected.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;
}

/// In-memory credential store used by tests and database-less startup.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.lock().expect("user store lock");
        if users.iter().any(|stored| stored.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(
                user.email().as_ref(),
            ));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("user store lock");
        Ok(users.iter().find(|stored| stored.email() == email).cloned())
    }
}
