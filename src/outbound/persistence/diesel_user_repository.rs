//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! A thin adapter: translates between Diesel rows and domain types and maps
//! database failures onto the port's error enum. No business logic lives
//! here; email-uniqueness is the one rule the database itself enforces.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, User, UserId};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let email = Email::new(row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email rejected: {err}")))?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        row.password_hash,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: user.id().as_uuid(),
            email: user.email().as_ref(),
            password_hash: user.password_hash(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|error| match &error {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    UserPersistenceError::duplicate_email(user.email().as_ref())
                }
                _ => map_diesel_error(error),
            })?;
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Row-mapping coverage; port-contract behaviour is exercised through
    //! the in-memory adapter and the HTTP integration tests.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn valid_row_maps_to_domain_user() {
        let id = Uuid::new_v4();
        let row = UserRow {
            id,
            email: "ada@example.com".into(),
            password_hash: "$argon2id$stub".into(),
            created_at: Utc::now(),
        };

        let user = row_to_user(row).expect("row maps");
        assert_eq!(user.id().as_uuid(), id);
        assert_eq!(user.email().as_ref(), "ada@example.com");
        assert_eq!(user.password_hash(), "$argon2id$stub");
    }

    #[rstest]
    fn corrupt_stored_email_surfaces_as_query_error() {
        let row = UserRow {
            id: Uuid::new_v4(),
            email: "not-an-email".into(),
            password_hash: "$argon2id$stub".into(),
            created_at: Utc::now(),
        };

        let err = row_to_user(row).expect_err("corrupt row must fail");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    fn pool_errors_map_to_connection_failures() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(err, UserPersistenceError::connection("timed out"));
    }
}
