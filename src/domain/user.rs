//! User account entity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::credentials::Email;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read back from persistence.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered user account.
///
/// ## Invariants
/// - `email` is unique across the credential store (enforced before insert
///   and by the database constraint).
/// - `password_hash` is an argon2 PHC string; the plaintext password never
///   reaches this type.
///
/// Deliberately not serialisable: the hash must not leak through a response
/// body by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    password_hash: String,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, email: Email, password_hash: String) -> Self {
        Self {
            id,
            email,
            password_hash,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Email the user authenticates with.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Stored argon2 PHC hash string.
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn user_id_serialises_as_plain_uuid_string() {
        let id = UserId::random();
        let value = serde_json::to_value(id).expect("serialises");
        assert_eq!(value, serde_json::Value::String(id.to_string()));
    }

    #[rstest]
    fn user_exposes_components() {
        let id = UserId::random();
        let email = Email::new("ada@example.com").expect("valid email");
        let user = User::new(id, email.clone(), "$argon2id$stub".into());

        assert_eq!(user.id(), id);
        assert_eq!(user.email(), &email);
        assert_eq!(user.password_hash(), "$argon2id$stub");
    }
}
