//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation; regenerate with `diesel print-schema` after changing a
//! migration.

diesel::table! {
    /// User accounts table.
    ///
    /// The `id` column is the primary key (UUID v4); `email` carries a
    /// unique constraint and is the authentication key.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique email address used to authenticate.
        email -> Varchar,
        /// Argon2 PHC hash string of the account password.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Gallery items table: one row per stored image blob.
    user_gallery (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user (foreign key into `users`).
        owner_id -> Uuid,
        /// Original upload filename.
        file_name -> Varchar,
        /// Raw image payload.
        image -> Bytea,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(user_gallery -> users (owner_id));
diesel::allow_tables_to_appear_in_same_query!(users, user_gallery);
