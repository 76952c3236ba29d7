//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{user_gallery, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for reading a full gallery item, payload included.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_gallery)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GalleryItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub file_name: String,
    pub image: Vec<u8>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Row struct for listing gallery entries without the payload column.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_gallery)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GalleryEntryRow {
    pub id: Uuid,
    pub file_name: String,
}

/// Insertable struct for creating new gallery item records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_gallery)]
pub(crate) struct NewGalleryItemRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub file_name: &'a str,
    pub image: &'a [u8],
}
