//! PostgreSQL-backed `GalleryRepository` implementation using Diesel ORM.
//!
//! Listing selects only the identifier and filename columns; image payloads
//! cross the wire solely for single-item fetches.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{GalleryPersistenceError, GalleryRepository};
use crate::domain::{GalleryItem, GalleryItemId, GalleryItemSummary, UserId};

use super::models::{GalleryEntryRow, GalleryItemRow, NewGalleryItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::user_gallery;

/// Diesel-backed implementation of the `GalleryRepository` port.
#[derive(Clone)]
pub struct DieselGalleryRepository {
    pool: DbPool,
}

impl DieselGalleryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GalleryPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            GalleryPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> GalleryPersistenceError {
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
            GalleryPersistenceError::connection("database connection error")
        }
        _ => GalleryPersistenceError::query("database error"),
    }
}

fn row_to_item(row: GalleryItemRow) -> GalleryItem {
    GalleryItem::new(
        GalleryItemId::from_uuid(row.id),
        UserId::from_uuid(row.owner_id),
        row.file_name,
        row.image,
    )
}

#[async_trait]
impl GalleryRepository for DieselGalleryRepository {
    async fn insert(&self, item: &GalleryItem) -> Result<(), GalleryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewGalleryItemRow {
            id: item.id().as_uuid(),
            owner_id: item.owner_id().as_uuid(),
            file_name: item.filename(),
            image: item.bytes(),
        };

        diesel::insert_into(user_gallery::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<GalleryItemSummary>, GalleryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = user_gallery::table
            .filter(user_gallery::owner_id.eq(owner.as_uuid()))
            .order(user_gallery::created_at.asc())
            .select(GalleryEntryRow::as_select())
            .load::<GalleryEntryRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| GalleryItemSummary {
                id: GalleryItemId::from_uuid(row.id),
                filename: row.file_name,
            })
            .collect())
    }

    async fn find_by_id(
        &self,
        id: GalleryItemId,
    ) -> Result<Option<GalleryItem>, GalleryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = user_gallery::table
            .find(id.as_uuid())
            .select(GalleryItemRow::as_select())
            .first::<GalleryItemRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_item))
    }

    async fn delete(&self, id: GalleryItemId) -> Result<bool, GalleryPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(user_gallery::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}
