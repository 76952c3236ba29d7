//! Port abstraction for the gallery store and its errors.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{GalleryItem, GalleryItemId, GalleryItemSummary, UserId};

/// Persistence errors raised by gallery store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GalleryPersistenceError {
    /// Store connection could not be established.
    #[error("gallery store connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("gallery store query failed: {message}")]
    Query { message: String },
}

impl GalleryPersistenceError {
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
}

/// Driven port for gallery item persistence.
#[async_trait]
pub trait GalleryRepository: Send + Sync {
    /// Store a new gallery item.
    async fn insert(&self, item: &GalleryItem) -> Result<(), GalleryPersistenceError>;

    /// List an owner's items as payload-free summaries.
    async fn list_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<GalleryItemSummary>, GalleryPersistenceError>;

    /// Fetch a full item (payload included) by identifier.
    async fn find_by_id(
        &self,
        id: GalleryItemId,
    ) -> Result<Option<GalleryItem>, GalleryPersistenceError>;

    /// Delete an item by identifier; returns false when no row existed.
    async fn delete(&self, id: GalleryItemId) -> Result<bool, GalleryPersistenceError>;
}

/// In-memory gallery store used by tests and database-less startup.
#[derive(Debug, Default)]
pub struct InMemoryGalleryRepository {
    items: Mutex<Vec<GalleryItem>>,
}

#[async_trait]
impl GalleryRepository for InMemoryGalleryRepository {
    async fn insert(&self, item: &GalleryItem) -> Result<(), GalleryPersistenceError> {
        let mut items = self.items.lock().expect("gallery store lock");
        items.push(item.clone());
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: UserId,
    ) -> Result<Vec<GalleryItemSummary>, GalleryPersistenceError> {
        let items = self.items.lock().expect("gallery store lock");
        Ok(items
            .iter()
            .filter(|item| item.owner_id() == owner)
            .map(|item| GalleryItemSummary {
                id: item.id(),
                filename: item.filename().to_owned(),
            })
            .collect())
    }

    async fn find_by_id(
        &self,
        id: GalleryItemId,
    ) -> Result<Option<GalleryItem>, GalleryPersistenceError> {
        let items = self.items.lock().expect("gallery store lock");
        Ok(items.iter().find(|item| item.id() == id).cloned())
    }

    async fn delete(&self, id: GalleryItemId) -> Result<bool, GalleryPersistenceError> {
        let mut items = self.items.lock().expect("gallery store lock");
        let before = items.len();
        items.retain(|item| item.id() != id);
        Ok(items.len() < before)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn item(owner: UserId, filename: &str) -> GalleryItem {
        GalleryItem::new(
            GalleryItemId::random(),
            owner,
            filename.to_owned(),
            vec![0xde, 0xad, 0xbe, 0xef],
        )
    }

    #[rstest]
    #[tokio::test]
    async fn listing_is_scoped_to_the_owner_and_carries_no_bytes() {
        let store = InMemoryGalleryRepository::default();
        let owner = UserId::random();
        let stranger = UserId::random();
        let mine = item(owner, "mine.png");
        store.insert(&mine).await.expect("insert succeeds");
        store
            .insert(&item(stranger, "theirs.png"))
            .await
            .expect("insert succeeds");

        let summaries = store.list_for_owner(owner).await.expect("list succeeds");

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, mine.id());
        assert_eq!(summaries[0].filename, "mine.png");
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_returns_byte_identical_payload() {
        let store = InMemoryGalleryRepository::default();
        let stored = item(UserId::random(), "cat.png");
        store.insert(&stored).await.expect("insert succeeds");

        let fetched = store
            .find_by_id(stored.id())
            .await
            .expect("lookup succeeds")
            .expect("item present");
        assert_eq!(fetched.bytes(), stored.bytes());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_reports_whether_a_row_existed() {
        let store = InMemoryGalleryRepository::default();
        let stored = item(UserId::random(), "cat.png");
        store.insert(&stored).await.expect("insert succeeds");

        assert!(store.delete(stored.id()).await.expect("delete succeeds"));
        assert!(!store.delete(stored.id()).await.expect("delete succeeds"));
        assert!(
            store
                .find_by_id(stored.id())
                .await
                .expect("lookup succeeds")
                .is_none()
        );
    }
}
