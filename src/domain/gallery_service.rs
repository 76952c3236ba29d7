//! Gallery service: upload, list, fetch, and delete against the stores.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::ports::{
    GalleryPersistenceError, GalleryRepository, GalleryService, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Email, Error, GalleryItem, GalleryItemId, ImageEntry, User, UserImageListing,
};

const USER_NOT_FOUND: &str = "User not found";

/// Store-backed [`GalleryService`] implementation.
#[derive(Clone)]
pub struct GalleryServiceImpl {
    users: Arc<dyn UserRepository>,
    gallery: Arc<dyn GalleryRepository>,
}

impl GalleryServiceImpl {
    /// Create a new service backed by the credential and gallery stores.
    pub fn new(users: Arc<dyn UserRepository>, gallery: Arc<dyn GalleryRepository>) -> Self {
        Self { users, gallery }
    }

    async fn resolve_caller(&self, caller: &Email) -> Result<User, Error> {
        self.users
            .find_by_email(caller)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message }
        | UserPersistenceError::DuplicateEmail { email: message } => Error::internal(message),
    }
}

fn map_gallery_persistence_error(error: GalleryPersistenceError) -> Error {
    match error {
        GalleryPersistenceError::Connection { message } => Error::service_unavailable(message),
        GalleryPersistenceError::Query { message } => Error::internal(message),
    }
}

fn missing_record(id: GalleryItemId) -> Error {
    Error::not_found(format!("No record found with id: {id}"))
}

#[async_trait]
impl GalleryService for GalleryServiceImpl {
    async fn upload_image(
        &self,
        caller: &Email,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<bool, Error> {
        let owner = self.resolve_caller(caller).await?;
        let item = GalleryItem::new(
            GalleryItemId::random(),
            owner.id(),
            filename.to_owned(),
            bytes,
        );

        // A failed write is reported to the caller as an unsuccessful upload,
        // not an error response.
        match self.gallery.insert(&item).await {
            Ok(()) => Ok(true),
            Err(error) => {
                warn!(error = %error, owner = %owner.id(), "gallery write failed during upload");
                Ok(false)
            }
        }
    }

    async fn list_images(&self, caller: &Email) -> Result<Vec<UserImageListing>, Error> {
        let owner = self.resolve_caller(caller).await?;
        let summaries = self
            .gallery
            .list_for_owner(owner.id())
            .await
            .map_err(map_gallery_persistence_error)?;

        if summaries.is_empty() {
            return Ok(Vec::new());
        }

        let image_data = summaries
            .into_iter()
            .map(|summary| ImageEntry {
                gallery_id: summary.id,
                file_name: summary.filename,
            })
            .collect();

        Ok(vec![UserImageListing {
            user_id: owner.id(),
            email: owner.email().clone(),
            image_data,
        }])
    }

    async fn get_image(&self, id: GalleryItemId) -> Result<Vec<u8>, Error> {
        self.gallery
            .find_by_id(id)
            .await
            .map_err(map_gallery_persistence_error)?
            .map(GalleryItem::into_bytes)
            .ok_or_else(|| missing_record(id))
    }

    async fn delete_image(&self, id: GalleryItemId) -> Result<(), Error> {
        match self.gallery.delete(id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(missing_record(id)),
            Err(error) => {
                debug!(error = %error, "gallery delete failed");
                Err(missing_record(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for gallery orchestration and the upload
    //! partial-failure policy.
    use super::*;
    use crate::domain::ports::{InMemoryGalleryRepository, InMemoryUserRepository};
    use crate::domain::{ErrorCode, GalleryItemSummary, UserId};
    use rstest::rstest;

    struct FailingGalleryRepository;

    #[async_trait]
    impl GalleryRepository for FailingGalleryRepository {
        async fn insert(&self, _item: &GalleryItem) -> Result<(), GalleryPersistenceError> {
            Err(GalleryPersistenceError::query("disk full"))
        }

        async fn list_for_owner(
            &self,
            _owner: UserId,
        ) -> Result<Vec<GalleryItemSummary>, GalleryPersistenceError> {
            Err(GalleryPersistenceError::connection("database unavailable"))
        }

        async fn find_by_id(
            &self,
            _id: GalleryItemId,
        ) -> Result<Option<GalleryItem>, GalleryPersistenceError> {
            Err(GalleryPersistenceError::query("database query failed"))
        }

        async fn delete(&self, _id: GalleryItemId) -> Result<bool, GalleryPersistenceError> {
            Err(GalleryPersistenceError::query("database query failed"))
        }
    }

    async fn seeded_users(email: &str) -> Arc<InMemoryUserRepository> {
        let users = Arc::new(InMemoryUserRepository::default());
        let user = User::new(
            UserId::random(),
            Email::new(email).expect("valid email"),
            "$argon2id$stub".into(),
        );
        users.insert(&user).await.expect("seed user");
        users
    }

    fn email(raw: &str) -> Email {
        Email::new(raw).expect("valid email")
    }

    #[rstest]
    #[tokio::test]
    async fn upload_then_fetch_returns_byte_identical_content() {
        let users = seeded_users("ada@example.com").await;
        let gallery = Arc::new(InMemoryGalleryRepository::default());
        let service = GalleryServiceImpl::new(users, gallery.clone());
        let bytes = vec![0x89, 0x50, 0x4e, 0x47, 0x00, 0xff, 0x7f];

        let uploaded = service
            .upload_image(&email("ada@example.com"), "cat.png", bytes.clone())
            .await
            .expect("upload succeeds");
        assert!(uploaded);

        let listing = service
            .list_images(&email("ada@example.com"))
            .await
            .expect("list succeeds");
        let id = listing[0].image_data[0].gallery_id;

        let fetched = service.get_image(id).await.expect("fetch succeeds");
        assert_eq!(fetched, bytes);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_caller_fails_with_not_found_before_any_write() {
        let users = Arc::new(InMemoryUserRepository::default());
        let gallery = Arc::new(InMemoryGalleryRepository::default());
        let service = GalleryServiceImpl::new(users, gallery.clone());

        let err = service
            .upload_image(&email("ghost@example.com"), "cat.png", vec![1, 2, 3])
            .await
            .expect_err("unknown caller must fail");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(
            gallery
                .list_for_owner(UserId::random())
                .await
                .expect("list succeeds")
                .is_empty()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn store_write_failure_reads_as_unsuccessful_upload() {
        let users = seeded_users("ada@example.com").await;
        let service = GalleryServiceImpl::new(users, Arc::new(FailingGalleryRepository));

        let uploaded = service
            .upload_image(&email("ada@example.com"), "cat.png", vec![1, 2, 3])
            .await
            .expect("write failure is not an error");
        assert!(!uploaded);
    }

    #[rstest]
    #[tokio::test]
    async fn listing_groups_by_owner_with_one_entry_per_item() {
        let users = seeded_users("ada@example.com").await;
        let gallery = Arc::new(InMemoryGalleryRepository::default());
        let service = GalleryServiceImpl::new(users.clone(), gallery);
        let caller = email("ada@example.com");

        for filename in ["a.png", "b.png"] {
            assert!(
                service
                    .upload_image(&caller, filename, vec![0x01])
                    .await
                    .expect("upload succeeds")
            );
        }

        let listing = service.list_images(&caller).await.expect("list succeeds");
        assert_eq!(listing.len(), 1);
        let owner = users
            .find_by_email(&caller)
            .await
            .expect("lookup succeeds")
            .expect("seeded");
        assert_eq!(listing[0].user_id, owner.id());
        assert_eq!(listing[0].email, caller);
        let names: Vec<&str> = listing[0]
            .image_data
            .iter()
            .map(|entry| entry.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_gallery_lists_as_empty() {
        let users = seeded_users("ada@example.com").await;
        let service =
            GalleryServiceImpl::new(users, Arc::new(InMemoryGalleryRepository::default()));

        let listing = service
            .list_images(&email("ada@example.com"))
            .await
            .expect("list succeeds");
        assert!(listing.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn delete_then_fetch_fails_with_not_found() {
        let users = seeded_users("ada@example.com").await;
        let gallery = Arc::new(InMemoryGalleryRepository::default());
        let service = GalleryServiceImpl::new(users, gallery);
        let caller = email("ada@example.com");
        service
            .upload_image(&caller, "cat.png", vec![1, 2, 3])
            .await
            .expect("upload succeeds");
        let id = service.list_images(&caller).await.expect("list")[0].image_data[0].gallery_id;

        service.delete_image(id).await.expect("delete succeeds");

        let err = service
            .get_image(id)
            .await
            .expect_err("deleted item must be gone");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_an_unknown_id_fails_with_not_found() {
        let users = seeded_users("ada@example.com").await;
        let service =
            GalleryServiceImpl::new(users, Arc::new(InMemoryGalleryRepository::default()));

        let err = service
            .delete_image(GalleryItemId::random())
            .await
            .expect_err("unknown id must fail");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn store_failure_during_delete_also_reads_as_not_found() {
        let users = seeded_users("ada@example.com").await;
        let service = GalleryServiceImpl::new(users, Arc::new(FailingGalleryRepository));

        let err = service
            .delete_image(GalleryItemId::random())
            .await
            .expect_err("failure must read as missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
