//! Driving port for gallery use-cases.

use async_trait::async_trait;

use crate::domain::{Email, Error, GalleryItemId, UserImageListing};

/// Domain use-case port for the image gallery.
#[async_trait]
pub trait GalleryService: Send + Sync {
    /// Store a new image for the caller.
    ///
    /// Fails with `NotFound` when the caller does not resolve to a user.
    /// A store-write failure is reported as `Ok(false)`, not an error.
    async fn upload_image(
        &self,
        caller: &Email,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<bool, Error>;

    /// List the caller's images grouped by owning user, payload-free.
    ///
    /// Fails with `NotFound` when the caller does not resolve to a user.
    async fn list_images(&self, caller: &Email) -> Result<Vec<UserImageListing>, Error>;

    /// Fetch an image payload by item identifier.
    async fn get_image(&self, id: GalleryItemId) -> Result<Vec<u8>, Error>;

    /// Delete an item by identifier; any failure reads as `NotFound`.
    async fn delete_image(&self, id: GalleryItemId) -> Result<(), Error>;
}
