//! Gallery item entity and the listing projections returned to clients.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::credentials::Email;
use super::user::UserId;

/// Stable gallery item identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GalleryItemId(Uuid);

impl GalleryItemId {
    /// Generate a new random [`GalleryItemId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one taken from a request path.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for GalleryItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stored image blob owned by exactly one user.
///
/// ## Invariants
/// - `owner_id` references an existing user at creation time; ownership is a
///   foreign key by value, never a back-reference into the owning entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    id: GalleryItemId,
    owner_id: UserId,
    filename: String,
    bytes: Vec<u8>,
}

impl GalleryItem {
    /// Build a new [`GalleryItem`] from validated components.
    pub fn new(id: GalleryItemId, owner_id: UserId, filename: String, bytes: Vec<u8>) -> Self {
        Self {
            id,
            owner_id,
            filename,
            bytes,
        }
    }

    /// Stable item identifier.
    pub fn id(&self) -> GalleryItemId {
        self.id
    }

    /// Owning user.
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Original upload filename.
    pub fn filename(&self) -> &str {
        self.filename.as_str()
    }

    /// Raw image payload.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Consume the item, keeping only the payload.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Listing projection for one item: identifier and filename, no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItemSummary {
    pub id: GalleryItemId,
    pub filename: String,
}

/// One listing entry as serialised to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub gallery_id: GalleryItemId,
    #[schema(example = "cat.png")]
    pub file_name: String,
}

/// Gallery listing grouped per owning user: identity data plus one
/// [`ImageEntry`] per stored item. Payload bytes are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserImageListing {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: UserId,
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: Email,
    pub image_data: Vec<ImageEntry>,
}
