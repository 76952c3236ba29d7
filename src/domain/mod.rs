//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: define strongly typed domain entities used by the HTTP and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode` — transport-agnostic error payload.
//! - `Email`, `Password`, `Credentials` — validated authentication inputs.
//! - `User`, `UserId` — account identity.
//! - `GalleryItem`, `GalleryItemId`, `UserImageListing` — image gallery.
//! - `TokenCodec`, `SignedToken` — bearer token issue/verify.
//! - `ports` — use-case and persistence traits with in-memory fallbacks.

mod account_service;
mod credentials;
pub mod error;
mod gallery;
mod gallery_service;
pub mod ports;
pub mod token;
mod user;

pub use self::account_service::AccountServiceImpl;
pub use self::credentials::{
    Credentials, CredentialValidationError, Email, PASSWORD_MAX, PASSWORD_MIN, Password,
    PasswordHashError, hash_password, verify_password,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::gallery::{
    GalleryItem, GalleryItemId, GalleryItemSummary, ImageEntry, UserImageListing,
};
pub use self::gallery_service::GalleryServiceImpl;
pub use self::token::{SignedToken, TokenCodec, TokenConfig, TokenError};
pub use self::user::{User, UserId};
