//! Domain ports: use-case traits called by inbound adapters and persistence
//! traits implemented by outbound adapters, plus the in-memory fallbacks.

mod account_service;
mod gallery_repository;
mod gallery_service;
mod user_repository;

pub use account_service::AccountService;
pub use gallery_repository::{
    GalleryPersistenceError, GalleryRepository, InMemoryGalleryRepository,
};
pub use gallery_service::GalleryService;
pub use user_repository::{InMemoryUserRepository, UserPersistenceError, UserRepository};
