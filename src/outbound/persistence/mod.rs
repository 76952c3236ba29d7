//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via Diesel with async support through `diesel-async` and
//! `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed
//!   to the domain layer.
//! - **Strongly typed errors**: all database errors are mapped to the
//!   ports' persistence error types.

mod diesel_gallery_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_gallery_repository::DieselGalleryRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
