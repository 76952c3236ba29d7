//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, GalleryService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub account: Arc<dyn AccountService>,
    pub gallery: Arc<dyn GalleryService>,
}

impl HttpState {
    /// Construct state from port implementations.
    pub fn new(account: Arc<dyn AccountService>, gallery: Arc<dyn GalleryService>) -> Self {
        Self { account, gallery }
    }
}
