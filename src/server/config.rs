//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::domain::TokenConfig;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token: TokenConfig,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration from the bind address and token
    /// settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token: TokenConfig) -> Self {
        Self {
            bind_addr,
            token,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses Diesel-backed stores; otherwise it
    /// falls back to the in-memory adapters (dev and test only).
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
