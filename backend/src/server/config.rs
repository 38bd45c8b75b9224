//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::domain::TokenIssuer;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_issuer: Arc<TokenIssuer>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration with the signing secret already loaded
    /// into the issuer.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_issuer: Arc<TokenIssuer>) -> Self {
        Self {
            bind_addr,
            token_issuer,
            db_pool: None,
        }
    }

    /// Attach a database pool; without one the server runs on the
    /// in-memory adapters.
    #[must_use]
    pub fn with_db_pool(mut self, pool: Option<DbPool>) -> Self {
        self.db_pool = pool;
        self
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
