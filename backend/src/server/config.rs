//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use shipments::domain::{AccessPolicy, RoleAccessPolicy};
use shipments::inbound::http::identity::TokenVerifier;
use shipments::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_verifier: TokenVerifier,
    pub(crate) access_policy: Arc<dyn AccessPolicy>,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) cors_allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Construct a configuration with the default `admin` policy, no
    /// database pool and no cross-origin callers.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_verifier: TokenVerifier) -> Self {
        Self {
            bind_addr,
            token_verifier,
            access_policy: Arc::new(RoleAccessPolicy::default()),
            db_pool: None,
            cors_allowed_origins: Vec::new(),
        }
    }

    /// Attach a database connection pool.
    ///
    /// Without one the server runs against the fixture repository.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Replace the policy deciding who may change shipment status.
    #[must_use]
    pub fn with_access_policy(mut self, policy: Arc<dyn AccessPolicy>) -> Self {
        self.access_policy = policy;
        self
    }

    /// Origins allowed to call the API from a browser.
    #[must_use]
    pub fn with_cors_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cors_allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }
}
