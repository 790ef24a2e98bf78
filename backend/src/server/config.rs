//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use hospadmin::inbound::http::session_config::SessionSettings;

use super::state_builders::{IdentityWiring, Storage};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
    pub(crate) identity: Option<IdentityWiring>,
}

impl ServerConfig {
    /// Serve `storage` on `bind_addr` without an identity provider.
    ///
    /// Only in-memory storage starts in this shape.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, storage: Storage) -> Self {
        Self {
            session,
            bind_addr,
            storage,
            identity: None,
        }
    }

    /// Route sign-in and user changes through the identity provider.
    #[must_use]
    pub fn with_identity(mut self, identity: Option<IdentityWiring>) -> Self {
        self.identity = identity;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
