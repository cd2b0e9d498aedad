//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use userdesk::middleware::CorsPolicy;
use userdesk::settings::Settings;

/// Listener and middleware settings for the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors: CorsPolicy,
    pub(crate) containerised: bool,
}

impl ServerConfig {
    /// Derive the server configuration from service settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            bind_addr: settings.bind_addr(),
            cors: settings.allowed_origins.clone(),
            containerised: settings.containerised,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
