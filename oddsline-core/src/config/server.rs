//! Server configuration.

use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address and port to listen on.
    pub listen: SocketAddr,
    /// Capacity of the odds change broadcast channel. Sockets that fall
    /// further behind receive one coalesced update.
    pub odds_buffer: usize,
}
