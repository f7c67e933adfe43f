//! Network front ends.
//!
//! Exactly one transport runs per process: the TCP [`Server`] or the UDP
//! [`DatagramServer`].

pub mod datagram;
pub mod listener;

pub use datagram::DatagramServer;
pub use listener::Server;

use crate::config::{Config, Transport};

/// Binds the configured transport and serves until the future is dropped.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    match cfg.server.transport {
        Transport::Tcp => Server::bind(cfg).await?.run().await,
        Transport::Udp => DatagramServer::bind(cfg).await?.run().await,
    }
}
