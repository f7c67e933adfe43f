//! UDP delivery mode.
//!
//! One datagram carries one complete request and one datagram carries the
//! response back. There is no retransmission or ordering; a lost datagram is
//! simply lost.

use std::io;
use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::UdpSocket;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::fs::FileSystemHandler;
use crate::http::parser::{ParseError, parse_http_request_with_limit};
use crate::http::response::Response;
use crate::http::writer::serialize_response;

/// Largest UDP payload over IPv4.
const MAX_DATAGRAM: usize = 65_507;

pub struct DatagramServer {
    socket: UdpSocket,
    handler: FileSystemHandler,
    max_header_bytes: usize,
}

impl DatagramServer {
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let addr = (cfg.server.host.as_str(), cfg.server.port);
        let socket = UdpSocket::bind(addr)
            .await
            .with_context(|| format!("failed to bind udp {}:{}", cfg.server.host, cfg.server.port))?;

        Ok(Self::from_socket(
            socket,
            FileSystemHandler::new(&cfg.root_dir),
            cfg.server.max_header_bytes,
        ))
    }

    pub fn from_socket(socket: UdpSocket, handler: FileSystemHandler, max_header_bytes: usize) -> Self {
        Self {
            socket,
            handler,
            max_header_bytes,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            addr = %self.local_addr()?,
            root = %self.handler.root().display(),
            "HTTP file system server is listening (udp)"
        );

        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            let (n, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => received,
                Err(e) => {
                    warn!(error = %e, "Failed to receive datagram");
                    continue;
                }
            };
            debug!(%peer, bytes = n, "Datagram received");

            let response = self.respond(&buf[..n]).await;
            let encoded = serialize_response(&response);

            match self.socket.send_to(&encoded, peer).await {
                Ok(_) => debug!(%peer, status = response.status.as_u16(), "Response sent to client"),
                Err(e) => error!(%peer, bytes = encoded.len(), error = %e, "Failed to send response datagram"),
            }
        }
    }

    /// A datagram must hold the whole request, so a short one is malformed.
    async fn respond(&self, datagram: &[u8]) -> Response {
        match parse_http_request_with_limit(datagram, self.max_header_bytes) {
            Ok((request, _)) => self.handler.handle(&request).await,
            Err(ParseError::Incomplete) => self.handler.reject(&ParseError::Malformed),
            Err(e) => {
                warn!(error = %e, "Rejecting malformed datagram");
                self.handler.reject(&e)
            }
        }
    }
}
