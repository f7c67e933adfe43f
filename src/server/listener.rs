use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::fs::FileSystemHandler;
use crate::http::connection::Connection;

/// TCP front end: owns the listening socket and every accepted connection.
///
/// Run it on a current-thread runtime and all connections are serviced
/// cooperatively by one thread, each suspended only while its socket is not
/// ready.
pub struct Server {
    listener: TcpListener,
    handler: Arc<FileSystemHandler>,
    max_header_bytes: usize,
    connections: JoinSet<()>,
}

impl Server {
    /// Binds the listening socket. This is the only failure that should stop the process.
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        let addr = (cfg.server.host.as_str(), cfg.server.port);
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}:{}", cfg.server.host, cfg.server.port))?;

        Ok(Self::from_listener(
            listener,
            FileSystemHandler::new(&cfg.root_dir),
            cfg.server.max_header_bytes,
        ))
    }

    pub fn from_listener(
        listener: TcpListener,
        handler: FileSystemHandler,
        max_header_bytes: usize,
    ) -> Self {
        Self {
            listener,
            handler: Arc::new(handler),
            max_header_bytes,
            connections: JoinSet::new(),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts and services connections until the task is dropped.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!(
            addr = %self.local_addr()?,
            root = %self.handler.root().display(),
            "HTTP file system server is listening"
        );

        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((socket, peer)) => self.spawn_connection(socket, peer),
                    Err(e) => warn!(error = %e, "Failed to accept connection"),
                },
                Some(joined) = self.connections.join_next(), if !self.connections.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "Connection task aborted");
                    }
                }
            }
        }
    }

    fn spawn_connection(&mut self, socket: tokio::net::TcpStream, peer: SocketAddr) {
        debug!(%peer, open = self.connections.len() + 1, "Accepted connection");

        let conn = Connection::new(socket, peer, Arc::clone(&self.handler), self.max_header_bytes);
        self.connections.spawn(async move {
            if let Err(e) = conn.run().await {
                error!(%peer, "Connection error: {:#}", e);
            }
        });
    }
}
