use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use bytes::BytesMut;
use tokio::io::{AsyncWriteExt, Interest};
use tokio::net::TcpStream;
use tracing::{debug, trace, warn};

use crate::fs::FileSystemHandler;
use crate::http::parser::{ParseError, RequestDecoder};
use crate::http::writer::ResponseWriter;

const READ_CHUNK: usize = 4096;

/// Everything the server keeps for one accepted socket.
///
/// Created on accept and dropped on close; never shared between connections.
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    inbound: BytesMut,
    outbound: ResponseWriter,
    state: ConnectionState,
    handler: Arc<FileSystemHandler>,
    decoder: RequestDecoder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Reading,
    Writing,
    Closed,
}

impl Connection {
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        handler: Arc<FileSystemHandler>,
        max_header_bytes: usize,
    ) -> Self {
        Self {
            stream,
            peer,
            inbound: BytesMut::with_capacity(READ_CHUNK),
            outbound: ResponseWriter::default(),
            state: ConnectionState::Reading,
            handler,
            decoder: RequestDecoder::new(max_header_bytes),
        }
    }

    /// Drives the connection through read, handle, write and close.
    ///
    /// Suspends only while waiting for socket readiness; all socket I/O is
    /// non-blocking and partial progress is kept in the inbound and outbound
    /// buffers between notifications.
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            let interest = match self.state {
                ConnectionState::Reading => Interest::READABLE,
                ConnectionState::Writing => Interest::WRITABLE,
                ConnectionState::Closed => break,
            };

            let ready = self
                .stream
                .ready(interest)
                .await
                .context("waiting for socket readiness")?;

            if ready.is_readable() && self.state == ConnectionState::Reading {
                self.on_readable().await.context("reading request")?;
            }

            if ready.is_writable() && self.state == ConnectionState::Writing {
                self.on_writable().context("writing response")?;
            }
        }

        self.close().await;
        Ok(())
    }

    async fn on_readable(&mut self) -> io::Result<()> {
        self.inbound.reserve(READ_CHUNK);

        match self.stream.try_read_buf(&mut self.inbound) {
            Ok(0) => {
                debug!(peer = %self.peer, buffered = self.inbound.len(), "Peer closed before completing a request");
                self.state = ConnectionState::Closed;
                return Ok(());
            }
            Ok(n) => trace!(peer = %self.peer, bytes = n, "Read from socket"),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
            Err(e) => return Err(e),
        }

        let response = match self.decoder.decode(&self.inbound) {
            Ok((request, _)) => {
                debug!(
                    peer = %self.peer,
                    method = %request.method,
                    path = %request.path,
                    body_len = request.body.len(),
                    "Request received"
                );
                self.handler.handle(&request).await
            }
            Err(ParseError::Incomplete) => return Ok(()),
            Err(e) => {
                warn!(peer = %self.peer, error = %e, "Rejecting malformed request");
                self.handler.reject(&e)
            }
        };

        debug!(peer = %self.peer, status = response.status.as_u16(), "Response ready");

        self.inbound.clear();
        self.outbound = ResponseWriter::new(&response);
        self.state = ConnectionState::Writing;
        Ok(())
    }

    fn on_writable(&mut self) -> io::Result<()> {
        if self.outbound.try_flush(&self.stream)? {
            debug!(peer = %self.peer, "Response sent to client");
            self.state = ConnectionState::Closed;
        }
        Ok(())
    }

    async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            trace!(peer = %self.peer, error = %e, "Shutdown after response failed");
        }
        debug!(peer = %self.peer, "Closed connection");
    }
}
