use std::io;

use chrono::Utc;
use tokio::net::TcpStream;

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// RFC 7231 IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub fn http_date() -> String {
    Utc::now().format(HTTP_DATE_FORMAT).to_string()
}

/// Encodes a response into raw bytes: status line, the four headers, a blank
/// line, then the body verbatim.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let head = format!(
        "{version} {code} {reason}\r\n\
         Content-Type: {content_type}\r\n\
         Content-Disposition: {disposition}\r\n\
         Content-Length: {length}\r\n\
         Date: {date}\r\n\
         \r\n",
        version = HTTP_VERSION,
        code = resp.status.as_u16(),
        reason = resp.status.reason_phrase(),
        content_type = resp.content_type,
        disposition = resp.content_disposition,
        length = resp.body.len(),
        date = http_date(),
    );

    let mut buf = Vec::with_capacity(head.len() + resp.body.len());
    buf.extend_from_slice(head.as_bytes());
    buf.extend_from_slice(&resp.body);
    buf
}

/// Outbound buffer of one connection.
///
/// Holds the encoded response and how much of it the socket has accepted so
/// far, so a partial write resumes on the next writable notification.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub fn remaining(&self) -> &[u8] {
        &self.buffer[self.written..]
    }

    pub fn is_flushed(&self) -> bool {
        self.written >= self.buffer.len()
    }

    /// Writes as much as the socket accepts right now without blocking.
    ///
    /// Returns `Ok(true)` once everything has been written. A `WouldBlock`
    /// from the socket is reported as `Ok(false)`.
    pub fn try_flush(&mut self, stream: &TcpStream) -> io::Result<bool> {
        while !self.is_flushed() {
            match stream.try_write(self.remaining()) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "connection closed while writing",
                    ));
                }
                Ok(n) => self.written += n,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(false),
                Err(e) => return Err(e),
            }
        }

        Ok(true)
    }
}
