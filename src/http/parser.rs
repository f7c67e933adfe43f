use crate::http::request::{Method, Request, content_length};
use std::collections::HashMap;

/// Largest header block accepted before the terminator must have arrived.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 64 * 1024;

const HEADERS_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// More bytes are needed before a request can be produced.
    #[error("request is incomplete")]
    Incomplete,
    /// The request line does not match `VERB SP PATH SP HTTP/<digit>[.<digit>]`.
    #[error("malformed request line")]
    Malformed,
    #[error("unsupported method {0:?}")]
    UnsupportedMethod(String),
    #[error("header block is not valid UTF-8")]
    InvalidEncoding,
    #[error("header block exceeds {0} bytes")]
    HeadersTooLarge(usize),
}

/// Parses one request out of `buf` with the default header size limit.
///
/// On success returns the request and the number of bytes it occupied.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    parse_http_request_with_limit(buf, DEFAULT_MAX_HEADER_BYTES)
}

pub fn parse_http_request_with_limit(
    buf: &[u8],
    max_header_bytes: usize,
) -> Result<(Request, usize), ParseError> {
    RequestDecoder::new(max_header_bytes).decode(buf)
}

/// Incremental decoder for a buffer that grows between calls.
///
/// Remembers how far the header terminator search got, so feeding a request a
/// few bytes at a time costs linear work overall. Only valid for one growing
/// buffer; start a new decoder for a new request.
#[derive(Debug, Clone)]
pub struct RequestDecoder {
    max_header_bytes: usize,
    scanned: usize,
    headers_end: Option<usize>,
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEADER_BYTES)
    }
}

impl RequestDecoder {
    pub fn new(max_header_bytes: usize) -> Self {
        Self {
            max_header_bytes,
            scanned: 0,
            headers_end: None,
        }
    }

    /// Bytes already searched for the header terminator.
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    pub fn decode(&mut self, buf: &[u8]) -> Result<(Request, usize), ParseError> {
        let headers_end = match self.headers_end {
            Some(end) => end,
            None => self.scan(buf)?,
        };
        parse_with_headers_end(buf, headers_end)
    }

    fn scan(&mut self, buf: &[u8]) -> Result<usize, ParseError> {
        // A terminator may straddle the previous scan boundary.
        let from = self.scanned.saturating_sub(HEADERS_TERMINATOR.len() - 1);
        let found = find_headers_end_from(buf, from);
        self.scanned = buf.len();

        match found {
            Some(end) if end > self.max_header_bytes => {
                Err(ParseError::HeadersTooLarge(self.max_header_bytes))
            }
            Some(end) => {
                self.headers_end = Some(end);
                Ok(end)
            }
            None if buf.len() > self.max_header_bytes => {
                Err(ParseError::HeadersTooLarge(self.max_header_bytes))
            }
            None => Err(ParseError::Incomplete),
        }
    }
}

fn parse_with_headers_end(buf: &[u8], headers_end: usize) -> Result<(Request, usize), ParseError> {
    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + HEADERS_TERMINATOR.len()..];

    let headers_str = std::str::from_utf8(header_bytes).map_err(|_| ParseError::InvalidEncoding)?;

    let mut lines = headers_str.split("\r\n");

    let request_line = lines.next().ok_or(ParseError::Malformed)?;
    let (method_str, path, version) = parse_request_line(request_line)?;

    let method = Method::from_str(method_str)
        .ok_or_else(|| ParseError::UnsupportedMethod(method_str.to_string()))?;

    // Duplicate names: the later line overwrites the earlier one.
    let mut headers = HashMap::new();
    for line in lines {
        if let Some((key, value)) = line.split_once(": ") {
            headers.insert(key.to_string(), value.to_string());
        }
    }

    let content_length = content_length(&headers);
    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: body_bytes[..content_length].to_vec(),
    };

    let total_consumed = headers_end + HEADERS_TERMINATOR.len() + content_length;
    Ok((request, total_consumed))
}

/// Splits `VERB SP PATH SP HTTP/<digit>[.<digit>]` into its three parts.
fn parse_request_line(line: &str) -> Result<(&str, &str, &str), ParseError> {
    let (method, rest) = line.split_once(' ').ok_or(ParseError::Malformed)?;
    let (path, version) = rest.rsplit_once(' ').ok_or(ParseError::Malformed)?;

    if method.is_empty() || path.is_empty() || !is_valid_version(version) {
        return Err(ParseError::Malformed);
    }

    Ok((method, path, version))
}

fn is_valid_version(version: &str) -> bool {
    let Some(number) = version.strip_prefix("HTTP/") else {
        return false;
    };

    match number.as_bytes() {
        [major] => major.is_ascii_digit(),
        [major, b'.', minor] => major.is_ascii_digit() && minor.is_ascii_digit(),
        _ => false,
    }
}

fn find_headers_end_from(buf: &[u8], from: usize) -> Option<usize> {
    buf.get(from..)?
        .windows(HEADERS_TERMINATOR.len())
        .position(|w| w == HEADERS_TERMINATOR)
        .map(|pos| from + pos)
}
