//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset built directly on raw byte streams:
//! one request per connection, `Content-Length` framed bodies only.
//!
//! # Architecture
//!
//! - **`request`**: `Method` and the immutable `Request` record
//! - **`response`**: `StatusCode` and the `Response` record every handler produces
//! - **`parser`**: decodes a request out of a byte buffer, tolerating partial input
//! - **`writer`**: encodes a `Response` and drains it into a non-blocking socket
//! - **`connection`**: per-socket state driven by readiness notifications
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Buffer bytes until a full request is decoded
//!        └──────┬──────┘
//!               │ Request decoded (or rejected)
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Drain the encoded response
//!        └──────┬───────────┘
//!               │ Response flushed
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```

pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
