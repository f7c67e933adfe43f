//! File system side of the server.
//!
//! `resolver` keeps every request inside the root directory and `handler`
//! performs the verb specific operation on the resolved path.

pub mod handler;
pub mod resolver;

pub use handler::{DirEntry, FileSystemHandler};
pub use resolver::{ResolveError, resolve};
