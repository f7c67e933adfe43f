//! httpfs - HTTP File System Server
//!
//! Core library exposing a directory tree over a minimal HTTP/1.1 surface:
//! `GET` reads a file or lists a directory, `POST` creates or overwrites a file.

pub mod config;
pub mod fs;
pub mod http;
pub mod server;
