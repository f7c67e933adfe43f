//! Maps HTTP verbs onto file system operations.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error};

use crate::fs::resolver::{self, ResolveError};
use crate::http::parser::ParseError;
use crate::http::request::{Method, Request};
use crate::http::response::{INLINE, Response, StatusCode};

/// Content types that are safe for a client to render directly.
pub const INLINE_MIME_TYPES: [&str; 8] = [
    "text/css",
    "text/html",
    "application/json",
    "text/javascript",
    "text/plain",
    "application/xhtml+xml",
    "application/xml",
    "text/xml",
];

/// One child in a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub is_directory: bool,
}

/// Serves requests against a single root directory.
///
/// Holds no state besides the root; every call is independent.
#[derive(Debug, Clone)]
pub struct FileSystemHandler {
    root: PathBuf,
}

impl FileSystemHandler {
    /// `root` should already be absolute and normalized.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Produces the response for a decoded request.
    ///
    /// Never fails: every error is turned into a response.
    pub async fn handle(&self, request: &Request) -> Response {
        let path = match resolver::resolve(&self.root, &request.path) {
            Ok(path) => path,
            Err(ResolveError::Forbidden) => {
                return Response::error(
                    StatusCode::Forbidden,
                    "The requested path is not accessible.",
                );
            }
        };

        debug!(method = %request.method, path = %path.display(), "Dispatching request");

        match request.method {
            Method::GET => self.get(&path).await,
            Method::POST => self.post(&path, &request.body).await,
        }
    }

    /// Response for a request that could not be decoded.
    pub fn reject(&self, err: &ParseError) -> Response {
        match err {
            ParseError::UnsupportedMethod(_) => Response::unsupported_method(),
            _ => Response::error(
                StatusCode::BadRequest,
                &format!(
                    "Malformed request ({err}). The supported verbs are {}.",
                    Method::supported_list()
                ),
            ),
        }
    }

    async fn get(&self, path: &Path) -> Response {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => list_directory(path).await,
            Ok(_) => read_file(path).await,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Response::error(StatusCode::NotFound, "The requested file was not found.")
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to stat path");
                Response::internal_error("An unknown error occurred while reading the file contents.", &e)
            }
        }
    }

    async fn post(&self, path: &Path, body: &[u8]) -> Response {
        if tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir()) {
            return Response::error(
                StatusCode::BadRequest,
                "The requested path represents a directory. The path must represent a file to work correctly.",
            );
        }

        match write_file(path, body).await {
            Ok(true) => Response::success(StatusCode::Created, "The file was created."),
            Ok(false) => Response::success(StatusCode::Ok, "The file was overwritten."),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to write file");
                Response::internal_error("An unknown error occurred while writing the file contents.", &e)
            }
        }
    }
}

async fn list_directory(path: &Path) -> Response {
    match read_entries(path).await {
        Ok(entries) => match serde_json::to_value(&entries) {
            Ok(value) => Response::json(StatusCode::Ok, &value),
            Err(e) => Response::internal_error(
                "An unknown error occurred while listing the directory contents.",
                &io::Error::other(e),
            ),
        },
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to list directory");
            Response::internal_error(
                "An unknown error occurred while listing the directory contents.",
                &e,
            )
        }
    }
}

/// Immediate children in native enumeration order. Symlinks report the kind of their target.
async fn read_entries(path: &Path) -> io::Result<Vec<DirEntry>> {
    let mut dir = tokio::fs::read_dir(path).await?;
    let mut entries = Vec::new();

    while let Some(entry) = dir.next_entry().await? {
        let is_directory = match tokio::fs::metadata(entry.path()).await {
            Ok(meta) => meta.is_dir(),
            Err(_) => entry.file_type().await?.is_dir(),
        };

        entries.push(DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_directory,
        });
    }

    Ok(entries)
}

async fn read_file(path: &Path) -> Response {
    match tokio::fs::read(path).await {
        Ok(contents) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            let disposition = content_disposition(mime.essence_str(), path);
            Response::file(contents, mime.essence_str(), disposition)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to read file");
            Response::internal_error("An unknown error occurred while reading the file contents.", &e)
        }
    }
}

/// Writes `body` to `path`, creating parent directories.
///
/// Returns whether the file was newly created.
async fn write_file(path: &Path, body: &[u8]) -> io::Result<bool> {
    let created = !tokio::fs::try_exists(path).await?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    tokio::fs::write(path, body).await?;
    Ok(created)
}

/// `inline` for renderable types, otherwise an attachment named after the file.
pub fn content_disposition(mime: &str, path: &Path) -> String {
    if INLINE_MIME_TYPES.contains(&mime) {
        return INLINE.to_string();
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("attachment; filename=\"{name}\"")
}
