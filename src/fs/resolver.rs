//! Request path resolution.
//!
//! Joins a client supplied URL path onto the root directory and rejects any
//! result that lands outside of it. Pure path arithmetic: the file system is
//! never touched, so resolution cannot block or fail with an I/O error.

use std::path::{Component, Path, PathBuf};

use tracing::warn;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("the requested path is not accessible")]
    Forbidden,
}

/// Resolves `request_path` against `root`.
///
/// The query string and fragment are dropped and the remainder is
/// percent-decoded before joining. Joining is concatenation, so a leading
/// `/` never replaces the root. `.` and `..` are collapsed lexically and the
/// result must still be `root` or one of its descendants.
///
/// `root` is expected to be absolute and normalized.
pub fn resolve(root: &Path, request_path: &str) -> Result<PathBuf, ResolveError> {
    let raw = strip_query(request_path);

    let decoded = urlencoding::decode(raw).map_err(|_| {
        warn!(path = %request_path, "Request path is not valid percent-encoded UTF-8");
        ResolveError::Forbidden
    })?;

    if decoded.contains('\0') {
        warn!(path = %request_path, "Request path contains a null byte");
        return Err(ResolveError::Forbidden);
    }

    let joined = normalize(root, Path::new(decoded.trim_start_matches('/')));

    if !joined.starts_with(root) {
        warn!(path = %request_path, resolved = %joined.display(), "Path traversal attempt rejected");
        return Err(ResolveError::Forbidden);
    }

    Ok(joined)
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

/// Appends `relative` to `base` collapsing `.` and `..` without consulting the file system.
fn normalize(base: &Path, relative: &Path) -> PathBuf {
    let mut result = base.to_path_buf();

    for component in relative.components() {
        match component {
            Component::Normal(name) => result.push(name),
            Component::ParentDir => {
                result.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }

    result
}
