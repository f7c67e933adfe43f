use serde_json::{Value, json};

/// Content type of every structured (JSON) body the server produces.
pub const JSON_CONTENT_TYPE: &str = "application/json;charset=utf-8";

/// Content disposition for bodies the client may render directly.
pub const INLINE: &str = "inline";

/// HTTP status codes supported by the server.
///
/// - `Ok` (200): Request successful, or an existing file was overwritten
/// - `Created` (201): A new file was written
/// - `BadRequest` (400): Malformed request, unsupported verb, or POST on a directory
/// - `Forbidden` (403): The path escapes the root directory
/// - `NotFound` (404): The requested file does not exist
/// - `InternalServerError` (500): A file system operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 201 Created
    Created,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpfs::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpfs::http::response::StatusCode;
    /// assert_eq!(StatusCode::Created.reason_phrase(), "Created");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Created => "Created",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// The outcome of handling one request, ready to be serialized.
///
/// Every field is set by the producer; the writer adds `Content-Length`
/// and `Date` when encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Value of the `Content-Type` header
    pub content_type: String,
    /// Value of the `Content-Disposition` header
    pub content_disposition: String,
    /// Response body as raw bytes
    pub body: Vec<u8>,
}

impl Response {
    /// A JSON body rendered inline.
    pub fn json(status: StatusCode, value: &Value) -> Self {
        Self {
            status,
            content_type: JSON_CONTENT_TYPE.to_string(),
            content_disposition: INLINE.to_string(),
            body: value.to_string().into_bytes(),
        }
    }

    /// `{"error": message}` with the given status.
    pub fn error(status: StatusCode, message: &str) -> Self {
        Self::json(status, &json!({ "error": message }))
    }

    /// 500 carrying a generic message plus the underlying error text.
    pub fn internal_error(message: &str, err: &std::io::Error) -> Self {
        Self::json(
            StatusCode::InternalServerError,
            &json!({ "error": message, "details": err.to_string() }),
        )
    }

    /// 400 naming the verbs the server understands.
    pub fn unsupported_method() -> Self {
        Self::error(
            StatusCode::BadRequest,
            &format!(
                "Unknown HTTP verb received. The supported verbs are {}.",
                crate::http::request::Method::supported_list()
            ),
        )
    }

    /// `{"success": message}` with the given status.
    pub fn success(status: StatusCode, message: &str) -> Self {
        Self::json(status, &json!({ "success": message }))
    }

    /// Raw file contents.
    pub fn file(
        body: Vec<u8>,
        content_type: impl Into<String>,
        content_disposition: impl Into<String>,
    ) -> Self {
        Self {
            status: StatusCode::Ok,
            content_type: content_type.into(),
            content_disposition: content_disposition.into(),
            body,
        }
    }
}
