//! Error taxonomy for the NodeImage client.

use reqwest::StatusCode;

/// Longest body excerpt carried inside an error message.
const BODY_SNIPPET_LEN: usize = 500;

/// Failures surfaced by the client. Carried inside `anyhow::Error` so call
/// sites can downcast when they need to distinguish variants.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed reference, empty identifier, or missing credential.
    InvalidInput(String),
    /// Local file missing or unreadable.
    NotFound(String),
    /// Non-200 while downloading a remote image.
    RemoteFetch {
        url: String,
        status: u16,
        body: String,
    },
    /// The service rejected the credential (HTTP 401/403).
    Auth { status: u16, body: String },
    /// Any other non-2xx from the service.
    Service { status: u16, body: String },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            ApiError::NotFound(msg) => {
                write!(f, "Not found: {}", msg)
            }
            ApiError::RemoteFetch { url, status, body } => {
                write!(
                    f,
                    "Failed to download image from {}: status {}, body: {}",
                    url, status, body
                )
            }
            ApiError::Auth { status, body } => {
                write!(
                    f,
                    "Authentication failed (status {}): {}. Check your API key or the NODE_IMAGE_API_KEY environment variable.",
                    status, body
                )
            }
            ApiError::Service { status, body } => {
                write!(f, "Service error (status {}): {}", status, body)
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Maps a non-2xx service response onto the error taxonomy:
/// 401/403 become [`ApiError::Auth`], everything else [`ApiError::Service`].
pub fn classify_status(status: StatusCode, body: &str) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth {
            status: status.as_u16(),
            body: snippet(body),
        },
        _ => ApiError::Service {
            status: status.as_u16(),
            body: snippet(body),
        },
    }
}

/// Bounded excerpt of a response body, so huge error pages don't flood logs.
pub fn snippet(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LEN {
        return body.to_string();
    }
    let mut end = BODY_SNIPPET_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
