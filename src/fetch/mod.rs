//! Image reference resolution: classify a user-supplied string as a local
//! path or a remote URL, and turn either into bytes ready for upload.

use anyhow::{Context, Result};
use log::{debug, error};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::api::error::{ApiError, snippet};
use crate::runtime::Runtime;

/// Fallbacks when the server omits or sends an unrecognized Content-Type.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Bound on how long a remote image download may block.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// An image resolved from a reference, ready to be uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Returns true iff the reference parses as a URL with scheme http or https.
/// Everything else (including `ftp://...` and plain paths) is a local path.
pub fn is_remote(reference: &str) -> bool {
    match Url::parse(reference) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Extension for a media type, `None` when the type is not a known image type.
/// The parameter part of the header value (`; charset=...`) is ignored.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "image/jpeg" | "image/jpg" => Some(".jpg"),
        "image/png" => Some(".png"),
        "image/gif" => Some(".gif"),
        "image/webp" => Some(".webp"),
        "image/bmp" => Some(".bmp"),
        "image/svg+xml" => Some(".svg"),
        "image/tiff" => Some(".tiff"),
        "image/avif" => Some(".avif"),
        "image/heic" => Some(".heic"),
        "image/x-icon" | "image/vnd.microsoft.icon" => Some(".ico"),
        _ => None,
    }
}

/// Media type for a local file, derived from its extension only.
/// Unknown extensions fall back to [`DEFAULT_CONTENT_TYPE`].
pub fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tiff" | "tif" => "image/tiff",
        "avif" => "image/avif",
        "heic" => "image/heic",
        "ico" => "image/x-icon",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Downloads an image over HTTP with a bounded timeout. One attempt; a failed
/// download is terminal for the call.
#[tracing::instrument(skip(client, timeout))]
pub fn fetch_remote(client: &Client, url: &str, timeout: Duration) -> Result<FetchedImage> {
    if !is_remote(url) {
        return Err(ApiError::InvalidInput(format!("not an http(s) URL: {}", url)).into());
    }

    debug!("Downloading image from {}...", url);

    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .with_context(|| format!("Failed to download image from {}", url))?;

    let status = response.status();
    let header_content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if status != StatusCode::OK {
        let body = response.text().unwrap_or_default();
        let err = ApiError::RemoteFetch {
            url: url.to_string(),
            status: status.as_u16(),
            body: snippet(&body),
        };
        error!("{}", err);
        return Err(err.into());
    }

    let bytes = response
        .bytes()
        .with_context(|| format!("Failed to read image bytes from {}", url))?
        .to_vec();

    // Absent or unrecognized Content-Type falls back to JPEG for both the
    // media type and the synthesized extension. The bytes are never sniffed.
    let (content_type, ext) = match header_content_type {
        Some(ct) => match extension_for(&ct) {
            Some(ext) => (ct, ext),
            None => (DEFAULT_CONTENT_TYPE.to_string(), DEFAULT_EXTENSION),
        },
        None => (DEFAULT_CONTENT_TYPE.to_string(), DEFAULT_EXTENSION),
    };

    debug!(
        "Downloaded {} bytes ({}) from {}",
        bytes.len(),
        content_type,
        url
    );

    Ok(FetchedImage {
        filename: format!("image{}", ext),
        bytes,
        content_type,
    })
}

/// Resolves a path-or-URL reference into an image ready for upload.
/// Local paths are read through the runtime; a missing or unreadable file
/// fails without issuing any HTTP request.
#[tracing::instrument(skip(runtime, client, timeout))]
pub fn resolve_reference<R: Runtime>(
    runtime: &R,
    client: &Client,
    reference: &str,
    timeout: Duration,
) -> Result<FetchedImage> {
    if is_remote(reference) {
        return fetch_remote(client, reference, timeout);
    }

    let path = Path::new(reference);
    if !runtime.exists(path) {
        return Err(ApiError::NotFound(format!("local file {:?} does not exist", path)).into());
    }

    let bytes = match runtime.read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            return Err(ApiError::NotFound(format!("cannot read {:?}: {}", path, e)).into());
        }
    };

    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("image.jpg")
        .to_string();
    let content_type = content_type_for_path(path).to_string();

    debug!("Read {} bytes ({}) from {:?}", bytes.len(), content_type, path);

    Ok(FetchedImage {
        filename,
        bytes,
        content_type,
    })
}
