use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::blocking::Client;

use crate::api::ImageService;
use crate::fetch::{self, DEFAULT_FETCH_TIMEOUT};
use crate::runtime::Runtime;

/// Uploads the image named by `reference`, which may be a local path or an
/// http(s) URL. The service's JSON response is printed to stdout
/// structurally unmodified.
#[tracing::instrument(skip(runtime, service, http))]
pub fn upload<R: Runtime, S: ImageService>(
    runtime: &R,
    service: &S,
    http: &Client,
    reference: &str,
) -> Result<()> {
    let image = fetch::resolve_reference(runtime, http, reference, DEFAULT_FETCH_TIMEOUT)?;
    debug!(
        "Uploading {} ({} bytes)...",
        image.filename,
        image.bytes.len()
    );

    let response = service.upload_image(&image)?;
    info!("Uploaded {}", image.filename);

    let rendered =
        serde_json::to_string(&response).context("Failed to serialize upload response")?;
    println!("{}", rendered);
    Ok(())
}
