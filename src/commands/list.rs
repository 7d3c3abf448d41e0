use anyhow::{Context, Result};
use log::debug;

use crate::api::ImageService;

/// Lists all images in the account and prints the service's JSON response
/// to stdout, structurally unmodified.
#[tracing::instrument(skip(service))]
pub fn list<S: ImageService>(service: &S) -> Result<()> {
    let response = service.list_images()?;
    debug!("List response received");

    let rendered =
        serde_json::to_string(&response).context("Failed to serialize list response")?;
    println!("{}", rendered);
    Ok(())
}
