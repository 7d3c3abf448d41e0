use anyhow::{Context, Result};
use log::debug;

use crate::api::{ApiError, ImageService};
use crate::runtime::Runtime;

/// Deletes the image with the given id, asking for confirmation first
/// unless `yes` is set. A declined confirmation is not an error.
#[tracing::instrument(skip(runtime, service))]
pub fn delete<R: Runtime, S: ImageService>(
    runtime: &R,
    service: &S,
    image_id: &str,
    yes: bool,
) -> Result<()> {
    if image_id.is_empty() {
        return Err(ApiError::InvalidInput("image id must not be empty".to_string()).into());
    }

    if !yes {
        let confirmed = runtime.confirm("Delete this image permanently?")?;
        if !confirmed {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let response = service.delete_image(image_id)?;
    debug!("Delete response received for {}", image_id);

    let rendered =
        serde_json::to_string(&response).context("Failed to serialize delete response")?;
    println!("{}", rendered);
    Ok(())
}
