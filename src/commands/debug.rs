use anyhow::Result;

use crate::runtime::Runtime;

/// Prints environment details useful when diagnosing configuration
/// problems: working directory, executable path, and whether a
/// credential was resolved.
#[tracing::instrument(skip(runtime, api_key))]
pub fn debug<R: Runtime>(runtime: &R, api_key: Option<&str>) -> Result<()> {
    println!("Current directory: {}", runtime.current_dir()?.display());
    println!("Executable: {}", runtime.current_exe()?.display());
    match api_key {
        Some(key) => println!("API key: {}", key),
        None => println!("API key: (not set)"),
    }
    Ok(())
}
