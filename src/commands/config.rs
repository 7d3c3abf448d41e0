use anyhow::Result;
use log::debug;
use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;

use crate::api::{ApiClient, ApiError};
use crate::runtime::Runtime;

/// Environment variable holding the credential.
pub const API_KEY_ENV: &str = "NODE_IMAGE_API_KEY";

/// Dotenv-style fallback file, looked up in the current directory.
const DOTENV_FILE: &str = ".env";

/// Uniform bound on every request the client issues, remote image downloads
/// included. None of the calls may block indefinitely.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct Config<R: Runtime> {
    pub runtime: R,
    pub service: ApiClient,
    pub http: Client,
}

impl<R: Runtime> Config<R> {
    /// Resolves the credential and builds the HTTP plumbing shared by all
    /// commands. Fails with `InvalidInput` when no non-empty key is found.
    pub fn new(runtime: R, api_key: Option<String>, api_url: Option<String>) -> Result<Self> {
        let api_key = resolve_api_key(&runtime, api_key).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "no API key; pass --api-key or set the {} environment variable",
                API_KEY_ENV
            ))
        })?;
        let prefix: String = api_key.chars().take(4).collect();
        debug!("Using API key: {}****", prefix);

        let http = Client::builder()
            .user_agent(concat!("nodeimage-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let service = ApiClient::new(http.clone(), api_key, api_url)?;

        Ok(Self {
            runtime,
            service,
            http,
        })
    }
}

/// Ordered credential resolution: explicit flag, then the environment
/// variable, then a `.env` file in the current directory. The first
/// non-empty result wins.
pub fn resolve_api_key<R: Runtime>(runtime: &R, explicit: Option<String>) -> Option<String> {
    let non_empty = |key: &String| !key.is_empty();
    explicit
        .filter(non_empty)
        .or_else(|| runtime.env_var(API_KEY_ENV).ok().filter(non_empty))
        .or_else(|| dotenv_value(runtime, API_KEY_ENV).filter(non_empty))
}

/// Reads `key` from a `.env` file in the current directory, if present.
/// Supports `KEY=VALUE` lines, an optional `export ` prefix, surrounding
/// quotes, and `#` comments.
fn dotenv_value<R: Runtime>(runtime: &R, key: &str) -> Option<String> {
    let path = Path::new(DOTENV_FILE);
    if !runtime.exists(path) {
        return None;
    }
    let contents = runtime.read_to_string(path).ok()?;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((name, value)) = line.split_once('=') else {
            continue;
        };
        if name.trim() != key {
            continue;
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);
        debug!("Resolved {} from {}", key, DOTENV_FILE);
        return Some(value.to_string());
    }
    None
}
