//! Client for the NodeImage hosting service HTTP API.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_API_URL, ImageService};
pub use error::ApiError;
