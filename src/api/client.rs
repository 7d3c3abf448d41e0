use anyhow::{Context, Result};
use log::{debug, error};
use reqwest::blocking::{Client, Response, multipart};
use serde_json::Value;

use super::error::{ApiError, classify_status};
use crate::fetch::FetchedImage;

pub const DEFAULT_API_URL: &str = "https://api.nodeimage.com";

/// Header carrying the credential on every request.
pub const API_KEY_HEADER: &str = "X-API-Key";

// Endpoint paths are configuration relative to the (overridable) base URL,
// not business logic.
const LIST_PATH: &str = "/api/v1/list";
const UPLOAD_PATH: &str = "/api/upload";
const DELETE_PATH: &str = "/api/v1/delete";

/// The three operations the service exposes. Each is one synchronous
/// request/response round trip; results are the decoded JSON bodies,
/// relayed to the caller structurally unmodified.
#[cfg_attr(test, mockall::automock)]
pub trait ImageService: Send + Sync {
    fn list_images(&self) -> Result<Value>;
    fn upload_image(&self, image: &FetchedImage) -> Result<Value>;
    fn delete_image(&self, image_id: &str) -> Result<Value>;
}

#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    api_url: String,
    api_key: String,
}

impl ApiClient {
    /// Creates a client for the given credential. The key must be non-empty;
    /// no further validation happens on this side of the wire.
    #[tracing::instrument(skip(client, api_key, api_url))]
    pub fn new(client: Client, api_key: String, api_url: Option<String>) -> Result<Self> {
        if api_key.is_empty() {
            return Err(ApiError::InvalidInput(
                "API key must not be empty".to_string(),
            )
            .into());
        }
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Turns a response into its JSON body, mapping non-2xx statuses onto
    /// the error taxonomy (401/403 auth, everything else service).
    fn handle_response(response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let err = classify_status(status, &body);
            error!("{}", err);
            return Err(err.into());
        }
        response
            .json::<Value>()
            .context("Failed to parse JSON response from service")
    }
}

impl ImageService for ApiClient {
    #[tracing::instrument(skip(self))]
    fn list_images(&self) -> Result<Value> {
        let url = format!("{}{}", self.api_url, LIST_PATH);
        debug!("Listing images via {}...", url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .context("Failed to send list request")?;

        Self::handle_response(response)
    }

    #[tracing::instrument(skip(self, image))]
    fn upload_image(&self, image: &FetchedImage) -> Result<Value> {
        let url = format!("{}{}", self.api_url, UPLOAD_PATH);
        debug!(
            "Uploading {} ({} bytes, {}) via {}...",
            image.filename,
            image.bytes.len(),
            image.content_type,
            url
        );

        let part = multipart::Part::bytes(image.bytes.clone())
            .file_name(image.filename.clone())
            .mime_str(&image.content_type)
            .context("Invalid content type for multipart upload")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .multipart(form)
            .send()
            .context("Failed to send upload request")?;

        Self::handle_response(response)
    }

    #[tracing::instrument(skip(self))]
    fn delete_image(&self, image_id: &str) -> Result<Value> {
        if image_id.is_empty() {
            return Err(ApiError::InvalidInput(
                "image id must not be empty".to_string(),
            )
            .into());
        }

        let url = format!("{}{}/{}", self.api_url, DELETE_PATH, image_id);
        debug!("Deleting image {} via {}...", image_id, url);

        let response = self
            .client
            .delete(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .context("Failed to send delete request")?;

        Self::handle_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_client(server: &mockito::Server) -> ApiClient {
        ApiClient::new(
            Client::new(),
            "test-key".to_string(),
            Some(server.url()),
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_empty_api_key() {
        let err = ApiClient::new(Client::new(), String::new(), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_new_defaults_api_url() {
        let client = ApiClient::new(Client::new(), "k".to_string(), None).unwrap();
        assert_eq!(client.api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_list_images_returns_body_unmodified() {
        let mut server = mockito::Server::new();
        let body = r#"{"success":true,"images":[{"image_id":"abc","url":"https://cdn/x.png"}]}"#;
        let mock = server
            .mock("GET", "/api/v1/list")
            .match_header("x-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();

        let result = test_client(&server).list_images().unwrap();

        mock.assert();
        assert_eq!(result, serde_json::from_str::<Value>(body).unwrap());
    }

    #[test_log::test]
    fn test_list_images_auth_failure() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/api/v1/list")
            .with_status(401)
            .with_body("invalid api key")
            .create();

        let err = test_client(&server).list_images().unwrap_err();

        mock.assert();
        match err.downcast_ref::<ApiError>() {
            Some(ApiError::Auth { status, body }) => {
                assert_eq!(*status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected Auth, got {:?}", other),
        }
    }

    #[test]
    fn test_list_images_service_failure() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/api/v1/list")
            .with_status(500)
            .with_body("boom")
            .create();

        let err = test_client(&server).list_images().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Service { status: 500, .. })
        ));
    }

    #[test]
    fn test_upload_image_returns_body_unmodified() {
        let mut server = mockito::Server::new();
        let body = r#"{"success":true,"image_id":"new-id","links":{"direct":"https://cdn/new.png"}}"#;
        let mock = server
            .mock("POST", "/api/upload")
            .match_header("x-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();

        let image = FetchedImage {
            filename: "image.png".to_string(),
            bytes: b"pngbytes".to_vec(),
            content_type: "image/png".to_string(),
        };
        let result = test_client(&server).upload_image(&image).unwrap();

        mock.assert();
        assert_eq!(result, serde_json::from_str::<Value>(body).unwrap());
    }

    #[test]
    fn test_upload_image_auth_failure() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/api/upload")
            .with_status(403)
            .with_body("forbidden")
            .create();

        let image = FetchedImage {
            filename: "image.jpg".to_string(),
            bytes: vec![1, 2, 3],
            content_type: "image/jpeg".to_string(),
        };
        let err = test_client(&server).upload_image(&image).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::Auth { status: 403, .. })
        ));
    }

    #[test]
    fn test_delete_image_returns_body_unmodified() {
        let mut server = mockito::Server::new();
        let body = r#"{"success":true,"message":"deleted"}"#;
        let mock = server
            .mock("DELETE", "/api/v1/delete/abc123")
            .match_header("x-api-key", "test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();

        let result = test_client(&server).delete_image("abc123").unwrap();

        mock.assert();
        assert_eq!(result, json!({"success": true, "message": "deleted"}));
    }

    #[test]
    fn test_delete_image_empty_id_fails_before_any_request() {
        let mut server = mockito::Server::new();
        // Any request reaching the server would fail the expect(0) assertion.
        let mock = server
            .mock("DELETE", mockito::Matcher::Any)
            .expect(0)
            .create();

        let err = test_client(&server).delete_image("").unwrap_err();

        mock.assert();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_delete_image_unknown_id_surfaces_service_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("DELETE", "/api/v1/delete/gone")
            .with_status(404)
            .with_body("image not found")
            .create();

        let err = test_client(&server).delete_image("gone").unwrap_err();
        match err.downcast_ref::<ApiError>() {
            Some(ApiError::Service { status, body }) => {
                assert_eq!(*status, 404);
                assert_eq!(body, "image not found");
            }
            other => panic!("expected Service, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_success_body_is_an_error() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/api/v1/list")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create();

        let result = test_client(&server).list_images();
        assert!(result.is_err());
    }
}
