use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult, PostSource};
use postdeck_types::Post;

/// Endpoint used when nothing else is configured
pub const DEFAULT_POSTS_ENDPOINT: &str =
    "https://my-json-server.typicode.com/Codeinwp/front-end-internship-api/posts";

/// HTTP client for the post collection and avatar hosts
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    posts_url: String,
}

impl ApiClient {
    /// Create a new API client for the given posts endpoint
    pub fn new(posts_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            posts_url: posts_url.into(),
        }
    }

    /// Create a client whose requests give up after `timeout`
    pub fn with_timeout(posts_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            posts_url: posts_url.into(),
        })
    }

    pub fn posts_url(&self) -> &str {
        &self.posts_url
    }

    /// Map non-success statuses to errors, cleaning up HTML error pages
    async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let clean_error = if error_text.contains("<html>") || error_text.contains("<!DOCTYPE") {
            format!("Server returned {} error. Please check the endpoint URL.", status.as_u16())
        } else {
            error_text
        };

        match status.as_u16() {
            404 => Err(ApiError::NotFound(clean_error)),
            code => Err(ApiError::Api {
                status: code,
                message: clean_error,
            }),
        }
    }

    /// Decode a JSON body, keeping decode failures apart from transport failures
    async fn handle_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let response = Self::check_status(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Get the post collection
    pub async fn get_posts(&self) -> ApiResult<Vec<Post>> {
        let response = self.client.get(&self.posts_url).send().await?;
        Self::handle_json(response).await
    }

    /// Get raw image bytes from an avatar URL
    pub async fn get_image_bytes(&self, url: &str) -> ApiResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_POSTS_ENDPOINT)
    }
}

#[async_trait]
impl PostSource for ApiClient {
    async fn fetch_posts(&self) -> ApiResult<Vec<Post>> {
        self.get_posts().await
    }

    async fn fetch_avatar(&self, url: &str) -> ApiResult<Vec<u8>> {
        self.get_image_bytes(url).await
    }
}
