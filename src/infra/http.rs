//! reqwest-backed posts transport.

use std::time::Duration;

use async_trait::async_trait;
use brezza_api_types::{Post, PostDraft, PostPatch};
use reqwest::{Response, StatusCode};
use url::Url;

use crate::client::api::PostsApi;
use crate::client::error::ApiError;
use crate::config::ClientConfig;

use super::error::InfraError;

/// HTTP transport for a conventional posts REST backend.
pub struct HttpPostsApi {
    http: reqwest::Client,
    base: Url,
}

impl HttpPostsApi {
    /// Build a transport from the client configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, InfraError> {
        let base = config
            .base_url()
            .map_err(|source| InfraError::base_url(&config.base_url, source))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::transport(format!("invalid endpoint `{path}`: {err}")))
    }

    /// Map non-success statuses to `ApiError::Status`, pulling a message out
    /// of the body when the server sent one.
    async fn error_for_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::status(status.as_u16(), body_message(&body, status)))
    }
}

fn body_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(message) = value.get("message").and_then(|v| v.as_str())
    {
        return message.to_string();
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.chars().take(200).collect()
    }
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let response = self.http.get(self.endpoint("posts")?).send().await?;
        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }

    async fn get_post(&self, id: i64) -> Result<Post, ApiError> {
        let response = self
            .http
            .get(self.endpoint(&format!("posts/{id}"))?)
            .send()
            .await?;
        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError> {
        let response = self
            .http
            .post(self.endpoint("posts")?)
            .json(draft)
            .send()
            .await?;
        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }

    async fn update_post(&self, id: i64, patch: &PostPatch) -> Result<Post, ApiError> {
        let response = self
            .http
            .patch(self.endpoint(&format!("posts/{id}"))?)
            .json(patch)
            .send()
            .await?;
        let response = Self::error_for_status(response).await?;
        Ok(response.json().await?)
    }

    async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.endpoint(&format!("posts/{id}"))?)
            .send()
            .await?;
        Self::error_for_status(response).await?;
        Ok(())
    }
}
