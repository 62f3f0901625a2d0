//! Reqwest-backed graph service adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping. The domain sees [`GraphService`] and its typed
//! errors, never reqwest types or the collaborator's response shape.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::json;

use crate::domain::ResourceType;
use crate::domain::ports::{GraphService, GraphServiceError};

/// Graph adapter performing HTTP POST requests against one endpoint.
pub struct GraphHttpClient {
    client: Client,
    base_url: Url,
}

impl GraphHttpClient {
    /// Build an adapter using a reqwest client with an explicit request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn associate_url(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> Result<Url, GraphServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                GraphServiceError::Rejected("graph endpoint cannot carry a path".to_owned())
            })?
            .pop_if_empty()
            .extend(["graph", resource_type.as_str(), resource_id, "associate"]);
        Ok(url)
    }
}

#[async_trait]
impl GraphService for GraphHttpClient {
    async fn associate(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
        tags: &[String],
    ) -> Result<(), GraphServiceError> {
        let url = self.associate_url(resource_type, resource_id)?;
        let response = self
            .client
            .post(url)
            .json(&json!({ "tags": tags }))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> GraphServiceError {
    GraphServiceError::Transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> GraphServiceError {
    let body_preview = body_preview(body);
    let message = if body_preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), body_preview)
    };

    if status.is_client_error() {
        GraphServiceError::Rejected(message)
    } else {
        GraphServiceError::Transport(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
