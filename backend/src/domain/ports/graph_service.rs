//! Port for the graph microservice that mirrors tag associations.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::resource::ResourceType;

/// Errors raised by graph service adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphServiceError {
    /// The graph service rejected the request (4xx).
    #[error("graph service rejected the request: {0}")]
    Rejected(String),
    /// The request never completed or the service failed (network, 5xx).
    #[error("graph service transport failed: {0}")]
    Transport(String),
}

/// Outbound call that records a tag association in the graph database.
///
/// Failures are wrapped and re-raised by the caller; they are never
/// swallowed, and the collaborator's internal error shape never reaches
/// clients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphService: Send + Sync {
    /// `POST /graph/{resourceType}/{resourceId}/associate` with the tags.
    async fn associate(
        &self,
        resource_type: ResourceType,
        resource_id: &str,
        tags: &[String],
    ) -> Result<(), GraphServiceError>;
}

/// Graph service stand-in used when no graph endpoint is configured.
///
/// Accepts every association; deployments without a graph database keep the
/// tagging write path functional.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpGraphService;

#[async_trait]
impl GraphService for NoOpGraphService {
    async fn associate(
        &self,
        _resource_type: ResourceType,
        _resource_id: &str,
        _tags: &[String],
    ) -> Result<(), GraphServiceError> {
        Ok(())
    }
}
