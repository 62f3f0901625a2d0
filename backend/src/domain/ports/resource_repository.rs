//! Port for resource document persistence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::resource::{Resource, ResourceType};

/// Errors raised by resource repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceRepositoryError {
    /// Store connection could not be established.
    #[error("resource store connection failed: {0}")]
    Connection(String),
    /// Query or mutation failed during execution.
    #[error("resource store query failed: {0}")]
    Query(String),
}

/// Port for resource document storage.
///
/// Follows the document-store contract: `find_one` probes by composite key,
/// `save` upserts the whole document. Uniqueness races between a probe and a
/// save are arbitrated by the store itself, not here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Fetch the resource document for `(resource_type, id)`, if present.
    async fn find_one(
        &self,
        resource_type: ResourceType,
        id: &str,
    ) -> Result<Option<Resource>, ResourceRepositoryError>;

    /// Upsert a resource document keyed by `(resource_type, id)`.
    async fn save(&self, resource: &Resource) -> Result<(), ResourceRepositoryError>;

    /// Delete the resource document for `(resource_type, id)`.
    async fn delete(
        &self,
        resource_type: ResourceType,
        id: &str,
    ) -> Result<(), ResourceRepositoryError>;
}
