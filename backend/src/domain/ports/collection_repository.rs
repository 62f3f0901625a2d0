//! Port for collection document persistence.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::collection::Collection;

/// Errors raised by collection repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionRepositoryError {
    /// Store connection could not be established.
    #[error("collection store connection failed: {0}")]
    Connection(String),
    /// Query or mutation failed during execution.
    #[error("collection store query failed: {0}")]
    Query(String),
}

/// Port for collection document storage.
///
/// `find_one` probes the `(name, application, owner)` uniqueness key; the
/// store itself does not enforce that invariant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Fetch the collection for `(name, application, owner_id)`, if present.
    async fn find_one(
        &self,
        name: &str,
        application: &str,
        owner_id: &str,
    ) -> Result<Option<Collection>, CollectionRepositoryError>;

    /// Fetch every collection owned by `owner_id` under `application`.
    async fn find_by_owner(
        &self,
        owner_id: &str,
        application: &str,
    ) -> Result<Vec<Collection>, CollectionRepositoryError>;

    /// Fetch a collection by identifier, if present.
    async fn get(&self, id: Uuid) -> Result<Option<Collection>, CollectionRepositoryError>;

    /// Upsert a collection document keyed by its identifier.
    async fn save(&self, collection: &Collection) -> Result<(), CollectionRepositoryError>;

    /// Delete the collection with the given identifier.
    async fn delete(&self, id: Uuid) -> Result<(), CollectionRepositoryError>;
}
