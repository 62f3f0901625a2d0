//! Port for favourite document persistence.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::favourite::Favourite;
use crate::domain::resource::ResourceType;

/// Errors raised by favourite repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FavouriteRepositoryError {
    /// Store connection could not be established.
    #[error("favourite store connection failed: {0}")]
    Connection(String),
    /// Query or mutation failed during execution.
    #[error("favourite store query failed: {0}")]
    Query(String),
}

/// Port for favourite document storage.
///
/// `find_one` probes the `(application, resource_type, resource_id, user)`
/// uniqueness key scoped to the current application.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavouriteRepository: Send + Sync {
    /// Fetch the favourite matching the full composite key, if present.
    async fn find_one(
        &self,
        application: &str,
        resource_type: ResourceType,
        resource_id: &str,
        user_id: &str,
    ) -> Result<Option<Favourite>, FavouriteRepositoryError>;

    /// Fetch every favourite of `user_id` under `application`.
    async fn find_by_user(
        &self,
        user_id: &str,
        application: &str,
    ) -> Result<Vec<Favourite>, FavouriteRepositoryError>;

    /// Fetch a favourite by identifier, if present.
    async fn get(&self, id: Uuid) -> Result<Option<Favourite>, FavouriteRepositoryError>;

    /// Insert a favourite document.
    async fn save(&self, favourite: &Favourite) -> Result<(), FavouriteRepositoryError>;

    /// Delete the favourite with the given identifier.
    async fn delete(&self, id: Uuid) -> Result<(), FavouriteRepositoryError>;
}
