//! Favourite use-cases: user bookmarks of single resources.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::auth::LoggedUser;
use super::error::{TaggingError, TaggingResult};
use super::favourite::{Favourite, FavouriteCandidate};
use super::ports::{FavouriteRepository, FavouriteRepositoryError};
use super::validation::validate_favourite;

fn map_favourite_error(error: FavouriteRepositoryError) -> TaggingError {
    TaggingError::ResourceUpdateFailed(error.to_string())
}

/// Favourite service backed by the document-store port.
#[derive(Clone)]
pub struct FavouriteService {
    favourites: Arc<dyn FavouriteRepository>,
    default_application: String,
}

impl FavouriteService {
    /// Create a new service over the given repository.
    pub fn new(favourites: Arc<dyn FavouriteRepository>, default_application: String) -> Self {
        Self {
            favourites,
            default_application,
        }
    }

    /// List the caller's favourites under one application.
    ///
    /// # Errors
    ///
    /// Propagates store failures as [`TaggingError::ResourceUpdateFailed`].
    pub async fn list(
        &self,
        user: &LoggedUser,
        application: Option<&str>,
    ) -> TaggingResult<Vec<Favourite>> {
        let application = application.unwrap_or(&self.default_application);
        self.favourites
            .find_by_user(&user.id, application)
            .await
            .map_err(map_favourite_error)
    }

    /// Validate, probe for duplicates, and persist a new favourite.
    ///
    /// The probe is scoped to the caller: two users may favourite the same
    /// resource, one user may not favourite it twice.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::FavouriteNotValid`] on field failures and
    /// [`TaggingError::FavouriteDuplicated`] when the composite key exists.
    pub async fn create(
        &self,
        candidate: FavouriteCandidate,
        user: &LoggedUser,
    ) -> TaggingResult<Favourite> {
        let valid = validate_favourite(candidate, &self.default_application)?;
        let existing = self
            .favourites
            .find_one(
                &valid.application,
                valid.resource_type,
                &valid.resource_id,
                &user.id,
            )
            .await
            .map_err(map_favourite_error)?;
        if existing.is_some() {
            return Err(TaggingError::FavouriteDuplicated(format!(
                "{} {} is already a favourite of user {}",
                valid.resource_type, valid.resource_id, user.id
            )));
        }

        debug!(
            resource = %valid.resource_id,
            user = %user.id,
            "creating favourite"
        );
        let favourite = Favourite {
            id: Uuid::new_v4(),
            application: valid.application,
            resource_type: valid.resource_type,
            resource_id: valid.resource_id,
            user_id: user.id.clone(),
            created_at: Utc::now(),
        };
        self.favourites
            .save(&favourite)
            .await
            .map_err(map_favourite_error)?;
        Ok(favourite)
    }

    /// Fetch one favourite owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::FavouriteNotFound`] when no favourite has
    /// this id, and [`TaggingError::AccessDenied`] when the caller does not
    /// own it.
    pub async fn get(&self, id: Uuid, user: &LoggedUser) -> TaggingResult<Favourite> {
        let favourite = self
            .favourites
            .get(id)
            .await
            .map_err(map_favourite_error)?
            .ok_or_else(|| TaggingError::FavouriteNotFound(id.to_string()))?;
        if favourite.user_id != user.id {
            return Err(TaggingError::AccessDenied(format!(
                "favourite {id} does not belong to user {}",
                user.id
            )));
        }
        Ok(favourite)
    }

    /// Delete one favourite owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::FavouriteNotFound`] /
    /// [`TaggingError::AccessDenied`] as in [`Self::get`].
    pub async fn delete(&self, id: Uuid, user: &LoggedUser) -> TaggingResult<Favourite> {
        let favourite = self.get(id, user).await?;
        self.favourites
            .delete(favourite.id)
            .await
            .map_err(map_favourite_error)?;
        Ok(favourite)
    }
}
