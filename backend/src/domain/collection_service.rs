//! Collection use-cases: user-owned groups of resource references.
//!
//! The `(name, application, owner)` uniqueness invariant is enforced by the
//! duplicate probe here, not by the store.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::auth::LoggedUser;
use super::collection::{
    Collection, CollectionCandidate, CollectionResourceCandidate, CollectionUpdate,
};
use super::error::{TaggingError, TaggingResult};
use super::ports::{CollectionRepository, CollectionRepositoryError};
use super::resource::ResourceType;
use super::validation::{
    validate_collection, validate_collection_resource, validate_collection_update,
};

fn map_collection_error(error: CollectionRepositoryError) -> TaggingError {
    TaggingError::ResourceUpdateFailed(error.to_string())
}

/// Collection service backed by the document-store port.
#[derive(Clone)]
pub struct CollectionService {
    collections: Arc<dyn CollectionRepository>,
    default_application: String,
}

impl CollectionService {
    /// Create a new service over the given repository.
    pub fn new(collections: Arc<dyn CollectionRepository>, default_application: String) -> Self {
        Self {
            collections,
            default_application,
        }
    }

    /// List the caller's collections under one application.
    ///
    /// # Errors
    ///
    /// Propagates store failures as [`TaggingError::ResourceUpdateFailed`].
    pub async fn list(
        &self,
        user: &LoggedUser,
        application: Option<&str>,
    ) -> TaggingResult<Vec<Collection>> {
        let application = application.unwrap_or(&self.default_application);
        self.collections
            .find_by_owner(&user.id, application)
            .await
            .map_err(map_collection_error)
    }

    /// Validate, probe for duplicates, and persist a new collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::CollectionNotValid`] on field failures,
    /// [`TaggingError::AccessDenied`] for an unauthorized application, and
    /// [`TaggingError::CollectionDuplicated`] when the caller already owns a
    /// collection with this name under this application.
    pub async fn create(
        &self,
        candidate: CollectionCandidate,
        user: &LoggedUser,
    ) -> TaggingResult<Collection> {
        let valid = validate_collection(candidate, user, &self.default_application)?;
        let existing = self
            .collections
            .find_one(&valid.name, &valid.application, &user.id)
            .await
            .map_err(map_collection_error)?;
        if existing.is_some() {
            return Err(TaggingError::CollectionDuplicated(valid.name));
        }

        debug!(name = %valid.name, owner = %user.id, "creating collection");
        let collection = Collection {
            id: Uuid::new_v4(),
            name: valid.name,
            application: valid.application,
            owner_id: user.id.clone(),
            resources: valid.resources,
        };
        self.collections
            .save(&collection)
            .await
            .map_err(map_collection_error)?;
        Ok(collection)
    }

    /// Fetch one collection owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::CollectionNotFound`] when no collection has
    /// this id, and [`TaggingError::AccessDenied`] when the caller does not
    /// own it.
    pub async fn get(&self, id: Uuid, user: &LoggedUser) -> TaggingResult<Collection> {
        let collection = self
            .collections
            .get(id)
            .await
            .map_err(map_collection_error)?
            .ok_or_else(|| TaggingError::CollectionNotFound(id.to_string()))?;
        if collection.owner_id != user.id {
            return Err(TaggingError::AccessDenied(format!(
                "collection {id} does not belong to user {}",
                user.id
            )));
        }
        Ok(collection)
    }

    /// Rename a collection or replace its resource references.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::CollectionNotValid`] on field failures and
    /// [`TaggingError::CollectionDuplicated`] when renaming onto a name the
    /// caller already uses under the same application.
    pub async fn update(
        &self,
        id: Uuid,
        update: CollectionUpdate,
        user: &LoggedUser,
    ) -> TaggingResult<Collection> {
        let mut collection = self.get(id, user).await?;
        let (name, resources) = validate_collection_update(update)?;

        if let Some(name) = name {
            if name != collection.name {
                let occupied = self
                    .collections
                    .find_one(&name, &collection.application, &user.id)
                    .await
                    .map_err(map_collection_error)?;
                if occupied.is_some() {
                    return Err(TaggingError::CollectionDuplicated(name));
                }
                collection.name = name;
            }
        }
        if let Some(resources) = resources {
            collection.resources = resources;
        }

        self.collections
            .save(&collection)
            .await
            .map_err(map_collection_error)?;
        Ok(collection)
    }

    /// Delete one collection owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::CollectionNotFound`] /
    /// [`TaggingError::AccessDenied`] as in [`Self::get`].
    pub async fn delete(&self, id: Uuid, user: &LoggedUser) -> TaggingResult<Collection> {
        let collection = self.get(id, user).await?;
        self.collections
            .delete(collection.id)
            .await
            .map_err(map_collection_error)?;
        Ok(collection)
    }

    /// Add one resource reference to a collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::CollectionNotValid`] when the element is
    /// malformed and [`TaggingError::AssociationDuplicated`] when the pair is
    /// already a member.
    pub async fn add_resource(
        &self,
        id: Uuid,
        candidate: CollectionResourceCandidate,
        user: &LoggedUser,
    ) -> TaggingResult<Collection> {
        let mut collection = self.get(id, user).await?;
        let resource = validate_collection_resource(&candidate)?;

        if collection.contains(&resource.id, resource.resource_type) {
            return Err(TaggingError::AssociationDuplicated(format!(
                "{} {} is already in collection {}",
                resource.resource_type, resource.id, collection.name
            )));
        }
        collection.resources.push(resource);

        self.collections
            .save(&collection)
            .await
            .map_err(map_collection_error)?;
        Ok(collection)
    }

    /// Remove one resource reference from a collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::ResourceNotFound`] when the pair is not a
    /// member of the collection.
    pub async fn remove_resource(
        &self,
        id: Uuid,
        resource_type: ResourceType,
        resource_id: &str,
        user: &LoggedUser,
    ) -> TaggingResult<Collection> {
        let mut collection = self.get(id, user).await?;
        if !collection.remove(resource_id, resource_type) {
            return Err(TaggingError::ResourceNotFound(format!(
                "{resource_type} {resource_id} is not in collection {}",
                collection.name
            )));
        }
        self.collections
            .save(&collection)
            .await
            .map_err(map_collection_error)?;
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::ExtraUserData;
    use crate::domain::collection::CollectionResource;
    use crate::domain::ports::MockCollectionRepository;

    fn user(id: &str) -> LoggedUser {
        LoggedUser {
            id: id.to_owned(),
            extra_user_data: ExtraUserData {
                apps: vec!["rw".to_owned()],
            },
        }
    }

    fn service(collections: MockCollectionRepository) -> CollectionService {
        CollectionService::new(Arc::new(collections), "rw".to_owned())
    }

    fn candidate(name: &str) -> CollectionCandidate {
        CollectionCandidate {
            name: Some(name.to_owned()),
            application: Some("rw".to_owned()),
            resources: None,
        }
    }

    fn stored(name: &str, owner: &str) -> Collection {
        Collection {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            application: "rw".to_owned(),
            owner_id: owner.to_owned(),
            resources: Vec::new(),
        }
    }

    #[tokio::test]
    async fn create_probes_the_composite_key_before_writing() {
        let mut collections = MockCollectionRepository::new();
        collections
            .expect_find_one()
            .withf(|name, application, owner| {
                name == "Forests" && application == "rw" && owner == "u1"
            })
            .times(1)
            .return_once(|_, _, _| Ok(None));
        collections
            .expect_save()
            .withf(|collection| collection.name == "Forests" && collection.owner_id == "u1")
            .times(1)
            .return_once(|_| Ok(()));

        service(collections)
            .create(candidate("Forests"), &user("u1"))
            .await
            .expect("create succeeds");
    }

    #[tokio::test]
    async fn second_submission_of_the_same_key_is_duplicated() {
        let mut collections = MockCollectionRepository::new();
        collections
            .expect_find_one()
            .times(1)
            .return_once(|_, _, _| Ok(Some(stored("Forests", "u1"))));
        collections.expect_save().times(0);

        let error = service(collections)
            .create(candidate("Forests"), &user("u1"))
            .await
            .expect_err("duplicate collection");
        assert_eq!(
            error,
            TaggingError::CollectionDuplicated("Forests".to_owned())
        );
    }

    #[tokio::test]
    async fn get_denies_access_to_another_users_collection() {
        let foreign = stored("Forests", "u2");
        let mut collections = MockCollectionRepository::new();
        collections
            .expect_get()
            .times(1)
            .return_once(move |_| Ok(Some(foreign)));

        let error = service(collections)
            .get(Uuid::new_v4(), &user("u1"))
            .await
            .expect_err("foreign collection");
        assert!(matches!(error, TaggingError::AccessDenied(_)));
    }

    #[tokio::test]
    async fn add_resource_rejects_an_existing_pair() {
        let mut owned = stored("Forests", "u1");
        owned.resources.push(CollectionResource {
            id: "d1".to_owned(),
            resource_type: ResourceType::Dataset,
        });
        let mut collections = MockCollectionRepository::new();
        collections
            .expect_get()
            .times(1)
            .return_once(move |_| Ok(Some(owned)));
        collections.expect_save().times(0);

        let error = service(collections)
            .add_resource(
                Uuid::new_v4(),
                CollectionResourceCandidate {
                    id: Some("d1".to_owned()),
                    resource_type: Some("dataset".to_owned()),
                },
                &user("u1"),
            )
            .await
            .expect_err("existing pair");
        assert!(matches!(error, TaggingError::AssociationDuplicated(_)));
    }

    #[tokio::test]
    async fn remove_resource_requires_membership() {
        let owned = stored("Forests", "u1");
        let mut collections = MockCollectionRepository::new();
        collections
            .expect_get()
            .times(1)
            .return_once(move |_| Ok(Some(owned)));

        let error = service(collections)
            .remove_resource(Uuid::new_v4(), ResourceType::Dataset, "d1", &user("u1"))
            .await
            .expect_err("missing pair");
        assert!(matches!(error, TaggingError::ResourceNotFound(_)));
    }
}
