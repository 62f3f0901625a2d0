//! In-memory document store adapters.
//!
//! Each adapter keeps whole documents behind an `RwLock<HashMap>` keyed by
//! the same composite keys the duplicate checkers probe. Reads clone; writes
//! replace the document, mirroring the upsert contract of the ports.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    CollectionRepository, CollectionRepositoryError, FavouriteRepository,
    FavouriteRepositoryError, ResourceRepository, ResourceRepositoryError, VocabularyRepository,
    VocabularyRepositoryError,
};
use crate::domain::{Collection, Favourite, Resource, ResourceType, Vocabulary};

const POISONED: &str = "store lock poisoned";

/// In-memory resource documents keyed by `(resource_type, id)`.
#[derive(Debug, Default)]
pub struct MemoryResourceRepository {
    inner: RwLock<HashMap<(ResourceType, String), Resource>>,
}

#[async_trait]
impl ResourceRepository for MemoryResourceRepository {
    async fn find_one(
        &self,
        resource_type: ResourceType,
        id: &str,
    ) -> Result<Option<Resource>, ResourceRepositoryError> {
        let store = self
            .inner
            .read()
            .map_err(|_| ResourceRepositoryError::Connection(POISONED.to_owned()))?;
        Ok(store.get(&(resource_type, id.to_owned())).cloned())
    }

    async fn save(&self, resource: &Resource) -> Result<(), ResourceRepositoryError> {
        let mut store = self
            .inner
            .write()
            .map_err(|_| ResourceRepositoryError::Connection(POISONED.to_owned()))?;
        store.insert(
            (resource.resource_type, resource.id.clone()),
            resource.clone(),
        );
        Ok(())
    }

    async fn delete(
        &self,
        resource_type: ResourceType,
        id: &str,
    ) -> Result<(), ResourceRepositoryError> {
        let mut store = self
            .inner
            .write()
            .map_err(|_| ResourceRepositoryError::Connection(POISONED.to_owned()))?;
        store.remove(&(resource_type, id.to_owned()));
        Ok(())
    }
}

/// In-memory vocabulary documents keyed by `(name, application)`.
#[derive(Debug, Default)]
pub struct MemoryVocabularyRepository {
    inner: RwLock<HashMap<(String, String), Vocabulary>>,
}

#[async_trait]
impl VocabularyRepository for MemoryVocabularyRepository {
    async fn find_one(
        &self,
        name: &str,
        application: &str,
    ) -> Result<Option<Vocabulary>, VocabularyRepositoryError> {
        let store = self
            .inner
            .read()
            .map_err(|_| VocabularyRepositoryError::Connection(POISONED.to_owned()))?;
        Ok(store
            .get(&(name.to_owned(), application.to_owned()))
            .cloned())
    }

    async fn find<'a>(
        &self,
        application: Option<&'a str>,
    ) -> Result<Vec<Vocabulary>, VocabularyRepositoryError> {
        let store = self
            .inner
            .read()
            .map_err(|_| VocabularyRepositoryError::Connection(POISONED.to_owned()))?;
        let mut vocabularies: Vec<Vocabulary> = store
            .values()
            .filter(|vocabulary| {
                application.is_none_or(|application| vocabulary.application == application)
            })
            .cloned()
            .collect();
        vocabularies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vocabularies)
    }

    async fn save(&self, vocabulary: &Vocabulary) -> Result<(), VocabularyRepositoryError> {
        let mut store = self
            .inner
            .write()
            .map_err(|_| VocabularyRepositoryError::Connection(POISONED.to_owned()))?;
        store.insert(
            (vocabulary.name.clone(), vocabulary.application.clone()),
            vocabulary.clone(),
        );
        Ok(())
    }

    async fn delete(
        &self,
        name: &str,
        application: &str,
    ) -> Result<(), VocabularyRepositoryError> {
        let mut store = self
            .inner
            .write()
            .map_err(|_| VocabularyRepositoryError::Connection(POISONED.to_owned()))?;
        store.remove(&(name.to_owned(), application.to_owned()));
        Ok(())
    }
}

/// In-memory collection documents keyed by identifier.
#[derive(Debug, Default)]
pub struct MemoryCollectionRepository {
    inner: RwLock<HashMap<Uuid, Collection>>,
}

#[async_trait]
impl CollectionRepository for MemoryCollectionRepository {
    async fn find_one(
        &self,
        name: &str,
        application: &str,
        owner_id: &str,
    ) -> Result<Option<Collection>, CollectionRepositoryError> {
        let store = self
            .inner
            .read()
            .map_err(|_| CollectionRepositoryError::Connection(POISONED.to_owned()))?;
        Ok(store
            .values()
            .find(|collection| {
                collection.name == name
                    && collection.application == application
                    && collection.owner_id == owner_id
            })
            .cloned())
    }

    async fn find_by_owner(
        &self,
        owner_id: &str,
        application: &str,
    ) -> Result<Vec<Collection>, CollectionRepositoryError> {
        let store = self
            .inner
            .read()
            .map_err(|_| CollectionRepositoryError::Connection(POISONED.to_owned()))?;
        let mut collections: Vec<Collection> = store
            .values()
            .filter(|collection| {
                collection.owner_id == owner_id && collection.application == application
            })
            .cloned()
            .collect();
        collections.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(collections)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Collection>, CollectionRepositoryError> {
        let store = self
            .inner
            .read()
            .map_err(|_| CollectionRepositoryError::Connection(POISONED.to_owned()))?;
        Ok(store.get(&id).cloned())
    }

    async fn save(&self, collection: &Collection) -> Result<(), CollectionRepositoryError> {
        let mut store = self
            .inner
            .write()
            .map_err(|_| CollectionRepositoryError::Connection(POISONED.to_owned()))?;
        store.insert(collection.id, collection.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), CollectionRepositoryError> {
        let mut store = self
            .inner
            .write()
            .map_err(|_| CollectionRepositoryError::Connection(POISONED.to_owned()))?;
        store.remove(&id);
        Ok(())
    }
}

/// In-memory favourite documents keyed by identifier.
#[derive(Debug, Default)]
pub struct MemoryFavouriteRepository {
    inner: RwLock<HashMap<Uuid, Favourite>>,
}

#[async_trait]
impl FavouriteRepository for MemoryFavouriteRepository {
    async fn find_one(
        &self,
        application: &str,
        resource_type: ResourceType,
        resource_id: &str,
        user_id: &str,
    ) -> Result<Option<Favourite>, FavouriteRepositoryError> {
        let store = self
            .inner
            .read()
            .map_err(|_| FavouriteRepositoryError::Connection(POISONED.to_owned()))?;
        Ok(store
            .values()
            .find(|favourite| {
                favourite.application == application
                    && favourite.resource_type == resource_type
                    && favourite.resource_id == resource_id
                    && favourite.user_id == user_id
            })
            .cloned())
    }

    async fn find_by_user(
        &self,
        user_id: &str,
        application: &str,
    ) -> Result<Vec<Favourite>, FavouriteRepositoryError> {
        let store = self
            .inner
            .read()
            .map_err(|_| FavouriteRepositoryError::Connection(POISONED.to_owned()))?;
        let mut favourites: Vec<Favourite> = store
            .values()
            .filter(|favourite| {
                favourite.user_id == user_id && favourite.application == application
            })
            .cloned()
            .collect();
        favourites.sort_by_key(|favourite| favourite.created_at);
        Ok(favourites)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Favourite>, FavouriteRepositoryError> {
        let store = self
            .inner
            .read()
            .map_err(|_| FavouriteRepositoryError::Connection(POISONED.to_owned()))?;
        Ok(store.get(&id).cloned())
    }

    async fn save(&self, favourite: &Favourite) -> Result<(), FavouriteRepositoryError> {
        let mut store = self
            .inner
            .write()
            .map_err(|_| FavouriteRepositoryError::Connection(POISONED.to_owned()))?;
        store.insert(favourite.id, favourite.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), FavouriteRepositoryError> {
        let mut store = self
            .inner
            .write()
            .map_err(|_| FavouriteRepositoryError::Connection(POISONED.to_owned()))?;
        store.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ResourceRef;
    use chrono::Utc;

    #[tokio::test]
    async fn resources_are_keyed_by_kind_and_id() {
        let repo = MemoryResourceRepository::default();
        let dataset = Resource::untagged(&ResourceRef::dataset("d1"));
        repo.save(&dataset).await.expect("save succeeds");

        assert!(
            repo.find_one(ResourceType::Dataset, "d1")
                .await
                .expect("lookup succeeds")
                .is_some()
        );
        assert!(
            repo.find_one(ResourceType::Layer, "d1")
                .await
                .expect("lookup succeeds")
                .is_none(),
            "a layer with the same id is a different document"
        );
    }

    #[tokio::test]
    async fn vocabulary_listing_scopes_by_application() {
        let repo = MemoryVocabularyRepository::default();
        for (name, application) in [("climate", "rw"), ("forests", "rw"), ("water", "gfw")] {
            let vocabulary = Vocabulary::new(
                name,
                application,
                crate::domain::VocabularyStatus::Published,
                Utc::now(),
            );
            repo.save(&vocabulary).await.expect("save succeeds");
        }

        let scoped = repo.find(Some("rw")).await.expect("find succeeds");
        assert_eq!(scoped.len(), 2);
        let all = repo.find(None).await.expect("find succeeds");
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn favourite_probe_matches_the_full_composite_key() {
        let repo = MemoryFavouriteRepository::default();
        let favourite = Favourite {
            id: Uuid::new_v4(),
            application: "rw".to_owned(),
            resource_type: ResourceType::Dataset,
            resource_id: "abc".to_owned(),
            user_id: "u1".to_owned(),
            created_at: Utc::now(),
        };
        repo.save(&favourite).await.expect("save succeeds");

        let same_user = repo
            .find_one("rw", ResourceType::Dataset, "abc", "u1")
            .await
            .expect("probe succeeds");
        assert!(same_user.is_some());

        let other_user = repo
            .find_one("rw", ResourceType::Dataset, "abc", "u2")
            .await
            .expect("probe succeeds");
        assert!(other_user.is_none(), "scoping by user must not collide");
    }

    #[tokio::test]
    async fn collection_probe_matches_name_application_owner() {
        let repo = MemoryCollectionRepository::default();
        let collection = Collection {
            id: Uuid::new_v4(),
            name: "Forests".to_owned(),
            application: "rw".to_owned(),
            owner_id: "u1".to_owned(),
            resources: Vec::new(),
        };
        repo.save(&collection).await.expect("save succeeds");

        assert!(
            repo.find_one("Forests", "rw", "u1")
                .await
                .expect("probe succeeds")
                .is_some()
        );
        assert!(
            repo.find_one("Forests", "rw", "u2")
                .await
                .expect("probe succeeds")
                .is_none()
        );
        assert!(
            repo.find_one("Forests", "gfw", "u1")
                .await
                .expect("probe succeeds")
                .is_none()
        );
    }
}
