//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters:
//! the document store holding resources, vocabularies, collections, and
//! favourites, and the graph microservice that mirrors tag associations.
//! Each trait exposes strongly typed errors so adapters map their failures
//! into predictable variants.

mod collection_repository;
mod favourite_repository;
mod graph_service;
mod resource_repository;
mod vocabulary_repository;

pub use collection_repository::{CollectionRepository, CollectionRepositoryError};
pub use favourite_repository::{FavouriteRepository, FavouriteRepositoryError};
pub use graph_service::{GraphService, GraphServiceError, NoOpGraphService};
pub use resource_repository::{ResourceRepository, ResourceRepositoryError};
pub use vocabulary_repository::{VocabularyRepository, VocabularyRepositoryError};

#[cfg(test)]
pub use collection_repository::MockCollectionRepository;
#[cfg(test)]
pub use favourite_repository::MockFavouriteRepository;
#[cfg(test)]
pub use graph_service::MockGraphService;
#[cfg(test)]
pub use resource_repository::MockResourceRepository;
#[cfg(test)]
pub use vocabulary_repository::MockVocabularyRepository;
