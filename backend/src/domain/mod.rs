//! Domain primitives, validators, and tagging use-cases.
//!
//! Purpose: define strongly typed entities for resources, vocabularies,
//! collections, and favourites, the closed error taxonomy raised on write
//! paths, and the services coordinating validation, duplicate detection, and
//! persistence through the ports. Nothing in this module depends on the HTTP
//! framework; inbound adapters map [`TaggingError`] to transport shapes.

pub mod auth;
pub mod collection;
pub mod collection_service;
pub mod error;
pub mod favourite;
pub mod favourite_service;
pub mod ports;
pub mod resource;
pub mod tagging_service;
pub mod validation;
pub mod vocabulary;
pub mod vocabulary_service;

pub use self::auth::{ExtraUserData, LoggedUser};
pub use self::collection::{
    Collection, CollectionCandidate, CollectionResource, CollectionResourceCandidate,
    CollectionUpdate,
};
pub use self::collection_service::CollectionService;
pub use self::error::{TaggingError, TaggingResult, ValidationFailure};
pub use self::favourite::{Favourite, FavouriteCandidate};
pub use self::favourite_service::FavouriteService;
pub use self::resource::{
    CloneCandidate, RelationshipCandidate, Resource, ResourceRef, ResourceType, VocabularyTag,
    parse_resource_type,
};
pub use self::tagging_service::TaggingService;
pub use self::vocabulary::{
    ResourceTag, Vocabulary, VocabularyCandidate, VocabularyStatus,
};
pub use self::vocabulary_service::VocabularyService;
