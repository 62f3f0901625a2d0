//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::{CollectionService, FavouriteService, TaggingService, VocabularyService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Vocabulary CRUD use-cases.
    pub vocabularies: Arc<VocabularyService>,
    /// Relationship use-cases, including bulk and clone.
    pub tagging: Arc<TaggingService>,
    /// Collection use-cases.
    pub collections: Arc<CollectionService>,
    /// Favourite use-cases.
    pub favourites: Arc<FavouriteService>,
    /// Application assumed when a request names none.
    pub default_application: String,
}
