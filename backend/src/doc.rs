//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API:
//! vocabulary, relationship, collection, and favourite endpoints plus the
//! health probes. Swagger UI serves the document at `/docs` in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::collections::{
    CollectionCreateRequest, CollectionResourceAddRequest, CollectionResourceRequest,
    CollectionUpdateRequest,
};
use crate::inbound::http::favourites::FavouriteCreateRequest;
use crate::inbound::http::relationships::{CloneRequest, RelationshipRequest};
use crate::inbound::http::serializers::{
    ApiErrorObject, CollectionEnvelope, CollectionListEnvelope, ErrorEnvelope, ErrorSource,
    FavouriteEnvelope, FavouriteListEnvelope, ResourceEnvelope, VocabularyEnvelope,
    VocabularyListEnvelope,
};
use crate::inbound::http::vocabularies::{VocabularyCreateRequest, VocabularyUpdateRequest};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vocabulary tagging API",
        description = "Tagging vocabularies, resource relationships, user \
                       collections, and favourites behind JSON:API-shaped \
                       envelopes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::vocabularies::list_vocabularies,
        crate::inbound::http::vocabularies::create_vocabulary,
        crate::inbound::http::vocabularies::get_vocabulary,
        crate::inbound::http::vocabularies::update_vocabulary,
        crate::inbound::http::vocabularies::delete_vocabulary,
        crate::inbound::http::relationships::get_dataset_vocabularies,
        crate::inbound::http::relationships::create_dataset_vocabularies,
        crate::inbound::http::relationships::clone_dataset_vocabularies,
        crate::inbound::http::relationships::create_dataset_vocabulary,
        crate::inbound::http::relationships::update_dataset_vocabulary,
        crate::inbound::http::relationships::delete_dataset_vocabulary,
        crate::inbound::http::collections::list_collections,
        crate::inbound::http::collections::create_collection,
        crate::inbound::http::collections::get_collection,
        crate::inbound::http::collections::update_collection,
        crate::inbound::http::collections::delete_collection,
        crate::inbound::http::collections::add_collection_resource,
        crate::inbound::http::collections::remove_collection_resource,
        crate::inbound::http::favourites::list_favourites,
        crate::inbound::http::favourites::create_favourite,
        crate::inbound::http::favourites::get_favourite,
        crate::inbound::http::favourites::delete_favourite,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorEnvelope,
        ApiErrorObject,
        ErrorSource,
        ResourceEnvelope,
        VocabularyEnvelope,
        VocabularyListEnvelope,
        CollectionEnvelope,
        CollectionListEnvelope,
        FavouriteEnvelope,
        FavouriteListEnvelope,
        VocabularyCreateRequest,
        VocabularyUpdateRequest,
        RelationshipRequest,
        CloneRequest,
        CollectionCreateRequest,
        CollectionUpdateRequest,
        CollectionResourceRequest,
        CollectionResourceAddRequest,
        FavouriteCreateRequest,
    )),
    tags(
        (name = "vocabulary", description = "Vocabulary CRUD"),
        (name = "relationships", description = "Tag associations between resources and vocabularies"),
        (name = "collection", description = "User-owned collections of resources"),
        (name = "favourite", description = "User bookmarks of resources"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_endpoint_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/vocabulary",
            "/api/v1/dataset/{dataset}/vocabulary",
            "/api/v1/collection",
            "/api/v1/favourite",
            "/health/ready",
        ] {
            assert!(
                paths.iter().any(|path| path.as_str() == expected),
                "missing path {expected}"
            );
        }
    }
}
