//! HTTP adapter mapping for the domain error taxonomy.
//!
//! Purpose: keep [`TaggingError`] transport-agnostic while letting Actix
//! handlers turn failures into JSON:API error envelopes with the right
//! status class: bad input (400), missing context (401), forbidden
//! application (403), missing entity (404), conflicting write (409), and
//! internal inconsistency or rejected write (500).

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use super::serializers::serialize_error;
use crate::domain::TaggingError;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, TaggingError>;

fn status_for(error: &TaggingError) -> StatusCode {
    match error {
        TaggingError::ResourceNotValid(_)
        | TaggingError::RelationshipNotValid(_)
        | TaggingError::RelationshipsNotValid(_)
        | TaggingError::VocabularyNotValid(_)
        | TaggingError::CloneNotValid(_)
        | TaggingError::CollectionNotValid(_)
        | TaggingError::FavouriteNotValid(_) => StatusCode::BAD_REQUEST,
        TaggingError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        TaggingError::AccessDenied(_) => StatusCode::FORBIDDEN,
        TaggingError::ResourceNotFound(_)
        | TaggingError::VocabularyNotFound(_)
        | TaggingError::RelationshipNotFound(_)
        | TaggingError::CollectionNotFound(_)
        | TaggingError::FavouriteNotFound(_) => StatusCode::NOT_FOUND,
        TaggingError::ResourceDuplicated(_)
        | TaggingError::AssociationDuplicated(_)
        | TaggingError::RelationshipDuplicated(_)
        | TaggingError::VocabularyDuplicated(_)
        | TaggingError::CollectionDuplicated(_)
        | TaggingError::FavouriteDuplicated(_) => StatusCode::CONFLICT,
        TaggingError::ConsistencyViolation(_) | TaggingError::ResourceUpdateFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl ResponseError for TaggingError {
    fn status_code(&self) -> StatusCode {
        status_for(self)
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!(code = self.code(), error = %self, "request failed");
        }
        HttpResponse::build(self.status_code()).json(serialize_error(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidationFailure;
    use actix_web::body::to_bytes;
    use rstest::rstest;

    #[rstest]
    #[case::not_valid(
        TaggingError::VocabularyNotValid(vec![ValidationFailure::new("name", "empty")]),
        StatusCode::BAD_REQUEST
    )]
    #[case::unauthorized(
        TaggingError::Unauthorized("loggedUser missing".to_owned()),
        StatusCode::UNAUTHORIZED
    )]
    #[case::denied(TaggingError::AccessDenied("nope".to_owned()), StatusCode::FORBIDDEN)]
    #[case::not_found(
        TaggingError::VocabularyNotFound("climate".to_owned()),
        StatusCode::NOT_FOUND
    )]
    #[case::duplicated(
        TaggingError::CollectionDuplicated("Forests".to_owned()),
        StatusCode::CONFLICT
    )]
    #[case::inconsistent(
        TaggingError::ConsistencyViolation("one-sided".to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    #[case::update_failed(
        TaggingError::ResourceUpdateFailed("store down".to_owned()),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn maps_taxonomy_to_status_classes(#[case] error: TaggingError, #[case] status: StatusCode) {
        assert_eq!(error.status_code(), status);
    }

    #[actix_rt::test]
    async fn response_body_is_a_json_api_error_envelope() {
        let error = TaggingError::RelationshipNotValid(vec![ValidationFailure::new(
            "tags",
            "tags must be a non-empty array and application must be a non-empty string",
        )]);

        let response = error.error_response();
        let body = to_bytes(response.into_body()).await.expect("body bytes");
        let wire: serde_json::Value = serde_json::from_slice(&body).expect("JSON body");

        assert_eq!(wire["errors"][0]["source"]["parameter"], "tags");
        assert_eq!(wire["errors"][0]["code"], "relationship_not_valid");
    }
}
