//! Domain error taxonomy.
//!
//! A closed set of typed failures raised by validators, duplicate checkers,
//! and the tagging services. These errors are transport agnostic: the inbound
//! HTTP adapter maps them to status codes and JSON:API error envelopes.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure.
///
/// Every `*NotValid` taxonomy member carries a non-empty ordered list of
/// these pairs; rendering preserves validation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFailure {
    /// Name of the offending request field.
    pub field: String,
    /// Human-readable description of the failed rule.
    pub message: String,
}

impl ValidationFailure {
    /// Build a failure for `field` with the given message.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Closed family of failures raised on the tagging write paths.
///
/// Single-message variants carry the offending key; `*NotValid` variants
/// carry the ordered field failures collected by the schema validators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaggingError {
    /// Resource lookup by id failed.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),
    /// Vocabulary lookup by name failed.
    #[error("vocabulary not found: {0}")]
    VocabularyNotFound(String),
    /// The resource carries no relationship with the named vocabulary.
    #[error("relationship not found: {0}")]
    RelationshipNotFound(String),
    /// Collection lookup by id failed.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),
    /// Favourite lookup by id failed.
    #[error("favourite not found: {0}")]
    FavouriteNotFound(String),

    /// A resource with the same key already exists.
    #[error("resource duplicated: {0}")]
    ResourceDuplicated(String),
    /// The resource pair is already a member of the collection.
    #[error("association duplicated: {0}")]
    AssociationDuplicated(String),
    /// The vocabulary is already attached to the resource.
    #[error("relationship duplicated: {0}")]
    RelationshipDuplicated(String),
    /// A vocabulary with the same name and application already exists.
    #[error("vocabulary duplicated: {0}")]
    VocabularyDuplicated(String),
    /// A collection with the same name, application, and owner already exists.
    #[error("collection duplicated: {0}")]
    CollectionDuplicated(String),
    /// The user already favourited this resource under this application.
    #[error("favourite duplicated: {0}")]
    FavouriteDuplicated(String),

    /// Resource payload failed field validation.
    #[error("resource not valid - {}", join_failures(.0))]
    ResourceNotValid(Vec<ValidationFailure>),
    /// A single relationship payload failed the joint tags/application rule.
    #[error("relationship not valid - {}", join_failures(.0))]
    RelationshipNotValid(Vec<ValidationFailure>),
    /// One or more keys of a bulk relationship payload failed validation.
    #[error("relationships not valid - {}", join_failures(.0))]
    RelationshipsNotValid(Vec<ValidationFailure>),
    /// Vocabulary payload failed field validation.
    #[error("vocabulary not valid - {}", join_failures(.0))]
    VocabularyNotValid(Vec<ValidationFailure>),
    /// Clone payload failed field validation.
    #[error("clone not valid - {}", join_failures(.0))]
    CloneNotValid(Vec<ValidationFailure>),
    /// Collection payload failed field validation.
    #[error("collection not valid - {}", join_failures(.0))]
    CollectionNotValid(Vec<ValidationFailure>),
    /// Favourite payload failed field validation.
    #[error("favourite not valid - {}", join_failures(.0))]
    FavouriteNotValid(Vec<ValidationFailure>),

    /// The request carries no authenticated user context.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// The authenticated user may not act on the requested application.
    #[error("access denied: {0}")]
    AccessDenied(String),
    /// Cross-entity state was found inconsistent.
    #[error("consistency violation: {0}")]
    ConsistencyViolation(String),
    /// The persistence layer or the graph collaborator rejected a write.
    #[error("resource update failed: {0}")]
    ResourceUpdateFailed(String),
}

impl TaggingError {
    /// Stable machine-readable code for the variant.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ResourceNotFound(_) => "resource_not_found",
            Self::VocabularyNotFound(_) => "vocabulary_not_found",
            Self::RelationshipNotFound(_) => "relationship_not_found",
            Self::CollectionNotFound(_) => "collection_not_found",
            Self::FavouriteNotFound(_) => "favourite_not_found",
            Self::ResourceDuplicated(_) => "resource_duplicated",
            Self::AssociationDuplicated(_) => "association_duplicated",
            Self::RelationshipDuplicated(_) => "relationship_duplicated",
            Self::VocabularyDuplicated(_) => "vocabulary_duplicated",
            Self::CollectionDuplicated(_) => "collection_duplicated",
            Self::FavouriteDuplicated(_) => "favourite_duplicated",
            Self::ResourceNotValid(_) => "resource_not_valid",
            Self::RelationshipNotValid(_) => "relationship_not_valid",
            Self::RelationshipsNotValid(_) => "relationships_not_valid",
            Self::VocabularyNotValid(_) => "vocabulary_not_valid",
            Self::CloneNotValid(_) => "clone_not_valid",
            Self::CollectionNotValid(_) => "collection_not_valid",
            Self::FavouriteNotValid(_) => "favourite_not_valid",
            Self::Unauthorized(_) => "unauthorized",
            Self::AccessDenied(_) => "access_denied",
            Self::ConsistencyViolation(_) => "consistency_violation",
            Self::ResourceUpdateFailed(_) => "resource_update_failed",
        }
    }

    /// Short human-readable title for the variant, used by the serializer.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::ResourceNotFound(_) => "Resource not found",
            Self::VocabularyNotFound(_) => "Vocabulary not found",
            Self::RelationshipNotFound(_) => "Relationship not found",
            Self::CollectionNotFound(_) => "Collection not found",
            Self::FavouriteNotFound(_) => "Favourite not found",
            Self::ResourceDuplicated(_) => "Resource duplicated",
            Self::AssociationDuplicated(_) => "Association duplicated",
            Self::RelationshipDuplicated(_) => "Relationship duplicated",
            Self::VocabularyDuplicated(_) => "Vocabulary duplicated",
            Self::CollectionDuplicated(_) => "Collection duplicated",
            Self::FavouriteDuplicated(_) => "Favourite duplicated",
            Self::ResourceNotValid(_) => "Resource not valid",
            Self::RelationshipNotValid(_) => "Relationship not valid",
            Self::RelationshipsNotValid(_) => "Relationships not valid",
            Self::VocabularyNotValid(_) => "Vocabulary not valid",
            Self::CloneNotValid(_) => "Clone not valid",
            Self::CollectionNotValid(_) => "Collection not valid",
            Self::FavouriteNotValid(_) => "Favourite not valid",
            Self::Unauthorized(_) => "Unauthorized",
            Self::AccessDenied(_) => "Access denied",
            Self::ConsistencyViolation(_) => "Consistency violation",
            Self::ResourceUpdateFailed(_) => "Resource update failed",
        }
    }

    /// Ordered field failures for `*NotValid` variants, `None` otherwise.
    pub fn failures(&self) -> Option<&[ValidationFailure]> {
        match self {
            Self::ResourceNotValid(failures)
            | Self::RelationshipNotValid(failures)
            | Self::RelationshipsNotValid(failures)
            | Self::VocabularyNotValid(failures)
            | Self::CloneNotValid(failures)
            | Self::CollectionNotValid(failures)
            | Self::FavouriteNotValid(failures) => Some(failures),
            _ => None,
        }
    }
}

/// Convenient result alias for validation and service paths.
pub type TaggingResult<T> = Result<T, TaggingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn not_valid_rendering_joins_failures_in_order() {
        let error = TaggingError::VocabularyNotValid(vec![
            ValidationFailure::new("name", "name can not be empty"),
            ValidationFailure::new("application", "application can not be empty"),
        ]);

        assert_eq!(
            error.to_string(),
            "vocabulary not valid - name: name can not be empty - \
             application: application can not be empty"
        );
    }

    #[test]
    fn single_message_variants_render_their_key() {
        let error = TaggingError::CollectionDuplicated("Forests".to_owned());
        assert_eq!(error.to_string(), "collection duplicated: Forests");
    }

    #[rstest]
    #[case::not_found(TaggingError::VocabularyNotFound("x".to_owned()), "vocabulary_not_found")]
    #[case::duplicated(TaggingError::FavouriteDuplicated("x".to_owned()), "favourite_duplicated")]
    #[case::not_valid(TaggingError::CloneNotValid(Vec::new()), "clone_not_valid")]
    #[case::denied(TaggingError::AccessDenied("x".to_owned()), "access_denied")]
    fn codes_are_stable(#[case] error: TaggingError, #[case] code: &str) {
        assert_eq!(error.code(), code);
    }

    #[test]
    fn failures_accessor_exposes_only_not_valid_payloads() {
        let failures = vec![ValidationFailure::new("tags", "tags can not be empty")];
        let not_valid = TaggingError::RelationshipNotValid(failures.clone());
        assert_eq!(not_valid.failures(), Some(failures.as_slice()));

        let duplicated = TaggingError::RelationshipDuplicated("vocab".to_owned());
        assert!(duplicated.failures().is_none());
    }
}
