//! Schema validators for the tagging write paths.
//!
//! Each validator is a pure function over a typed candidate: field-shape
//! checks only, no store lookups. Duplicate detection runs afterwards in the
//! services, against the canonical forms produced here. Per-entity semantics
//! differ deliberately: the collection validator rejects a malformed
//! `resources` array in aggregate (fail-fast), while the bulk relationship
//! validator collects every failing key before reporting.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::auth::LoggedUser;
use super::collection::{
    CollectionCandidate, CollectionResource, CollectionResourceCandidate, CollectionUpdate,
    ValidCollection,
};
use super::error::{TaggingError, TaggingResult, ValidationFailure};
use super::favourite::{FavouriteCandidate, ValidFavourite};
use super::resource::{CloneCandidate, RelationshipCandidate, ResourceType, ValidRelationship};
use super::vocabulary::{ValidVocabulary, VocabularyCandidate};

/// Reserved body key carrying the authenticated context; never a resource.
pub const LOGGED_USER_KEY: &str = "loggedUser";

const RELATIONSHIP_RULE: &str =
    "tags must be a non-empty array and application must be a non-empty string";

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|raw| raw.trim().is_empty())
}

fn required_lowercase(
    value: Option<String>,
    field: &'static str,
    failures: &mut Vec<ValidationFailure>,
) -> String {
    match value {
        Some(raw) if !raw.trim().is_empty() => raw.to_lowercase(),
        _ => {
            failures.push(ValidationFailure::new(
                field,
                format!("{field} can not be empty"),
            ));
            String::new()
        }
    }
}

/// Validate a collection create payload.
///
/// `application` defaults to `default_application` when absent; when present
/// it must be one of the caller's authorized applications, otherwise the
/// failure is [`TaggingError::AccessDenied`], distinct from validation.
///
/// # Errors
///
/// Returns [`TaggingError::CollectionNotValid`] on field failures and
/// [`TaggingError::AccessDenied`] on an unauthorized application.
pub fn validate_collection(
    candidate: CollectionCandidate,
    user: &LoggedUser,
    default_application: &str,
) -> TaggingResult<ValidCollection> {
    let mut failures = Vec::new();

    let name = match candidate.name {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => {
            failures.push(ValidationFailure::new("name", "name can not be empty"));
            String::new()
        }
    };

    let resources = match candidate.resources {
        Some(raw) => match validate_resource_elements(&raw) {
            Ok(valid) => valid,
            Err(failure) => {
                failures.push(failure);
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    if !failures.is_empty() {
        return Err(TaggingError::CollectionNotValid(failures));
    }

    let application = match candidate.application {
        Some(requested) => {
            if !user.may_use_application(&requested) {
                return Err(TaggingError::AccessDenied(format!(
                    "user {} is not authorized for application {requested}",
                    user.id
                )));
            }
            requested
        }
        None => default_application.to_owned(),
    };

    Ok(ValidCollection {
        name,
        application,
        resources,
    })
}

/// Validate a collection update payload; absent fields pass through as
/// `None`.
///
/// # Errors
///
/// Returns [`TaggingError::CollectionNotValid`] when the replacement name is
/// empty or the replacement `resources` array is malformed.
pub fn validate_collection_update(
    update: CollectionUpdate,
) -> TaggingResult<(Option<String>, Option<Vec<CollectionResource>>)> {
    let mut failures = Vec::new();

    let name = match update.name {
        Some(raw) if raw.trim().is_empty() => {
            failures.push(ValidationFailure::new("name", "name can not be empty"));
            None
        }
        other => other,
    };

    let resources = match update.resources {
        Some(raw) => match validate_resource_elements(&raw) {
            Ok(valid) => Some(valid),
            Err(failure) => {
                failures.push(failure);
                None
            }
        },
        None => None,
    };

    if failures.is_empty() {
        Ok((name, resources))
    } else {
        Err(TaggingError::CollectionNotValid(failures))
    }
}

/// Validate one element of a collection's `resources` array.
///
/// # Errors
///
/// Returns [`TaggingError::CollectionNotValid`] when `id` or `type` is
/// missing or `type` is outside the resource enum.
pub fn validate_collection_resource(
    candidate: &CollectionResourceCandidate,
) -> TaggingResult<CollectionResource> {
    element_to_resource(candidate).map_err(|failure| TaggingError::CollectionNotValid(vec![failure]))
}

// One malformed element invalidates the whole array: the caller gets a
// single aggregate failure on `resources`, not a per-element report.
fn validate_resource_elements(
    elements: &[CollectionResourceCandidate],
) -> Result<Vec<CollectionResource>, ValidationFailure> {
    let mut valid = Vec::with_capacity(elements.len());
    for element in elements {
        match element_to_resource(element) {
            Ok(resource) => valid.push(resource),
            Err(_) => {
                return Err(ValidationFailure::new(
                    "resources",
                    "resources must contain a non-empty id and a valid type for every element",
                ));
            }
        }
    }
    Ok(valid)
}

fn element_to_resource(
    candidate: &CollectionResourceCandidate,
) -> Result<CollectionResource, ValidationFailure> {
    let id = candidate
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let resource_type = candidate
        .resource_type
        .as_deref()
        .and_then(|raw| raw.parse::<ResourceType>().ok());

    match (id, resource_type) {
        (Some(id), Some(resource_type)) => Ok(CollectionResource {
            id: id.to_owned(),
            resource_type,
        }),
        _ => Err(ValidationFailure::new(
            "resources",
            "resources must contain a non-empty id and a valid type for every element",
        )),
    }
}

/// Validate a favourite create payload.
///
/// # Errors
///
/// Returns [`TaggingError::FavouriteNotValid`] when `resourceType` is absent
/// or outside the resource enum, or `resourceId` is absent or empty.
pub fn validate_favourite(
    candidate: FavouriteCandidate,
    default_application: &str,
) -> TaggingResult<ValidFavourite> {
    let mut failures = Vec::new();

    let resource_type = match candidate.resource_type.as_deref() {
        None => {
            failures.push(ValidationFailure::new(
                "resourceType",
                "resourceType can not be empty",
            ));
            None
        }
        Some(raw) => match raw.parse::<ResourceType>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                failures.push(ValidationFailure::new(
                    "resourceType",
                    "resourceType must be one of dataset, layer, widget",
                ));
                None
            }
        },
    };

    let resource_id = match candidate.resource_id {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => {
            failures.push(ValidationFailure::new(
                "resourceId",
                "resourceId can not be empty",
            ));
            String::new()
        }
    };

    match (resource_type, failures.is_empty()) {
        (Some(resource_type), true) => Ok(ValidFavourite {
            resource_type,
            resource_id,
            application: candidate
                .application
                .unwrap_or_else(|| default_application.to_owned()),
        }),
        _ => Err(TaggingError::FavouriteNotValid(failures)),
    }
}

/// Validate a single relationship payload.
///
/// `tags` must be a non-empty array and `application` a non-empty string,
/// jointly; either condition failing raises one combined failure attributed
/// to the `tags` field.
///
/// # Errors
///
/// Returns [`TaggingError::RelationshipNotValid`] when the joint rule fails.
pub fn validate_relationship(
    candidate: &RelationshipCandidate,
) -> TaggingResult<ValidRelationship> {
    relationship_rule(candidate)
        .ok_or_else(|| {
            TaggingError::RelationshipNotValid(vec![ValidationFailure::new(
                "tags",
                RELATIONSHIP_RULE,
            )])
        })
}

fn relationship_rule(candidate: &RelationshipCandidate) -> Option<ValidRelationship> {
    let tags = candidate.tags.as_ref().filter(|tags| !tags.is_empty())?;
    if is_blank(candidate.application.as_ref()) {
        return None;
    }
    candidate.application.as_ref().map(|application| ValidRelationship {
        application: application.clone(),
        tags: tags.clone(),
    })
}

/// Validate a bulk relationship payload: a map from vocabulary key to
/// `{application, tags}`.
///
/// The reserved `loggedUser` key is skipped. Every other key is validated
/// independently against the joint rule of [`validate_relationship`], and
/// all failing keys are collected into one error. This is deliberately not
/// fail-fast, unlike the collection array check.
///
/// # Errors
///
/// Returns [`TaggingError::RelationshipsNotValid`] listing every failing
/// key, or when no resource key is present at all.
pub fn validate_relationships(
    body: &Map<String, Value>,
) -> TaggingResult<BTreeMap<String, ValidRelationship>> {
    let mut failures = Vec::new();
    let mut valid = BTreeMap::new();

    for (key, value) in body {
        if key == LOGGED_USER_KEY {
            continue;
        }
        let candidate: RelationshipCandidate =
            serde_json::from_value(value.clone()).unwrap_or_default();
        match relationship_rule(&candidate) {
            Some(relationship) => {
                valid.insert(key.clone(), relationship);
            }
            None => failures.push(ValidationFailure::new(key.clone(), RELATIONSHIP_RULE)),
        }
    }

    if !failures.is_empty() {
        return Err(TaggingError::RelationshipsNotValid(failures));
    }
    if valid.is_empty() {
        return Err(TaggingError::RelationshipsNotValid(vec![
            ValidationFailure::new("relationships", "at least one relationship is required"),
        ]));
    }
    Ok(valid)
}

/// Validate a vocabulary write payload.
///
/// `name` and `application` are lower-cased here so the duplicate checker
/// compares canonical forms; skipping normalization would let `Climate` and
/// `climate` coexist.
///
/// # Errors
///
/// Returns [`TaggingError::VocabularyNotValid`] when either field is absent
/// or empty.
pub fn validate_vocabulary(candidate: VocabularyCandidate) -> TaggingResult<ValidVocabulary> {
    let mut failures = Vec::new();
    let name = required_lowercase(candidate.name, "name", &mut failures);
    let application = required_lowercase(candidate.application, "application", &mut failures);

    if failures.is_empty() {
        Ok(ValidVocabulary {
            name,
            application,
            status: candidate.status.unwrap_or_default(),
        })
    } else {
        Err(TaggingError::VocabularyNotValid(failures))
    }
}

/// Validate a clone payload, returning the canonical target dataset.
///
/// # Errors
///
/// Returns [`TaggingError::CloneNotValid`] when `newDataset` is absent or
/// empty.
pub fn validate_clone(candidate: CloneCandidate) -> TaggingResult<String> {
    let mut failures = Vec::new();
    let new_dataset = required_lowercase(candidate.new_dataset, "newDataset", &mut failures);
    if failures.is_empty() {
        Ok(new_dataset)
    } else {
        Err(TaggingError::CloneNotValid(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::ExtraUserData;
    use rstest::rstest;
    use serde_json::json;

    fn user(apps: &[&str]) -> LoggedUser {
        LoggedUser {
            id: "u1".to_owned(),
            extra_user_data: ExtraUserData {
                apps: apps.iter().map(|app| (*app).to_owned()).collect(),
            },
        }
    }

    fn relationship(tags: Option<Vec<&str>>, application: Option<&str>) -> RelationshipCandidate {
        RelationshipCandidate {
            tags: tags.map(|tags| tags.into_iter().map(str::to_owned).collect()),
            application: application.map(str::to_owned),
        }
    }

    #[test]
    fn collection_requires_a_name() {
        let error = validate_collection(CollectionCandidate::default(), &user(&["rw"]), "rw")
            .expect_err("empty candidate must fail");
        let failures = error.failures().expect("validation payload");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "name");
    }

    #[test]
    fn collection_defaults_application_when_absent() {
        let valid = validate_collection(
            CollectionCandidate {
                name: Some("Forests".to_owned()),
                ..CollectionCandidate::default()
            },
            &user(&[]),
            "rw",
        )
        .expect("default application requires no grant");
        assert_eq!(valid.application, "rw");
    }

    #[test]
    fn collection_rejects_unauthorized_application_as_access_denied() {
        let error = validate_collection(
            CollectionCandidate {
                name: Some("Forests".to_owned()),
                application: Some("gfw".to_owned()),
                resources: None,
            },
            &user(&["rw"]),
            "rw",
        )
        .expect_err("unauthorized application must fail");
        assert!(matches!(error, TaggingError::AccessDenied(_)));
    }

    #[rstest]
    #[case::missing_id(None, Some("dataset"))]
    #[case::missing_type(Some("d1"), None)]
    #[case::unknown_type(Some("d1"), Some("table"))]
    fn collection_invalidates_whole_resources_array(
        #[case] id: Option<&str>,
        #[case] resource_type: Option<&str>,
    ) {
        let candidate = CollectionCandidate {
            name: Some("Forests".to_owned()),
            application: None,
            resources: Some(vec![
                CollectionResourceCandidate {
                    id: Some("ok".to_owned()),
                    resource_type: Some("dataset".to_owned()),
                },
                CollectionResourceCandidate {
                    id: id.map(str::to_owned),
                    resource_type: resource_type.map(str::to_owned),
                },
            ]),
        };

        let error = validate_collection(candidate, &user(&["rw"]), "rw")
            .expect_err("one malformed element must invalidate the array");
        let failures = error.failures().expect("validation payload");
        assert_eq!(failures.len(), 1, "aggregate failure, not per element");
        assert_eq!(failures[0].field, "resources");
    }

    #[test]
    fn favourite_requires_enum_member_and_id() {
        let error = validate_favourite(
            FavouriteCandidate {
                resource_type: Some("table".to_owned()),
                resource_id: None,
                application: None,
            },
            "rw",
        )
        .expect_err("bad type and missing id must fail");
        let failures = error.failures().expect("validation payload");
        let fields: Vec<&str> = failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["resourceType", "resourceId"]);
    }

    #[test]
    fn favourite_accepts_enum_member() {
        let valid = validate_favourite(
            FavouriteCandidate {
                resource_type: Some("dataset".to_owned()),
                resource_id: Some("abc".to_owned()),
                application: None,
            },
            "rw",
        )
        .expect("well-formed favourite");
        assert_eq!(valid.resource_type, ResourceType::Dataset);
        assert_eq!(valid.application, "rw");
    }

    #[rstest]
    #[case::no_tags(None, Some("rw"))]
    #[case::empty_tags(Some(vec![]), Some("rw"))]
    #[case::no_application(Some(vec!["forest"]), None)]
    #[case::blank_application(Some(vec!["forest"]), Some("  "))]
    fn relationship_joint_rule_attributes_failure_to_tags(
        #[case] tags: Option<Vec<&str>>,
        #[case] application: Option<&str>,
    ) {
        let error = validate_relationship(&relationship(tags, application))
            .expect_err("joint rule must fail");
        let failures = error.failures().expect("validation payload");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "tags");
    }

    #[test]
    fn relationship_succeeds_iff_both_conditions_hold() {
        let valid = validate_relationship(&relationship(Some(vec!["forest"]), Some("rw")))
            .expect("both conditions hold");
        assert_eq!(valid.tags, vec!["forest".to_owned()]);
        assert_eq!(valid.application, "rw");
    }

    #[test]
    fn relationships_skip_logged_user_and_collect_all_failures() {
        let body = json!({
            "good": {"application": "rw", "tags": ["forest"]},
            "broken-a": {"application": "rw", "tags": []},
            "broken-b": {"tags": ["x"]},
            "loggedUser": {"id": "u1", "extraUserData": {"apps": ["rw"]}},
        });
        let map = body.as_object().expect("object body");

        let error = validate_relationships(map).expect_err("failing keys must be reported");
        let failures = error.failures().expect("validation payload");
        let fields: Vec<&str> = failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["broken-a", "broken-b"],
            "all failing keys reported together, loggedUser skipped"
        );
    }

    #[test]
    fn relationships_validate_each_key_independently() {
        let body = json!({
            "vocab-a": {"application": "rw", "tags": ["forest"]},
            "vocab-b": {"application": "gfw", "tags": ["water"]},
            "loggedUser": {"id": "u1"},
        });
        let map = body.as_object().expect("object body");

        let valid = validate_relationships(map).expect("all keys valid");
        assert_eq!(valid.len(), 2);
        assert!(valid.contains_key("vocab-a"));
        assert!(!valid.contains_key(LOGGED_USER_KEY));
    }

    #[test]
    fn relationships_require_at_least_one_key() {
        let body = json!({"loggedUser": {"id": "u1"}});
        let map = body.as_object().expect("object body");
        let error = validate_relationships(map).expect_err("empty body must fail");
        assert!(matches!(error, TaggingError::RelationshipsNotValid(_)));
    }

    #[rstest]
    #[case::mixed_case("Climate", "RW")]
    #[case::already_canonical("climate", "rw")]
    fn vocabulary_normalization_is_idempotent(#[case] name: &str, #[case] application: &str) {
        let valid = validate_vocabulary(VocabularyCandidate {
            name: Some(name.to_owned()),
            application: Some(application.to_owned()),
            status: None,
        })
        .expect("well-formed vocabulary");

        assert_eq!(valid.name, "climate");
        assert_eq!(valid.application, "rw");
    }

    #[test]
    fn vocabulary_collects_both_field_failures() {
        let error = validate_vocabulary(VocabularyCandidate::default())
            .expect_err("empty candidate must fail");
        let failures = error.failures().expect("validation payload");
        let fields: Vec<&str> = failures.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "application"]);
    }

    #[rstest]
    #[case::mixed_case("NewForests", "newforests")]
    #[case::already_canonical("newforests", "newforests")]
    fn clone_normalization_is_idempotent(#[case] raw: &str, #[case] canonical: &str) {
        let dataset = validate_clone(CloneCandidate {
            new_dataset: Some(raw.to_owned()),
        })
        .expect("well-formed clone payload");
        assert_eq!(dataset, canonical);
    }

    #[test]
    fn clone_requires_new_dataset() {
        let error = validate_clone(CloneCandidate::default()).expect_err("missing target");
        let failures = error.failures().expect("validation payload");
        assert_eq!(failures[0].field, "newDataset");
    }
}
