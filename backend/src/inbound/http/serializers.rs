//! JSON:API-shaped serializers for entities and errors.
//!
//! Pure total mappings from domain shapes to the wire envelopes: top-level
//! `data` carrying `{id, type, attributes}` elements, or top-level `errors`
//! carrying one entry per field failure. Serializers never validate and
//! never mutate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    Collection, Favourite, Resource, TaggingError, Vocabulary,
};

/// Pointer to the request field an error entry refers to.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorSource {
    /// Name of the offending request field.
    pub parameter: String,
}

/// One JSON:API error object.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiErrorObject {
    /// Field pointer; present for validation failures only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
    /// Short summary of the failure category.
    pub title: String,
    /// Human-readable detail for this entry.
    pub detail: String,
    /// Stable machine-readable code.
    pub code: String,
}

/// Top-level `errors` envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    /// Error objects, one per field failure.
    pub errors: Vec<ApiErrorObject>,
}

/// Map a taxonomy member to its error envelope.
///
/// `*NotValid` members yield one entry per field failure, each pointing at
/// its field through `source.parameter`; single-message members yield one
/// entry without a source.
pub fn serialize_error(error: &TaggingError) -> ErrorEnvelope {
    let errors = error.failures().map_or_else(
        || {
            vec![ApiErrorObject {
                source: None,
                title: error.title().to_owned(),
                detail: error.to_string(),
                code: error.code().to_owned(),
            }]
        },
        |failures| {
            failures
                .iter()
                .map(|failure| ApiErrorObject {
                    source: Some(ErrorSource {
                        parameter: failure.field.clone(),
                    }),
                    title: error.title().to_owned(),
                    detail: failure.message.clone(),
                    code: error.code().to_owned(),
                })
                .collect()
        },
    );
    ErrorEnvelope { errors }
}

/// Vocabulary attachment as rendered inside resource attributes.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyTagDto {
    /// Vocabulary name.
    pub name: String,
    /// Application owning the vocabulary.
    pub application: String,
    /// Tags associated through this relationship.
    pub tags: Vec<String>,
}

/// Attributes of a serialized resource.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAttributes {
    /// Dataset the resource belongs to.
    pub dataset: String,
    /// Kind of the resource.
    pub resource_type: String,
    /// Ordered vocabulary attachments.
    pub vocabularies: Vec<VocabularyTagDto>,
}

/// One serialized resource element.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResourceData {
    /// Resource identifier.
    pub id: String,
    /// JSON:API element type, always `resource`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Resource attributes.
    pub attributes: ResourceAttributes,
}

/// Top-level envelope for one resource.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResourceEnvelope {
    /// The serialized resource.
    pub data: ResourceData,
}

/// Serialize a resource and its attachments.
pub fn serialize_resource(resource: &Resource) -> ResourceEnvelope {
    ResourceEnvelope {
        data: ResourceData {
            id: resource.id.clone(),
            kind: "resource".to_owned(),
            attributes: ResourceAttributes {
                dataset: resource.dataset.clone(),
                resource_type: resource.resource_type.to_string(),
                vocabularies: resource
                    .vocabularies
                    .iter()
                    .map(|tag| VocabularyTagDto {
                        name: tag.name.clone(),
                        application: tag.application.clone(),
                        tags: tag.tags.clone(),
                    })
                    .collect(),
            },
        },
    }
}

/// Resource attachment as rendered inside vocabulary attributes.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTagDto {
    /// Resource identifier.
    pub id: String,
    /// Dataset the resource belongs to.
    pub dataset: String,
    /// Kind of the resource.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Tags associated through this relationship.
    pub tags: Vec<String>,
}

/// Attributes of a serialized vocabulary.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyAttributes {
    /// Application owning the vocabulary.
    pub application: String,
    /// Lifecycle status.
    pub status: String,
    /// Ordered resource attachments.
    pub resources: Vec<ResourceTagDto>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// One serialized vocabulary element.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VocabularyData {
    /// Vocabulary name; its identifier within an application.
    pub id: String,
    /// JSON:API element type, always `vocabulary`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Vocabulary attributes.
    pub attributes: VocabularyAttributes,
}

/// Top-level envelope for one vocabulary.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VocabularyEnvelope {
    /// The serialized vocabulary.
    pub data: VocabularyData,
}

/// Top-level envelope for a vocabulary list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VocabularyListEnvelope {
    /// The serialized vocabularies.
    pub data: Vec<VocabularyData>,
}

fn vocabulary_data(vocabulary: &Vocabulary) -> VocabularyData {
    VocabularyData {
        id: vocabulary.name.clone(),
        kind: "vocabulary".to_owned(),
        attributes: VocabularyAttributes {
            application: vocabulary.application.clone(),
            status: vocabulary.status.to_string(),
            resources: vocabulary
                .resources
                .iter()
                .map(|tag| ResourceTagDto {
                    id: tag.id.clone(),
                    dataset: tag.dataset.clone(),
                    resource_type: tag.resource_type.to_string(),
                    tags: tag.tags.clone(),
                })
                .collect(),
            created_at: vocabulary.created_at,
            updated_at: vocabulary.updated_at,
        },
    }
}

/// Serialize one vocabulary.
pub fn serialize_vocabulary(vocabulary: &Vocabulary) -> VocabularyEnvelope {
    VocabularyEnvelope {
        data: vocabulary_data(vocabulary),
    }
}

/// Serialize a vocabulary list.
pub fn serialize_vocabularies(vocabularies: &[Vocabulary]) -> VocabularyListEnvelope {
    VocabularyListEnvelope {
        data: vocabularies.iter().map(vocabulary_data).collect(),
    }
}

/// Resource reference as rendered inside collection attributes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectionResourceDto {
    /// Resource identifier.
    pub id: String,
    /// Kind of the resource.
    #[serde(rename = "type")]
    pub resource_type: String,
}

/// Attributes of a serialized collection.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionAttributes {
    /// Collection name.
    pub name: String,
    /// Application the collection belongs to.
    pub application: String,
    /// Identifier of the owning user.
    pub owner_id: String,
    /// Ordered resource references.
    pub resources: Vec<CollectionResourceDto>,
}

/// One serialized collection element.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectionData {
    /// Collection identifier.
    pub id: String,
    /// JSON:API element type, always `collection`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Collection attributes.
    pub attributes: CollectionAttributes,
}

/// Top-level envelope for one collection.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectionEnvelope {
    /// The serialized collection.
    pub data: CollectionData,
}

/// Top-level envelope for a collection list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CollectionListEnvelope {
    /// The serialized collections.
    pub data: Vec<CollectionData>,
}

fn collection_data(collection: &Collection) -> CollectionData {
    CollectionData {
        id: collection.id.to_string(),
        kind: "collection".to_owned(),
        attributes: CollectionAttributes {
            name: collection.name.clone(),
            application: collection.application.clone(),
            owner_id: collection.owner_id.clone(),
            resources: collection
                .resources
                .iter()
                .map(|member| CollectionResourceDto {
                    id: member.id.clone(),
                    resource_type: member.resource_type.to_string(),
                })
                .collect(),
        },
    }
}

/// Serialize one collection.
pub fn serialize_collection(collection: &Collection) -> CollectionEnvelope {
    CollectionEnvelope {
        data: collection_data(collection),
    }
}

/// Serialize a collection list.
pub fn serialize_collections(collections: &[Collection]) -> CollectionListEnvelope {
    CollectionListEnvelope {
        data: collections.iter().map(collection_data).collect(),
    }
}

/// Attributes of a serialized favourite.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteAttributes {
    /// Application the favourite belongs to.
    pub application: String,
    /// Kind of the bookmarked resource.
    pub resource_type: String,
    /// Identifier of the bookmarked resource.
    pub resource_id: String,
    /// Identifier of the owning user.
    pub user_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// One serialized favourite element.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavouriteData {
    /// Favourite identifier.
    pub id: String,
    /// JSON:API element type, always `favourite`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Favourite attributes.
    pub attributes: FavouriteAttributes,
}

/// Top-level envelope for one favourite.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavouriteEnvelope {
    /// The serialized favourite.
    pub data: FavouriteData,
}

/// Top-level envelope for a favourite list.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FavouriteListEnvelope {
    /// The serialized favourites.
    pub data: Vec<FavouriteData>,
}

fn favourite_data(favourite: &Favourite) -> FavouriteData {
    FavouriteData {
        id: favourite.id.to_string(),
        kind: "favourite".to_owned(),
        attributes: FavouriteAttributes {
            application: favourite.application.clone(),
            resource_type: favourite.resource_type.to_string(),
            resource_id: favourite.resource_id.clone(),
            user_id: favourite.user_id.clone(),
            created_at: favourite.created_at,
        },
    }
}

/// Serialize one favourite.
pub fn serialize_favourite(favourite: &Favourite) -> FavouriteEnvelope {
    FavouriteEnvelope {
        data: favourite_data(favourite),
    }
}

/// Serialize a favourite list.
pub fn serialize_favourites(favourites: &[Favourite]) -> FavouriteListEnvelope {
    FavouriteListEnvelope {
        data: favourites.iter().map(favourite_data).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ResourceRef, ResourceType, ValidationFailure, VocabularyStatus, VocabularyTag,
    };
    use serde_json::json;

    #[test]
    fn validation_error_yields_one_entry_per_failure() {
        let failures = vec![
            ValidationFailure::new("name", "name can not be empty"),
            ValidationFailure::new("application", "application can not be empty"),
            ValidationFailure::new("resources", "resources must be an array"),
        ];
        let envelope = serialize_error(&TaggingError::VocabularyNotValid(failures));

        assert_eq!(envelope.errors.len(), 3);
        for entry in &envelope.errors {
            let source = entry.source.as_ref().expect("field pointer present");
            assert!(!source.parameter.is_empty());
            assert!(!entry.title.is_empty());
            assert!(!entry.detail.is_empty());
            assert_eq!(entry.code, "vocabulary_not_valid");
        }
        assert_eq!(envelope.errors[0].source.as_ref().map(|s| s.parameter.as_str()), Some("name"));
    }

    #[test]
    fn single_message_error_yields_one_entry_without_source() {
        let envelope =
            serialize_error(&TaggingError::CollectionDuplicated("Forests".to_owned()));
        assert_eq!(envelope.errors.len(), 1);
        assert!(envelope.errors[0].source.is_none());
        assert_eq!(envelope.errors[0].code, "collection_duplicated");

        let wire = serde_json::to_value(&envelope).expect("envelope serializes");
        assert!(
            wire["errors"][0].get("source").is_none(),
            "absent source must be omitted, not null"
        );
    }

    #[test]
    fn resource_envelope_carries_id_type_attributes() {
        let mut resource = Resource::untagged(&ResourceRef::dataset("d1"));
        resource.vocabularies.push(VocabularyTag {
            name: "climate".to_owned(),
            application: "rw".to_owned(),
            tags: vec!["co2".to_owned()],
        });

        let wire = serde_json::to_value(serialize_resource(&resource)).expect("serializes");
        assert_eq!(wire["data"]["id"], json!("d1"));
        assert_eq!(wire["data"]["type"], json!("resource"));
        assert_eq!(
            wire["data"]["attributes"]["vocabularies"][0]["name"],
            json!("climate")
        );
    }

    #[test]
    fn vocabulary_list_envelope_serializes_each_element() {
        let now = chrono::Utc::now();
        let vocabularies = vec![
            Vocabulary::new("climate", "rw", VocabularyStatus::Published, now),
            Vocabulary::new("forests", "rw", VocabularyStatus::Draft, now),
        ];

        let wire =
            serde_json::to_value(serialize_vocabularies(&vocabularies)).expect("serializes");
        assert_eq!(wire["data"].as_array().map(Vec::len), Some(2));
        assert_eq!(wire["data"][0]["id"], json!("climate"));
        assert_eq!(wire["data"][1]["attributes"]["status"], json!("draft"));
    }

    #[test]
    fn favourite_envelope_uses_camel_case_attributes() {
        let favourite = Favourite {
            id: uuid::Uuid::nil(),
            application: "rw".to_owned(),
            resource_type: ResourceType::Dataset,
            resource_id: "abc".to_owned(),
            user_id: "u1".to_owned(),
            created_at: chrono::Utc::now(),
        };

        let wire = serde_json::to_value(serialize_favourite(&favourite)).expect("serializes");
        assert_eq!(wire["data"]["type"], json!("favourite"));
        assert_eq!(wire["data"]["attributes"]["resourceId"], json!("abc"));
        assert_eq!(wire["data"]["attributes"]["userId"], json!("u1"));
    }
}
