//! Tagged resources and the resource kind enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{TaggingError, TaggingResult, ValidationFailure};

/// The fixed set of resource kinds that can be tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A dataset registered with the platform.
    Dataset,
    /// A layer rendered on top of a dataset.
    Layer,
    /// A widget derived from a dataset.
    Widget,
}

impl ResourceType {
    /// Lowercase wire name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dataset => "dataset",
            Self::Layer => "layer",
            Self::Widget => "widget",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown resource kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type: {0}")]
pub struct ParseResourceTypeError(String);

impl FromStr for ResourceType {
    type Err = ParseResourceTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dataset" => Ok(Self::Dataset),
            "layer" => Ok(Self::Layer),
            "widget" => Ok(Self::Widget),
            other => Err(ParseResourceTypeError(other.to_owned())),
        }
    }
}

/// Parse a path segment into a [`ResourceType`], mapping failures into the
/// taxonomy so handlers can bubble them with `?`.
pub fn parse_resource_type(value: &str) -> TaggingResult<ResourceType> {
    value.parse().map_err(|_| {
        TaggingError::ResourceNotValid(vec![ValidationFailure::new(
            "resourceType",
            format!("{value} is not a valid resource type"),
        )])
    })
}

/// A vocabulary attachment carried by a resource document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyTag {
    /// Vocabulary name.
    pub name: String,
    /// Application owning the vocabulary.
    pub application: String,
    /// Tags associated through this relationship.
    pub tags: Vec<String>,
}

/// Key identifying one taggable resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRef {
    /// Resource identifier.
    pub id: String,
    /// Dataset the resource belongs to. Datasets reference themselves.
    pub dataset: String,
    /// Kind of the resource.
    pub resource_type: ResourceType,
}

impl ResourceRef {
    /// Reference for a dataset resource, which is its own dataset.
    pub fn dataset(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            dataset: id.clone(),
            id,
            resource_type: ResourceType::Dataset,
        }
    }
}

/// A taggable resource and its vocabulary attachments.
///
/// Invariant: each `(name, application)` pair appears at most once in
/// `vocabularies`; the duplicate checker enforces this before any write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Resource identifier.
    pub id: String,
    /// Dataset the resource belongs to.
    pub dataset: String,
    /// Kind of the resource.
    pub resource_type: ResourceType,
    /// Ordered vocabulary attachments.
    pub vocabularies: Vec<VocabularyTag>,
}

impl Resource {
    /// An untagged resource for the given reference.
    pub fn untagged(resource: &ResourceRef) -> Self {
        Self {
            id: resource.id.clone(),
            dataset: resource.dataset.clone(),
            resource_type: resource.resource_type,
            vocabularies: Vec::new(),
        }
    }

    /// Find the attachment for `(name, application)`, if any.
    pub fn vocabulary(&self, name: &str, application: &str) -> Option<&VocabularyTag> {
        self.vocabularies
            .iter()
            .find(|tag| tag.name == name && tag.application == application)
    }

    /// Remove the attachment for `(name, application)`; returns whether one
    /// was present.
    pub fn detach_vocabulary(&mut self, name: &str, application: &str) -> bool {
        let before = self.vocabularies.len();
        self.vocabularies
            .retain(|tag| !(tag.name == name && tag.application == application));
        self.vocabularies.len() != before
    }
}

/// Unvalidated single relationship payload: the tags to associate and the
/// application performing the association.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipCandidate {
    /// Tags to associate, required and non-empty.
    pub tags: Option<Vec<String>>,
    /// Application performing the association, required and non-empty.
    pub application: Option<String>,
}

/// A relationship payload that passed the joint tags/application rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRelationship {
    /// Application performing the association.
    pub application: String,
    /// Tags to associate.
    pub tags: Vec<String>,
}

/// Unvalidated clone payload naming the target dataset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneCandidate {
    /// Dataset that receives the cloned relationships.
    pub new_dataset: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("dataset", ResourceType::Dataset)]
    #[case("layer", ResourceType::Layer)]
    #[case("widget", ResourceType::Widget)]
    fn parses_every_member(#[case] raw: &str, #[case] expected: ResourceType) {
        assert_eq!(raw.parse::<ResourceType>().ok(), Some(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn rejects_unknown_kind_with_field_failure() {
        let error = parse_resource_type("table").expect_err("unknown kind must fail");
        let failures = error.failures().expect("validation payload");
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "resourceType");
    }

    #[test]
    fn vocabulary_lookup_matches_name_and_application() {
        let mut resource = Resource::untagged(&ResourceRef::dataset("d1"));
        resource.vocabularies.push(VocabularyTag {
            name: "climate".to_owned(),
            application: "rw".to_owned(),
            tags: vec!["co2".to_owned()],
        });

        assert!(resource.vocabulary("climate", "rw").is_some());
        assert!(resource.vocabulary("climate", "gfw").is_none());
        assert!(resource.detach_vocabulary("climate", "rw"));
        assert!(!resource.detach_vocabulary("climate", "rw"));
    }
}
