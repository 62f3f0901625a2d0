//! User bookmarks of single resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resource::ResourceType;

/// A user-owned bookmark of one resource.
///
/// Invariant: `(application, resource_type, resource_id, user_id)` is unique;
/// the duplicate checker probes the store before any create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favourite {
    /// Stable favourite identifier.
    pub id: Uuid,
    /// Application the favourite belongs to.
    pub application: String,
    /// Kind of the bookmarked resource.
    pub resource_type: ResourceType,
    /// Identifier of the bookmarked resource.
    pub resource_id: String,
    /// Identifier of the owning user.
    pub user_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Unvalidated favourite create payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteCandidate {
    /// Kind of the resource, required and drawn from the
    /// [`ResourceType`] enum.
    pub resource_type: Option<String>,
    /// Identifier of the resource, required.
    pub resource_id: Option<String>,
    /// Application; defaults to the baseline application.
    pub application: Option<String>,
}

/// A favourite create payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFavourite {
    /// Kind of the bookmarked resource.
    pub resource_type: ResourceType,
    /// Identifier of the bookmarked resource.
    pub resource_id: String,
    /// Application the favourite belongs to.
    pub application: String,
}
