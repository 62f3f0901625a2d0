//! Relationship HTTP handlers for dataset resources.
//!
//! ```text
//! GET    /api/v1/dataset/{dataset}/vocabulary
//! POST   /api/v1/dataset/{dataset}/vocabulary              (bulk)
//! POST   /api/v1/dataset/{dataset}/vocabulary/clone/dataset
//! POST   /api/v1/dataset/{dataset}/vocabulary/{vocabulary}
//! PATCH  /api/v1/dataset/{dataset}/vocabulary/{vocabulary}
//! DELETE /api/v1/dataset/{dataset}/vocabulary/{vocabulary}
//! ```

use actix_web::{delete, get, patch, post, web};
use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::auth::{RequestUser, require_logged_user};
use super::error::ApiResult;
use super::serializers::{ResourceEnvelope, serialize_resource};
use super::state::HttpState;
use super::vocabularies::ApplicationQuery;
use crate::domain::validation::LOGGED_USER_KEY;
use crate::domain::{
    CloneCandidate, LoggedUser, RelationshipCandidate, ResourceRef, TaggingError,
};

/// Request payload for creating or updating a single relationship.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRequest {
    /// Tags to associate.
    pub tags: Option<Vec<String>>,
    /// Application performing the association.
    pub application: Option<String>,
    /// Authenticated context forwarded by the gateway.
    #[schema(value_type = Object)]
    pub logged_user: Option<LoggedUser>,
}

impl RelationshipRequest {
    fn into_candidate(self) -> ApiResult<RelationshipCandidate> {
        let _user = require_logged_user(self.logged_user)?;
        Ok(RelationshipCandidate {
            tags: self.tags,
            application: self.application,
        })
    }
}

/// Request payload for cloning a dataset's relationships.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloneRequest {
    /// Dataset that receives the cloned relationships.
    pub new_dataset: Option<String>,
    /// Authenticated context forwarded by the gateway.
    #[schema(value_type = Object)]
    pub logged_user: Option<LoggedUser>,
}

fn bulk_logged_user(body: &Map<String, Value>) -> ApiResult<LoggedUser> {
    let user = body
        .get(LOGGED_USER_KEY)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok());
    user.ok_or_else(|| {
        TaggingError::Unauthorized("loggedUser context is missing".to_owned())
    })
}

/// Fetch the vocabularies attached to a dataset.
#[utoipa::path(
    get,
    path = "/api/v1/dataset/{dataset}/vocabulary",
    params(("dataset" = String, Path, description = "Dataset identifier")),
    responses(
        (status = 200, description = "Resource with attachments", body = ResourceEnvelope),
        (status = 404, description = "Resource not found")
    ),
    tags = ["relationships"],
    operation_id = "getDatasetVocabularies"
)]
#[get("/dataset/{dataset}/vocabulary")]
pub async fn get_dataset_vocabularies(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ResourceEnvelope>> {
    let resource = ResourceRef::dataset(path.into_inner());
    let doc = state.tagging.resource_vocabularies(&resource).await?;
    Ok(web::Json(serialize_resource(&doc)))
}

/// Associate several vocabularies with a dataset in one request.
///
/// The body maps vocabulary names to `{application, tags}`; the reserved
/// `loggedUser` key carries the authenticated context.
#[utoipa::path(
    post,
    path = "/api/v1/dataset/{dataset}/vocabulary",
    params(("dataset" = String, Path, description = "Dataset identifier")),
    responses(
        (status = 200, description = "Resource with attachments", body = ResourceEnvelope),
        (status = 400, description = "Relationships not valid"),
        (status = 401, description = "Missing loggedUser context"),
        (status = 409, description = "Relationship duplicated")
    ),
    tags = ["relationships"],
    operation_id = "createDatasetVocabularies"
)]
#[post("/dataset/{dataset}/vocabulary")]
pub async fn create_dataset_vocabularies(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<ResourceEnvelope>> {
    let body = body.into_inner();
    let _user = bulk_logged_user(&body)?;
    let resource = ResourceRef::dataset(path.into_inner());
    let doc = state.tagging.create_relationships(&resource, &body).await?;
    Ok(web::Json(serialize_resource(&doc)))
}

/// Clone every vocabulary relationship of a dataset onto a new dataset.
#[utoipa::path(
    post,
    path = "/api/v1/dataset/{dataset}/vocabulary/clone/dataset",
    params(("dataset" = String, Path, description = "Source dataset identifier")),
    request_body = CloneRequest,
    responses(
        (status = 200, description = "Cloned resource", body = ResourceEnvelope),
        (status = 400, description = "Clone not valid"),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Source dataset not found"),
        (status = 409, description = "Target dataset already tagged")
    ),
    tags = ["relationships"],
    operation_id = "cloneDatasetVocabularies"
)]
#[post("/dataset/{dataset}/vocabulary/clone/dataset")]
pub async fn clone_dataset_vocabularies(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CloneRequest>,
) -> ApiResult<web::Json<ResourceEnvelope>> {
    let payload = payload.into_inner();
    let _user = require_logged_user(payload.logged_user)?;
    let doc = state
        .tagging
        .clone_dataset(
            &path,
            CloneCandidate {
                new_dataset: payload.new_dataset,
            },
        )
        .await?;
    Ok(web::Json(serialize_resource(&doc)))
}

/// Associate one vocabulary and its tags with a dataset.
#[utoipa::path(
    post,
    path = "/api/v1/dataset/{dataset}/vocabulary/{vocabulary}",
    params(
        ("dataset" = String, Path, description = "Dataset identifier"),
        ("vocabulary" = String, Path, description = "Vocabulary name")
    ),
    request_body = RelationshipRequest,
    responses(
        (status = 200, description = "Resource with attachments", body = ResourceEnvelope),
        (status = 400, description = "Relationship not valid"),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Vocabulary not found"),
        (status = 409, description = "Relationship duplicated")
    ),
    tags = ["relationships"],
    operation_id = "createDatasetVocabulary"
)]
#[post("/dataset/{dataset}/vocabulary/{vocabulary}")]
pub async fn create_dataset_vocabulary(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<RelationshipRequest>,
) -> ApiResult<web::Json<ResourceEnvelope>> {
    let (dataset, vocabulary) = path.into_inner();
    let candidate = payload.into_inner().into_candidate()?;
    let resource = ResourceRef::dataset(dataset);
    let doc = state
        .tagging
        .create_relationship(&resource, &vocabulary, candidate)
        .await?;
    Ok(web::Json(serialize_resource(&doc)))
}

/// Replace the tags of an existing relationship.
#[utoipa::path(
    patch,
    path = "/api/v1/dataset/{dataset}/vocabulary/{vocabulary}",
    params(
        ("dataset" = String, Path, description = "Dataset identifier"),
        ("vocabulary" = String, Path, description = "Vocabulary name")
    ),
    request_body = RelationshipRequest,
    responses(
        (status = 200, description = "Resource with attachments", body = ResourceEnvelope),
        (status = 400, description = "Relationship not valid"),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Relationship not found")
    ),
    tags = ["relationships"],
    operation_id = "updateDatasetVocabulary"
)]
#[patch("/dataset/{dataset}/vocabulary/{vocabulary}")]
pub async fn update_dataset_vocabulary(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    payload: web::Json<RelationshipRequest>,
) -> ApiResult<web::Json<ResourceEnvelope>> {
    let (dataset, vocabulary) = path.into_inner();
    let candidate = payload.into_inner().into_candidate()?;
    let resource = ResourceRef::dataset(dataset);
    let doc = state
        .tagging
        .update_relationship(&resource, &vocabulary, candidate)
        .await?;
    Ok(web::Json(serialize_resource(&doc)))
}

/// Remove a relationship from both the resource and the vocabulary.
#[utoipa::path(
    delete,
    path = "/api/v1/dataset/{dataset}/vocabulary/{vocabulary}",
    params(
        ("dataset" = String, Path, description = "Dataset identifier"),
        ("vocabulary" = String, Path, description = "Vocabulary name"),
        ("application" = Option<String>, Query, description = "Owning application"),
        ("loggedUser" = String, Query, description = "JSON-encoded authenticated context")
    ),
    responses(
        (status = 200, description = "Resource with remaining attachments", body = ResourceEnvelope),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Relationship not found")
    ),
    tags = ["relationships"],
    operation_id = "deleteDatasetVocabulary"
)]
#[delete("/dataset/{dataset}/vocabulary/{vocabulary}")]
pub async fn delete_dataset_vocabulary(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
    query: web::Query<ApplicationQuery>,
    _user: RequestUser,
) -> ApiResult<web::Json<ResourceEnvelope>> {
    let (dataset, vocabulary) = path.into_inner();
    let application = query
        .application
        .as_deref()
        .unwrap_or(&state.default_application);
    let resource = ResourceRef::dataset(dataset);
    let doc = state
        .tagging
        .delete_relationship(&resource, &vocabulary, application)
        .await?;
    Ok(web::Json(serialize_resource(&doc)))
}
