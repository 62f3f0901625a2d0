//! Vocabulary HTTP handlers.
//!
//! ```text
//! GET    /api/v1/vocabulary
//! POST   /api/v1/vocabulary
//! GET    /api/v1/vocabulary/{vocabulary}
//! PATCH  /api/v1/vocabulary/{vocabulary}
//! DELETE /api/v1/vocabulary/{vocabulary}
//! ```

use actix_web::{delete, get, patch, post, web};
use serde::Deserialize;
use utoipa::ToSchema;

use super::auth::{RequestUser, require_logged_user};
use super::error::ApiResult;
use super::serializers::{
    VocabularyEnvelope, VocabularyListEnvelope, serialize_vocabularies, serialize_vocabulary,
};
use super::state::HttpState;
use crate::domain::{
    LoggedUser, TaggingError, ValidationFailure, VocabularyCandidate, VocabularyStatus,
};

/// Optional application filter carried in the query string.
#[derive(Debug, Deserialize)]
pub struct ApplicationQuery {
    /// Application to scope the operation to.
    pub application: Option<String>,
}

/// Request payload for creating a vocabulary.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyCreateRequest {
    /// Vocabulary name.
    pub name: Option<String>,
    /// Owning application.
    pub application: Option<String>,
    /// Lifecycle status; defaults to `published`.
    pub status: Option<String>,
    /// Authenticated context forwarded by the gateway.
    #[schema(value_type = Object)]
    pub logged_user: Option<LoggedUser>,
}

/// Request payload for updating a vocabulary.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyUpdateRequest {
    /// Owning application; defaults to the baseline application.
    pub application: Option<String>,
    /// Replacement lifecycle status.
    pub status: Option<String>,
    /// Authenticated context forwarded by the gateway.
    #[schema(value_type = Object)]
    pub logged_user: Option<LoggedUser>,
}

fn parse_status(raw: Option<String>) -> ApiResult<Option<VocabularyStatus>> {
    raw.as_deref()
        .map(|value| {
            value.parse().map_err(|_| {
                TaggingError::VocabularyNotValid(vec![ValidationFailure::new(
                    "status",
                    "status must be one of draft, published, disabled",
                )])
            })
        })
        .transpose()
}

/// List vocabularies, optionally scoped to one application.
#[utoipa::path(
    get,
    path = "/api/v1/vocabulary",
    params(("application" = Option<String>, Query, description = "Application filter")),
    responses(
        (status = 200, description = "Vocabularies", body = VocabularyListEnvelope)
    ),
    tags = ["vocabulary"],
    operation_id = "listVocabularies"
)]
#[get("/vocabulary")]
pub async fn list_vocabularies(
    state: web::Data<HttpState>,
    query: web::Query<ApplicationQuery>,
) -> ApiResult<web::Json<VocabularyListEnvelope>> {
    let vocabularies = state.vocabularies.list(query.application.as_deref()).await?;
    Ok(web::Json(serialize_vocabularies(&vocabularies)))
}

/// Fetch one vocabulary by name.
#[utoipa::path(
    get,
    path = "/api/v1/vocabulary/{vocabulary}",
    params(
        ("vocabulary" = String, Path, description = "Vocabulary name"),
        ("application" = Option<String>, Query, description = "Owning application")
    ),
    responses(
        (status = 200, description = "Vocabulary", body = VocabularyEnvelope),
        (status = 404, description = "Vocabulary not found")
    ),
    tags = ["vocabulary"],
    operation_id = "getVocabulary"
)]
#[get("/vocabulary/{vocabulary}")]
pub async fn get_vocabulary(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ApplicationQuery>,
) -> ApiResult<web::Json<VocabularyEnvelope>> {
    let application = query
        .application
        .as_deref()
        .unwrap_or(&state.default_application);
    let vocabulary = state.vocabularies.get(&path, application).await?;
    Ok(web::Json(serialize_vocabulary(&vocabulary)))
}

/// Create a vocabulary after validation and a duplicate probe.
#[utoipa::path(
    post,
    path = "/api/v1/vocabulary",
    request_body = VocabularyCreateRequest,
    responses(
        (status = 200, description = "Created vocabulary", body = VocabularyEnvelope),
        (status = 400, description = "Vocabulary not valid"),
        (status = 401, description = "Missing loggedUser context"),
        (status = 409, description = "Vocabulary duplicated")
    ),
    tags = ["vocabulary"],
    operation_id = "createVocabulary"
)]
#[post("/vocabulary")]
pub async fn create_vocabulary(
    state: web::Data<HttpState>,
    payload: web::Json<VocabularyCreateRequest>,
) -> ApiResult<web::Json<VocabularyEnvelope>> {
    let payload = payload.into_inner();
    let _user = require_logged_user(payload.logged_user)?;
    let status = parse_status(payload.status)?;

    let vocabulary = state
        .vocabularies
        .create(VocabularyCandidate {
            name: payload.name,
            application: payload.application,
            status,
        })
        .await?;
    Ok(web::Json(serialize_vocabulary(&vocabulary)))
}

/// Update the lifecycle status of a vocabulary.
#[utoipa::path(
    patch,
    path = "/api/v1/vocabulary/{vocabulary}",
    params(("vocabulary" = String, Path, description = "Vocabulary name")),
    request_body = VocabularyUpdateRequest,
    responses(
        (status = 200, description = "Updated vocabulary", body = VocabularyEnvelope),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Vocabulary not found")
    ),
    tags = ["vocabulary"],
    operation_id = "updateVocabulary"
)]
#[patch("/vocabulary/{vocabulary}")]
pub async fn update_vocabulary(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<VocabularyUpdateRequest>,
) -> ApiResult<web::Json<VocabularyEnvelope>> {
    let payload = payload.into_inner();
    let _user = require_logged_user(payload.logged_user)?;
    let status = parse_status(payload.status)?;
    let application = payload
        .application
        .as_deref()
        .unwrap_or(&state.default_application);

    let vocabulary = state.vocabularies.update(&path, application, status).await?;
    Ok(web::Json(serialize_vocabulary(&vocabulary)))
}

/// Delete a vocabulary and detach it from every tagged resource.
#[utoipa::path(
    delete,
    path = "/api/v1/vocabulary/{vocabulary}",
    params(
        ("vocabulary" = String, Path, description = "Vocabulary name"),
        ("application" = Option<String>, Query, description = "Owning application"),
        ("loggedUser" = String, Query, description = "JSON-encoded authenticated context")
    ),
    responses(
        (status = 200, description = "Deleted vocabulary", body = VocabularyEnvelope),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Vocabulary not found")
    ),
    tags = ["vocabulary"],
    operation_id = "deleteVocabulary"
)]
#[delete("/vocabulary/{vocabulary}")]
pub async fn delete_vocabulary(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    query: web::Query<ApplicationQuery>,
    _user: RequestUser,
) -> ApiResult<web::Json<VocabularyEnvelope>> {
    let application = query
        .application
        .as_deref()
        .unwrap_or(&state.default_application);
    let vocabulary = state.vocabularies.delete(&path, application).await?;
    Ok(web::Json(serialize_vocabulary(&vocabulary)))
}
