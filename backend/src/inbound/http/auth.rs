//! Extraction of the `loggedUser` context from requests.
//!
//! Reads and deletes carry the context as a JSON-encoded `loggedUser` query
//! parameter; writes carry it as a `loggedUser` body field on their DTOs.
//! Handlers needing the query form take a [`RequestUser`] parameter;
//! handlers with body DTOs call [`require_logged_user`] on the optional
//! field. Either way a missing context maps to a 401, distinct from the 403
//! raised for an unauthorized application.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{LoggedUser, TaggingError, TaggingResult};

/// Extractor wrapper for the query-borne `loggedUser` context.
#[derive(Debug, Clone)]
pub struct RequestUser(pub LoggedUser);

fn logged_user_from_query(query: &str) -> TaggingResult<LoggedUser> {
    let raw = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "loggedUser")
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| {
            TaggingError::Unauthorized("loggedUser context is missing".to_owned())
        })?;
    serde_json::from_str(&raw)
        .map_err(|_| TaggingError::Unauthorized("loggedUser context is malformed".to_owned()))
}

impl FromRequest for RequestUser {
    type Error = TaggingError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(logged_user_from_query(req.query_string()).map(RequestUser))
    }
}

/// Require the body-borne `loggedUser` field to be present.
///
/// # Errors
///
/// Returns [`TaggingError::Unauthorized`] when the field is absent.
pub fn require_logged_user(user: Option<LoggedUser>) -> TaggingResult<LoggedUser> {
    user.ok_or_else(|| TaggingError::Unauthorized("loggedUser context is missing".to_owned()))
}
