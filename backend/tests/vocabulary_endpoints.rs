//! End-to-end coverage of the vocabulary and relationship endpoints:
//! validate → duplicate-check → serialize, over the in-memory adapters.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use vocabulary_backend::domain::ports::NoOpGraphService;
use vocabulary_backend::domain::{
    CollectionService, FavouriteService, TaggingService, VocabularyService,
};
use vocabulary_backend::inbound::http::relationships::{
    clone_dataset_vocabularies, create_dataset_vocabularies, create_dataset_vocabulary,
    delete_dataset_vocabulary, get_dataset_vocabularies, update_dataset_vocabulary,
};
use vocabulary_backend::inbound::http::state::HttpState;
use vocabulary_backend::inbound::http::vocabularies::{
    create_vocabulary, delete_vocabulary, get_vocabulary, list_vocabularies, update_vocabulary,
};
use vocabulary_backend::outbound::persistence::{
    MemoryCollectionRepository, MemoryFavouriteRepository, MemoryResourceRepository,
    MemoryVocabularyRepository,
};

fn http_state() -> HttpState {
    let resources = Arc::new(MemoryResourceRepository::default());
    let vocabularies = Arc::new(MemoryVocabularyRepository::default());
    HttpState {
        vocabularies: Arc::new(VocabularyService::new(
            vocabularies.clone(),
            resources.clone(),
        )),
        tagging: Arc::new(TaggingService::new(
            resources,
            vocabularies,
            Arc::new(NoOpGraphService),
        )),
        collections: Arc::new(CollectionService::new(
            Arc::new(MemoryCollectionRepository::default()),
            "rw".to_owned(),
        )),
        favourites: Arc::new(FavouriteService::new(
            Arc::new(MemoryFavouriteRepository::default()),
            "rw".to_owned(),
        )),
        default_application: "rw".to_owned(),
    }
}

async fn init_app() -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(http_state()))
            .service(
                web::scope("/api/v1")
                    .service(list_vocabularies)
                    .service(create_vocabulary)
                    .service(get_vocabulary)
                    .service(update_vocabulary)
                    .service(delete_vocabulary)
                    .service(get_dataset_vocabularies)
                    .service(create_dataset_vocabularies)
                    .service(clone_dataset_vocabularies)
                    .service(create_dataset_vocabulary)
                    .service(update_dataset_vocabulary)
                    .service(delete_dataset_vocabulary),
            ),
    )
    .await
}

fn logged_user() -> Value {
    json!({"id": "u1", "extraUserData": {"apps": ["rw"]}})
}

async fn create_published_vocabulary(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    name: &str,
) {
    let request = test::TestRequest::post()
        .uri("/api/v1/vocabulary")
        .set_json(json!({
            "name": name,
            "application": "rw",
            "loggedUser": logged_user(),
        }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "vocabulary setup failed");
}

#[actix_rt::test]
async fn create_then_duplicate_yields_conflict() {
    let app = init_app().await;
    create_published_vocabulary(&app, "climate").await;

    let request = test::TestRequest::post()
        .uri("/api/v1/vocabulary")
        .set_json(json!({
            "name": "climate",
            "application": "rw",
            "loggedUser": logged_user(),
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 409);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["errors"][0]["code"], "vocabulary_duplicated");
}

#[actix_rt::test]
async fn mixed_case_create_collides_with_canonical_key() {
    let app = init_app().await;
    create_published_vocabulary(&app, "climate").await;

    // `Climate`/`RW` normalizes to the same canonical key before the probe.
    let request = test::TestRequest::post()
        .uri("/api/v1/vocabulary")
        .set_json(json!({
            "name": "Climate",
            "application": "RW",
            "loggedUser": logged_user(),
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 409);
}

#[actix_rt::test]
async fn invalid_create_reports_each_field() {
    let app = init_app().await;

    let request = test::TestRequest::post()
        .uri("/api/v1/vocabulary")
        .set_json(json!({"loggedUser": logged_user()}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);

    let body: Value = test::read_body_json(response).await;
    let errors = body["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["source"]["parameter"], "name");
    assert_eq!(errors[1]["source"]["parameter"], "application");
    assert_eq!(errors[0]["code"], "vocabulary_not_valid");
}

#[actix_rt::test]
async fn missing_logged_user_is_unauthorized() {
    let app = init_app().await;

    let request = test::TestRequest::post()
        .uri("/api/v1/vocabulary")
        .set_json(json!({"name": "climate", "application": "rw"}))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 401);
}

#[actix_rt::test]
async fn get_serves_the_data_envelope() {
    let app = init_app().await;
    create_published_vocabulary(&app, "climate").await;

    let request = test::TestRequest::get()
        .uri("/api/v1/vocabulary/climate?application=rw")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["id"], "climate");
    assert_eq!(body["data"]["type"], "vocabulary");
    assert_eq!(body["data"]["attributes"]["application"], "rw");
    assert_eq!(body["data"]["attributes"]["status"], "published");
}

#[actix_rt::test]
async fn relationship_create_then_duplicate_yields_conflict() {
    let app = init_app().await;
    create_published_vocabulary(&app, "climate").await;

    let create = || {
        test::TestRequest::post()
            .uri("/api/v1/dataset/d1/vocabulary/climate")
            .set_json(json!({
                "tags": ["co2", "warming"],
                "application": "rw",
                "loggedUser": logged_user(),
            }))
            .to_request()
    };

    let response = test::call_service(&app, create()).await;
    assert!(response.status().is_success());
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["type"], "resource");
    assert_eq!(body["data"]["attributes"]["vocabularies"][0]["name"], "climate");

    let response = test::call_service(&app, create()).await;
    assert_eq!(response.status(), 409);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["errors"][0]["code"], "relationship_duplicated");
}

#[actix_rt::test]
async fn relationship_requires_tags_and_application_jointly() {
    let app = init_app().await;
    create_published_vocabulary(&app, "climate").await;

    let request = test::TestRequest::post()
        .uri("/api/v1/dataset/d1/vocabulary/climate")
        .set_json(json!({
            "tags": [],
            "application": "rw",
            "loggedUser": logged_user(),
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);

    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["errors"][0]["source"]["parameter"], "tags");
    assert_eq!(body["errors"][0]["code"], "relationship_not_valid");
}

#[actix_rt::test]
async fn bulk_create_collects_every_failing_key() {
    let app = init_app().await;

    let request = test::TestRequest::post()
        .uri("/api/v1/dataset/d1/vocabulary")
        .set_json(json!({
            "broken-a": {"application": "rw", "tags": []},
            "broken-b": {"tags": ["x"]},
            "loggedUser": logged_user(),
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), 400);

    let body: Value = test::read_body_json(response).await;
    let errors = body["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 2, "both failing keys reported together");
    assert_eq!(errors[0]["source"]["parameter"], "broken-a");
    assert_eq!(errors[1]["source"]["parameter"], "broken-b");
}

#[actix_rt::test]
async fn bulk_create_attaches_every_vocabulary() {
    let app = init_app().await;
    create_published_vocabulary(&app, "climate").await;
    create_published_vocabulary(&app, "forests").await;

    let request = test::TestRequest::post()
        .uri("/api/v1/dataset/d1/vocabulary")
        .set_json(json!({
            "climate": {"application": "rw", "tags": ["co2"]},
            "forests": {"application": "rw", "tags": ["tree"]},
            "loggedUser": logged_user(),
        }))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());

    let body: Value = test::read_body_json(response).await;
    let vocabularies = body["data"]["attributes"]["vocabularies"]
        .as_array()
        .expect("vocabularies array");
    assert_eq!(vocabularies.len(), 2);
}

#[actix_rt::test]
async fn clone_copies_relationships_and_rejects_occupied_targets() {
    let app = init_app().await;
    create_published_vocabulary(&app, "climate").await;

    let tag = test::TestRequest::post()
        .uri("/api/v1/dataset/d1/vocabulary/climate")
        .set_json(json!({
            "tags": ["co2"],
            "application": "rw",
            "loggedUser": logged_user(),
        }))
        .to_request();
    assert!(test::call_service(&app, tag).await.status().is_success());

    let clone = test::TestRequest::post()
        .uri("/api/v1/dataset/d1/vocabulary/clone/dataset")
        .set_json(json!({"newDataset": "d2", "loggedUser": logged_user()}))
        .to_request();
    let response = test::call_service(&app, clone).await;
    assert!(response.status().is_success());
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["data"]["id"], "d2");
    assert_eq!(body["data"]["attributes"]["vocabularies"][0]["name"], "climate");

    // The target now carries relationships, so a second clone conflicts.
    let again = test::TestRequest::post()
        .uri("/api/v1/dataset/d1/vocabulary/clone/dataset")
        .set_json(json!({"newDataset": "d2", "loggedUser": logged_user()}))
        .to_request();
    let response = test::call_service(&app, again).await;
    assert_eq!(response.status(), 409);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["errors"][0]["code"], "resource_duplicated");
}

#[actix_rt::test]
async fn delete_relationship_requires_an_existing_association() {
    let app = init_app().await;
    create_published_vocabulary(&app, "climate").await;

    let tag = test::TestRequest::post()
        .uri("/api/v1/dataset/d1/vocabulary/climate")
        .set_json(json!({
            "tags": ["co2"],
            "application": "rw",
            "loggedUser": logged_user(),
        }))
        .to_request();
    assert!(test::call_service(&app, tag).await.status().is_success());

    let user = serde_json::to_string(&logged_user()).expect("context serializes");
    let query: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("application", "rw")
        .append_pair("loggedUser", &user)
        .finish();

    let delete = test::TestRequest::delete()
        .uri(&format!("/api/v1/dataset/d1/vocabulary/climate?{query}"))
        .to_request();
    let response = test::call_service(&app, delete).await;
    assert!(response.status().is_success());

    // Removing the only relationship drops the resource document entirely.
    let again = test::TestRequest::delete()
        .uri(&format!("/api/v1/dataset/d1/vocabulary/climate?{query}"))
        .to_request();
    let response = test::call_service(&app, again).await;
    assert_eq!(response.status(), 404);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["errors"][0]["code"], "resource_not_found");
}
