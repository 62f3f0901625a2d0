//! Server construction and route wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::warn;

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use vocabulary_backend::ApiDoc;
use vocabulary_backend::domain::ports::{GraphService, NoOpGraphService};
use vocabulary_backend::domain::{
    CollectionService, FavouriteService, TaggingService, VocabularyService,
};
use vocabulary_backend::inbound::http::collections::{
    add_collection_resource, create_collection, delete_collection, get_collection,
    list_collections, remove_collection_resource, update_collection,
};
use vocabulary_backend::inbound::http::favourites::{
    create_favourite, delete_favourite, get_favourite, list_favourites,
};
use vocabulary_backend::inbound::http::health::{HealthState, live, ready};
use vocabulary_backend::inbound::http::relationships::{
    clone_dataset_vocabularies, create_dataset_vocabularies, create_dataset_vocabulary,
    delete_dataset_vocabulary, get_dataset_vocabularies, update_dataset_vocabulary,
};
use vocabulary_backend::inbound::http::state::HttpState;
use vocabulary_backend::inbound::http::vocabularies::{
    create_vocabulary, delete_vocabulary, get_vocabulary, list_vocabularies, update_vocabulary,
};
use vocabulary_backend::outbound::graph::GraphHttpClient;
use vocabulary_backend::outbound::persistence::{
    MemoryCollectionRepository, MemoryFavouriteRepository, MemoryResourceRepository,
    MemoryVocabularyRepository,
};

fn build_graph_service(config: &ServerConfig) -> std::io::Result<Arc<dyn GraphService>> {
    match &config.graph_endpoint {
        Some(endpoint) => {
            let client = GraphHttpClient::new(endpoint.clone(), config.graph_timeout)
                .map_err(|e| std::io::Error::other(format!("graph client build failed: {e}")))?;
            Ok(Arc::new(client))
        }
        None => {
            warn!("no graph endpoint configured; tag associations will not be mirrored");
            Ok(Arc::new(NoOpGraphService))
        }
    }
}

fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let resources = Arc::new(MemoryResourceRepository::default());
    let vocabularies = Arc::new(MemoryVocabularyRepository::default());
    let collections = Arc::new(MemoryCollectionRepository::default());
    let favourites = Arc::new(MemoryFavouriteRepository::default());
    let graph = build_graph_service(config)?;

    Ok(HttpState {
        vocabularies: Arc::new(VocabularyService::new(
            vocabularies.clone(),
            resources.clone(),
        )),
        tagging: Arc::new(TaggingService::new(resources, vocabularies, graph)),
        collections: Arc::new(CollectionService::new(
            collections,
            config.default_application.clone(),
        )),
        favourites: Arc::new(FavouriteService::new(
            favourites,
            config.default_application.clone(),
        )),
        default_application: config.default_application.clone(),
    })
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
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
        .service(delete_dataset_vocabulary)
        .service(list_collections)
        .service(create_collection)
        .service(get_collection)
        .service(update_collection)
        .service(delete_collection)
        .service(add_collection_resource)
        .service(remove_collection_resource)
        .service(list_favourites)
        .service(create_favourite)
        .service(get_favourite)
        .service(delete_favourite);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket or building the
/// graph adapter fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config)?);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
