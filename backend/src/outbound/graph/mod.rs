//! Outbound adapter for the graph microservice.

mod http_client;

pub use http_client::GraphHttpClient;
