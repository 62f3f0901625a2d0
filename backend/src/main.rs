//! Service entry-point: configuration, tracing, and server startup.

mod server;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::ServerConfig;
use vocabulary_backend::inbound::http::health::HealthState;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env().map_err(std::io::Error::other)?;
    let health_state = web::Data::new(HealthState::new());
    let server = server::create_server(health_state, config)?;
    server.await
}
