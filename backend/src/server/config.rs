//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_APPLICATION: &str = "rw";
const DEFAULT_GRAPH_TIMEOUT_SECONDS: u64 = 30;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) default_application: String,
    pub(crate) graph_endpoint: Option<Url>,
    pub(crate) graph_timeout: Duration,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// `BIND_ADDR` (default `0.0.0.0:8080`), `DEFAULT_APPLICATION`
    /// (default `rw`), `GRAPH_SERVICE_URL` (optional),
    /// `GRAPH_TIMEOUT_SECONDS` (default 30).
    ///
    /// # Errors
    ///
    /// Returns a message when an address or URL fails to parse.
    pub fn from_env() -> Result<Self, String> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse()
            .map_err(|e| format!("invalid BIND_ADDR: {e}"))?;
        let default_application =
            env::var("DEFAULT_APPLICATION").unwrap_or_else(|_| DEFAULT_APPLICATION.to_owned());

        let graph_endpoint = match env::var("GRAPH_SERVICE_URL") {
            Ok(raw) => Some(Url::parse(&raw).map_err(|e| format!("invalid GRAPH_SERVICE_URL: {e}"))?),
            Err(_) => None,
        };
        let graph_timeout = env::var("GRAPH_TIMEOUT_SECONDS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .map_or(
                Duration::from_secs(DEFAULT_GRAPH_TIMEOUT_SECONDS),
                Duration::from_secs,
            );

        Ok(Self {
            bind_addr,
            default_application,
            graph_endpoint,
            graph_timeout,
        })
    }
}
