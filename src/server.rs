use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use reqwest::Client;
use tokio::net::TcpListener;
use tracing::info;

use crate::{api, config::Config, error::ConfigError, suggest::SuggestionSource};

/// Shared by every request. Holds no per-run state.
pub struct AppState {
    pub config: Config,
    /// Connection pool for catalog calls; each request adds its own bearer token.
    pub http: Client,
    pub suggestions: Arc<dyn SuggestionSource>,
}

impl AppState {
    pub fn new(config: Config, suggestions: Arc<dyn SuggestionSource>) -> Result<Self, ConfigError> {
        let http = Client::builder().timeout(config.catalog.timeout).build()?;
        Ok(Self {
            config,
            http,
            suggestions,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/generate-playlist", post(api::generate_playlist))
        .with_state(state)
}

pub async fn start_api_server(state: Arc<AppState>) -> Result<(), String> {
    let addr = SocketAddr::from_str(&state.config.server_addr)
        .map_err(|e| format!("Failed to parse server address: {}", e))?;

    let listener = TcpListener::bind(&addr).await.map_err(|e| e.to_string())?;
    info!(%addr, "listening");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| e.to_string())
}
