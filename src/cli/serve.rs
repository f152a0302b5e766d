use std::sync::Arc;

use crate::{
    config::Config,
    error, info,
    server::{AppState, start_api_server},
    suggest::OpenAiClient,
};

pub async fn serve() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    let suggestions = match OpenAiClient::new(&config.suggestions) {
        Ok(client) => client,
        Err(e) => error!("Cannot create suggestion client: {}", e),
    };

    info!("Serving on http://{}", config.server_addr);
    let state = match AppState::new(config, Arc::new(suggestions)) {
        Ok(state) => state,
        Err(e) => error!("Cannot create server state: {}", e),
    };

    if let Err(e) = start_api_server(Arc::new(state)).await {
        error!("Server stopped: {}", e);
    }
}
