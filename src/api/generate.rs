use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::error;

use crate::{
    error::PipelineError,
    pipeline::{self, GenerateRequest},
    server::AppState,
    spotify::SpotifyClient,
};

pub async fn generate_playlist(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> (StatusCode, Json<Value>) {
    let Ok(Json(request)) = body else {
        return error_response(StatusCode::BAD_REQUEST, "Missing required parameters");
    };

    let token = match request.validate() {
        Ok((_, token)) => token.to_string(),
        Err(e) => return error_response(status_for(&e), &e.to_string()),
    };

    let catalog = SpotifyClient::with_client(state.http.clone(), &state.config.catalog.api_url, token);

    let report = match pipeline::generate_playlist(
        &request,
        &catalog,
        state.suggestions.as_ref(),
        &state.config.pipeline,
        &(),
    )
    .await
    {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "playlist generation failed");
            return error_response(status_for(&e), &e.to_string());
        }
    };

    match serde_json::to_value(report.to_response()) {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::MissingInput(_) => StatusCode::BAD_REQUEST,
        PipelineError::AuthRejected => StatusCode::UNAUTHORIZED,
        PipelineError::UserLookupFailed(_) | PipelineError::PlaylistCreationFailed(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message })))
}
