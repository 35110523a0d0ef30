//! HTTP surface: a single `GET /{cep}` route in front of [`Lookup`].

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use cep_weather_core::{Config, Lookup, LookupError};
use tower_http::trace::TraceLayer;

/// Shared state for the web server.
#[derive(Clone, Debug)]
pub struct AppState {
    pub lookup: Lookup,
}

/// Create the router with its one route.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/:cep", get(weather_by_cep))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server and run until Ctrl-C.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = AppState { lookup: Lookup::from_config(config)? };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!("Starting server at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn weather_by_cep(
    State(state): State<AppState>,
    cep: Result<Path<String>, PathRejection>,
) -> Response {
    // A segment that doesn't even decode to UTF-8 is just another malformed CEP.
    let Path(cep) = match cep {
        Ok(cep) => cep,
        Err(rejection) => {
            tracing::debug!("rejected undecodable path: {}", rejection);
            return ApiError(LookupError::InvalidInput).into_response();
        }
    };

    match state.lookup.handle_lookup(&cep).await {
        Ok(weather) => (StatusCode::OK, Json(weather)).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

/// Maps a lookup failure to its status code and fixed plain-text message.
struct ApiError(LookupError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, self.0.to_string()).into_response()
    }
}
