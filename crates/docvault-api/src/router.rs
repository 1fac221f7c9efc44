//! Route definitions for the DocVault HTTP API.
//!
//! All routes are mounted under `/api`. Every file route takes the
//! `AuthUser` extractor, so the access gate runs before any handler body.

use std::time::Duration;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::trace::TraceLayer;

use docvault_core::error::AppError;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(file_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(deadline_exceeded))
                .layer(TimeoutLayer::new(timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Maps a request that outlived its deadline to `UpstreamUnavailable`.
///
/// Dropping the handler future cancels the pending store call and
/// releases any staged upload.
async fn deadline_exceeded(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        AppError::upstream("Request deadline exceeded while waiting on storage").into()
    } else {
        AppError::internal(format!("Unhandled middleware error: {err}")).into()
    }
}

/// Registration and login
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
}

/// Custody operations
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route("/files/upload", post(handlers::file::upload_file))
        .route(
            "/files/{id}",
            get(handlers::file::download_file).delete(handlers::file::delete_file),
        )
        .route("/files/{id}/preview", get(handlers::file::preview_file))
        .route("/files/{id}/share", post(handlers::file::share_file))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
