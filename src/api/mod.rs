//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/toggle", post(toggle_handler))
        .route("/reset", post(reset_handler))
        .route("/status", get(status_handler))
        .route("/volume", get(get_volume_handler).put(set_volume_handler))
        .route("/playlist", get(playlist_handler))
        .route("/playlist/select/:index", post(select_track_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
