//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use super::responses::{
    ApiResponse, ErrorResponse, HealthResponse, PlaylistResponse, StatusResponse, VolumeBody,
};
use crate::{error::TrainerError, state::AppState};

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn reject(context: &str, e: TrainerError) -> HandlerError {
    let code = if e.is_client_error() {
        warn!("{}: {}", context, e);
        StatusCode::BAD_REQUEST
    } else {
        error!("{}: {}", context, e);
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (code, Json(ErrorResponse { error: e.to_string() }))
}

fn action_response(state: &AppState, message: &str) -> Result<Json<ApiResponse>, HandlerError> {
    let snapshot = state.snapshot().map_err(|e| reject("Failed to sample timer", e))?;
    Ok(Json(ApiResponse::new(message.to_string(), &snapshot, &state.timer)))
}

/// Handle POST /toggle - Start, pause or resume the timer
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let run_state = state.toggle().map_err(|e| reject("Failed to toggle timer", e))?;

    let message = if run_state.is_active() { "Timer running" } else { "Timer paused" };
    info!("Toggle endpoint called - {}", message.to_lowercase());
    action_response(&state, message)
}

/// Handle POST /reset - Stop the timer and clear progress
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, HandlerError> {
    state.reset().map_err(|e| reject("Failed to reset timer", e))?;

    info!("Reset endpoint called - timer stopped");
    action_response(&state, "Timer reset")
}

/// Handle GET /status - Return the current run state and phase
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, HandlerError> {
    let snapshot = state.snapshot().map_err(|e| reject("Failed to sample timer", e))?;
    let volume = state.get_volume().map_err(|e| reject("Failed to read volume", e))?;
    let track = state.selected_track().map_err(|e| reject("Failed to read playlist", e))?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        run_state: snapshot.run_state,
        phase: snapshot.phase,
        display: snapshot.phase.describe(&state.timer),
        toggle_label: snapshot.run_state.toggle_label().to_string(),
        timer: state.timer,
        volume,
        track,
        uptime: state.get_uptime(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /volume
pub async fn get_volume_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<VolumeBody>, HandlerError> {
    let volume = state.get_volume().map_err(|e| reject("Failed to read volume", e))?;
    Ok(Json(VolumeBody { volume }))
}

/// Handle PUT /volume - Change and persist the volume
pub async fn set_volume_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VolumeBody>,
) -> Result<Json<VolumeBody>, HandlerError> {
    // the store write is blocking file I/O
    let volume = tokio::task::spawn_blocking(move || state.set_volume(body.volume))
        .await
        .map_err(|e| {
            error!("Volume update task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse { error: "volume update failed".to_string() }),
            )
        })?
        .map_err(|e| reject("Failed to set volume", e))?;
    Ok(Json(VolumeBody { volume }))
}

/// Handle GET /playlist
pub async fn playlist_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlaylistResponse>, HandlerError> {
    let playlist = state.get_playlist().map_err(|e| reject("Failed to read playlist", e))?;
    Ok(Json(PlaylistResponse {
        tracks: playlist.tracks().to_vec(),
        selected: playlist.selected_index(),
    }))
}

/// Handle POST /playlist/select/:index - Switch the background track
pub async fn select_track_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<PlaylistResponse>, HandlerError> {
    state.select_track(index).map_err(|e| reject("Failed to select track", e))?;
    playlist_handler(State(state)).await
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
