use super::state::AppState;
use crate::voice::GuildId;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// GET /sessions
/// List every active voice session
pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registry.snapshots())
}

/// GET /sessions/:guild_id
/// Status of one guild's voice session
pub async fn get_session(
    State(state): State<AppState>,
    Path(guild_id): Path<u64>,
) -> impl IntoResponse {
    match state.registry.get(GuildId(guild_id)) {
        Some(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("No voice session for guild {}", guild_id),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
