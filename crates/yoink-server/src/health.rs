use std::sync::atomic::Ordering;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Static liveness string served at `/`.
pub async fn liveness() -> &'static str {
    "yoink-server ok"
}

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub connections: usize,
    pub rooms: usize,
    pub dictionary_words: usize,
}

/// Structured health endpoint: server status, live connections, active rooms,
/// dictionary size.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connections = state.ws_connection_count.load(Ordering::Relaxed);
    let rooms = state.registry.read().await.room_count();

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        connections,
        rooms,
        dictionary_words: state.dictionary.len(),
    })
}
