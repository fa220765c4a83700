pub mod config;
pub mod dictionary;
pub mod health;
pub mod rate_limit;
pub mod registry;
pub mod room;
pub mod state;
pub mod ws;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use yoink_core::dictionary::Dictionary;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state. The dictionary must already
/// be loaded; rooms share it read-only.
pub fn build_app(config: ServerConfig, dictionary: Arc<Dictionary>) -> (Router<()>, AppState) {
    let state = AppState::new(config, dictionary);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", axum::routing::get(health::liveness))
        .route("/health", axum::routing::get(health::health_check))
        .route("/ws", axum::routing::get(ws::ws_handler))
        .layer(cors)
        .with_state(state.clone());

    (app, state)
}

/// Background task that removes registry entries for rooms whose actor has
/// exited (last player left).
pub fn spawn_room_reaper(state: AppState) {
    let shutdown = state.shutdown.clone();
    tokio::spawn(async move {
        let mut closed_rx = state.room_closed_rx.lock().await;
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Room reaper shutting down");
                    break;
                }
                code = closed_rx.recv() => {
                    match code {
                        Some(code) => {
                            let mut registry = state.registry.write().await;
                            registry.remove_closed(&code);
                            tracing::debug!(room = %code, "Room entry reaped");
                        },
                        None => break,
                    }
                }
            }
        }
    });
}
