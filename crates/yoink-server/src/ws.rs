use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use yoink_core::PlayerId;
use yoink_core::net::messages::ClientEvent;
use yoink_core::net::protocol::{MAX_MESSAGE_SIZE, decode_client_event};
use yoink_core::room::is_valid_room_code;

use crate::rate_limit::SubmitLimiter;
use crate::room::RoomCommand;
use crate::state::{AppState, ConnectionGuard};

/// Longest accepted display name; longer names are truncated.
const MAX_NAME_LEN: usize = 16;

pub async fn ws_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<axum::response::Response, StatusCode> {
    let max_ws = state.config.limits.max_ws_connections;
    let current = state.ws_connection_count.load(Ordering::Relaxed);
    if current >= max_ws {
        tracing::warn!(current, max = max_ws, "WS connection limit reached");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state)).into_response())
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let _guard = ConnectionGuard::new(Arc::clone(&state.ws_connection_count));
    let (ws_sender, mut ws_receiver) = socket.split();

    // The handshake: the first frame must be lobby:join.
    let first = match ws_receiver.next().await {
        Some(Ok(Message::Text(text))) => text,
        _ => return,
    };
    let join = match decode_client_event(first.as_str()) {
        Ok(ClientEvent::LobbyJoin(join)) => join,
        Ok(other) => {
            tracing::debug!(event = ?other, "First frame was not lobby:join, closing");
            return;
        },
        Err(e) => {
            tracing::debug!(error = %e, "Undecodable join frame, closing");
            return;
        },
    };

    let Some(name) = sanitize_name(&join.name) else {
        tracing::debug!(name = %join.name, "Rejected player name");
        return;
    };
    let room_code = join.room.trim().to_string();
    if !is_valid_room_code(&room_code) {
        tracing::debug!(room = %room_code, "Rejected room code");
        return;
    }

    let (tx, rx) = mpsc::channel::<String>(state.config.limits.player_message_buffer);
    let (player_id, cmd_tx) = {
        let mut registry = state.registry.write().await;
        registry.join_or_create(&room_code, name, tx)
    };
    tracing::info!(player_id, room = %room_code, "Player connected");

    spawn_writer(ws_sender, rx);
    read_loop(&mut ws_receiver, &cmd_tx, player_id).await;

    // Disconnected: the room removes the player and tears itself down when
    // it empties.
    let _ = cmd_tx.send(RoomCommand::Leave { player_id });
    tracing::info!(player_id, room = %room_code, "Player disconnected");
}

/// Trim, cap at 16 characters, refuse empty or control-character names.
fn sanitize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_control()) {
        return None;
    }
    Some(trimmed.chars().take(MAX_NAME_LEN).collect())
}

fn spawn_writer(
    mut ws_sender: futures::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<String>,
) {
    tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });
}

/// Translate inbound frames into room commands. Unknown events
/// and malformed payloads are dropped at debug level; `word:submit` passes
/// through the per-connection token bucket first.
async fn read_loop(
    ws_receiver: &mut futures::stream::SplitStream<WebSocket>,
    cmd_tx: &mpsc::UnboundedSender<RoomCommand>,
    player_id: PlayerId,
) {
    let mut submit_limiter = SubmitLimiter::default();

    while let Some(Ok(msg)) = ws_receiver.next().await {
        let text = match msg {
            Message::Text(t) => t,
            Message::Close(_) => break,
            _ => continue,
        };
        if text.len() > MAX_MESSAGE_SIZE {
            continue;
        }

        let event = match decode_client_event(text.as_str()) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(player_id, error = %e, "Dropping undecodable frame");
                continue;
            },
        };

        let command = match event {
            ClientEvent::LobbyJoin(_) => {
                tracing::debug!(player_id, "Duplicate lobby:join ignored");
                continue;
            },
            ClientEvent::GameStart(_) => RoomCommand::StartGame { player_id },
            ClientEvent::SettingsUpdate(patch) => RoomCommand::UpdateSettings { player_id, patch },
            ClientEvent::TileYoink(m) => RoomCommand::Yoink {
                player_id,
                index: m.index,
            },
            ClientEvent::WordSubmit(m) => {
                // Success-only feed: starved submits vanish with no reply.
                if !submit_limiter.allow() {
                    tracing::debug!(player_id, "Submit rate limited");
                    continue;
                }
                RoomCommand::Submit {
                    player_id,
                    word: m.word,
                    indices: m.indices,
                }
            },
        };

        if cmd_tx.send(command).is_err() {
            // Room actor is gone; nothing more to route.
            break;
        }
    }
}
