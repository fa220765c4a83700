use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use yoink_core::net::messages::{ClientEvent, LobbyJoinMsg, LobbyStateMsg, ServerEvent};
use yoink_core::net::protocol::{decode_server_event, encode_client_event};

use yoink_server::config::ServerConfig;
use yoink_server::dictionary::load_dictionary;
use yoink_server::{build_app, spawn_room_reaper};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub addr: SocketAddr,
    _server: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server on an ephemeral port with the built-in fallback
    /// dictionary (no dictionary URLs configured).
    pub async fn new() -> Self {
        let config = ServerConfig::default();
        let dictionary = Arc::new(load_dictionary(&config.dictionary).await);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, state) = build_app(config, dictionary);
        spawn_room_reaper(state);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            _server: handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

/// Connect a WebSocket client to the given URL.
pub async fn ws_connect(url: &str) -> WsStream {
    let (stream, _) = tokio_tungstenite::connect_async(url).await.unwrap();
    stream
}

/// Send a client event as a JSON text frame.
pub async fn send_event(stream: &mut WsStream, event: &ClientEvent) {
    let text = encode_client_event(event).unwrap();
    stream.send(Message::Text(text.into())).await.unwrap();
}

/// Join a room and return the first projection the server sends back.
pub async fn ws_join(stream: &mut WsStream, room: &str, name: &str) -> LobbyStateMsg {
    send_event(
        stream,
        &ClientEvent::LobbyJoin(LobbyJoinMsg {
            room: room.to_string(),
            name: name.to_string(),
        }),
    )
    .await;
    match read_event(stream).await {
        ServerEvent::LobbyState(state) => state,
        other => panic!("Expected lobby:state after join, got: {other:?}"),
    }
}

/// Read the next server event (5 s timeout).
pub async fn read_event(stream: &mut WsStream) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return decode_server_event(text.as_str()).expect("server sent valid JSON");
                },
                Some(Ok(Message::Close(_))) => panic!("WebSocket closed unexpectedly"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => panic!("WebSocket error: {e}"),
                None => panic!("WebSocket stream ended"),
            }
        }
    })
    .await
    .expect("Timed out waiting for server event")
}

/// Read events until one matches, skipping the rest (5 s timeout overall).
pub async fn read_until<F>(stream: &mut WsStream, mut pred: F) -> ServerEvent
where
    F: FnMut(&ServerEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let event = read_event(stream).await;
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("Timed out waiting for matching server event")
}

/// Try to read an event, returning `None` on timeout.
pub async fn try_read_event(stream: &mut WsStream, timeout_ms: u64) -> Option<ServerEvent> {
    tokio::time::timeout(Duration::from_millis(timeout_ms), async {
        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => {
                    return decode_server_event(text.as_str()).expect("server sent valid JSON");
                },
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => {
                    panic!("WebSocket error or closed")
                },
                _ => continue,
            }
        }
    })
    .await
    .ok()
}
