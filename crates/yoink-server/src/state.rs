use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use yoink_core::dictionary::Dictionary;

use crate::config::ServerConfig;
use crate::registry::RoomRegistry;

pub type SharedRegistry = Arc<RwLock<RoomRegistry>>;

#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
    pub dictionary: Arc<Dictionary>,
    pub config: Arc<ServerConfig>,
    pub ws_connection_count: Arc<AtomicUsize>,
    pub shutdown: CancellationToken,
    /// Receives codes of rooms whose actor has exited; drained by the reaper.
    pub room_closed_rx: Arc<tokio::sync::Mutex<tokio::sync::mpsc::UnboundedReceiver<String>>>,
}

impl AppState {
    pub fn new(config: ServerConfig, dictionary: Arc<Dictionary>) -> Self {
        let (closed_tx, closed_rx) = tokio::sync::mpsc::unbounded_channel();
        Self {
            registry: Arc::new(RwLock::new(RoomRegistry::new(
                Arc::clone(&dictionary),
                closed_tx,
            ))),
            dictionary,
            config: Arc::new(config),
            ws_connection_count: Arc::new(AtomicUsize::new(0)),
            shutdown: CancellationToken::new(),
            room_closed_rx: Arc::new(tokio::sync::Mutex::new(closed_rx)),
        }
    }
}

/// RAII guard that decrements a counter on drop.
pub struct ConnectionGuard {
    counter: Arc<AtomicUsize>,
}

impl ConnectionGuard {
    pub fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self { counter }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::Relaxed);
    }
}
