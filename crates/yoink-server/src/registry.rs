use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use yoink_core::PlayerId;
use yoink_core::dictionary::Dictionary;

use crate::room::{PlayerSender, RoomCommand, spawn_room};

/// Creates and locates room actors by their opaque code. Player ids are
/// allocated here so they are unique across rooms for a server lifetime.
pub struct RoomRegistry {
    rooms: HashMap<String, RoomHandle>,
    next_player_id: PlayerId,
    dictionary: Arc<Dictionary>,
    closed_tx: mpsc::UnboundedSender<String>,
}

struct RoomHandle {
    cmd_tx: mpsc::UnboundedSender<RoomCommand>,
    _task: JoinHandle<()>,
}

impl RoomRegistry {
    pub fn new(dictionary: Arc<Dictionary>, closed_tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            rooms: HashMap::new(),
            next_player_id: 1,
            dictionary,
            closed_tx,
        }
    }

    fn alloc_player_id(&mut self) -> PlayerId {
        let id = self.next_player_id;
        self.next_player_id += 1;
        id
    }

    /// Join the room named `code`, creating it in the lobby phase if it does
    /// not exist. Returns the new player's id and the room's command queue.
    pub fn join_or_create(
        &mut self,
        code: &str,
        name: String,
        sender: PlayerSender,
    ) -> (PlayerId, mpsc::UnboundedSender<RoomCommand>) {
        let player_id = self.alloc_player_id();

        // A stale entry (actor already exited, reaper not yet run) is
        // replaced rather than joined.
        if self
            .rooms
            .get(code)
            .is_some_and(|entry| entry.cmd_tx.is_closed())
        {
            self.rooms.remove(code);
        }

        let entry = self.rooms.entry(code.to_string()).or_insert_with(|| {
            tracing::info!(room = %code, "Room created");
            let (cmd_tx, task) =
                spawn_room(code.to_string(), Arc::clone(&self.dictionary), self.closed_tx.clone());
            RoomHandle {
                cmd_tx,
                _task: task,
            }
        });

        let cmd_tx = entry.cmd_tx.clone();
        let _ = cmd_tx.send(RoomCommand::Join {
            player_id,
            name,
            sender,
        });
        (player_id, cmd_tx)
    }

    /// Drop the entry for a room whose actor has exited. A room recreated
    /// under the same code in the meantime is left alone.
    pub fn remove_closed(&mut self, code: &str) {
        if self
            .rooms
            .get(code)
            .is_some_and(|entry| entry.cmd_tx.is_closed())
        {
            self.rooms.remove(code);
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    #[cfg(test)]
    pub fn room_exists(&self, code: &str) -> bool {
        self.rooms.contains_key(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_registry() -> (RoomRegistry, mpsc::UnboundedReceiver<String>) {
        let (closed_tx, closed_rx) = mpsc::unbounded_channel();
        let dict = Arc::new(Dictionary::fallback());
        (RoomRegistry::new(dict, closed_tx), closed_rx)
    }

    fn make_sender() -> (PlayerSender, mpsc::Receiver<String>) {
        mpsc::channel(256)
    }

    #[tokio::test]
    async fn join_creates_room_once() {
        let (mut registry, _closed_rx) = make_registry();
        let (tx1, _rx1) = make_sender();
        let (tx2, _rx2) = make_sender();

        let (alice, _) = registry.join_or_create("kitchen", "Alice".to_string(), tx1);
        let (bob, _) = registry.join_or_create("kitchen", "Bob".to_string(), tx2);

        assert_eq!(registry.room_count(), 1);
        assert_ne!(alice, bob);
    }

    #[tokio::test]
    async fn distinct_codes_are_distinct_rooms() {
        let (mut registry, _closed_rx) = make_registry();
        let (tx1, _rx1) = make_sender();
        let (tx2, _rx2) = make_sender();

        registry.join_or_create("kitchen", "Alice".to_string(), tx1);
        registry.join_or_create("attic", "Bob".to_string(), tx2);
        assert_eq!(registry.room_count(), 2);
    }

    #[tokio::test]
    async fn player_ids_are_globally_unique() {
        let (mut registry, _closed_rx) = make_registry();
        let mut seen = std::collections::HashSet::new();
        for i in 0..10 {
            let (tx, _rx) = make_sender();
            let (id, _) = registry.join_or_create(&format!("room-{i}"), "P".to_string(), tx);
            assert!(seen.insert(id));
        }
    }

    #[tokio::test]
    async fn emptied_room_reports_and_is_removed() {
        let (mut registry, mut closed_rx) = make_registry();
        let (tx, mut rx) = make_sender();
        let (player_id, cmd_tx) = registry.join_or_create("kitchen", "Alice".to_string(), tx);

        // Wait for the join projection so the actor has processed it.
        assert!(rx.recv().await.is_some());

        cmd_tx.send(RoomCommand::Leave { player_id }).unwrap();
        let code = closed_rx.recv().await.unwrap();
        assert_eq!(code, "kitchen");

        registry.remove_closed(&code);
        assert!(!registry.room_exists("kitchen"));
    }

    #[tokio::test]
    async fn stale_entry_is_replaced_on_join() {
        let (mut registry, mut closed_rx) = make_registry();
        let (tx, mut rx) = make_sender();
        let (player_id, cmd_tx) = registry.join_or_create("kitchen", "Alice".to_string(), tx);
        assert!(rx.recv().await.is_some());
        cmd_tx.send(RoomCommand::Leave { player_id }).unwrap();
        let _ = closed_rx.recv().await;

        // Reaper has not run; a fresh join must still land in a live room.
        let (tx2, mut rx2) = make_sender();
        let (_, _) = registry.join_or_create("kitchen", "Bob".to_string(), tx2);
        assert!(rx2.recv().await.is_some(), "new actor answers the join");
    }
}
