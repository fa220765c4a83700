use super::messages::{ClientEvent, ServerEvent};

/// Maximum inbound frame size in bytes. Anything larger is dropped before
/// decoding.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024;

#[derive(Debug)]
pub enum ProtocolError {
    MessageTooLarge(usize),
    Serialize(String),
    Deserialize(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MessageTooLarge(size) => {
                write!(f, "message too large: {size} bytes (max {MAX_MESSAGE_SIZE})")
            },
            Self::Serialize(e) => write!(f, "serialize error: {e}"),
            Self::Deserialize(e) => write!(f, "deserialize error: {e}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// Encode a server event to a JSON text frame.
pub fn encode_server_event(event: &ServerEvent) -> Result<String, ProtocolError> {
    serde_json::to_string(event).map_err(|e| ProtocolError::Serialize(e.to_string()))
}

/// Encode a client event to a JSON text frame (used by test clients).
pub fn encode_client_event(event: &ClientEvent) -> Result<String, ProtocolError> {
    serde_json::to_string(event).map_err(|e| ProtocolError::Serialize(e.to_string()))
}

/// Decode an inbound text frame into a client event. Unknown event names and
/// malformed payloads surface as `Deserialize` errors for the caller to drop.
pub fn decode_client_event(text: &str) -> Result<ClientEvent, ProtocolError> {
    if text.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(text.len()));
    }
    serde_json::from_str(text).map_err(|e| ProtocolError::Deserialize(e.to_string()))
}

/// Decode a server event (used by test clients).
pub fn decode_server_event(text: &str) -> Result<ServerEvent, ProtocolError> {
    if text.len() > MAX_MESSAGE_SIZE {
        return Err(ProtocolError::MessageTooLarge(text.len()));
    }
    serde_json::from_str(text).map_err(|e| ProtocolError::Deserialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::messages::*;
    use crate::room::Phase;
    use crate::settings::{RoomSettings, SettingsPatch};

    #[test]
    fn roundtrip_lobby_join() {
        let msg = ClientEvent::LobbyJoin(LobbyJoinMsg {
            room: "kitchen".to_string(),
            name: "Alice".to_string(),
        });
        let encoded = encode_client_event(&msg).unwrap();
        assert!(encoded.contains(r#""event":"lobby:join""#));
        assert_eq!(decode_client_event(&encoded).unwrap(), msg);
    }

    #[test]
    fn roundtrip_game_start() {
        let msg = ClientEvent::GameStart(GameStartMsg {});
        let encoded = encode_client_event(&msg).unwrap();
        assert!(encoded.contains(r#""event":"game:start""#));
        assert_eq!(decode_client_event(&encoded).unwrap(), msg);
    }

    #[test]
    fn roundtrip_settings_update() {
        let msg = ClientEvent::SettingsUpdate(SettingsPatch {
            rounds: Some(4),
            min_len: Some(2),
            ..SettingsPatch::default()
        });
        let encoded = encode_client_event(&msg).unwrap();
        assert_eq!(decode_client_event(&encoded).unwrap(), msg);
    }

    #[test]
    fn roundtrip_tile_yoink() {
        let msg = ClientEvent::TileYoink(TileYoinkMsg { index: 5 });
        let encoded = encode_client_event(&msg).unwrap();
        assert!(encoded.contains(r#""event":"tile:yoink""#));
        assert_eq!(decode_client_event(&encoded).unwrap(), msg);
    }

    #[test]
    fn roundtrip_word_submit_with_and_without_indices() {
        let with = ClientEvent::WordSubmit(WordSubmitMsg {
            word: "CAT".to_string(),
            indices: Some(vec![0, 1, 2]),
        });
        let without = ClientEvent::WordSubmit(WordSubmitMsg {
            word: "CAT".to_string(),
            indices: None,
        });
        for msg in [with, without] {
            let encoded = encode_client_event(&msg).unwrap();
            assert_eq!(decode_client_event(&encoded).unwrap(), msg);
        }
    }

    #[test]
    fn decode_client_event_from_literal_wire_text() {
        let msg = decode_client_event(r#"{"event":"tile:yoink","data":{"index":12}}"#).unwrap();
        assert_eq!(msg, ClientEvent::TileYoink(TileYoinkMsg { index: 12 }));
    }

    #[test]
    fn unknown_event_fails_to_decode() {
        assert!(decode_client_event(r#"{"event":"tile:shove","data":{}}"#).is_err());
        assert!(decode_client_event("not json").is_err());
    }

    #[test]
    fn oversized_frame_rejected() {
        let huge = format!(
            r#"{{"event":"word:submit","data":{{"word":"{}"}}}}"#,
            "A".repeat(MAX_MESSAGE_SIZE)
        );
        assert!(matches!(
            decode_client_event(&huge),
            Err(ProtocolError::MessageTooLarge(_))
        ));
    }

    #[test]
    fn roundtrip_lobby_state() {
        let msg = ServerEvent::LobbyState(LobbyStateMsg {
            id: 7,
            settings: SettingsView::from(&RoomSettings::default()),
            players: vec![PlayerEntry {
                id: 7,
                name: "Alice".to_string(),
            }],
            pool: vec![Some('A'); 16],
            bank: vec!['C', 'A', 'T'],
            my_score: 64,
            ends_in_ms: Some(42_000),
            phase: Phase::Playing,
            current_round: 1,
            total_rounds: 3,
            round_multiplier: 1.0,
            scores_hidden: true,
        });
        let encoded = encode_server_event(&msg).unwrap();
        assert!(encoded.contains(r#""event":"lobby:state""#));
        assert!(encoded.contains(r#""myScore":64"#));
        assert!(encoded.contains(r#""endsInMs":42000"#));
        assert!(encoded.contains(r#""scoresHidden":true"#));
        assert_eq!(decode_server_event(&encoded).unwrap(), msg);
    }

    #[test]
    fn roundtrip_tile_yoinked() {
        let msg = ServerEvent::TileYoinked(TileYoinkedMsg {
            player_id: 3,
            player_name: "Bob".to_string(),
            index: 5,
            letter: 'Q',
        });
        let encoded = encode_server_event(&msg).unwrap();
        assert!(encoded.contains(r#""event":"tile:yoinked""#));
        assert!(encoded.contains(r#""playerId":3"#));
        assert_eq!(decode_server_event(&encoded).unwrap(), msg);
    }

    #[test]
    fn roundtrip_word_events() {
        let accepted = ServerEvent::WordAccepted(WordAcceptedMsg {
            player_id: 1,
            name: "Alice".to_string(),
            word: "CAT".to_string(),
            letters: vec!['C', 'A', 'T'],
            points: 64,
            feed: "Alice played CAT for 64 points".to_string(),
        });
        let rejected = ServerEvent::WordRejected(WordRejectedMsg {
            word: "ZZZ".to_string(),
            reason: "not a word".to_string(),
        });
        for msg in [accepted, rejected] {
            let encoded = encode_server_event(&msg).unwrap();
            assert_eq!(decode_server_event(&encoded).unwrap(), msg);
        }
    }

    #[test]
    fn roundtrip_round_and_game_ended() {
        let board = vec![LeaderboardEntry {
            id: 1,
            name: "Alice".to_string(),
            round_score: 64,
            cumulative_score: 128,
        }];
        let round = ServerEvent::RoundEnded(RoundEndedMsg {
            round: 2,
            total_rounds: 3,
            leaderboard: board.clone(),
        });
        let game = ServerEvent::GameEnded(GameEndedMsg { leaderboard: board });
        for msg in [round, game] {
            let encoded = encode_server_event(&msg).unwrap();
            assert!(encoded.contains(r#""cumulativeScore":128"#));
            assert_eq!(decode_server_event(&encoded).unwrap(), msg);
        }
    }
}
