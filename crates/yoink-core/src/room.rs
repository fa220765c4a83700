use serde::{Deserialize, Serialize};

/// Lifecycle phase of a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Lobby,
    Playing,
    Intermission,
    Finished,
}

/// Room codes are opaque strings matched exactly. This only bounds them to
/// something sane for a hash key and a log field.
pub fn is_valid_room_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= 24
        && code.chars().all(|c| !c.is_whitespace() && !c.is_control())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_wire_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Lobby).unwrap(), "\"lobby\"");
        assert_eq!(serde_json::to_string(&Phase::Playing).unwrap(), "\"playing\"");
        assert_eq!(
            serde_json::to_string(&Phase::Intermission).unwrap(),
            "\"intermission\""
        );
        assert_eq!(serde_json::to_string(&Phase::Finished).unwrap(), "\"finished\"");
    }

    #[test]
    fn room_code_bounds() {
        assert!(is_valid_room_code("kitchen"));
        assert!(is_valid_room_code("ROOM-42"));
        assert!(!is_valid_room_code(""));
        assert!(!is_valid_room_code("has space"));
        assert!(!is_valid_room_code(&"x".repeat(25)));
    }
}
