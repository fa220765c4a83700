use serde::{Deserialize, Serialize};

use crate::PlayerId;
use crate::bank::BANK_CAPACITY;
use crate::room::Phase;
use crate::settings::{MAX_WORD_LEN, ROUND_MULTIPLIERS, RoomSettings, SettingsPatch, YOINK_COOLDOWN};

/// Events a client may send. Wire form is `{"event": "<name>", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "lobby:join")]
    LobbyJoin(LobbyJoinMsg),
    #[serde(rename = "game:start")]
    GameStart(GameStartMsg),
    #[serde(rename = "settings:update")]
    SettingsUpdate(SettingsPatch),
    #[serde(rename = "tile:yoink")]
    TileYoink(TileYoinkMsg),
    #[serde(rename = "word:submit")]
    WordSubmit(WordSubmitMsg),
}

/// Events the server emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "lobby:state")]
    LobbyState(LobbyStateMsg),
    #[serde(rename = "tile:yoinked")]
    TileYoinked(TileYoinkedMsg),
    #[serde(rename = "word:accepted")]
    WordAccepted(WordAcceptedMsg),
    #[serde(rename = "word:rejected")]
    WordRejected(WordRejectedMsg),
    #[serde(rename = "yoink:rejected")]
    YoinkRejected(YoinkRejectedMsg),
    #[serde(rename = "round:ended")]
    RoundEnded(RoundEndedMsg),
    #[serde(rename = "game:ended")]
    GameEnded(GameEndedMsg),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyJoinMsg {
    pub room: String,
    pub name: String,
}

/// `game:start` carries no fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStartMsg {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileYoinkMsg {
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSubmitMsg {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<usize>>,
}

/// Per-viewer state projection. `bank`, `myScore`, and `id` are private to
/// the recipient; everything else is shared room state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyStateMsg {
    pub id: PlayerId,
    pub settings: SettingsView,
    pub players: Vec<PlayerEntry>,
    pub pool: Vec<Option<char>>,
    pub bank: Vec<char>,
    pub my_score: u32,
    pub ends_in_ms: Option<u64>,
    pub phase: Phase,
    pub current_round: u32,
    pub total_rounds: u32,
    pub round_multiplier: f64,
    pub scores_hidden: bool,
}

/// Settings as shown to clients: the adjustable fields plus the fixed rule
/// constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub rounds: u32,
    pub round_duration_sec: u64,
    pub intermission_sec: u64,
    pub min_len: usize,
    pub max_len: usize,
    pub bank_capacity: usize,
    pub yoink_cooldown_ms: u64,
    pub round_multipliers: Vec<f64>,
}

impl From<&RoomSettings> for SettingsView {
    fn from(s: &RoomSettings) -> Self {
        Self {
            rounds: s.rounds,
            round_duration_sec: s.round_duration_secs,
            intermission_sec: s.intermission_secs,
            min_len: s.min_len,
            max_len: MAX_WORD_LEN,
            bank_capacity: BANK_CAPACITY,
            yoink_cooldown_ms: YOINK_COOLDOWN.as_millis() as u64,
            round_multipliers: ROUND_MULTIPLIERS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileYoinkedMsg {
    pub player_id: PlayerId,
    pub player_name: String,
    pub index: usize,
    pub letter: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordAcceptedMsg {
    pub player_id: PlayerId,
    pub name: String,
    pub word: String,
    pub letters: Vec<char>,
    pub points: u32,
    /// Human-readable feed line for the room's activity ticker.
    pub feed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRejectedMsg {
    pub word: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoinkRejectedMsg {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub name: String,
    pub round_score: u32,
    pub cumulative_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundEndedMsg {
    pub round: u32,
    pub total_rounds: u32,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEndedMsg {
    pub leaderboard: Vec<LeaderboardEntry>,
}
