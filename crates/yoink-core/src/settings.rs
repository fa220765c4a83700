use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed rule constants. These are not host-adjustable.
pub const MAX_WORD_LEN: usize = 7;
pub const YOINK_COOLDOWN: Duration = Duration::from_millis(500);
pub const ROUND_MULTIPLIERS: [f64; 3] = [1.0, 1.2, 1.5];

/// Host-adjustable room settings. Every write path clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomSettings {
    pub rounds: u32,
    pub round_duration_secs: u64,
    pub intermission_secs: u64,
    pub min_len: usize,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            rounds: 3,
            round_duration_secs: 60,
            intermission_secs: 10,
            min_len: 3,
        }
    }
}

impl RoomSettings {
    /// Apply a partial update, clamping each field to its legal range.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(rounds) = patch.rounds {
            self.rounds = rounds.clamp(1, 5);
        }
        if let Some(secs) = patch.round_duration_sec {
            self.round_duration_secs = secs.clamp(15, 300);
        }
        if let Some(secs) = patch.intermission_sec {
            self.intermission_secs = secs.clamp(3, 30);
        }
        if let Some(min_len) = patch.min_len {
            self.min_len = min_len.clamp(2, 6);
        }
    }

    pub fn round_duration(&self) -> Duration {
        Duration::from_secs(self.round_duration_secs)
    }

    pub fn intermission(&self) -> Duration {
        Duration::from_secs(self.intermission_secs)
    }

    /// Multiplier for a 1-based round index. Rounds past the table reuse the
    /// last entry; round 0 (lobby) reports the base multiplier.
    pub fn multiplier_for_round(&self, round: u32) -> f64 {
        let index = (round.saturating_sub(1) as usize).min(ROUND_MULTIPLIERS.len() - 1);
        ROUND_MULTIPLIERS[index]
    }
}

/// Partial `settings:update` payload. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub rounds: Option<u32>,
    pub round_duration_sec: Option<u64>,
    pub intermission_sec: Option<u64>,
    pub min_len: Option<usize>,
}
