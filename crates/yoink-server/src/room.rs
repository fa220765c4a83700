//! The per-room engine: one tokio task owns all room state and consumes a
//! serialized command queue. Spawn and phase timers are select arms on the
//! same loop, so grid mutations, submissions, and clock transitions are
//! totally ordered per room. Concurrent rooms are independent tasks.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, Instant};

use yoink_core::PlayerId;
use yoink_core::bank::Bank;
use yoink_core::dictionary::Dictionary;
use yoink_core::grid::{Grid, spawn_interval};
use yoink_core::letters::LetterBag;
use yoink_core::net::messages::{
    GameEndedMsg, LeaderboardEntry, LobbyStateMsg, PlayerEntry, RoundEndedMsg, ServerEvent,
    SettingsView, TileYoinkedMsg, WordAcceptedMsg, WordRejectedMsg, YoinkRejectedMsg,
};
use yoink_core::net::protocol::encode_server_event;
use yoink_core::room::Phase;
use yoink_core::scoring::score_word;
use yoink_core::settings::{RoomSettings, SettingsPatch, YOINK_COOLDOWN};
use yoink_core::validate::validate_submission;

/// Per-player outbound channel. Bounded; slow consumers are skipped rather
/// than awaited inside the room critical section.
pub type PlayerSender = mpsc::Sender<String>;

/// Everything the transport layer can ask a room to do. Commands are
/// processed strictly in arrival order; yoink arbitration on a contested
/// slot is first-accepted-wins.
#[derive(Debug)]
pub enum RoomCommand {
    Join {
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    },
    Leave {
        player_id: PlayerId,
    },
    StartGame {
        player_id: PlayerId,
    },
    UpdateSettings {
        player_id: PlayerId,
        patch: SettingsPatch,
    },
    Yoink {
        player_id: PlayerId,
        index: usize,
    },
    Submit {
        player_id: PlayerId,
        word: String,
        indices: Option<Vec<usize>>,
    },
}

/// Spawn a room actor. Returns the command sender and task handle; the task
/// exits when its last player leaves and reports its code on `closed_tx`.
pub fn spawn_room(
    code: String,
    dictionary: Arc<Dictionary>,
    closed_tx: mpsc::UnboundedSender<String>,
) -> (mpsc::UnboundedSender<RoomCommand>, JoinHandle<()>) {
    spawn_room_seeded(code, dictionary, closed_tx, rand::random())
}

/// Seeded variant for deterministic tests.
pub fn spawn_room_seeded(
    code: String,
    dictionary: Arc<Dictionary>,
    closed_tx: mpsc::UnboundedSender<String>,
    seed: u64,
) -> (mpsc::UnboundedSender<RoomCommand>, JoinHandle<()>) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let room = Room::new(code, dictionary, seed);
    let handle = tokio::spawn(run_room(room, cmd_rx, closed_tx));
    (cmd_tx, handle)
}

/// Deadline placeholder for disarmed timers; the select arm is gated off, so
/// this instant is never actually slept to.
const IDLE: Duration = Duration::from_secs(3600);

async fn run_room(
    mut room: Room,
    mut cmd_rx: mpsc::UnboundedReceiver<RoomCommand>,
    closed_tx: mpsc::UnboundedSender<String>,
) {
    // Observational 1 Hz tick so clients can animate countdowns. Transitions
    // use the absolute deadlines below, never this interval.
    let mut tick = time::interval(Duration::from_secs(1));
    tick.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

    loop {
        let spawn_at = room.spawn_deadline.unwrap_or_else(|| Instant::now() + IDLE);
        let phase_at = room.phase_deadline.unwrap_or_else(|| Instant::now() + IDLE);

        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => {
                    if !room.handle(cmd) {
                        break;
                    }
                },
                None => break,
            },
            _ = time::sleep_until(spawn_at), if room.spawn_deadline.is_some() => {
                room.spawn_fired();
            },
            _ = time::sleep_until(phase_at), if room.phase_deadline.is_some() => {
                room.phase_fired();
            },
            _ = tick.tick() => room.broadcast_state(),
        }
    }

    tracing::info!(room = %room.code, "Room closed");
    let _ = closed_tx.send(room.code);
}

struct Seat {
    id: PlayerId,
    name: String,
    sender: PlayerSender,
    bank: Bank,
    round_score: u32,
    total_score: u32,
    words: Vec<String>,
    last_yoink_at: Option<Instant>,
}

pub(crate) struct Room {
    code: String,
    seats: Vec<Seat>,
    host_id: Option<PlayerId>,
    phase: Phase,
    settings: RoomSettings,
    grid: Grid,
    bag: LetterBag,
    rng: StdRng,
    dictionary: Arc<Dictionary>,
    /// 1-based round index; 0 while in the lobby.
    current_round: u32,
    phase_deadline: Option<Instant>,
    spawn_deadline: Option<Instant>,
}

impl Room {
    fn new(code: String, dictionary: Arc<Dictionary>, seed: u64) -> Self {
        Self {
            code,
            seats: Vec::new(),
            host_id: None,
            phase: Phase::Lobby,
            settings: RoomSettings::default(),
            grid: Grid::new(),
            bag: LetterBag::new(),
            rng: StdRng::seed_from_u64(seed),
            dictionary,
            current_round: 0,
            phase_deadline: None,
            spawn_deadline: None,
        }
    }

    /// Process one command. Returns `false` when the room emptied and the
    /// actor should exit.
    fn handle(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                player_id,
                name,
                sender,
            } => self.join(player_id, name, sender),
            RoomCommand::Leave { player_id } => return self.leave(player_id),
            RoomCommand::StartGame { player_id } => self.start_game(player_id),
            RoomCommand::UpdateSettings { player_id, patch } => {
                self.update_settings(player_id, &patch)
            },
            RoomCommand::Yoink { player_id, index } => self.yoink(player_id, index),
            RoomCommand::Submit {
                player_id,
                word,
                indices,
            } => self.submit(player_id, &word, indices.as_deref()),
        }
        true
    }

    fn join(&mut self, player_id: PlayerId, name: String, sender: PlayerSender) {
        self.seats.push(Seat {
            id: player_id,
            name,
            sender,
            bank: Bank::new(),
            round_score: 0,
            total_score: 0,
            words: Vec::new(),
            last_yoink_at: None,
        });
        // First joiner hosts.
        if self.host_id.is_none() {
            self.host_id = Some(player_id);
        }
        tracing::info!(room = %self.code, player_id, "Player joined");
        self.broadcast_state();
    }

    /// Returns `false` when the last player left (room must be destroyed).
    fn leave(&mut self, player_id: PlayerId) -> bool {
        self.seats.retain(|s| s.id != player_id);
        if self.seats.is_empty() {
            return false;
        }
        // Host migration to the earliest remaining joiner.
        if self.host_id == Some(player_id) {
            self.host_id = self.seats.first().map(|s| s.id);
        }
        tracing::info!(room = %self.code, player_id, "Player left");
        self.broadcast_state();
        true
    }

    fn start_game(&mut self, player_id: PlayerId) {
        if self.host_id != Some(player_id) {
            tracing::debug!(room = %self.code, player_id, "game:start from non-host ignored");
            return;
        }
        if !matches!(self.phase, Phase::Lobby | Phase::Finished) {
            tracing::debug!(room = %self.code, phase = ?self.phase, "game:start ignored mid-game");
            return;
        }
        if self.seats.is_empty() {
            return;
        }
        for seat in &mut self.seats {
            seat.total_score = 0;
        }
        tracing::info!(room = %self.code, rounds = self.settings.rounds, "Game started");
        self.start_round(1);
    }

    fn update_settings(&mut self, player_id: PlayerId, patch: &SettingsPatch) {
        if self.host_id != Some(player_id) {
            tracing::debug!(room = %self.code, player_id, "settings:update from non-host ignored");
            return;
        }
        self.settings.apply(patch);
        self.broadcast_state();
    }

    /// Reset per-round state, fill the grid, and arm the round clock. The
    /// round begins full, so no spawn is scheduled until the first yoink.
    fn start_round(&mut self, round: u32) {
        self.current_round = round;
        self.phase = Phase::Playing;
        for seat in &mut self.seats {
            seat.bank.clear();
            seat.round_score = 0;
            seat.words.clear();
            seat.last_yoink_at = None;
        }
        self.grid.refill_all(&self.bag, &mut self.rng);
        self.spawn_deadline = None;
        self.phase_deadline = Some(Instant::now() + self.settings.round_duration());
        tracing::info!(room = %self.code, round, "Round started");
        self.broadcast_state();
    }

    fn phase_fired(&mut self) {
        self.phase_deadline = None;
        match self.phase {
            Phase::Playing => self.end_round(),
            Phase::Intermission => self.start_round(self.current_round + 1),
            Phase::Lobby | Phase::Finished => {},
        }
    }

    fn end_round(&mut self) {
        self.spawn_deadline = None;
        for seat in &mut self.seats {
            seat.total_score += seat.round_score;
        }
        let leaderboard = self.leaderboard();
        self.broadcast_event(&ServerEvent::RoundEnded(RoundEndedMsg {
            round: self.current_round,
            total_rounds: self.settings.rounds,
            leaderboard: leaderboard.clone(),
        }));

        if self.current_round < self.settings.rounds {
            self.phase = Phase::Intermission;
            self.phase_deadline = Some(Instant::now() + self.settings.intermission());
            tracing::info!(room = %self.code, round = self.current_round, "Intermission");
        } else {
            self.phase = Phase::Finished;
            self.broadcast_event(&ServerEvent::GameEnded(GameEndedMsg { leaderboard }));
            tracing::info!(room = %self.code, "Game finished");
        }
        self.broadcast_state();
    }

    /// Cumulative score descending; ties break by name ascending.
    fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .seats
            .iter()
            .map(|s| LeaderboardEntry {
                id: s.id,
                name: s.name.clone(),
                round_score: s.round_score,
                cumulative_score: s.total_score,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.cumulative_score
                .cmp(&a.cumulative_score)
                .then_with(|| a.name.cmp(&b.name))
        });
        entries
    }

    fn yoink(&mut self, player_id: PlayerId, index: usize) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(pos) = self.seats.iter().position(|s| s.id == player_id) else {
            return;
        };
        let now = Instant::now();

        if let Some(last) = self.seats[pos].last_yoink_at
            && now.duration_since(last) < YOINK_COOLDOWN
        {
            self.send_to_seat(pos, &ServerEvent::YoinkRejected(YoinkRejectedMsg {
                reason: "cooldown".to_string(),
            }));
            return;
        }
        if self.seats[pos].bank.is_full() {
            self.send_to_seat(pos, &ServerEvent::YoinkRejected(YoinkRejectedMsg {
                reason: "bank full".to_string(),
            }));
            return;
        }
        // The decisive step: the slot either still has its letter or this
        // yoink lost the race and gets no reply.
        let Some(letter) = self.grid.take_at(index) else {
            tracing::debug!(room = %self.code, player_id, index, "yoink lost (tile gone)");
            return;
        };

        let seat = &mut self.seats[pos];
        seat.last_yoink_at = Some(now);
        seat.bank.append(letter);
        let player_name = seat.name.clone();

        self.broadcast_event(&ServerEvent::TileYoinked(TileYoinkedMsg {
            player_id,
            player_name,
            index,
            letter,
        }));
        // Taking a tile always leaves a hole, so the pending spawn (if any)
        // is superseded by a schedule computed from the new fill level.
        self.spawn_deadline = Some(now + spawn_interval(self.grid.non_empty_count()));
        self.broadcast_state();
    }

    fn spawn_fired(&mut self) {
        self.spawn_deadline = None;
        if self.phase != Phase::Playing {
            return;
        }
        if let Some((index, letter)) = self.grid.spawn_one(&self.bag, &mut self.rng) {
            tracing::debug!(room = %self.code, index, %letter, "Tile spawned");
            if !self.grid.is_full() {
                self.spawn_deadline =
                    Some(Instant::now() + spawn_interval(self.grid.non_empty_count()));
            }
            self.broadcast_state();
        }
    }

    fn submit(&mut self, player_id: PlayerId, word: &str, indices: Option<&[usize]>) {
        if self.phase != Phase::Playing {
            return;
        }
        let Some(pos) = self.seats.iter().position(|s| s.id == player_id) else {
            return;
        };

        let multiplier = self.settings.multiplier_for_round(self.current_round);
        match validate_submission(
            &self.dictionary,
            self.settings.min_len,
            &self.seats[pos].bank,
            word,
            indices,
        ) {
            Err(rejection) => {
                self.send_to_seat(pos, &ServerEvent::WordRejected(WordRejectedMsg {
                    word: word.to_string(),
                    reason: rejection.reason().to_string(),
                }));
            },
            Ok((word, picked)) => {
                let points = score_word(&word, multiplier);
                let seat = &mut self.seats[pos];
                seat.bank.remove_indices(&picked);
                seat.round_score += points;
                seat.words.push(word.clone());
                let name = seat.name.clone();
                let feed = format!("{name} played {word} for {points} points");

                self.broadcast_event(&ServerEvent::WordAccepted(WordAcceptedMsg {
                    player_id,
                    name,
                    letters: word.chars().collect(),
                    word,
                    points,
                    feed,
                }));
                self.broadcast_state();
            },
        }
    }

    /// Emit a per-viewer projection to every player. The room-wide portion is
    /// computed once; only `id`, `bank`, and `myScore` vary per recipient.
    fn broadcast_state(&self) {
        let players: Vec<PlayerEntry> = self
            .seats
            .iter()
            .map(|s| PlayerEntry {
                id: s.id,
                name: s.name.clone(),
            })
            .collect();
        let pool: Vec<Option<char>> = self.grid.slots().to_vec();
        let settings = SettingsView::from(&self.settings);
        let now = Instant::now();
        let ends_in_ms = self
            .phase_deadline
            .map(|d| d.saturating_duration_since(now).as_millis() as u64);
        let round_multiplier = self.settings.multiplier_for_round(self.current_round);
        let scores_hidden = self.phase == Phase::Playing;

        for (pos, seat) in self.seats.iter().enumerate() {
            let projection = ServerEvent::LobbyState(LobbyStateMsg {
                id: seat.id,
                settings: settings.clone(),
                players: players.clone(),
                pool: pool.clone(),
                bank: seat.bank.letters().to_vec(),
                my_score: seat.round_score,
                ends_in_ms,
                phase: self.phase,
                current_round: self.current_round,
                total_rounds: self.settings.rounds,
                round_multiplier,
                scores_hidden,
            });
            self.send_to_seat(pos, &projection);
        }
    }

    /// Encode once, send to every seat.
    fn broadcast_event(&self, event: &ServerEvent) {
        let text = match encode_server_event(event) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(room = %self.code, error = %e, "Failed to encode broadcast");
                return;
            },
        };
        for seat in &self.seats {
            if let Err(e) = seat.sender.try_send(text.clone()) {
                tracing::debug!(
                    room = %self.code, player_id = seat.id, error = %e,
                    "Skipping broadcast to slow client"
                );
            }
        }
    }

    fn send_to_seat(&self, pos: usize, event: &ServerEvent) {
        let seat = &self.seats[pos];
        match encode_server_event(event) {
            Ok(text) => {
                if let Err(e) = seat.sender.try_send(text) {
                    tracing::debug!(
                        room = %self.code, player_id = seat.id, error = %e,
                        "Skipping send to slow client"
                    );
                }
            },
            Err(e) => {
                tracing::error!(room = %self.code, error = %e, "Failed to encode event");
            },
        }
    }
}
