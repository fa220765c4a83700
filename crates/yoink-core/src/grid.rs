use std::time::Duration;

use rand::Rng;

use crate::letters::LetterBag;

/// Number of slots in the shared pool.
pub const GRID_SIZE: usize = 16;

/// Fastest spawn interval, used when the grid is empty.
const SPAWN_MIN: Duration = Duration::from_millis(500);
/// Slowest spawn interval, used at 15 of 16 slots filled.
const SPAWN_MAX: Duration = Duration::from_millis(10_000);

/// Delay before the next spawn given the current non-empty slot count.
///
/// Linear from 500 ms at an empty grid to 10 s at 15/16. Callers must not
/// schedule a spawn at all when the grid is full.
pub fn spawn_interval(non_empty: usize) -> Duration {
    debug_assert!(non_empty < GRID_SIZE);
    let span = (SPAWN_MAX - SPAWN_MIN).as_millis() as f64;
    let ms = SPAWN_MIN.as_millis() as f64 + span * (non_empty as f64 / (GRID_SIZE - 1) as f64);
    Duration::from_millis(ms.round() as u64)
}

/// The 16-slot shared letter pool. Slot identity is its index: a taken slot
/// becomes empty and may later be refilled with a different letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    slots: [Option<char>; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// An all-empty grid.
    pub fn new() -> Self {
        Self {
            slots: [None; GRID_SIZE],
        }
    }

    pub fn slots(&self) -> &[Option<char>; GRID_SIZE] {
        &self.slots
    }

    pub fn non_empty_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    /// Take the letter at `index`, leaving the slot empty. Returns `None`
    /// for an empty slot or an out-of-range index.
    pub fn take_at(&mut self, index: usize) -> Option<char> {
        self.slots.get_mut(index).and_then(|slot| slot.take())
    }

    /// Fill one uniformly chosen empty slot with a freshly sampled letter.
    /// Returns the slot and letter, or `None` if the grid is already full.
    pub fn spawn_one<R: Rng + ?Sized>(&mut self, bag: &LetterBag, rng: &mut R) -> Option<(usize, char)> {
        let empty: Vec<usize> = (0..GRID_SIZE).filter(|&i| self.slots[i].is_none()).collect();
        if empty.is_empty() {
            return None;
        }
        let index = empty[rng.gen_range(0..empty.len())];
        let letter = bag.sample(rng);
        self.slots[index] = Some(letter);
        Some((index, letter))
    }

    /// Reset to a completely full grid of fresh letters (round start).
    pub fn refill_all<R: Rng + ?Sized>(&mut self, bag: &LetterBag, rng: &mut R) {
        for slot in &mut self.slots {
            *slot = Some(bag.sample(rng));
        }
    }
}
