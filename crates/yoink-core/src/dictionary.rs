use std::collections::HashSet;

/// Minimal built-in word set used when no dictionary source can be loaded.
/// Enough to keep a game playable.
pub const FALLBACK_WORDS: &[&str] = &[
    "ACE", "AGE", "AIR", "AND", "ANT", "APE", "ARM", "ART", "ATE", "BAD", "BAG", "BAR", "BAT",
    "BED", "BEE", "BIG", "BIT", "BOX", "BUS", "CAB", "CAN", "CAP", "CAR", "CAT", "COT", "CUP",
    "DOG", "DOT", "EAR", "EAT", "EGG", "END", "EYE", "FAN", "FAR", "FIT", "FOX", "GAME", "GAS",
    "GEM", "HAT", "HEN", "ICE", "INK", "JAM", "JAR", "JEST", "JESTING", "JET", "JOG", "KEY",
    "LEG", "LET", "LID", "LIP", "LOG", "MAN", "MAP", "MAT", "NET", "NEST", "NOTE", "OAK", "OAR",
    "ONE", "OWL", "PAN", "PEN", "PET", "PIG", "PIN", "POT", "RAT", "RATS", "RED", "RUN", "SAT",
    "SEA", "SIT", "STAR", "SUN", "TAN", "TAP", "TAR", "TEA", "TEN", "TIN", "TOE", "TOP", "TREE",
    "WORD", "YES", "ZOO",
];

/// Immutable set of valid words, stored uppercase. Shared read-only across
/// all rooms once loaded.
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Build from an iterator of words. Entries are uppercased; anything
    /// containing a non-A–Z character is discarded.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_ascii_uppercase())
            .filter(|w| !w.is_empty() && w.bytes().all(|b| b.is_ascii_uppercase()))
            .collect();
        Self { words }
    }

    /// The built-in fallback set.
    pub fn fallback() -> Self {
        Self::from_words(FALLBACK_WORDS.iter().copied())
    }

    /// Membership test. Expects an already-uppercased candidate.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
