use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

/// Point value and spawn weight for each letter A–Z, in alphabetical order.
///
/// Tiers: 10 for the common set (A D E G I L N O R S T U), 20 for the
/// mid set (B C F H K M P V W Y), 30 for J Q X Z.
pub const LETTERS: [(char, u32, u32); 26] = [
    ('A', 10, 9),
    ('B', 20, 2),
    ('C', 20, 2),
    ('D', 10, 4),
    ('E', 10, 12),
    ('F', 20, 2),
    ('G', 10, 3),
    ('H', 20, 2),
    ('I', 10, 9),
    ('J', 30, 1),
    ('K', 20, 1),
    ('L', 10, 4),
    ('M', 20, 2),
    ('N', 10, 6),
    ('O', 10, 8),
    ('P', 20, 2),
    ('Q', 30, 1),
    ('R', 10, 6),
    ('S', 10, 4),
    ('T', 10, 6),
    ('U', 10, 4),
    ('V', 20, 2),
    ('W', 20, 2),
    ('X', 30, 1),
    ('Y', 20, 2),
    ('Z', 30, 1),
];

/// Point value for an uppercase letter. Non-A–Z input scores zero.
pub fn letter_points(letter: char) -> u32 {
    if letter.is_ascii_uppercase() {
        LETTERS[(letter as u8 - b'A') as usize].1
    } else {
        0
    }
}

/// Weighted random letter source. The pool never exhausts; each sample is
/// independent.
pub struct LetterBag {
    dist: WeightedIndex<u32>,
}

impl Default for LetterBag {
    fn default() -> Self {
        Self::new()
    }
}

impl LetterBag {
    pub fn new() -> Self {
        let dist = WeightedIndex::new(LETTERS.iter().map(|&(_, _, w)| w))
            .expect("letter weights are non-zero");
        Self { dist }
    }

    /// Draw one letter according to the spawn weights.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
        LETTERS[self.dist.sample(rng)].0
    }
}
