use crate::bank::Bank;
use crate::dictionary::Dictionary;
use crate::settings::MAX_WORD_LEN;

/// Why a submission was rejected. `reason()` strings go to the submitter
/// verbatim in `word:rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordRejection {
    TooShort,
    TooLong,
    NotAWord,
    NotInBank,
}

impl WordRejection {
    pub fn reason(self) -> &'static str {
        match self {
            Self::TooShort => "too short",
            Self::TooLong => "too long (max 7)",
            Self::NotAWord => "not a word",
            Self::NotInBank => "not in bank",
        }
    }
}

/// Validate a submission against the dictionary, length rules, and the
/// player's bank.
///
/// Checks run in order: character set, length, dictionary membership, bank
/// match. When `indices` is given, those exact positions must spell the word
/// in selection order; otherwise positions are reconstructed and the
/// submission is rejected if no exact match exists.
///
/// Returns the uppercased word plus the bank indices to consume.
pub fn validate_submission(
    dictionary: &Dictionary,
    min_len: usize,
    bank: &Bank,
    word: &str,
    indices: Option<&[usize]>,
) -> Result<(String, Vec<usize>), WordRejection> {
    let word = word.trim().to_ascii_uppercase();
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(WordRejection::NotAWord);
    }
    if word.len() < min_len {
        return Err(WordRejection::TooShort);
    }
    if word.len() > MAX_WORD_LEN {
        return Err(WordRejection::TooLong);
    }
    if !dictionary.contains(&word) {
        return Err(WordRejection::NotAWord);
    }
    let indices = match indices {
        Some(picked) if bank.spells(picked, &word) => picked.to_vec(),
        Some(_) => return Err(WordRejection::NotInBank),
        None => bank.find_indices(&word).ok_or(WordRejection::NotInBank)?,
    };
    Ok((word, indices))
}
