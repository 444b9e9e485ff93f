//! Dictionary collaborator contract.
//!
//! Converters never touch a storage format. They configure which sources to
//! search and in which score band (`clear_dictionary` + `set_dictionary`),
//! run one search (`search_word`) and drain its results (`next_word`). The
//! search cursor is single-shot: a new search abandons the previous one.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::word::{WnnPos, WnnWord};

/// A searchable source inside a dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DictionaryIndex {
    /// Numbered read-only source.
    System(u8),
    /// Words registered by the user.
    User,
    /// Words learned from committed conversions.
    Learn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOperation {
    /// Stroke equals the key.
    Exact,
    /// Stroke starts with the key.
    Prefix,
    /// Words learned right after the previous word.
    Link,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchOrder {
    ByFrequency,
    ByKey,
}

/// Grammar anchors a dictionary provides POS pairs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosType {
    /// Terminal after the last clause of a sentence.
    SentenceEnd,
    /// Terminal after a clause converted on its own.
    ClauseEnd,
    /// Terminal after a clause in the middle of a sentence.
    ClauseBreak,
    SentenceStart,
    SingleKanji,
    Numeral,
    Noun,
    PersonName,
    PlaceName,
    Symbol,
}

/// Errors of fallible dictionary operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    #[error("invalid word: {0}")]
    InvalidWord(String),

    #[error("user dictionary is full ({0} words)")]
    UserDictionaryFull(usize),

    #[error("word not found: {0}")]
    NotFound(String),

    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

/// POS connectivity: which right POS may be followed by which left POS.
///
/// Stored as one bitset per left POS over right POS, both 1-indexed. Index 0
/// (unset) and indices past the matrix size are never connectible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectMatrix {
    size: usize,
    rows: Vec<Vec<u64>>,
}

impl ConnectMatrix {
    /// Empty matrix over POS `1..=size`.
    pub fn new(size: usize) -> Self {
        let words = size.div_ceil(64);
        Self {
            size,
            rows: vec![vec![0; words]; size],
        }
    }

    /// Build a matrix from `(right, left)` pairs that may connect.
    pub fn from_pairs<I: IntoIterator<Item = (u16, u16)>>(size: usize, pairs: I) -> Self {
        let mut matrix = Self::new(size);
        for (right, left) in pairs {
            matrix.allow(right, left);
        }
        matrix
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn in_range(&self, pos: u16) -> bool {
        pos != 0 && (pos as usize) <= self.size
    }

    /// Allow a word with right POS `right` to be followed by left POS `left`.
    /// Out-of-range indices are ignored.
    pub fn allow(&mut self, right: u16, left: u16) {
        if !self.in_range(right) || !self.in_range(left) {
            return;
        }
        let bit = right as usize - 1;
        self.rows[left as usize - 1][bit / 64] |= 1 << (bit % 64);
    }

    /// Whether right POS `right` may be followed by left POS `left`.
    pub fn connectible(&self, right: u16, left: u16) -> bool {
        if !self.in_range(right) || !self.in_range(left) {
            return false;
        }
        let bit = right as usize - 1;
        self.rows[left as usize - 1][bit / 64] & (1 << (bit % 64)) != 0
    }
}

/// The dictionary collaborator used by converters and the engine.
pub trait WnnDictionary {
    /// Deactivate every source.
    fn clear_dictionary(&mut self);

    /// Activate `index`, scaling its scores into `[min_score, max_score]`.
    /// Returns false when the source does not exist.
    fn set_dictionary(&mut self, index: DictionaryIndex, min_score: i32, max_score: i32) -> bool;

    /// Start a search over the active sources and return the result count.
    /// Malformed keys yield 0.
    fn search_word(
        &mut self,
        operation: SearchOperation,
        order: SearchOrder,
        key: &str,
        previous: Option<&WnnWord>,
    ) -> usize;

    /// Next result of the current search. With `exact_length`, results whose
    /// stroke has a different character count are skipped.
    fn next_word(&mut self, exact_length: Option<usize>) -> Option<WnnWord>;

    fn connect_matrix(&self) -> Arc<ConnectMatrix>;

    fn part_of_speech(&self, pos_type: PosType) -> WnnPos;

    /// Record that `word` was committed, optionally right after `previous`.
    fn learn_word(&mut self, word: &WnnWord, previous: Option<&WnnWord>) -> Result<(), DictionaryError>;

    fn add_word_to_user_dictionary(&mut self, _word: &WnnWord) -> Result<(), DictionaryError> {
        Err(DictionaryError::Unsupported("user dictionary"))
    }

    fn remove_word_from_user_dictionary(&mut self, _word: &WnnWord) -> Result<(), DictionaryError> {
        Err(DictionaryError::Unsupported("user dictionary"))
    }

    fn user_dictionary_words(&self) -> Vec<WnnWord> {
        Vec::new()
    }

    fn clear_user_dictionary(&mut self) -> Result<(), DictionaryError> {
        Err(DictionaryError::Unsupported("user dictionary"))
    }

    fn clear_learn_dictionary(&mut self) -> Result<(), DictionaryError> {
        Err(DictionaryError::Unsupported("learning dictionary"))
    }
}
