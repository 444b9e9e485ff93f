//! libwnn-core
//!
//! Language-neutral model shared by the libwnn language crates (libjajp).
//!
//! Public API:
//! - `StrSegment` / `ComposingText` - three-layer composing buffer with
//!   synchronized cursors (keystrokes, letters, clauses)
//! - `WnnWord`, `WnnClause`, `WnnSentence`, `WnnPos` - conversion values
//! - `Candidate` - one entry of a candidate stream (word, clause or sentence)
//! - `WnnDictionary` - the dictionary collaborator contract
//! - `InMemoryDictionary` - reference dictionary (`Lexicon` + `UserDict`)
//! - `LetterConverter` - one transliteration step on a `ComposingText`
//! - `Config` - tuning constants, loadable from TOML
use anyhow::Context;
use serde::{Deserialize, Serialize};

pub mod segment;
pub use segment::StrSegment;

pub mod composing_text;
pub use composing_text::{ComposingText, Inconsistency, LAYER0, LAYER1, LAYER2, MAX_LAYER};

pub mod word;
pub use word::{WnnClause, WnnPos, WnnSentence, WnnWord};

pub mod candidate;
pub use candidate::Candidate;

pub mod dictionary;
pub use dictionary::{
    ConnectMatrix, DictionaryError, DictionaryIndex, PosType, SearchOperation, SearchOrder,
    WnnDictionary,
};

pub mod lexicon;
pub use lexicon::{Lexicon, LexiconEntry};

pub mod userdict;
pub use userdict::UserDict;

pub mod memory;
pub use memory::InMemoryDictionary;

pub mod letter_converter;
pub use letter_converter::LetterConverter;

/// Cost added for every clause of a consecutive-clause conversion.
pub const CLAUSE_COST: i32 = -1000;
/// Score band of learned words.
pub const FREQ_LEARN: i32 = 600;
/// Score band of user dictionary words.
pub const FREQ_USER: i32 = 500;

/// Tuning constants of the conversion pipeline.
///
/// Everything here is language-agnostic. Language crates wrap it (see
/// `JaJpConfig` in libjajp) to add their own options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Cost of one clause in a sentence. Negative; more clauses rank lower.
    pub clause_cost: i32,
    /// Score given to learned words.
    pub freq_learn: i32,
    /// Score given to user dictionary words. Normally at most `freq_learn`.
    pub freq_user: i32,

    /// Longest clause (in characters) tried by consecutive-clause conversion.
    pub max_clause_length: usize,
    /// Number of trailing letter segments a letter converter may consume.
    pub romkan_lookback: usize,

    /// Maximum number of dictionary candidates handed out by prediction.
    pub predict_limit: usize,
    /// Candidates longer than this (in characters) are dropped.
    pub max_output_length: usize,
    /// Readings longer than this are not clause-converted.
    pub max_input_length: usize,
    /// Keys longer than this yield no dictionary results.
    pub max_key_length: usize,

    /// Capacity of the learning store (least recently used words are evicted).
    pub learn_capacity: usize,
    /// Maximum number of user dictionary words.
    pub user_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clause_cost: CLAUSE_COST,
            freq_learn: FREQ_LEARN,
            freq_user: FREQ_USER,
            max_clause_length: 20,
            romkan_lookback: 4,
            predict_limit: 100,
            max_output_length: 50,
            max_input_length: 50,
            max_key_length: 50,
            learn_capacity: 2000,
            user_capacity: 100,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content).with_context(|| format!("write config {}", path.display()))?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    // ========== Score Bands ==========

    /// Set the clause cost. Positive values are flipped; a clause never adds score.
    pub fn set_clause_cost(&mut self, cost: i32) {
        self.clause_cost = -cost.abs();
    }

    /// Set the learn and user score bands together. The user band is capped
    /// at the learn band.
    pub fn set_score_bands(&mut self, learn: i32, user: i32) {
        self.freq_learn = learn;
        self.freq_user = user.min(learn);
    }

    // ========== Limits ==========

    /// Set the clause window of consecutive-clause conversion (at least 1).
    pub fn set_max_clause_length(&mut self, len: usize) {
        self.max_clause_length = len.max(1);
    }

    /// Set the number of letter segments a letter converter looks back over (at least 1).
    pub fn set_romkan_lookback(&mut self, len: usize) {
        self.romkan_lookback = len.max(1);
    }
}

/// Utility helpers.
pub mod utils {
    use unicode_normalization::UnicodeNormalization;

    /// Normalize a dictionary key or reading (NFC).
    ///
    /// Unlike display text, readings keep surrounding whitespace: a space is a
    /// legitimate keystroke in a composition.
    pub fn normalize(s: &str) -> String {
        s.nfc().collect()
    }

    /// Number of characters (not bytes) in `s`.
    pub fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    /// Full-width form of a printable ASCII character.
    ///
    /// - ASCII space → Ideographic space (　)
    /// - `!`..=`~` → U+FF01..=U+FF5E
    ///
    /// Anything else has no full-width form and yields `None`.
    pub fn to_fullwidth_char(ch: char) -> Option<char> {
        match ch {
            ' ' => Some('\u{3000}'),
            '!'..='~' => char::from_u32(ch as u32 - 0x21 + 0xFF01),
            _ => None,
        }
    }

    /// Convert a string of printable ASCII to full width, or `None` if any
    /// character has no full-width form.
    pub fn to_fullwidth(s: &str) -> Option<String> {
        s.chars().map(to_fullwidth_char).collect()
    }

    /// Upper-case the first character and lower-case the rest.
    pub fn capitalize(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }
}
