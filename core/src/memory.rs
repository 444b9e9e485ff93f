//! Reference dictionary: a `Lexicon` of system sources plus a `UserDict`.
//!
//! Scores are assigned per search from the band each source was activated
//! with: system words scale their raw frequency linearly into the band, user
//! and learned words sit at the top of theirs.

use std::collections::VecDeque;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use tracing::{debug, trace};

use crate::dictionary::{
    ConnectMatrix, DictionaryError, DictionaryIndex, PosType, SearchOperation, SearchOrder,
    WnnDictionary,
};
use crate::lexicon::{Lexicon, MAX_RAW_FREQUENCY};
use crate::userdict::UserDict;
use crate::utils::{char_len, normalize};
use crate::word::{WnnPos, WnnWord};
use crate::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActiveSource {
    index: DictionaryIndex,
    min_score: i32,
    max_score: i32,
}

impl ActiveSource {
    fn scale(&self, raw: u8) -> i32 {
        self.min_score + (self.max_score - self.min_score) * raw as i32 / MAX_RAW_FREQUENCY as i32
    }
}

#[derive(Debug)]
pub struct InMemoryDictionary {
    lexicon: Lexicon,
    user: UserDict,
    matrix: Arc<ConnectMatrix>,
    pos_table: AHashMap<PosType, WnnPos>,
    active: Vec<ActiveSource>,
    results: VecDeque<WnnWord>,
    max_key_length: usize,
}

impl InMemoryDictionary {
    pub fn new(lexicon: Lexicon, matrix: ConnectMatrix) -> Self {
        Self::with_config(lexicon, matrix, &Config::default())
    }

    pub fn with_config(lexicon: Lexicon, matrix: ConnectMatrix, config: &Config) -> Self {
        Self {
            lexicon,
            user: UserDict::new(config.user_capacity, config.learn_capacity),
            matrix: Arc::new(matrix),
            pos_table: AHashMap::new(),
            active: Vec::new(),
            results: VecDeque::new(),
            max_key_length: config.max_key_length,
        }
    }

    /// Set the POS pair returned for a grammar anchor.
    pub fn set_part_of_speech(&mut self, pos_type: PosType, pos: WnnPos) {
        self.pos_table.insert(pos_type, pos);
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn lexicon_mut(&mut self) -> &mut Lexicon {
        &mut self.lexicon
    }

    pub fn user_dict(&self) -> &UserDict {
        &self.user
    }

    fn collect(
        &self,
        source: &ActiveSource,
        operation: SearchOperation,
        key: &str,
        previous: Option<&WnnWord>,
        out: &mut Vec<WnnWord>,
    ) {
        let matches = |stroke: &str| match operation {
            SearchOperation::Exact => stroke == key,
            SearchOperation::Prefix => stroke.starts_with(key),
            SearchOperation::Link => stroke.starts_with(key),
        };
        match source.index {
            DictionaryIndex::System(n) => {
                let to_word = |stroke: &str, e: &crate::lexicon::LexiconEntry| WnnWord {
                    id: e.id,
                    candidate: e.candidate.clone(),
                    stroke: stroke.to_string(),
                    frequency: source.scale(e.frequency),
                    pos: e.pos,
                    attribute: 0,
                };
                match operation {
                    SearchOperation::Exact => {
                        out.extend(self.lexicon.exact(n, key).iter().map(|e| to_word(key, e)))
                    }
                    SearchOperation::Prefix => {
                        out.extend(self.lexicon.prefix(n, key).map(|(s, e)| to_word(s, e)))
                    }
                    // System sources carry no bigram links.
                    SearchOperation::Link => {}
                }
            }
            DictionaryIndex::User => {
                if operation == SearchOperation::Link {
                    return;
                }
                out.extend(
                    self.user
                        .user_words()
                        .iter()
                        .filter(|w| matches(&w.stroke))
                        .map(|w| WnnWord {
                            frequency: source.max_score,
                            ..w.clone()
                        }),
                );
            }
            DictionaryIndex::Learn => {
                let scored = |w: &WnnWord| WnnWord {
                    frequency: source.max_score,
                    ..w.clone()
                };
                match (operation, previous) {
                    (SearchOperation::Link, Some(previous)) => out.extend(
                        self.user
                            .linked_words(previous)
                            .filter(|w| matches(&w.stroke))
                            .map(scored),
                    ),
                    (SearchOperation::Link, None) => {}
                    _ => out.extend(
                        self.user
                            .learned_words()
                            .filter(|w| matches(&w.stroke))
                            .map(scored),
                    ),
                }
            }
        }
    }
}

impl WnnDictionary for InMemoryDictionary {
    fn clear_dictionary(&mut self) {
        self.active.clear();
        self.results.clear();
    }

    fn set_dictionary(&mut self, index: DictionaryIndex, min_score: i32, max_score: i32) -> bool {
        if min_score > max_score {
            return false;
        }
        if let DictionaryIndex::System(n) = index {
            if !self.lexicon.has_source(n) {
                return false;
            }
        }
        self.active.retain(|s| s.index != index);
        self.active.push(ActiveSource {
            index,
            min_score,
            max_score,
        });
        true
    }

    fn search_word(
        &mut self,
        operation: SearchOperation,
        order: SearchOrder,
        key: &str,
        previous: Option<&WnnWord>,
    ) -> usize {
        self.results.clear();
        let key = normalize(key);
        if char_len(&key) > self.max_key_length {
            return 0;
        }
        if key.is_empty() && operation != SearchOperation::Link {
            return 0;
        }

        let mut found = Vec::new();
        for source in &self.active {
            self.collect(source, operation, &key, previous, &mut found);
        }
        match order {
            SearchOrder::ByFrequency => found.sort_by(|a, b| b.frequency.cmp(&a.frequency)),
            SearchOrder::ByKey => found.sort_by(|a, b| {
                a.stroke
                    .cmp(&b.stroke)
                    .then_with(|| b.frequency.cmp(&a.frequency))
            }),
        }
        let mut seen = AHashSet::new();
        found.retain(|w| seen.insert((w.stroke.clone(), w.candidate.clone())));

        trace!(?operation, key = %key, count = found.len(), "search");
        self.results = found.into();
        self.results.len()
    }

    fn next_word(&mut self, exact_length: Option<usize>) -> Option<WnnWord> {
        while let Some(word) = self.results.pop_front() {
            match exact_length {
                Some(len) if char_len(&word.stroke) != len => continue,
                _ => return Some(word),
            }
        }
        None
    }

    fn connect_matrix(&self) -> Arc<ConnectMatrix> {
        Arc::clone(&self.matrix)
    }

    fn part_of_speech(&self, pos_type: PosType) -> WnnPos {
        self.pos_table.get(&pos_type).copied().unwrap_or_default()
    }

    fn learn_word(&mut self, word: &WnnWord, previous: Option<&WnnWord>) -> Result<(), DictionaryError> {
        self.user.learn(word, previous)
    }

    fn add_word_to_user_dictionary(&mut self, word: &WnnWord) -> Result<(), DictionaryError> {
        self.user.add_user_word(word)
    }

    fn remove_word_from_user_dictionary(&mut self, word: &WnnWord) -> Result<(), DictionaryError> {
        self.user.remove_user_word(word)
    }

    fn user_dictionary_words(&self) -> Vec<WnnWord> {
        self.user.user_words().to_vec()
    }

    fn clear_user_dictionary(&mut self) -> Result<(), DictionaryError> {
        debug!("user dictionary cleared");
        self.user.clear_user_words();
        Ok(())
    }

    fn clear_learn_dictionary(&mut self) -> Result<(), DictionaryError> {
        debug!("learning dictionary cleared");
        self.user.clear_learned();
        Ok(())
    }
}
