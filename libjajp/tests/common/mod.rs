// libjajp/tests/common/mod.rs
//
// A scripted dictionary for integration tests.
//
// Every search ignores which sources are active: exact and prefix searches
// see the same word list, link searches see nothing. Results come back in
// frequency order. POS anchors all resolve to the same pair.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use libwnn_core::{
    ConnectMatrix, DictionaryError, DictionaryIndex, PosType, SearchOperation, SearchOrder,
    WnnDictionary, WnnPos, WnnWord,
};

pub struct MockDictionary {
    words: Vec<WnnWord>,
    matrix: Arc<ConnectMatrix>,
    anchor: WnnPos,
    results: VecDeque<WnnWord>,
    pub searches: usize,
    pub learned: Vec<(WnnWord, Option<WnnWord>)>,
}

impl MockDictionary {
    pub fn new(matrix: ConnectMatrix, anchor: WnnPos) -> Self {
        Self {
            words: Vec::new(),
            matrix: Arc::new(matrix),
            anchor,
            results: VecDeque::new(),
            searches: 0,
            learned: Vec::new(),
        }
    }

    pub fn word(mut self, stroke: &str, candidate: &str, pos: WnnPos, frequency: i32) -> Self {
        self.words
            .push(WnnWord::with_frequency(candidate, stroke, pos, frequency));
        self
    }
}

impl WnnDictionary for MockDictionary {
    fn clear_dictionary(&mut self) {
        self.results.clear();
    }

    fn set_dictionary(&mut self, _index: DictionaryIndex, _min: i32, _max: i32) -> bool {
        true
    }

    fn search_word(
        &mut self,
        operation: SearchOperation,
        _order: SearchOrder,
        key: &str,
        _previous: Option<&WnnWord>,
    ) -> usize {
        self.searches += 1;
        let mut found: Vec<WnnWord> = self
            .words
            .iter()
            .filter(|w| match operation {
                SearchOperation::Exact => w.stroke == key,
                SearchOperation::Prefix => !key.is_empty() && w.stroke.starts_with(key),
                SearchOperation::Link => false,
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        self.results = found.into();
        self.results.len()
    }

    fn next_word(&mut self, exact_length: Option<usize>) -> Option<WnnWord> {
        while let Some(word) = self.results.pop_front() {
            match exact_length {
                Some(len) if word.stroke.chars().count() != len => continue,
                _ => return Some(word),
            }
        }
        None
    }

    fn connect_matrix(&self) -> Arc<ConnectMatrix> {
        Arc::clone(&self.matrix)
    }

    fn part_of_speech(&self, _pos_type: PosType) -> WnnPos {
        self.anchor
    }

    fn learn_word(&mut self, word: &WnnWord, previous: Option<&WnnWord>) -> Result<(), DictionaryError> {
        self.learned.push((word.clone(), previous.cloned()));
        Ok(())
    }
}

/// The dictionary of the "わたしは" scenario: 私 as a noun, は as an
/// ancillary word, with 1 -> 1 and 1 -> 2 connectible.
pub fn watashi_dictionary() -> MockDictionary {
    MockDictionary::new(ConnectMatrix::from_pairs(2, [(1, 1), (1, 2)]), WnnPos::new(1, 1))
        .word("わたし", "私", WnnPos::new(1, 1), 100)
        .word("は", "は", WnnPos::new(1, 2), 0)
}
