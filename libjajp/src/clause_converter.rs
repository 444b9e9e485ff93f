//! Clause conversion.
//!
//! A clause is an independent word (stem) optionally followed by an ancillary
//! pattern (a chain of particles, auxiliaries and endings). Single-clause
//! conversion lists the clauses a whole reading can be read as; consecutive
//! clause conversion segments a reading into the best-scoring clause sequence.
//!
//! Dictionary lookups are memoized per reading. The memo tables belong to the
//! converter and are only dropped when the dictionary changes
//! (`set_dictionary`).

use std::sync::Arc;

use ahash::AHashMap;
use libwnn_core::utils::char_len;
use libwnn_core::{
    Config, ConnectMatrix, DictionaryIndex, PosType, SearchOperation, SearchOrder, WnnClause,
    WnnDictionary, WnnPos, WnnSentence, WnnWord,
};
use tracing::{debug, trace};

use crate::sources;

type WordList = Arc<[WnnWord]>;

#[derive(Debug, Clone)]
pub struct ClauseConverter {
    // ========== Memo tables ==========
    /// Best stem per right POS, keyed by reading.
    independent_words: AHashMap<String, WordList>,
    /// Every stem, keyed by reading.
    all_independent_words: AHashMap<String, WordList>,
    /// Ancillary patterns, keyed by reading.
    ancillary_patterns: AHashMap<String, WordList>,

    // ========== Grammar ==========
    matrix: Option<Arc<ConnectMatrix>>,
    pos_default: WnnPos,
    pos_sentence_end: WnnPos,
    pos_clause_end: WnnPos,
    pos_clause_break: WnnPos,

    // ========== Tuning ==========
    clause_cost: i32,
    freq_learn: i32,
    freq_user: i32,
    /// Highest score a single clause can reach.
    clause_ceiling: i32,
    max_clause_length: usize,
    max_input_length: usize,
    pruning: bool,
    evaluations: usize,
}

impl Default for ClauseConverter {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl ClauseConverter {
    pub fn new(config: &Config) -> Self {
        Self {
            independent_words: AHashMap::new(),
            all_independent_words: AHashMap::new(),
            ancillary_patterns: AHashMap::new(),
            matrix: None,
            pos_default: WnnPos::default(),
            pos_sentence_end: WnnPos::default(),
            pos_clause_end: WnnPos::default(),
            pos_clause_break: WnnPos::default(),
            clause_cost: config.clause_cost,
            freq_learn: config.freq_learn,
            freq_user: config.freq_user,
            clause_ceiling: config
                .freq_learn
                .max(config.freq_user)
                .max(sources::STEM_BAND.1),
            max_clause_length: config.max_clause_length.max(1),
            max_input_length: config.max_input_length,
            pruning: true,
            evaluations: 0,
        }
    }

    /// Attach a dictionary: drop every memo table and re-read the
    /// connectivity matrix and the grammar anchors.
    pub fn set_dictionary<D: WnnDictionary + ?Sized>(&mut self, dictionary: &D) {
        self.independent_words.clear();
        self.all_independent_words.clear();
        self.ancillary_patterns.clear();
        self.matrix = Some(dictionary.connect_matrix());
        self.pos_default = dictionary.part_of_speech(PosType::Noun);
        self.pos_sentence_end = dictionary.part_of_speech(PosType::SentenceEnd);
        self.pos_clause_end = dictionary.part_of_speech(PosType::ClauseEnd);
        self.pos_clause_break = dictionary.part_of_speech(PosType::ClauseBreak);
        debug!("clause converter caches reset");
    }

    /// Enable or disable the frequency bound of consecutive-clause
    /// conversion. The result is the same either way; only the number of
    /// clause evaluations differs.
    pub fn set_pruning(&mut self, pruning: bool) {
        self.pruning = pruning;
    }

    /// Clause evaluations performed by the last consecutive-clause conversion.
    pub fn last_evaluations(&self) -> usize {
        self.evaluations
    }

    /// Every clause `input` can be read as, best first.
    ///
    /// Non-empty input always yields at least the literal clause, unless it
    /// is longer than `max_input_length` or no dictionary has been set.
    pub fn convert<D: WnnDictionary + ?Sized>(
        &mut self,
        dictionary: &mut D,
        input: &str,
    ) -> Vec<WnnClause> {
        let len = char_len(input);
        if len == 0 || len > self.max_input_length || self.matrix.is_none() {
            return Vec::new();
        }
        let mut clauses = Vec::new();
        let terminal = self.pos_clause_end;
        self.single_clause_convert(dictionary, &mut clauses, input, terminal, true);
        if clauses.is_empty() {
            clauses.push(self.default_clause(input));
        }
        trace!(input, count = clauses.len(), "single clause conversion");
        clauses
    }

    /// The best clause for `input` followed by the `terminal` POS, or the
    /// literal clause when nothing connects.
    pub fn best_clause<D: WnnDictionary + ?Sized>(
        &mut self,
        dictionary: &mut D,
        input: &str,
        terminal: WnnPos,
    ) -> WnnClause {
        let mut clauses = Vec::with_capacity(1);
        if self.matrix.is_some() {
            self.single_clause_convert(dictionary, &mut clauses, input, terminal, false);
        }
        clauses
            .into_iter()
            .next()
            .unwrap_or_else(|| self.default_clause(input))
    }

    /// Segment `input` into the clause sequence with the highest total score.
    ///
    /// `sentence[i]` holds the best sentence covering `input[..=i]`. Each
    /// clause costs `clause_cost`, which keeps readings from being split
    /// without need.
    pub fn consecutive_clause_convert<D: WnnDictionary + ?Sized>(
        &mut self,
        dictionary: &mut D,
        input: &str,
    ) -> Option<WnnSentence> {
        self.evaluations = 0;
        let chars: Vec<char> = input.chars().collect();
        let n = chars.len();
        if n == 0 || self.matrix.is_none() {
            return None;
        }

        let mut sentence: Vec<Option<WnnSentence>> = vec![None; n];
        for start in 0..n {
            let predecessor = if start == 0 {
                None
            } else {
                match &sentence[start - 1] {
                    Some(prev) => Some(prev.clone()),
                    None => continue,
                }
            };
            let base = predecessor.as_ref().map_or(0, |p| p.word.frequency);
            let last = (start + self.max_clause_length).min(n);

            for end in (start + 1..=last).rev() {
                // No clause scores above `clause_ceiling`, so a recorded
                // sentence above this bound cannot be beaten from `start`.
                if self.pruning {
                    if let Some(best) = &sentence[end - 1] {
                        if best.word.frequency > base + self.clause_cost + self.clause_ceiling {
                            continue;
                        }
                    }
                }
                self.evaluations += 1;

                let key: String = chars[start..end].iter().collect();
                let terminal = if end == n {
                    self.pos_sentence_end
                } else {
                    self.pos_clause_break
                };
                let clause = self.best_clause(dictionary, &key, terminal);
                let mut candidate = match &predecessor {
                    Some(prev) => WnnSentence::extend(prev, clause),
                    None => WnnSentence::from_clause(clause),
                };
                candidate.word.frequency += self.clause_cost;

                let better = sentence[end - 1]
                    .as_ref()
                    .map_or(true, |best| candidate.word.frequency > best.word.frequency);
                if better {
                    sentence[end - 1] = Some(candidate);
                }
            }
        }

        let result = sentence.pop().flatten();
        trace!(
            input,
            evaluations = self.evaluations,
            clauses = result.as_ref().map_or(0, |s| s.elements.len()),
            "consecutive clause conversion"
        );
        result
    }

    fn connectible(&self, right: u16, left: u16) -> bool {
        self.matrix
            .as_ref()
            .is_some_and(|matrix| matrix.connectible(right, left))
    }

    fn literal_frequency(&self, input: &str) -> i32 {
        (self.clause_cost - 1).saturating_mul(char_len(input) as i32)
    }

    fn default_clause(&self, input: &str) -> WnnClause {
        WnnClause::new(input, input, self.pos_default, self.literal_frequency(input))
    }

    fn single_clause_convert<D: WnnDictionary + ?Sized>(
        &mut self,
        dictionary: &mut D,
        clauses: &mut Vec<WnnClause>,
        input: &str,
        terminal: WnnPos,
        all: bool,
    ) -> bool {
        let mut found = false;

        let stems = self.independent_words(dictionary, input, all);
        for stem in stems.iter() {
            if self.add_clause(clauses, input, stem, None, terminal, all) {
                found = true;
            }
        }

        let mut max = self.clause_cost * 2;
        for (split, _) in input.char_indices().skip(1) {
            let ancillaries = self.ancillary_pattern(dictionary, &input[split..]);
            if ancillaries.is_empty() {
                continue;
            }
            let stems = self.independent_words(dictionary, &input[..split], all);
            for stem in stems.iter() {
                if !all && stem.frequency <= max {
                    continue;
                }
                for ancillary in ancillaries.iter() {
                    if self.add_clause(clauses, input, stem, Some(ancillary), terminal, all) {
                        found = true;
                        max = max.max(stem.frequency);
                    }
                }
            }
        }
        found
    }

    /// Add the clause `stem` (+ `ancillary`) if its POS chain connects to
    /// `terminal`. Keeps only the best clause unless `all` is set, in which
    /// case the list stays sorted by frequency with earlier finds first.
    fn add_clause(
        &self,
        clauses: &mut Vec<WnnClause>,
        input: &str,
        stem: &WnnWord,
        ancillary: Option<&WnnWord>,
        terminal: WnnPos,
        all: bool,
    ) -> bool {
        let clause = match ancillary {
            None if self.connectible(stem.pos.right, terminal.left) => {
                WnnClause::from_stem(input, stem)
            }
            Some(ancillary)
                if self.connectible(stem.pos.right, ancillary.pos.left)
                    && self.connectible(ancillary.pos.right, terminal.left) =>
            {
                WnnClause::from_stem_and_ancillary(input, stem, ancillary)
            }
            _ => return false,
        };

        if clauses.is_empty() {
            clauses.push(clause);
            return true;
        }
        if !all {
            if clauses[0].word.frequency < clause.word.frequency {
                clauses[0] = clause;
                return true;
            }
            return false;
        }
        let at = clauses
            .iter()
            .position(|c| c.word.frequency < clause.word.frequency)
            .unwrap_or(clauses.len());
        clauses.insert(at, clause);
        true
    }

    /// Stems whose reading is exactly `input`, followed by the literal word.
    ///
    /// Unless `all` is set, only the first (highest scoring) stem per right
    /// POS is kept and the search stops after the first stem below the stem
    /// band.
    fn independent_words<D: WnnDictionary + ?Sized>(
        &mut self,
        dictionary: &mut D,
        input: &str,
        all: bool,
    ) -> WordList {
        let memo = if all {
            &self.all_independent_words
        } else {
            &self.independent_words
        };
        if let Some(words) = memo.get(input) {
            return Arc::clone(words);
        }

        dictionary.clear_dictionary();
        dictionary.set_dictionary(sources::STEM, sources::STEM_BAND.0, sources::STEM_BAND.1);
        dictionary.set_dictionary(DictionaryIndex::User, self.freq_user, self.freq_user);
        dictionary.set_dictionary(DictionaryIndex::Learn, self.freq_learn, self.freq_learn);
        dictionary.search_word(SearchOperation::Exact, SearchOrder::ByFrequency, input, None);

        let mut words: Vec<WnnWord> = Vec::new();
        while let Some(word) = dictionary.next_word(None) {
            if word.stroke != input {
                continue;
            }
            if all {
                words.push(word);
                continue;
            }
            let below_band = word.frequency < sources::STEM_BAND.0;
            if !words.iter().any(|w| w.pos.right == word.pos.right) {
                words.push(word);
            }
            if below_band {
                break;
            }
        }
        words.push(WnnWord::with_frequency(
            input,
            input,
            self.pos_default,
            self.literal_frequency(input),
        ));

        let words: WordList = words.into();
        let memo = if all {
            &mut self.all_independent_words
        } else {
            &mut self.independent_words
        };
        memo.insert(input.to_string(), Arc::clone(&words));
        words
    }

    /// Ancillary patterns reading exactly `input`.
    ///
    /// Patterns for every suffix of `input` are built shortest first: a
    /// suffix matches a single ancillary word, or an ancillary word followed
    /// by a pattern of a shorter suffix it connects to.
    fn ancillary_pattern<D: WnnDictionary + ?Sized>(
        &mut self,
        dictionary: &mut D,
        input: &str,
    ) -> WordList {
        if let Some(patterns) = self.ancillary_patterns.get(input) {
            return Arc::clone(patterns);
        }

        dictionary.clear_dictionary();
        dictionary.set_dictionary(
            sources::ANCILLARY,
            sources::ANCILLARY_BAND.0,
            sources::ANCILLARY_BAND.1,
        );

        let bounds: Vec<usize> = input.char_indices().map(|(i, _)| i).collect();
        for &start in bounds.iter().rev() {
            let key = &input[start..];
            if self.ancillary_patterns.contains_key(key) {
                continue;
            }

            let mut patterns = Vec::new();
            dictionary.search_word(SearchOperation::Exact, SearchOrder::ByFrequency, key, None);
            while let Some(word) = dictionary.next_word(None) {
                patterns.push(word);
            }

            for &end in bounds.iter().rev().take_while(|&&end| end > start) {
                let Some(follows) = self.ancillary_patterns.get(&input[end..]) else {
                    continue;
                };
                if follows.is_empty() {
                    continue;
                }
                let follows = Arc::clone(follows);
                dictionary.search_word(
                    SearchOperation::Exact,
                    SearchOrder::ByFrequency,
                    &input[start..end],
                    None,
                );
                while let Some(word) = dictionary.next_word(None) {
                    for follow in follows.iter() {
                        if self.connectible(word.pos.right, follow.pos.left) {
                            patterns.push(WnnWord::with_pos(
                                key,
                                key,
                                WnnPos::new(word.pos.left, follow.pos.right),
                            ));
                        }
                    }
                }
            }
            self.ancillary_patterns
                .insert(key.to_string(), patterns.into());
        }

        self.ancillary_patterns
            .get(input)
            .cloned()
            .unwrap_or_else(|| Arc::from(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libwnn_core::{InMemoryDictionary, Lexicon};

    const NOUN: WnnPos = WnnPos::new(1, 1);
    const PARTICLE: WnnPos = WnnPos::new(2, 2);
    const END: WnnPos = WnnPos::new(3, 3);

    fn dictionary() -> InMemoryDictionary {
        let mut lexicon = Lexicon::new();
        let stem = sources::id::STEM;
        let ancillary = sources::id::ANCILLARY;
        lexicon.insert(stem, "かみ", "紙", NOUN, 80);
        lexicon.insert(stem, "かみ", "神", NOUN, 60);
        lexicon.insert(stem, "かみ", "髪", NOUN, 40);
        lexicon.insert(ancillary, "を", "を", PARTICLE, 90);
        lexicon.insert(ancillary, "も", "も", PARTICLE, 70);
        // noun -> particle, noun -> end, particle -> end, particle -> particle
        let matrix = ConnectMatrix::from_pairs(3, [(1, 2), (1, 3), (2, 3), (2, 2)]);
        let mut dict = InMemoryDictionary::new(lexicon, matrix);
        dict.set_part_of_speech(PosType::Noun, NOUN);
        dict.set_part_of_speech(PosType::SentenceEnd, END);
        dict.set_part_of_speech(PosType::ClauseEnd, END);
        dict.set_part_of_speech(PosType::ClauseBreak, END);
        dict
    }

    fn converter(dict: &InMemoryDictionary) -> ClauseConverter {
        let mut converter = ClauseConverter::default();
        converter.set_dictionary(dict);
        converter
    }

    #[test]
    fn convert_lists_stems_then_literal() {
        let mut dict = dictionary();
        let mut converter = converter(&dict);
        let clauses: Vec<String> = converter
            .convert(&mut dict, "かみ")
            .into_iter()
            .map(|c| c.word.candidate)
            .collect();
        assert_eq!(clauses, vec!["紙", "神", "髪", "かみ"]);
    }

    #[test]
    fn stem_with_ancillary_chain() {
        let mut dict = dictionary();
        let mut converter = converter(&dict);
        let clauses = converter.convert(&mut dict, "かみをも");
        let first = &clauses[0];
        assert_eq!(first.word.candidate, "紙をも");
        assert_eq!(first.word.stroke, "かみをも");
        assert_eq!(first.word.pos, WnnPos::new(1, 2));
    }

    #[test]
    fn best_clause_keeps_one() {
        let mut dict = dictionary();
        let mut converter = converter(&dict);
        let clause = converter.best_clause(&mut dict, "かみを", END);
        assert_eq!(clause.word.candidate, "紙を");
        assert_eq!(clause.word.frequency, 480);
    }

    #[test]
    fn unknown_reading_falls_back_to_literal() {
        let mut dict = dictionary();
        let mut converter = converter(&dict);
        let clauses = converter.convert(&mut dict, "xyz123");
        assert_eq!(clauses[0].word.candidate, "xyz123");
        assert_eq!(clauses[0].word.frequency, -1001 * 6);
    }

    #[test]
    fn no_dictionary_no_clauses() {
        let mut dict = dictionary();
        let mut converter = ClauseConverter::default();
        assert!(converter.convert(&mut dict, "かみ").is_empty());
        assert!(converter.consecutive_clause_convert(&mut dict, "かみ").is_none());
    }

    #[test]
    fn oversized_input_is_refused() {
        let mut dict = dictionary();
        let mut converter = converter(&dict);
        assert!(converter.convert(&mut dict, &"か".repeat(51)).is_empty());
        assert!(converter.convert(&mut dict, "").is_empty());
    }

    #[test]
    fn sentence_splits_where_clauses_connect() {
        let mut dict = dictionary();
        let mut converter = converter(&dict);
        let sentence = converter
            .consecutive_clause_convert(&mut dict, "かみをかみ")
            .unwrap();
        let parts: Vec<&str> = sentence
            .elements
            .iter()
            .map(|c| c.word.candidate.as_str())
            .collect();
        assert_eq!(parts, vec!["紙を", "紙"]);
        assert_eq!(sentence.word.candidate, "紙を紙");
        assert_eq!(sentence.word.frequency, 480 + 480 - 2000);
    }

    #[test]
    fn set_dictionary_drops_memo() {
        let mut dict = dictionary();
        let mut converter = converter(&dict);
        converter.convert(&mut dict, "かみ");
        dict.lexicon_mut().insert(sources::id::STEM, "かみ", "加味", NOUN, 100);
        assert_eq!(converter.convert(&mut dict, "かみ")[0].word.candidate, "紙");
        converter.set_dictionary(&dict);
        assert_eq!(converter.convert(&mut dict, "かみ")[0].word.candidate, "加味");
    }
}
