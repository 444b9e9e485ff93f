//! Japanese conversion engine.
//!
//! The engine drives one composition at a time:
//!
//! - `predict` starts a candidate stream for the reading typed so far;
//! - `next_candidate` / `candidate` hand out dictionary words, then
//!   single-clause conversions, then pseudo candidates;
//! - `convert` segments the reading into clauses and writes them to `LAYER2`;
//! - `make_candidate_list_of` lists the alternatives of one clause;
//! - `learn` feeds the committed candidate back into the dictionary.
//!
//! The engine owns its dictionary and lends it to the converters per call.

use ahash::AHashSet;
use libwnn_core::utils::char_len;
use libwnn_core::{
    Candidate, ComposingText, DictionaryError, DictionaryIndex, PosType, SearchOperation,
    SearchOrder, StrSegment, WnnClause, WnnDictionary, WnnPos, WnnSentence, WnnWord, LAYER0,
    LAYER1, LAYER2,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clause_converter::ClauseConverter;
use crate::config::JaJpConfig;
use crate::kana_converter::KanaConverter;
use crate::sources;

/// Which conversion the engine performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryKind {
    /// Kana-kanji conversion.
    #[default]
    Japanese,
    /// Literal forms only (kana, katakana, alphanumerics).
    EisuKana,
}

/// Store cleared by `init_dictionary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitTarget {
    User,
    Learn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineState {
    #[default]
    Idle,
    /// A search was issued; no candidate has been handed out yet.
    Predicting,
    CandidateIteration,
    Converting,
    /// A sentence sits in `LAYER2`, one segment per clause.
    SentenceReview,
}

/// Where the candidate stream draws from next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Dictionary,
    Clause,
    Pseudo,
    Exhausted,
}

pub struct Engine<D: WnnDictionary> {
    dictionary: D,
    clause_converter: ClauseConverter,
    kana_converter: KanaConverter,
    config: JaJpConfig,
    dictionary_kind: DictionaryKind,
    state: EngineState,

    // ========== Candidate stream ==========
    input_hiragana: Option<String>,
    input_romaji: String,
    exact_match_mode: bool,
    single_clause_mode: bool,
    stage: Stage,
    results: Vec<Candidate>,
    seen: AHashSet<String>,
    output_count: usize,

    // ========== Conversion ==========
    convert_sentence: Option<WnnSentence>,
    /// Keys typed for each clause of `convert_sentence`.
    clause_romaji: Vec<String>,
    previous_word: Option<WnnWord>,
}

impl<D: WnnDictionary> Engine<D> {
    pub fn new(dictionary: D, config: JaJpConfig) -> Self {
        let mut clause_converter = ClauseConverter::new(&config.base);
        clause_converter.set_dictionary(&dictionary);
        let mut kana_converter = KanaConverter::new();
        kana_converter.set_dictionary(&dictionary);
        let dictionary_kind = config.dictionary_kind;
        Self {
            dictionary,
            clause_converter,
            kana_converter,
            config,
            dictionary_kind,
            state: EngineState::Idle,
            input_hiragana: None,
            input_romaji: String::new(),
            exact_match_mode: false,
            single_clause_mode: false,
            stage: Stage::Exhausted,
            results: Vec::new(),
            seen: AHashSet::new(),
            output_count: 0,
            convert_sentence: None,
            clause_romaji: Vec::new(),
            previous_word: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    pub fn dictionary_mut(&mut self) -> &mut D {
        &mut self.dictionary
    }

    pub fn dictionary_kind(&self) -> DictionaryKind {
        self.dictionary_kind
    }

    pub fn config(&self) -> &JaJpConfig {
        &self.config
    }

    pub fn clause_converter_mut(&mut self) -> &mut ClauseConverter {
        &mut self.clause_converter
    }

    /// The word the next `Link` prediction follows.
    pub fn previous_word(&self) -> Option<&WnnWord> {
        self.previous_word.as_ref()
    }

    /// The sentence of the last `convert`.
    pub fn converted_sentence(&self) -> Option<&WnnSentence> {
        self.convert_sentence.as_ref()
    }

    fn transition(&mut self, to: EngineState) {
        if self.state != to {
            debug!(from = ?self.state, to = ?to, "engine state");
            self.state = to;
        }
    }

    // ========== Candidate stream ==========

    /// Drop the candidate stream.
    pub fn clear_candidates(&mut self) {
        self.input_hiragana = None;
        self.input_romaji.clear();
        self.exact_match_mode = false;
        self.single_clause_mode = false;
        self.stage = Stage::Exhausted;
        self.results.clear();
        self.seen.clear();
        self.output_count = 0;
        self.transition(EngineState::Idle);
    }

    /// Start a candidate stream for the letters of `text`.
    ///
    /// The key is the whole `LAYER1` text, or its first `max_len` letters,
    /// which also restricts results to exact matches. Keys shorter than
    /// `min_len` letters predict nothing. An empty key predicts the words
    /// learned after the previous word.
    ///
    /// Returns the number of dictionary results.
    pub fn predict(&mut self, text: &ComposingText, min_len: usize, max_len: Option<usize>) -> usize {
        self.clear_candidates();

        let letters = text.size(LAYER1);
        let (len, exact) = match max_len {
            Some(max) if max < letters => (max, true),
            Some(_) => (letters, true),
            None => (letters, false),
        };
        if len < min_len {
            return 0;
        }
        let (hiragana, romaji) = if len == 0 {
            (String::new(), String::new())
        } else {
            let last = text.segment(LAYER1, len - 1).to;
            (
                text.to_string_range(LAYER1, 0, len - 1),
                text.to_string_range(LAYER0, 0, last),
            )
        };

        self.exact_match_mode = exact;
        self.input_romaji = romaji;
        self.transition(EngineState::Predicting);

        let count = self.search_for_prediction(&hiragana);
        self.input_hiragana = Some(hiragana);
        self.stage = Stage::Dictionary;
        count
    }

    fn search_for_prediction(&mut self, key: &str) -> usize {
        let dict = &mut self.dictionary;
        dict.clear_dictionary();
        if self.dictionary_kind == DictionaryKind::EisuKana {
            return 0;
        }
        let freq_learn = self.config.base.freq_learn;
        let freq_user = self.config.base.freq_user;
        let len = char_len(key);

        if len == 0 {
            let Some(previous) = self.previous_word.as_ref() else {
                return 0;
            };
            dict.set_dictionary(DictionaryIndex::Learn, freq_learn, freq_learn);
            return dict.search_word(
                SearchOperation::Link,
                SearchOrder::ByFrequency,
                key,
                Some(previous),
            );
        }

        let (min, max) = sources::PREDICT_BAND;
        dict.set_dictionary(sources::MAIN, min, max);
        if len > 1 {
            dict.set_dictionary(sources::COMPOUND, min, max);
        }
        dict.set_dictionary(DictionaryIndex::User, freq_user, freq_user);
        dict.set_dictionary(DictionaryIndex::Learn, freq_learn, freq_learn);
        let operation = if self.exact_match_mode {
            SearchOperation::Exact
        } else {
            SearchOperation::Prefix
        };
        dict.search_word(operation, SearchOrder::ByFrequency, key, None)
    }

    /// Next candidate of the stream, or `None` once it is exhausted.
    pub fn next_candidate(&mut self) -> Option<Candidate> {
        let candidate = self.candidate(self.output_count)?;
        self.output_count += 1;
        Some(candidate)
    }

    /// Candidate `index` of the stream, pulling from the sources as needed.
    pub fn candidate(&mut self, index: usize) -> Option<Candidate> {
        let input = self.input_hiragana.clone()?;

        if self.stage == Stage::Dictionary {
            self.stage = if self.dictionary_kind == DictionaryKind::EisuKana {
                Stage::Pseudo
            } else if self.single_clause_mode {
                Stage::Clause
            } else {
                self.pull_dictionary(index, &input)
            };
        }

        if self.stage == Stage::Clause {
            if !input.is_empty() {
                let clauses = self.clause_converter.convert(&mut self.dictionary, &input);
                for clause in clauses {
                    self.add_candidate(clause.into());
                }
            }
            self.stage = Stage::Pseudo;
        }

        if self.stage == Stage::Pseudo {
            let pseudo = self
                .kana_converter
                .create_pseudo_candidate_list(&input, &self.input_romaji);
            for word in pseudo {
                self.add_candidate(word.into());
            }
            self.stage = Stage::Exhausted;
        }

        let candidate = self.results.get(index).cloned();
        if candidate.is_some() {
            self.transition(EngineState::CandidateIteration);
        }
        candidate
    }

    /// Drain dictionary results until `index` is available. Returns the
    /// stage to continue with.
    fn pull_dictionary(&mut self, index: usize, input: &str) -> Stage {
        let limit = self.config.base.predict_limit;
        let exact_length = self.exact_match_mode.then(|| char_len(input));
        while index >= self.results.len() {
            if self.results.len() >= limit {
                return Stage::Clause;
            }
            let Some(word) = self.dictionary.next_word(exact_length) else {
                return Stage::Clause;
            };
            if self.exact_match_mode && word.stroke != input {
                continue;
            }
            self.add_candidate(word.into());
        }
        if self.results.len() >= limit {
            Stage::Clause
        } else {
            Stage::Dictionary
        }
    }

    fn add_candidate(&mut self, candidate: Candidate) -> bool {
        let text = candidate.text();
        if text.is_empty()
            || char_len(text) > self.config.base.max_output_length
            || self.seen.contains(text)
        {
            return false;
        }
        self.seen.insert(text.to_string());
        self.results.push(candidate);
        true
    }

    // ========== Conversion ==========

    /// Convert the letters of `text` into a sentence.
    ///
    /// Letters before the `LAYER1` cursor form one fixed clause; the rest is
    /// segmented by consecutive-clause conversion. The clauses replace
    /// `LAYER2`, one segment each. Returns the number of clauses.
    pub fn convert(&mut self, text: &mut ComposingText) -> usize {
        self.clear_candidates();
        self.convert_sentence = None;
        self.clause_romaji.clear();
        if self.dictionary_kind == DictionaryKind::EisuKana || text.size(LAYER1) == 0 {
            return 0;
        }
        self.transition(EngineState::Converting);

        let cursor = text.cursor(LAYER1);
        let size = text.size(LAYER1);
        let head = if cursor > 0 && cursor < size {
            let input = text.to_string_range(LAYER1, 0, cursor - 1);
            let terminal = self.dictionary.part_of_speech(PosType::ClauseBreak);
            Some(
                self.clause_converter
                    .best_clause(&mut self.dictionary, &input, terminal),
            )
        } else {
            None
        };
        let rest = match head {
            Some(_) => text.to_string_range(LAYER1, cursor, size - 1),
            None => text.to_string(LAYER1),
        };
        let tail = self
            .clause_converter
            .consecutive_clause_convert(&mut self.dictionary, &rest);

        let sentence = match (head, tail) {
            (Some(head), tail) => WnnSentence::join(head, tail.as_ref()),
            (None, Some(tail)) => tail,
            (None, None) => {
                self.transition(EngineState::Idle);
                return 0;
            }
        };

        let (sentence, segments) = align_clauses(text, sentence);
        let count = segments.len();
        text.set_cursor(LAYER2, text.size(LAYER2));
        let replaced = text.cursor(LAYER2);
        text.replace(LAYER2, segments, replaced);
        self.clause_romaji = text
            .segments(LAYER2)
            .iter()
            .map(|clause| {
                let first = text.segment(LAYER1, clause.from).from;
                let last = text.segment(LAYER1, clause.to).to;
                text.to_string_range(LAYER0, first, last)
            })
            .collect();
        debug!(sentence = %sentence.word.candidate, clauses = count, "converted");

        self.convert_sentence = Some(sentence);
        self.transition(EngineState::SentenceReview);
        count
    }

    /// Switch the candidate stream to the alternatives of clause `index` of
    /// the last converted sentence.
    pub fn make_candidate_list_of(&mut self, index: usize) -> bool {
        self.clear_candidates();
        let Some(clause) = self
            .convert_sentence
            .as_ref()
            .and_then(|s| s.elements.get(index))
        else {
            return false;
        };
        self.input_hiragana = Some(clause.word.stroke.clone());
        self.input_romaji = self.clause_romaji.get(index).cloned().unwrap_or_default();
        self.single_clause_mode = true;
        self.stage = Stage::Dictionary;
        self.transition(EngineState::CandidateIteration);
        true
    }

    // ========== Learning ==========

    /// Record a committed candidate.
    ///
    /// Sentences are learned clause by clause, each following the one
    /// before. The last learned word becomes the previous word of the next
    /// `Link` prediction.
    pub fn learn(&mut self, candidate: &Candidate) -> Result<(), DictionaryError> {
        let noun = self.dictionary.part_of_speech(PosType::Noun);
        let result = match candidate {
            Candidate::Sentence(sentence) => {
                let mut result = Ok(());
                for clause in &sentence.elements {
                    let word = as_noun_if_unset(clause.word.clone(), noun);
                    result = self
                        .dictionary
                        .learn_word(&word, self.previous_word.as_ref());
                    self.previous_word = Some(word);
                    if result.is_err() {
                        break;
                    }
                }
                result
            }
            other => {
                let word = as_noun_if_unset(other.word().clone(), noun);
                let result = self
                    .dictionary
                    .learn_word(&word, self.previous_word.as_ref());
                self.previous_word = Some(word);
                result
            }
        };
        self.clause_converter.set_dictionary(&self.dictionary);
        self.transition(EngineState::Idle);
        result
    }

    /// Forget the previous word; the next empty-key prediction yields nothing.
    pub fn break_sequence(&mut self) {
        self.previous_word = None;
    }

    // ========== Dictionary management ==========

    pub fn set_dictionary(&mut self, kind: DictionaryKind) {
        self.clear_candidates();
        if self.dictionary_kind != kind {
            debug!(?kind, "dictionary kind");
            self.dictionary_kind = kind;
        }
    }

    /// Register a word in the user dictionary. A word without a right POS is
    /// registered as a noun.
    pub fn add_word(&mut self, word: WnnWord) -> Result<(), DictionaryError> {
        let word = as_noun_if_unset(word, self.dictionary.part_of_speech(PosType::Noun));
        self.dictionary.add_word_to_user_dictionary(&word)?;
        self.clause_converter.set_dictionary(&self.dictionary);
        Ok(())
    }

    pub fn delete_word(&mut self, word: &WnnWord) -> Result<(), DictionaryError> {
        self.dictionary.remove_word_from_user_dictionary(word)?;
        self.clause_converter.set_dictionary(&self.dictionary);
        Ok(())
    }

    pub fn user_dictionary_words(&self) -> Vec<WnnWord> {
        self.dictionary.user_dictionary_words()
    }

    /// Clear the user dictionary or the learned words.
    pub fn init_dictionary(&mut self, target: InitTarget) -> Result<(), DictionaryError> {
        match target {
            InitTarget::User => self.dictionary.clear_user_dictionary()?,
            InitTarget::Learn => {
                self.dictionary.clear_learn_dictionary()?;
                self.previous_word = None;
            }
        }
        self.clause_converter.set_dictionary(&self.dictionary);
        Ok(())
    }
}

fn as_noun_if_unset(mut word: WnnWord, noun: WnnPos) -> WnnWord {
    if word.pos.is_unset() {
        word.pos = noun;
    }
    word
}

/// Place the clauses of `sentence` over the `LAYER1` segments of `text`.
///
/// Clause boundaries are character offsets into the letters. A boundary that
/// falls inside a multi-character letter moves to the end of that letter; a
/// clause left without letters of its own is merged into the one before.
fn align_clauses(text: &ComposingText, sentence: WnnSentence) -> (WnnSentence, Vec<StrSegment>) {
    let mut ends = Vec::with_capacity(text.size(LAYER1));
    let mut offset = 0;
    for seg in text.segments(LAYER1) {
        offset += char_len(&seg.text);
        ends.push(offset);
    }
    let last = ends.len().saturating_sub(1);

    let mut placed: Vec<(WnnClause, usize, usize)> = Vec::with_capacity(sentence.elements.len());
    let mut offset = 0;
    let mut next_from = 0;
    for clause in sentence.elements {
        offset += char_len(&clause.word.stroke);
        let to = ends.iter().position(|&end| end >= offset).unwrap_or(last);
        if to < next_from {
            if let Some((prev, _, _)) = placed.last_mut() {
                *prev = merge_clauses(prev, &clause);
                continue;
            }
        }
        placed.push((clause, next_from, to.max(next_from)));
        next_from = to.max(next_from) + 1;
    }
    if let Some((_, _, to)) = placed.last_mut() {
        *to = last;
    }

    let mut word = sentence.word;
    word.pos = match (placed.first(), placed.last()) {
        (Some(first), Some(last)) => WnnPos::new(first.0.word.pos.left, last.0.word.pos.right),
        _ => word.pos,
    };
    let segments = placed
        .iter()
        .map(|(clause, from, to)| StrSegment::with_clause(clause.clone(), *from, *to))
        .collect();
    let elements = placed.into_iter().map(|(clause, _, _)| clause).collect();
    (WnnSentence { word, elements }, segments)
}

fn merge_clauses(first: &WnnClause, second: &WnnClause) -> WnnClause {
    WnnClause::new(
        format!("{}{}", first.word.candidate, second.word.candidate),
        format!("{}{}", first.word.stroke, second.word.stroke),
        WnnPos::new(first.word.pos.left, second.word.pos.right),
        first.word.frequency + second.word.frequency,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_dictionary;
    use crate::romkan::Romkan;
    use libwnn_core::{InMemoryDictionary, LetterConverter};

    fn engine() -> Engine<InMemoryDictionary> {
        Engine::new(demo_dictionary(), JaJpConfig::default())
    }

    fn typed(keys: &str) -> ComposingText {
        let mut text = ComposingText::new();
        Romkan::hiragana().feed(&mut text, keys);
        text
    }

    fn texts(engine: &mut Engine<InMemoryDictionary>) -> Vec<String> {
        std::iter::from_fn(|| engine.next_candidate())
            .map(|c| c.text().to_string())
            .collect()
    }

    #[test]
    fn prediction_streams_dictionary_then_clause_then_pseudo() {
        let mut engine = engine();
        let text = typed("kyou");
        assert!(engine.predict(&text, 0, None) > 0);
        assert_eq!(engine.state(), EngineState::Predicting);

        let all = texts(&mut engine);
        assert_eq!(all[0], "今日");
        assert!(all.contains(&"きょう".to_string()));
        assert!(all.contains(&"キョウ".to_string()));
        assert!(all.contains(&"KYOU".to_string()));
        assert_eq!(engine.state(), EngineState::CandidateIteration);

        let mut unique = all.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn candidate_by_index_is_stable() {
        let mut engine = engine();
        engine.predict(&typed("kyou"), 0, None);
        let third = engine.candidate(2);
        assert_eq!(engine.candidate(2), third);
        assert_eq!(engine.next_candidate().map(|c| c.text().to_string()), Some("今日".into()));
    }

    #[test]
    fn exact_mode_keeps_full_reading_only() {
        let mut engine = engine();
        engine.predict(&typed("kyou"), 0, Some(3));
        let all = texts(&mut engine);
        assert!(all.iter().all(|t| t != "今日は"));
        assert_eq!(all[0], "今日");
    }

    #[test]
    fn min_len_suppresses_prediction() {
        let mut engine = engine();
        assert_eq!(engine.predict(&typed("ki"), 2, None), 0);
        assert!(engine.next_candidate().is_none());
    }

    #[test]
    fn convert_writes_clauses_to_top_layer() {
        let mut engine = engine();
        let mut text = typed("watashiha");
        assert_eq!(engine.convert(&mut text), 1);
        assert_eq!(engine.state(), EngineState::SentenceReview);
        assert_eq!(text.to_string(LAYER2), "私は");
        let seg = text.segment(LAYER2, 0);
        assert_eq!((seg.from, seg.to), (0, 3));
        assert!(seg.clause.is_some());
        assert!(text.check_consistency().is_ok());
    }

    #[test]
    fn convert_with_fixed_head() {
        let mut engine = engine();
        let mut text = typed("kyouhatenki");
        text.set_cursor(LAYER1, 4);
        let clauses = engine.convert(&mut text);
        assert_eq!(clauses, 2);
        assert_eq!(text.to_string(LAYER2), "今日は天気");
        assert_eq!(text.segment(LAYER2, 1).from, 4);

        // Alternatives of 天気 spell out only the keys typed for it.
        assert!(engine.make_candidate_list_of(1));
        let all = texts(&mut engine);
        assert!(all.contains(&"tenki".to_string()));
        assert!(all.contains(&"TENKI".to_string()));
        assert!(!all.iter().any(|t| t.contains("kyou")));
    }

    #[test]
    fn clause_alternatives() {
        let mut engine = engine();
        let mut text = typed("kyouhatenki");
        engine.convert(&mut text);
        let sentence = engine.converted_sentence().unwrap().clone();
        let last = sentence.elements.len() - 1;
        assert!(engine.make_candidate_list_of(last));
        let all = texts(&mut engine);
        assert_eq!(all[0], sentence.elements[last].word.candidate);
        assert!(!engine.make_candidate_list_of(99));
    }

    #[test]
    fn learned_sentence_links_next_prediction() {
        let mut engine = engine();
        let mut text = typed("kyouha");
        engine.convert(&mut text);
        let sentence = engine.converted_sentence().unwrap().clone();
        engine.learn(&Candidate::Sentence(sentence)).unwrap();
        assert_eq!(engine.state(), EngineState::Idle);

        let first = WnnWord::with_pos("天気", "てんき", WnnPos::default());
        engine.learn(&Candidate::Word(first)).unwrap();
        let previous = engine.previous_word().unwrap();
        assert_eq!(previous.pos, engine.dictionary().part_of_speech(PosType::Noun));

        engine.learn(&Candidate::Word(WnnWord::with_pos("です", "です", WnnPos::new(8, 8)))).unwrap();
        engine.break_sequence();
        assert_eq!(engine.predict(&ComposingText::new(), 0, None), 0);

        engine.learn(&Candidate::Word(WnnWord::with_pos("天気", "てんき", WnnPos::new(1, 1)))).unwrap();
        engine.learn(&Candidate::Word(WnnWord::with_pos("です", "です", WnnPos::new(8, 8)))).unwrap();
        engine.learn(&Candidate::Word(WnnWord::with_pos("天気", "てんき", WnnPos::new(1, 1)))).unwrap();
        assert_eq!(engine.predict(&ComposingText::new(), 0, None), 1);
        assert_eq!(engine.next_candidate().unwrap().text(), "です");
    }

    #[test]
    fn eisu_kana_yields_literal_forms_only() {
        let mut engine = engine();
        engine.set_dictionary(DictionaryKind::EisuKana);
        assert_eq!(engine.predict(&typed("kyou"), 0, None), 0);
        let all = texts(&mut engine);
        assert_eq!(all[0], "きょう");
        assert!(!all.contains(&"今日".to_string()));
        assert_eq!(engine.convert(&mut typed("kyou")), 0);
    }

    #[test]
    fn user_words_are_predicted() {
        let mut engine = engine();
        engine
            .add_word(WnnWord::with_pos("響", "きょう", WnnPos::default()))
            .unwrap();
        assert_eq!(engine.user_dictionary_words().len(), 1);
        engine.predict(&typed("kyou"), 0, None);
        assert_eq!(engine.next_candidate().unwrap().text(), "響");

        let word = engine.user_dictionary_words()[0].clone();
        engine.delete_word(&word).unwrap();
        engine.init_dictionary(InitTarget::User).unwrap();
        engine.init_dictionary(InitTarget::Learn).unwrap();
        assert!(engine.user_dictionary_words().is_empty());
    }

    #[test]
    fn empty_text_converts_to_nothing() {
        let mut engine = engine();
        assert_eq!(engine.convert(&mut ComposingText::new()), 0);
        assert_eq!(engine.state(), EngineState::Idle);
    }
}
