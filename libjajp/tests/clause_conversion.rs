// libjajp/tests/clause_conversion.rs
//
// Integration tests for ClauseConverter.
//
// Tests cover:
// - Literal fallback for readings without dictionary hits
// - The "わたしは" segmentation against a scripted dictionary
// - Determinism and candidate concatenation of sentences
// - Pruned and exhaustive consecutive-clause conversion agree
// - Pruning stays exact when user words outscore learned ones
// - The clause window bounds clause length

mod common;

use common::{watashi_dictionary, MockDictionary};
use libjajp::sources::id;
use libjajp::ClauseConverter;
use libwnn_core::{
    Config, ConnectMatrix, InMemoryDictionary, Lexicon, PosType, WnnDictionary, WnnPos, WnnWord,
};
use proptest::prelude::*;

#[test]
fn unknown_reading_converts_to_itself() {
    let mut dict = watashi_dictionary();
    let mut converter = ClauseConverter::default();
    converter.set_dictionary(&dict);

    let clauses = converter.convert(&mut dict, "xyz123");
    assert!(!clauses.is_empty());
    assert_eq!(clauses[0].word.candidate, "xyz123");
    assert_eq!(clauses[0].word.stroke, "xyz123");
}

#[test]
fn watashi_ha_splits_into_noun_and_particle() {
    let mut dict = watashi_dictionary();
    let mut converter = ClauseConverter::default();
    converter.set_dictionary(&dict);

    let sentence = converter
        .consecutive_clause_convert(&mut dict, "わたしは")
        .expect("a sentence");
    assert_eq!(sentence.elements.len(), 2);
    assert_eq!(sentence.elements[0].word.candidate, "私");
    assert_eq!(sentence.elements[0].word.stroke, "わたし");
    assert_eq!(sentence.elements[1].word.candidate, "は");
    assert_eq!(sentence.elements[1].word.stroke, "は");
    assert_eq!(sentence.word.candidate, "私は");
    // 私 (100) and the literal は (-1001), plus two clause costs.
    assert_eq!(sentence.word.frequency, 100 - 1001 - 2000);
}

#[test]
fn sentences_are_deterministic() {
    let mut dict = watashi_dictionary();
    let mut converter = ClauseConverter::default();
    converter.set_dictionary(&dict);

    let first = converter.consecutive_clause_convert(&mut dict, "わたしはわたし");
    let again = converter.consecutive_clause_convert(&mut dict, "わたしはわたし");
    let mut fresh = ClauseConverter::default();
    fresh.set_dictionary(&dict);
    let other = fresh.consecutive_clause_convert(&mut dict, "わたしはわたし");

    assert_eq!(first, again);
    assert_eq!(first, other);

    let sentence = first.expect("a sentence");
    let joined: String = sentence
        .elements
        .iter()
        .map(|c| c.word.candidate.as_str())
        .collect();
    assert_eq!(sentence.word.candidate, joined);
    let strokes: String = sentence
        .elements
        .iter()
        .map(|c| c.word.stroke.as_str())
        .collect();
    assert_eq!(strokes, "わたしはわたし");
}

#[test]
fn memo_tables_spare_dictionary_searches() {
    let mut dict = watashi_dictionary();
    let mut converter = ClauseConverter::default();
    converter.set_dictionary(&dict);

    converter.consecutive_clause_convert(&mut dict, "わたしは");
    let searches = dict.searches;
    converter.consecutive_clause_convert(&mut dict, "わたしは");
    assert_eq!(dict.searches, searches);

    converter.set_dictionary(&dict);
    converter.consecutive_clause_convert(&mut dict, "わたしは");
    assert!(dict.searches > searches);
}

#[test]
fn clause_window_bounds_clause_length() {
    let mut config = Config::default();
    config.set_max_clause_length(2);
    let mut dict = watashi_dictionary();
    let mut converter = ClauseConverter::new(&config);
    converter.set_dictionary(&dict);

    let sentence = converter
        .consecutive_clause_convert(&mut dict, "あいうえ")
        .expect("a sentence");
    assert!(sentence
        .elements
        .iter()
        .all(|c| c.word.stroke.chars().count() <= 2));
    assert_eq!(sentence.word.candidate, "あいうえ");
}

// ========== Pruning ==========

#[test]
fn pruning_skips_hopeless_clauses() {
    let mut dict = watashi_dictionary();
    let mut pruned = ClauseConverter::default();
    pruned.set_dictionary(&dict);
    let mut exhaustive = ClauseConverter::default();
    exhaustive.set_dictionary(&dict);
    exhaustive.set_pruning(false);

    let a = pruned.consecutive_clause_convert(&mut dict, "わたし");
    let b = exhaustive.consecutive_clause_convert(&mut dict, "わたし");
    assert_eq!(a, b);
    assert_eq!(exhaustive.last_evaluations(), 6);
    assert_eq!(pruned.last_evaluations(), 4);
}

#[test]
fn user_band_above_learn_band_is_not_pruned_away() {
    // 愛 (-250) covers the whole reading, but 亜 + 胃 wins once 胃 scores
    // at a user band of 900, above the learn band.
    let mut config = Config::default();
    config.freq_user = 900;
    let mut dict = MockDictionary::new(
        ConnectMatrix::from_pairs(2, [(1, 1), (2, 1)]),
        WnnPos::new(1, 1),
    )
    .word("あ", "亜", WnnPos::new(1, 1), 0)
    .word("あい", "愛", WnnPos::new(1, 1), -250)
    .word("い", "胃", WnnPos::new(2, 2), 900);

    let mut pruned = ClauseConverter::new(&config);
    pruned.set_dictionary(&dict);
    let mut exhaustive = ClauseConverter::new(&config);
    exhaustive.set_dictionary(&dict);
    exhaustive.set_pruning(false);

    let sentence = pruned
        .consecutive_clause_convert(&mut dict, "あい")
        .expect("a sentence");
    assert_eq!(sentence.word.candidate, "亜胃");
    assert_eq!(sentence.word.frequency, 900 - 2000);
    assert_eq!(
        Some(sentence),
        exhaustive.consecutive_clause_convert(&mut dict, "あい")
    );
}

// ========== Pruning differential ==========

const KANA: [char; 5] = ['あ', 'い', 'う', 'か', 'き'];
const POS_COUNT: u16 = 5;
const TERMINAL: WnnPos = WnnPos::new(5, 5);

fn reading(max_len: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(KANA.to_vec()), 1..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

fn pos() -> impl Strategy<Value = WnnPos> {
    (1..=4u16, 1..=4u16).prop_map(|(left, right)| WnnPos::new(left, right))
}

/// Stems and ancillary words with random POS and frequencies, a random
/// matrix, and a few learned and user words. No clause can score above the
/// learn band.
#[derive(Debug, Clone)]
struct Synthetic {
    stems: Vec<(String, WnnPos, u8)>,
    ancillaries: Vec<(String, WnnPos, u8)>,
    links: Vec<bool>,
    learned: Vec<(String, WnnPos)>,
    user: Vec<(String, WnnPos)>,
}

impl Synthetic {
    fn build(&self) -> InMemoryDictionary {
        let mut lexicon = Lexicon::new();
        lexicon.add_source(id::STEM);
        lexicon.add_source(id::ANCILLARY);
        for (i, (stroke, pos, freq)) in self.stems.iter().enumerate() {
            lexicon.insert(id::STEM, stroke, format!("{stroke}#{i}"), *pos, *freq);
        }
        for (stroke, pos, freq) in &self.ancillaries {
            lexicon.insert(id::ANCILLARY, stroke, stroke.clone(), *pos, *freq);
        }

        let mut matrix = ConnectMatrix::new(POS_COUNT as usize);
        let pairs = (1..=POS_COUNT).flat_map(|right| (1..=POS_COUNT).map(move |left| (right, left)));
        for ((right, left), linked) in pairs.zip(&self.links) {
            if *linked {
                matrix.allow(right, left);
            }
        }

        let mut dict = InMemoryDictionary::new(lexicon, matrix);
        dict.set_part_of_speech(PosType::Noun, WnnPos::new(1, 1));
        dict.set_part_of_speech(PosType::SentenceEnd, TERMINAL);
        dict.set_part_of_speech(PosType::ClauseEnd, TERMINAL);
        dict.set_part_of_speech(PosType::ClauseBreak, TERMINAL);

        for (i, (stroke, pos)) in self.learned.iter().enumerate() {
            let word = WnnWord::with_pos(format!("learned{i}"), stroke.clone(), *pos);
            dict.learn_word(&word, None).expect("learn");
        }
        for (i, (stroke, pos)) in self.user.iter().enumerate() {
            let word = WnnWord::with_pos(format!("user{i}"), stroke.clone(), *pos);
            dict.add_word_to_user_dictionary(&word).expect("add user word");
        }
        dict
    }
}

fn synthetic() -> impl Strategy<Value = Synthetic> {
    let entries = |count: usize, max_len: usize| {
        prop::collection::vec((reading(max_len), pos(), 0..=100u8), count)
    };
    let words = || prop::collection::vec((reading(2), pos()), 2);
    let links = prop::collection::vec(any::<bool>(), (POS_COUNT * POS_COUNT) as usize);
    (entries(14, 3), entries(5, 2), links, words(), words()).prop_map(
        |(stems, ancillaries, links, learned, user)| Synthetic {
            stems,
            ancillaries,
            links,
            learned,
            user,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pruning_never_changes_the_sentence(
        synthetic in synthetic(),
        inputs in prop::collection::vec(reading(9), 10),
    ) {
        let mut dict = synthetic.build();
        let mut pruned = ClauseConverter::default();
        pruned.set_dictionary(&dict);
        let mut exhaustive = ClauseConverter::default();
        exhaustive.set_dictionary(&dict);
        exhaustive.set_pruning(false);

        for input in &inputs {
            let a = pruned.consecutive_clause_convert(&mut dict, input);
            let b = exhaustive.consecutive_clause_convert(&mut dict, input);
            prop_assert_eq!(a, b, "input {}", input);
            prop_assert!(pruned.last_evaluations() <= exhaustive.last_evaluations());
        }
    }
}
