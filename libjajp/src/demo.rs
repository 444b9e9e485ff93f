//! A small built-in dictionary for the CLI and tests.
//!
//! Real deployments load a full word list (`Lexicon::load_json`) and a
//! connectivity matrix from their dictionary engine; this one carries a few
//! dozen everyday words and the particles needed to join them.

use libwnn_core::{ConnectMatrix, InMemoryDictionary, Lexicon, PosType, WnnPos};

use crate::sources::id;

pub const NOUN: u16 = 1;
pub const PARTICLE: u16 = 2;
pub const SENTENCE_END: u16 = 3;
pub const CLAUSE_END: u16 = 4;
pub const CLAUSE_BREAK: u16 = 5;
pub const SYMBOL: u16 = 6;
pub const SENTENCE_START: u16 = 7;
pub const AUXILIARY: u16 = 8;

const POS_COUNT: usize = 8;

/// (reading, word, raw frequency) of nouns, shared by prediction and stems.
const NOUNS: &[(&str, &str, u8)] = &[
    ("わたし", "私", 90),
    ("わたし", "渡し", 20),
    ("わたしたち", "私達", 60),
    ("きょう", "今日", 90),
    ("きょう", "京", 40),
    ("きょう", "強", 30),
    ("てんき", "天気", 80),
    ("てんき", "転機", 30),
    ("にほん", "日本", 90),
    ("にほん", "二本", 30),
    ("にほんご", "日本語", 70),
    ("はし", "橋", 60),
    ("はし", "箸", 55),
    ("はし", "端", 40),
    ("あめ", "雨", 80),
    ("あめ", "飴", 50),
    ("かみ", "紙", 70),
    ("かみ", "神", 60),
    ("かみ", "髪", 50),
    ("がっこう", "学校", 85),
    ("ともだち", "友達", 80),
    ("でんしゃ", "電車", 75),
    ("えき", "駅", 75),
    ("ほん", "本", 80),
    ("なまえ", "名前", 70),
    ("じかん", "時間", 75),
    ("あした", "明日", 85),
    ("きのう", "昨日", 80),
    ("やま", "山", 70),
    ("かわ", "川", 65),
];

/// Multi-word entries only offered as predictions.
const COMPOUNDS: &[(&str, &str, u8)] = &[
    ("きょうは", "今日は", 50),
    ("きょうのてんき", "今日の天気", 40),
    ("にほんのやま", "日本の山", 30),
    ("わたしは", "私は", 45),
];

const PARTICLES: &[(&str, u8)] = &[
    ("は", 90),
    ("が", 90),
    ("を", 90),
    ("に", 85),
    ("の", 85),
    ("へ", 60),
    ("と", 70),
    ("で", 75),
    ("も", 70),
    ("から", 65),
    ("まで", 60),
];

const AUXILIARIES: &[(&str, u8)] = &[("です", 80), ("だ", 70)];

/// Which right POS may precede which left POS, as `(right, left)`.
const CONNECTIONS: &[(u16, u16)] = &[
    (NOUN, PARTICLE),
    (NOUN, AUXILIARY),
    (NOUN, SENTENCE_END),
    (NOUN, CLAUSE_END),
    (NOUN, CLAUSE_BREAK),
    (PARTICLE, PARTICLE),
    (PARTICLE, SENTENCE_END),
    (PARTICLE, CLAUSE_END),
    (PARTICLE, CLAUSE_BREAK),
    (AUXILIARY, PARTICLE),
    (AUXILIARY, SENTENCE_END),
    (AUXILIARY, CLAUSE_END),
    (AUXILIARY, CLAUSE_BREAK),
    (SYMBOL, SENTENCE_END),
    (SYMBOL, CLAUSE_END),
    (SYMBOL, CLAUSE_BREAK),
    (SENTENCE_START, NOUN),
];

const fn pos(id: u16) -> WnnPos {
    WnnPos::new(id, id)
}

pub fn demo_lexicon() -> Lexicon {
    let mut lexicon = Lexicon::new();
    for &(stroke, candidate, freq) in NOUNS {
        lexicon.insert(id::MAIN, stroke, candidate, pos(NOUN), freq);
        lexicon.insert(id::STEM, stroke, candidate, pos(NOUN), freq);
    }
    for &(stroke, candidate, freq) in COMPOUNDS {
        lexicon.insert(id::COMPOUND, stroke, candidate, pos(NOUN), freq);
    }
    for &(stroke, freq) in PARTICLES {
        lexicon.insert(id::ANCILLARY, stroke, stroke, pos(PARTICLE), freq);
    }
    for &(stroke, freq) in AUXILIARIES {
        lexicon.insert(id::ANCILLARY, stroke, stroke, pos(AUXILIARY), freq);
    }
    lexicon
}

pub fn demo_matrix() -> ConnectMatrix {
    ConnectMatrix::from_pairs(POS_COUNT, CONNECTIONS.iter().copied())
}

/// The demo lexicon and matrix with every grammar anchor set.
pub fn demo_dictionary() -> InMemoryDictionary {
    let mut dictionary = InMemoryDictionary::new(demo_lexicon(), demo_matrix());
    let anchors = [
        (PosType::SentenceEnd, pos(SENTENCE_END)),
        (PosType::ClauseEnd, pos(CLAUSE_END)),
        (PosType::ClauseBreak, pos(CLAUSE_BREAK)),
        (PosType::SentenceStart, pos(SENTENCE_START)),
        (PosType::SingleKanji, pos(NOUN)),
        (PosType::Numeral, pos(NOUN)),
        (PosType::Noun, pos(NOUN)),
        (PosType::PersonName, pos(NOUN)),
        (PosType::PlaceName, pos(NOUN)),
        (PosType::Symbol, pos(SYMBOL)),
    ];
    for (pos_type, pos) in anchors {
        dictionary.set_part_of_speech(pos_type, pos);
    }
    dictionary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources;
    use libwnn_core::{SearchOperation, SearchOrder, WnnDictionary};

    #[test]
    fn sources_are_populated() {
        let lexicon = demo_lexicon();
        assert_eq!(lexicon.exact(id::MAIN, "わたし").len(), 2);
        assert_eq!(lexicon.exact(id::STEM, "わたし").len(), 2);
        assert_eq!(lexicon.exact(id::ANCILLARY, "は").len(), 1);
        assert!(lexicon.has_source(id::COMPOUND));
    }

    #[test]
    fn particles_follow_nouns() {
        let matrix = demo_matrix();
        assert!(matrix.connectible(NOUN, PARTICLE));
        assert!(matrix.connectible(PARTICLE, SENTENCE_END));
        assert!(!matrix.connectible(PARTICLE, NOUN));
    }

    #[test]
    fn anchors_are_set() {
        let mut dict = demo_dictionary();
        assert_eq!(dict.part_of_speech(PosType::ClauseBreak), pos(CLAUSE_BREAK));
        dict.set_dictionary(sources::MAIN, 100, 400);
        assert_eq!(
            dict.search_word(SearchOperation::Prefix, SearchOrder::ByFrequency, "にほん", None),
            3
        );
    }
}
