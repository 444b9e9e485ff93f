// libjajp/tests/engine_flow.rs
//
// End-to-end composition flows through the Engine.
//
// Tests cover:
// - Typing romaji, predicting, converting and committing
// - Learned words outranking the system dictionary
// - Link prediction after a commit
// - Katakana input tables feeding the engine
// - Loading configuration and word lists from files

mod common;

use common::watashi_dictionary;
use libjajp::demo::{demo_dictionary, demo_matrix};
use libjajp::{DictionaryKind, Engine, EngineState, JaJpConfig, RomajiTable, Romkan};
use libwnn_core::{
    Candidate, ComposingText, InMemoryDictionary, LetterConverter, Lexicon, PosType,
    WnnDictionary, WnnPos, WnnWord, LAYER0, LAYER1, LAYER2,
};

fn typed(keys: &str) -> ComposingText {
    let mut text = ComposingText::new();
    Romkan::hiragana().feed(&mut text, keys);
    text
}

fn demo_engine() -> Engine<InMemoryDictionary> {
    Engine::new(demo_dictionary(), JaJpConfig::default())
}

fn candidates<D: WnnDictionary>(engine: &mut Engine<D>) -> Vec<Candidate> {
    std::iter::from_fn(|| engine.next_candidate()).collect()
}

#[test]
fn type_convert_commit() {
    let mut engine = demo_engine();
    let mut text = typed("ashitahaamedesu");
    assert_eq!(text.to_string(LAYER1), "あしたはあめです");
    assert_eq!(engine.state(), EngineState::Idle);

    let clauses = engine.convert(&mut text);
    assert!(clauses >= 2);
    assert_eq!(engine.state(), EngineState::SentenceReview);
    assert_eq!(text.to_string(LAYER2), "明日は雨です");
    assert_eq!(text.to_string(LAYER0), "ashitahaamedesu");
    assert!(text.check_consistency().is_ok());

    let sentence = engine.converted_sentence().cloned().expect("sentence");
    engine.learn(&Candidate::Sentence(sentence)).expect("learn");
    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(engine.dictionary().user_dict().learned_len(), clauses);
    text.clear();
    assert!(text.is_empty());
}

#[test]
fn learned_word_moves_to_front() {
    let mut engine = demo_engine();
    engine.predict(&typed("ame"), 0, None);
    let before = candidates(&mut engine);
    assert_eq!(before[0].text(), "雨");
    let candy = before
        .iter()
        .find(|c| c.text() == "飴")
        .cloned()
        .expect("飴 is predicted");

    engine.learn(&candy).expect("learn");
    engine.predict(&typed("ame"), 0, None);
    assert_eq!(engine.next_candidate().expect("candidate").text(), "飴");
}

#[test]
fn link_prediction_follows_commits() {
    let mut engine = demo_engine();
    let today = WnnWord::with_pos("今日", "きょう", WnnPos::new(1, 1));
    let weather = WnnWord::with_pos("天気", "てんき", WnnPos::new(1, 1));
    engine.learn(&Candidate::Word(today.clone())).expect("learn");
    engine.learn(&Candidate::Word(weather)).expect("learn");

    // The next commit of 今日 predicts 天気 with no input at all.
    engine.break_sequence();
    engine.learn(&Candidate::Word(today)).expect("learn");
    assert_eq!(engine.predict(&ComposingText::new(), 0, None), 1);
    let linked = candidates(&mut engine);
    assert_eq!(linked[0].text(), "天気");
}

#[test]
fn clause_alternatives_after_conversion() {
    let mut engine = demo_engine();
    let mut text = typed("hashiwo");
    engine.convert(&mut text);
    assert_eq!(text.to_string(LAYER2), "橋を");

    assert!(engine.make_candidate_list_of(0));
    let texts: Vec<String> = candidates(&mut engine)
        .iter()
        .map(|c| c.text().to_string())
        .collect();
    assert_eq!(&texts[..3], &["橋を", "箸を", "端を"]);
    assert!(texts.contains(&"ハシヲ".to_string()));
    assert!(texts.contains(&"hashiwo".to_string()));
    assert!(texts.contains(&"Ｈａｓｈｉｗｏ".to_string()));
}

#[test]
fn katakana_table_feeds_pseudo_candidates() {
    let mut config = JaJpConfig::default();
    config.romaji_table = RomajiTable::FullKatakana;
    config.dictionary_kind = DictionaryKind::EisuKana;
    let mut engine = Engine::new(demo_dictionary(), config);

    let mut text = ComposingText::new();
    Romkan::from_config(engine.config()).feed(&mut text, "tesuto");
    assert_eq!(text.to_string(LAYER1), "テスト");

    engine.predict(&text, 0, None);
    let texts: Vec<String> = candidates(&mut engine)
        .iter()
        .map(|c| c.text().to_string())
        .collect();
    assert_eq!(texts[0], "テスト");
    assert!(texts.contains(&"tesuto".to_string()));
    assert!(texts.contains(&"ＴＥＳＵＴＯ".to_string()));
}

#[test]
fn scripted_dictionary_drives_the_engine() {
    let mut engine = Engine::new(watashi_dictionary(), JaJpConfig::default());
    let mut text = typed("watashiha");
    assert_eq!(engine.convert(&mut text), 2);
    assert_eq!(text.to_string(LAYER2), "私は");
    assert_eq!(text.segment(LAYER2, 0).to, 2);
    assert_eq!(text.segment(LAYER2, 1).from, 3);

    let sentence = engine.converted_sentence().cloned().expect("sentence");
    engine.learn(&Candidate::Sentence(sentence)).expect("learn");
    let learned = &engine.dictionary().learned;
    assert_eq!(learned.len(), 2);
    assert_eq!(learned[1].1.as_ref().map(|w| w.candidate.as_str()), Some("私"));
}

#[test]
fn files_configure_the_engine() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("jajp.toml");
    std::fs::write(&config_path, "predict_limit = 1\nromaji_table = \"hiragana\"\n")
        .expect("write config");
    let lexicon_path = dir.path().join("words.json");
    std::fs::write(
        &lexicon_path,
        r#"[
            {"source": 0, "stroke": "ねこ", "candidate": "猫", "left": 1, "right": 1, "frequency": 90},
            {"source": 0, "stroke": "ねこ", "candidate": "寝子", "left": 1, "right": 1, "frequency": 10},
            {"source": 4, "stroke": "ねこ", "candidate": "猫", "left": 1, "right": 1, "frequency": 90}
        ]"#,
    )
    .expect("write lexicon");

    let config = JaJpConfig::load_toml(&config_path).expect("config");
    assert_eq!(config.base.predict_limit, 1);
    let lexicon = Lexicon::load_json(&lexicon_path).expect("lexicon");
    assert_eq!(lexicon.len(), 3);

    let mut dict = InMemoryDictionary::with_config(lexicon, demo_matrix(), &config.base);
    dict.set_part_of_speech(PosType::Noun, WnnPos::new(1, 1));
    dict.set_part_of_speech(PosType::ClauseEnd, WnnPos::new(4, 4));
    let mut engine = Engine::new(dict, config);

    assert_eq!(engine.predict(&typed("neko"), 0, None), 2);
    let texts: Vec<String> = candidates(&mut engine)
        .iter()
        .map(|c| c.text().to_string())
        .collect();
    // One dictionary candidate, then clauses and literal forms.
    assert_eq!(texts[0], "猫");
    assert!(!texts.contains(&"寝子".to_string()));
    assert!(texts.contains(&"ねこ".to_string()));
}
