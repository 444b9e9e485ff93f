use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use libjajp::demo::{demo_dictionary, demo_matrix};
use libjajp::{Engine, JaJpConfig, Romkan};
use libwnn_core::{
    Candidate, ComposingText, InMemoryDictionary, LetterConverter, Lexicon, PosType,
    WnnDictionary, LAYER0, LAYER1, LAYER2,
};
use tracing::info;

const CANDIDATES_SHOWN: usize = 10;

#[derive(Parser)]
#[command(name = "libjajp")]
#[command(about = "Japanese romaji/kana/kanji conversion demo")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// JSON word list replacing the built-in demo words
    #[arg(short, long, global = true)]
    lexicon: Option<PathBuf>,

    /// Print candidates as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive REPL mode
    Repl,
    /// Convert romaji into a sentence
    Convert {
        /// Romaji input, e.g. "kyouhatenki"
        romaji: String,
    },
    /// List prediction candidates for romaji input
    Predict {
        /// Romaji input, e.g. "kyou"
        romaji: String,
    },
}

fn build_engine(cli: &Cli) -> anyhow::Result<Engine<InMemoryDictionary>> {
    let config = match &cli.config {
        Some(path) => JaJpConfig::load_toml(path)?,
        None => JaJpConfig::default(),
    };

    let dictionary = match &cli.lexicon {
        Some(path) => {
            let lexicon = Lexicon::load_json(path)
                .with_context(|| format!("load lexicon {}", path.display()))?;
            info!(words = lexicon.len(), "lexicon loaded");
            let mut dictionary =
                InMemoryDictionary::with_config(lexicon, demo_matrix(), &config.base);
            // Grammar anchors follow the demo POS numbering.
            let template = demo_dictionary();
            for pos_type in [
                PosType::SentenceEnd,
                PosType::ClauseEnd,
                PosType::ClauseBreak,
                PosType::SentenceStart,
                PosType::SingleKanji,
                PosType::Numeral,
                PosType::Noun,
                PosType::PersonName,
                PosType::PlaceName,
                PosType::Symbol,
            ] {
                dictionary.set_part_of_speech(pos_type, template.part_of_speech(pos_type));
            }
            dictionary
        }
        None => {
            info!("using built-in demo dictionary");
            demo_dictionary()
        }
    };
    Ok(Engine::new(dictionary, config))
}

fn compose(engine: &Engine<InMemoryDictionary>, romaji: &str) -> ComposingText {
    let mut text = ComposingText::new();
    Romkan::from_config(engine.config()).feed(&mut text, romaji);
    text
}

fn print_layers(text: &ComposingText) {
    println!("  keys:    {}", text.to_string(LAYER0));
    println!("  letters: {}", text.to_string(LAYER1));
    if text.size(LAYER2) > 0 {
        let clauses: Vec<&str> = text
            .segments(LAYER2)
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        println!("  clauses: {}", clauses.join(" | "));
    }
}

fn run_predict(engine: &mut Engine<InMemoryDictionary>, romaji: &str, json: bool) -> anyhow::Result<()> {
    let text = compose(engine, romaji);
    engine.predict(&text, 0, None);
    let candidates: Vec<Candidate> = std::iter::from_fn(|| engine.next_candidate())
        .take(CANDIDATES_SHOWN)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        return Ok(());
    }
    print_layers(&text);
    if candidates.is_empty() {
        println!("  (no candidates found)");
    }
    for (i, candidate) in candidates.iter().enumerate() {
        println!("  {}. {} ({})", i + 1, candidate.text(), candidate.frequency());
    }
    Ok(())
}

fn run_convert(engine: &mut Engine<InMemoryDictionary>, romaji: &str) {
    let mut text = compose(engine, romaji);
    if engine.convert(&mut text) == 0 {
        println!("  (nothing to convert)");
        return;
    }
    print_layers(&text);
    if let Some(sentence) = engine.converted_sentence() {
        println!("  → {} (score: {})", sentence.word.candidate, sentence.word.frequency);
    }
}

fn run_repl(engine: &mut Engine<InMemoryDictionary>, json: bool) -> anyhow::Result<()> {
    println!("libjajp demo CLI: type romaji and press Enter");
    println!("Prefix a line with '=' to convert instead of predict (e.g. =kyouhatenki).");
    println!("Ctrl-D to exit.");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let raw = line.context("read stdin")?;
        let input = raw.trim();
        if input.is_empty() {
            continue;
        }
        println!("\nInput: '{}'", input);
        match input.strip_prefix('=') {
            Some(romaji) => run_convert(engine, romaji),
            None => run_predict(engine, input, json)?,
        }
        println!();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut engine = build_engine(&cli)?;

    match &cli.command {
        Some(Commands::Convert { romaji }) => run_convert(&mut engine, romaji),
        Some(Commands::Predict { romaji }) => run_predict(&mut engine, romaji, cli.json)?,
        Some(Commands::Repl) | None => run_repl(&mut engine, cli.json)?,
    }
    Ok(())
}
