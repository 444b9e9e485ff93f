//! libjajp
//!
//! Japanese conversion on top of libwnn-core:
//! - `Romkan` - romaji to kana letter conversion (hiragana or katakana)
//! - `ClauseConverter` - single-clause and consecutive-clause conversion
//! - `KanaConverter` - literal (pseudo) candidates
//! - `Engine` - prediction, conversion, candidate stream and learning
//! - `JaJpConfig` - base tuning constants plus Japanese options

pub mod config;
pub use config::JaJpConfig;

pub mod kana_table;
pub mod romaji_table;
pub use romaji_table::RomajiTable;

pub mod romkan;
pub use romkan::Romkan;

pub mod sources;

pub mod kana_converter;
pub use kana_converter::KanaConverter;

pub mod clause_converter;
pub use clause_converter::ClauseConverter;

pub mod engine;
pub use engine::{DictionaryKind, Engine, EngineState, InitTarget};

pub mod demo;
