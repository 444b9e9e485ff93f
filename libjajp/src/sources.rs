//! Dictionary source layout of the Japanese engine.
//!
//! A `WnnDictionary` exposes numbered system sources; which number holds
//! which word class, and the score band each is searched in, is fixed here.

use libwnn_core::DictionaryIndex;

/// Source numbers inside the system dictionary.
pub mod id {
    pub const MAIN: u8 = 0;
    pub const COMPOUND: u8 = 1;
    pub const STEM: u8 = 4;
    pub const ANCILLARY: u8 = 5;
}

/// Main prediction dictionary.
pub const MAIN: DictionaryIndex = DictionaryIndex::System(id::MAIN);
/// Compound words, only predicted for keys longer than one character.
pub const COMPOUND: DictionaryIndex = DictionaryIndex::System(id::COMPOUND);
/// Independent words (stems) for clause conversion.
pub const STEM: DictionaryIndex = DictionaryIndex::System(id::STEM);
/// Ancillary words (particles, auxiliaries, inflection endings).
pub const ANCILLARY: DictionaryIndex = DictionaryIndex::System(id::ANCILLARY);

/// Score band of `MAIN` and `COMPOUND` during prediction.
pub const PREDICT_BAND: (i32, i32) = (100, 400);
/// Score band of `STEM`. Searches for the best stem per POS stop below its floor.
pub const STEM_BAND: (i32, i32) = (400, 500);
/// Score band of `ANCILLARY`.
pub const ANCILLARY_BAND: (i32, i32) = (400, 500);
