//! Pseudo candidates: literal forms of what was typed.
//!
//! Besides dictionary results the user can always pick the reading itself,
//! its katakana forms, and the raw romaji in several casings and widths.

use libwnn_core::utils::{capitalize, to_fullwidth};
use libwnn_core::{PosType, WnnDictionary, WnnPos, WnnWord};

use crate::kana_table::{to_full_katakana, to_half_katakana};

#[derive(Debug, Clone, Default)]
pub struct KanaConverter {
    pos_default: WnnPos,
    pos_symbol: WnnPos,
}

impl KanaConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the POS pairs pseudo candidates are tagged with.
    pub fn set_dictionary<D: WnnDictionary + ?Sized>(&mut self, dictionary: &D) {
        self.pos_default = dictionary.part_of_speech(PosType::Noun);
        self.pos_symbol = dictionary.part_of_speech(PosType::Symbol);
    }

    /// Literal candidates for `reading` typed as `romaji`, in order:
    ///
    /// 1. the reading
    /// 2. full-width katakana, half-width katakana
    /// 3. romaji as typed, lower case, capitalized, upper case
    /// 4. the same four in full width
    ///
    /// A form some character has no mapping for is skipped.
    pub fn create_pseudo_candidate_list(&self, reading: &str, romaji: &str) -> Vec<WnnWord> {
        let mut list = Vec::new();
        if reading.is_empty() {
            return list;
        }
        let word = |candidate: String, pos: WnnPos| WnnWord::with_pos(candidate, reading, pos);

        list.push(word(reading.to_string(), self.pos_default));
        if let Some(katakana) = to_full_katakana(reading) {
            list.push(word(katakana, self.pos_default));
        }
        if let Some(katakana) = to_half_katakana(reading) {
            list.push(word(katakana, self.pos_default));
        }

        if romaji.is_empty() {
            return list;
        }
        let cases = [
            romaji.to_string(),
            romaji.to_lowercase(),
            capitalize(romaji),
            romaji.to_uppercase(),
        ];
        list.push(word(cases[0].clone(), self.pos_default));
        for case in &cases[1..] {
            list.push(word(case.clone(), self.pos_symbol));
        }
        for (i, case) in cases.iter().enumerate() {
            let Some(wide) = to_fullwidth(case) else {
                break;
            };
            let pos = if i == 0 { self.pos_default } else { self.pos_symbol };
            list.push(word(wide, pos));
        }
        list
    }
}
