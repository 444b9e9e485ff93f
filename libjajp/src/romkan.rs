//! Romaji to kana letter conversion.
//!
//! After every keystroke the letters just before the `LAYER1` cursor are
//! matched against a romaji table, widest key first. A match replaces the
//! matched letters with its kana. When the kana has several characters, the
//! last one becomes its own segment over the last keystroke: "kk" becomes
//! "っ" + "k", so the pending "k" can still combine with the next key.

use libwnn_core::{ComposingText, LetterConverter, StrSegment, LAYER1};
use tracing::trace;

use crate::config::JaJpConfig;
use crate::romaji_table::{RomajiTable, MAX_KEY_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Romkan {
    table: RomajiTable,
    lookback: usize,
}

impl Default for Romkan {
    fn default() -> Self {
        Self::new(RomajiTable::Hiragana)
    }
}

impl Romkan {
    pub fn new(table: RomajiTable) -> Self {
        Self {
            table,
            lookback: MAX_KEY_LENGTH,
        }
    }

    pub fn hiragana() -> Self {
        Self::new(RomajiTable::Hiragana)
    }

    pub fn full_katakana() -> Self {
        Self::new(RomajiTable::FullKatakana)
    }

    pub fn half_katakana() -> Self {
        Self::new(RomajiTable::HalfKatakana)
    }

    pub fn from_config(config: &JaJpConfig) -> Self {
        Self::new(config.romaji_table).with_lookback(config.base.romkan_lookback)
    }

    /// Number of trailing letters considered (at least 1).
    pub fn with_lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback.max(1);
        self
    }

    pub fn table(&self) -> RomajiTable {
        self.table
    }
}

impl LetterConverter for Romkan {
    fn convert(&self, text: &mut ComposingText) -> bool {
        let cursor = text.cursor(LAYER1);
        if cursor == 0 {
            return false;
        }

        for begin in cursor.saturating_sub(self.lookback)..cursor {
            let key: String = (begin..cursor)
                .map(|i| text.segment(LAYER1, i).text.as_str())
                .collect();
            let Some(kana) = self.table.lookup(&key.to_lowercase()) else {
                continue;
            };
            let upper = key.chars().last().is_some_and(char::is_uppercase);
            let kana = if upper {
                kana.to_uppercase()
            } else {
                kana.to_string()
            };

            let from = text.segment(LAYER1, begin).from;
            let to = text.segment(LAYER1, cursor - 1).to;
            let segments = match kana.char_indices().last() {
                Some((tail_at, _)) if tail_at > 0 && to > from => vec![
                    StrSegment::new(&kana[..tail_at], from, to - 1),
                    StrSegment::new(&kana[tail_at..], to, to),
                ],
                _ => vec![StrSegment::new(kana.as_str(), from, to)],
            };
            trace!(key = %key, kana = %kana, "romaji converted");
            text.replace(LAYER1, segments, cursor - begin);
            return true;
        }
        false
    }
}
