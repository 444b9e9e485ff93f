//! Letter conversion seam.
//!
//! A letter converter rewrites the letter layer of a composing text, one step
//! at a time, right after a keystroke has been inserted.

use crate::composing_text::{ComposingText, LAYER0, LAYER1};
use crate::segment::StrSegment;

pub trait LetterConverter {
    /// Convert the letters just before the `LAYER1` cursor. Returns true if
    /// the composing text was changed.
    fn convert(&self, text: &mut ComposingText) -> bool;

    /// Type `keys` one character at a time: each keystroke is inserted on
    /// `LAYER0` with its own letter and then converted.
    fn feed(&self, text: &mut ComposingText, keys: &str) {
        for ch in keys.chars() {
            text.insert_spanning(LAYER0, LAYER1, StrSegment::from_text(ch.to_string()));
            self.convert(text);
        }
    }
}
