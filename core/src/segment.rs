//! One unit of text on a composing layer.
//!
//! A layer of a [`ComposingText`](crate::ComposingText) is an ordered list of
//! segments. Each segment spans a closed range of segments on the layer
//! directly below it: on the letter layer a segment points at the keystrokes
//! it was made from, on the clause layer at the letters of the clause.

use crate::word::WnnClause;

/// A segment of a composing layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrSegment {
    /// Text shown for this segment.
    pub text: String,
    /// First spanned index on the layer below (inclusive).
    pub from: usize,
    /// Last spanned index on the layer below (inclusive).
    pub to: usize,
    /// Conversion result this segment displays, if any.
    pub clause: Option<WnnClause>,
}

/// Returned for out-of-range queries.
static EMPTY_SEGMENT: StrSegment = StrSegment::EMPTY;

impl StrSegment {
    /// The sentinel segment: empty text and an inverted span.
    pub const EMPTY: StrSegment = StrSegment {
        text: String::new(),
        from: 1,
        to: 0,
        clause: None,
    };

    /// Create a segment spanning `[from, to]` on the layer below.
    pub fn new<T: Into<String>>(text: T, from: usize, to: usize) -> Self {
        Self {
            text: text.into(),
            from,
            to,
            clause: None,
        }
    }

    /// Create a segment for a single keystroke or letter.
    ///
    /// The span is filled in by the composing text when the segment is
    /// inserted on a layer.
    pub fn from_text<T: Into<String>>(text: T) -> Self {
        Self::new(text, 0, 0)
    }

    /// Create a segment displaying a conversion result.
    pub fn with_clause(clause: WnnClause, from: usize, to: usize) -> Self {
        Self {
            text: clause.word.candidate.clone(),
            from,
            to,
            clause: Some(clause),
        }
    }

    /// Reference to the shared sentinel.
    pub fn empty() -> &'static StrSegment {
        &EMPTY_SEGMENT
    }

    /// Whether this is the sentinel (inverted span).
    pub fn is_sentinel(&self) -> bool {
        self.from > self.to
    }

    /// Number of lower-layer segments spanned.
    pub fn span_len(&self) -> usize {
        if self.is_sentinel() {
            0
        } else {
            self.to - self.from + 1
        }
    }

    /// Whether `index` on the layer below is spanned by this segment.
    pub fn spans(&self, index: usize) -> bool {
        self.from <= index && index <= self.to
    }
}
