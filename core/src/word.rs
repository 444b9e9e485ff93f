//! Words, clauses and sentences produced by conversion.
//!
//! All three share one shape (`WnnWord`): a clause is a word usable as one
//! clause of a sentence (a stem, optionally followed by ancillary words), a
//! sentence is a word whose candidate and stroke concatenate its clauses.

use serde::{Deserialize, Serialize};

/// Part-of-speech pair used for connectivity checks.
///
/// `left` is matched against the right POS of the preceding word, `right`
/// against the left POS of the following word. 0 means unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WnnPos {
    pub left: u16,
    pub right: u16,
}

impl WnnPos {
    pub const fn new(left: u16, right: u16) -> Self {
        Self { left, right }
    }

    pub fn is_unset(&self) -> bool {
        self.right == 0
    }
}

/// A dictionary word.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WnnWord {
    /// Dictionary-local id (0 for synthesized words).
    pub id: u32,
    /// Output text ("私").
    pub candidate: String,
    /// Reading ("わたし").
    pub stroke: String,
    /// Score; higher ranks first.
    pub frequency: i32,
    pub pos: WnnPos,
    /// Dictionary-defined attribute bits.
    pub attribute: u32,
}

impl WnnWord {
    pub fn new<C: Into<String>, S: Into<String>>(candidate: C, stroke: S) -> Self {
        Self {
            candidate: candidate.into(),
            stroke: stroke.into(),
            ..Self::default()
        }
    }

    pub fn with_pos<C: Into<String>, S: Into<String>>(candidate: C, stroke: S, pos: WnnPos) -> Self {
        Self {
            pos,
            ..Self::new(candidate, stroke)
        }
    }

    pub fn with_frequency<C: Into<String>, S: Into<String>>(
        candidate: C,
        stroke: S,
        pos: WnnPos,
        frequency: i32,
    ) -> Self {
        Self {
            frequency,
            pos,
            ..Self::new(candidate, stroke)
        }
    }
}

/// A word (or stem + ancillary compound) usable as one clause.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WnnClause {
    pub word: WnnWord,
}

impl WnnClause {
    pub fn new<C: Into<String>, S: Into<String>>(
        candidate: C,
        stroke: S,
        pos: WnnPos,
        frequency: i32,
    ) -> Self {
        Self {
            word: WnnWord::with_frequency(candidate, stroke, pos, frequency),
        }
    }

    /// Clause made of a stem alone.
    pub fn from_stem(stroke: &str, stem: &WnnWord) -> Self {
        Self {
            word: WnnWord {
                id: stem.id,
                candidate: stem.candidate.clone(),
                stroke: stroke.to_string(),
                frequency: stem.frequency,
                pos: stem.pos,
                attribute: stem.attribute,
            },
        }
    }

    /// Clause made of a stem followed by an ancillary pattern.
    ///
    /// The clause keeps the stem's score; its POS runs from the stem's left
    /// side to the ancillary's right side.
    pub fn from_stem_and_ancillary(stroke: &str, stem: &WnnWord, ancillary: &WnnWord) -> Self {
        Self {
            word: WnnWord {
                id: stem.id,
                candidate: format!("{}{}", stem.candidate, ancillary.candidate),
                stroke: stroke.to_string(),
                frequency: stem.frequency,
                pos: WnnPos::new(stem.pos.left, ancillary.pos.right),
                attribute: stem.attribute,
            },
        }
    }

    pub fn is_clause(&self) -> bool {
        true
    }
}

/// A sequence of clauses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WnnSentence {
    pub word: WnnWord,
    pub elements: Vec<WnnClause>,
}

impl WnnSentence {
    /// Sentence of one clause.
    pub fn from_clause(clause: WnnClause) -> Self {
        Self {
            word: clause.word.clone(),
            elements: vec![clause],
        }
    }

    /// `prev` followed by `clause`; scores add up.
    pub fn extend(prev: &WnnSentence, clause: WnnClause) -> Self {
        let mut word = prev.word.clone();
        word.candidate.push_str(&clause.word.candidate);
        word.stroke.push_str(&clause.word.stroke);
        word.frequency += clause.word.frequency;
        word.pos = WnnPos::new(prev.word.pos.left, clause.word.pos.right);

        let mut elements = prev.elements.clone();
        elements.push(clause);
        Self { word, elements }
    }

    /// `head` clause followed by an optional sentence.
    pub fn join(head: WnnClause, tail: Option<&WnnSentence>) -> Self {
        let Some(tail) = tail else {
            return Self::from_clause(head);
        };
        let mut word = head.word.clone();
        word.candidate.push_str(&tail.word.candidate);
        word.stroke.push_str(&tail.word.stroke);
        word.frequency += tail.word.frequency;
        word.pos = WnnPos::new(head.word.pos.left, tail.word.pos.right);

        let mut elements = Vec::with_capacity(tail.elements.len() + 1);
        elements.push(head);
        elements.extend(tail.elements.iter().cloned());
        Self { word, elements }
    }

    pub fn is_sentence(&self) -> bool {
        true
    }
}
