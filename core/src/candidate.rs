//! One entry of a candidate stream.
//!
//! The engine hands out dictionary words, single clauses and whole sentences
//! through the same stream; learning needs to tell them apart.

use serde::{Deserialize, Serialize};

use crate::word::{WnnClause, WnnSentence, WnnWord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Candidate {
    Word(WnnWord),
    Clause(WnnClause),
    Sentence(WnnSentence),
}

impl Candidate {
    /// The word carrying the candidate's text, reading and score.
    pub fn word(&self) -> &WnnWord {
        match self {
            Candidate::Word(word) => word,
            Candidate::Clause(clause) => &clause.word,
            Candidate::Sentence(sentence) => &sentence.word,
        }
    }

    pub fn text(&self) -> &str {
        &self.word().candidate
    }

    pub fn stroke(&self) -> &str {
        &self.word().stroke
    }

    pub fn frequency(&self) -> i32 {
        self.word().frequency
    }

    pub fn is_clause(&self) -> bool {
        matches!(self, Candidate::Clause(_))
    }

    pub fn is_sentence(&self) -> bool {
        matches!(self, Candidate::Sentence(_))
    }
}

impl From<WnnWord> for Candidate {
    fn from(word: WnnWord) -> Self {
        Candidate::Word(word)
    }
}

impl From<WnnClause> for Candidate {
    fn from(clause: WnnClause) -> Self {
        Candidate::Clause(clause)
    }
}

impl From<WnnSentence> for Candidate {
    fn from(sentence: WnnSentence) -> Self {
        Candidate::Sentence(sentence)
    }
}
