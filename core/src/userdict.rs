//! User words and learned words.
//!
//! - user words: registered explicitly, bounded by a fixed capacity
//! - learned words: every committed word, kept in an LRU store so the most
//!   recent ones survive; each remembers which words it was committed after
//!   (bigram links used by `Link` searches)

use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::debug;

use crate::dictionary::DictionaryError;
use crate::utils::normalize;
use crate::word::WnnWord;

/// Number of predecessors remembered per learned word.
const MAX_LINKS: usize = 8;

type WordKey = (String, String);

fn key_of(word: &WnnWord) -> WordKey {
    (word.stroke.clone(), word.candidate.clone())
}

#[derive(Debug, Clone)]
struct LearnedWord {
    word: WnnWord,
    /// Words this one was committed after, oldest first.
    predecessors: Vec<WordKey>,
}

/// Validate and normalize a word coming from outside the dictionary.
fn checked(word: &WnnWord) -> Result<WnnWord, DictionaryError> {
    if word.stroke.is_empty() || word.candidate.is_empty() {
        return Err(DictionaryError::InvalidWord(format!(
            "{:?}/{:?}",
            word.stroke, word.candidate
        )));
    }
    let mut word = word.clone();
    word.stroke = normalize(&word.stroke);
    Ok(word)
}

#[derive(Debug)]
pub struct UserDict {
    user_words: Vec<WnnWord>,
    user_capacity: usize,
    learned: LruCache<WordKey, LearnedWord>,
}

impl UserDict {
    pub fn new(user_capacity: usize, learn_capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(learn_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            user_words: Vec::new(),
            user_capacity,
            learned: LruCache::new(capacity),
        }
    }

    // ========== User Words ==========

    /// Register a user word. Registering an existing word updates its POS.
    pub fn add_user_word(&mut self, word: &WnnWord) -> Result<(), DictionaryError> {
        let word = checked(word)?;
        if let Some(existing) = self
            .user_words
            .iter_mut()
            .find(|w| w.stroke == word.stroke && w.candidate == word.candidate)
        {
            existing.pos = word.pos;
            return Ok(());
        }
        if self.user_words.len() >= self.user_capacity {
            return Err(DictionaryError::UserDictionaryFull(self.user_capacity));
        }
        debug!(stroke = %word.stroke, candidate = %word.candidate, "user word added");
        self.user_words.push(word);
        Ok(())
    }

    pub fn remove_user_word(&mut self, word: &WnnWord) -> Result<(), DictionaryError> {
        let stroke = normalize(&word.stroke);
        let before = self.user_words.len();
        self.user_words
            .retain(|w| !(w.stroke == stroke && w.candidate == word.candidate));
        if self.user_words.len() == before {
            return Err(DictionaryError::NotFound(format!("{stroke}/{}", word.candidate)));
        }
        Ok(())
    }

    /// User words in registration order.
    pub fn user_words(&self) -> &[WnnWord] {
        &self.user_words
    }

    pub fn clear_user_words(&mut self) {
        self.user_words.clear();
    }

    // ========== Learned Words ==========

    /// Record a committed word, linking it to `previous` when given.
    pub fn learn(&mut self, word: &WnnWord, previous: Option<&WnnWord>) -> Result<(), DictionaryError> {
        let word = checked(word)?;
        let link = previous.map(|p| (normalize(&p.stroke), p.candidate.clone()));
        let key = key_of(&word);
        match self.learned.get_mut(&key) {
            Some(entry) => {
                entry.word.pos = word.pos;
                entry.word.attribute = word.attribute;
                if let Some(link) = link {
                    entry.predecessors.retain(|p| *p != link);
                    entry.predecessors.push(link);
                    if entry.predecessors.len() > MAX_LINKS {
                        entry.predecessors.remove(0);
                    }
                }
            }
            None => {
                let entry = LearnedWord {
                    word,
                    predecessors: link.into_iter().collect(),
                };
                if let Some((evicted, _)) = self.learned.push(key, entry) {
                    debug!(stroke = %evicted.0, candidate = %evicted.1, "learned word evicted");
                }
            }
        }
        Ok(())
    }

    /// Learned words, most recently learned first.
    pub fn learned_words(&self) -> impl Iterator<Item = &WnnWord> {
        self.learned.iter().map(|(_, entry)| &entry.word)
    }

    /// Learned words that were committed right after `previous`, most recent first.
    pub fn linked_words<'a>(&'a self, previous: &WnnWord) -> impl Iterator<Item = &'a WnnWord> + 'a {
        let link = (normalize(&previous.stroke), previous.candidate.clone());
        self.learned
            .iter()
            .filter(move |(_, entry)| entry.predecessors.contains(&link))
            .map(|(_, entry)| &entry.word)
    }

    pub fn learned_len(&self) -> usize {
        self.learned.len()
    }

    pub fn clear_learned(&mut self) {
        self.learned.clear();
    }
}

impl Default for UserDict {
    fn default() -> Self {
        let config = crate::Config::default();
        Self::new(config.user_capacity, config.learn_capacity)
    }
}
