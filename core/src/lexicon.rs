//! In-memory system word lists.
//!
//! A `Lexicon` holds the read-only sources of the reference dictionary, each
//! identified by a number (`DictionaryIndex::System(n)`). Within a source,
//! words are grouped by stroke in key order so exact and prefix lookups are
//! both a map range.
//!
//! Raw frequencies are `0..=100`; the dictionary maps them into whatever
//! score band the caller activates the source with.
//!
//! Public API:
//! - `LexiconEntry` - one word of a source (candidate, POS, raw frequency)
//! - `LexiconRecord` - the flat JSON import format
//! - `Lexicon` - insert / lookup / remove, JSON import, bincode snapshots

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::ops::Bound;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::utils::normalize;
use crate::word::WnnPos;

/// Highest raw frequency of a lexicon word.
pub const MAX_RAW_FREQUENCY: u8 = 100;

/// One word of a system source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub id: u32,
    pub candidate: String,
    pub pos: WnnPos,
    /// Raw frequency, `0..=100`.
    pub frequency: u8,
}

/// A word as written in a JSON word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconRecord {
    pub source: u8,
    pub stroke: String,
    pub candidate: String,
    pub left: u16,
    pub right: u16,
    pub frequency: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Lexicon {
    sources: BTreeMap<u8, BTreeMap<String, Vec<LexiconEntry>>>,
    next_id: u32,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word into `source`, creating the source if needed.
    ///
    /// Re-inserting the same candidate with the same POS keeps the higher
    /// frequency. Frequencies above 100 are clamped.
    pub fn insert<K: AsRef<str>, C: Into<String>>(
        &mut self,
        source: u8,
        stroke: K,
        candidate: C,
        pos: WnnPos,
        frequency: u8,
    ) {
        let stroke = normalize(stroke.as_ref());
        let candidate = candidate.into();
        let frequency = frequency.min(MAX_RAW_FREQUENCY);
        let bucket = self
            .sources
            .entry(source)
            .or_default()
            .entry(stroke)
            .or_default();
        if let Some(e) = bucket
            .iter_mut()
            .find(|e| e.candidate == candidate && e.pos == pos)
        {
            e.frequency = e.frequency.max(frequency);
            return;
        }
        self.next_id += 1;
        bucket.push(LexiconEntry {
            id: self.next_id,
            candidate,
            pos,
            frequency,
        });
    }

    /// Make sure `source` exists, even without words.
    pub fn add_source(&mut self, source: u8) {
        self.sources.entry(source).or_default();
    }

    pub fn has_source(&self, source: u8) -> bool {
        self.sources.contains_key(&source)
    }

    /// Words of `source` whose stroke equals `key`.
    pub fn exact(&self, source: u8, key: &str) -> &[LexiconEntry] {
        self.sources
            .get(&source)
            .and_then(|words| words.get(key))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Words of `source` whose stroke starts with `key`, in key order.
    pub fn prefix<'a>(
        &'a self,
        source: u8,
        key: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a LexiconEntry)> + 'a {
        self.sources
            .get(&source)
            .into_iter()
            .flat_map(move |words| {
                words
                    .range::<str, _>((Bound::Included(key), Bound::Unbounded))
                    .take_while(move |(stroke, _)| stroke.starts_with(key))
            })
            .flat_map(|(stroke, entries)| entries.iter().map(move |e| (stroke.as_str(), e)))
    }

    /// Remove a candidate from `source`. Returns true if removed.
    pub fn remove(&mut self, source: u8, stroke: &str, candidate: &str) -> bool {
        let Some(words) = self.sources.get_mut(&source) else {
            return false;
        };
        let Some(bucket) = words.get_mut(stroke) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|e| e.candidate != candidate);
        let removed = bucket.len() != before;
        if bucket.is_empty() {
            words.remove(stroke);
        }
        removed
    }

    /// Number of words across all sources.
    pub fn len(&self) -> usize {
        self.sources
            .values()
            .flat_map(|words| words.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // ========== Import / Snapshots ==========

    /// Add every record of a JSON word list (an array of `LexiconRecord`).
    pub fn extend_from_json_str(&mut self, json: &str) -> anyhow::Result<usize> {
        let records: Vec<LexiconRecord> =
            serde_json::from_str(json).context("parse lexicon word list")?;
        let count = records.len();
        for r in records {
            self.insert(
                r.source,
                &r.stroke,
                r.candidate,
                WnnPos::new(r.left, r.right),
                r.frequency,
            );
        }
        Ok(count)
    }

    /// Load a JSON word list file into a new lexicon.
    pub fn load_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read word list {}", path.display()))?;
        let mut lexicon = Self::new();
        lexicon.extend_from_json_str(&content)?;
        Ok(lexicon)
    }

    /// Save the lexicon to a file using bincode serialization.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        bincode::serialize_into(BufWriter::new(file), self).context("serialize lexicon")?;
        Ok(())
    }

    /// Load the lexicon from a bincode file produced by `save_bincode`.
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
        let lexicon = bincode::deserialize_from(BufReader::new(file)).context("deserialize lexicon")?;
        Ok(lexicon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOUN: WnnPos = WnnPos::new(1, 1);

    #[test]
    fn insert_and_exact_lookup() {
        let mut lx = Lexicon::new();
        lx.insert(0, "わたし", "私", NOUN, 80);
        lx.insert(0, "わたし", "渡し", NOUN, 20);
        let words = lx.exact(0, "わたし");
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].candidate, "私");
        assert!(lx.exact(1, "わたし").is_empty());
        assert!(lx.exact(0, "わた").is_empty());
    }

    #[test]
    fn duplicate_insert_keeps_higher_frequency() {
        let mut lx = Lexicon::new();
        lx.insert(0, "き", "木", NOUN, 10);
        lx.insert(0, "き", "木", NOUN, 250);
        let words = lx.exact(0, "き");
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].frequency, MAX_RAW_FREQUENCY);
    }

    #[test]
    fn prefix_lookup_is_in_key_order() {
        let mut lx = Lexicon::new();
        lx.insert(0, "にほんご", "日本語", NOUN, 50);
        lx.insert(0, "にほん", "日本", NOUN, 60);
        lx.insert(0, "にわ", "庭", NOUN, 40);
        lx.insert(0, "ぬま", "沼", NOUN, 40);
        let found: Vec<&str> = lx.prefix(0, "にほ").map(|(_, e)| e.candidate.as_str()).collect();
        assert_eq!(found, vec!["日本", "日本語"]);
        assert_eq!(lx.prefix(0, "に").count(), 3);
        assert_eq!(lx.prefix(9, "に").count(), 0);
    }

    #[test]
    fn remove_drops_empty_strokes() {
        let mut lx = Lexicon::new();
        lx.insert(0, "き", "木", NOUN, 1);
        assert!(lx.remove(0, "き", "木"));
        assert!(!lx.remove(0, "き", "木"));
        assert!(lx.is_empty());
        assert!(lx.has_source(0));
    }

    #[test]
    fn json_import() {
        let json = r#"[
            {"source": 0, "stroke": "そら", "candidate": "空", "left": 1, "right": 1, "frequency": 70},
            {"source": 5, "stroke": "は", "candidate": "は", "left": 2, "right": 2, "frequency": 90}
        ]"#;
        let mut lx = Lexicon::new();
        assert_eq!(lx.extend_from_json_str(json).unwrap(), 2);
        assert_eq!(lx.exact(5, "は")[0].pos, WnnPos::new(2, 2));
        assert!(lx.extend_from_json_str("{not json").is_err());
    }

    #[test]
    fn save_and_load_bincode_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.bin");
        let mut lx = Lexicon::new();
        lx.insert(0, "やま", "山", NOUN, 5);
        lx.insert(4, "かわ", "川", NOUN, 2);
        lx.save_bincode(&path).unwrap();
        let loaded = Lexicon::load_bincode(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.exact(4, "かわ")[0].candidate, "川");
    }
}
