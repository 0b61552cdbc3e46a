//! # Code Index
//!
//! Bidirectional map between taxonomy codes and words:
//!
//! - code → words of that group, in resource order
//! - word → codes (senses) of that word, in resource order
//!
//! A `CodeIndex` is immutable once built. Additional resources are folded in
//! with [`CodeIndex::merge`], which returns a new index and leaves the
//! original untouched. [`SharedIndex`] publishes replacements atomically.
//!
//! ## Fanout
//!
//! The scorer asks "how many sibling branches hang below this prefix?" for
//! every code pair. Answering that by scanning every code is linear in the
//! index size, so the builder precomputes the answer for every hierarchical
//! prefix (lengths 1, 2, 4, 5, 7) of every code. Other prefixes fall back to
//! the scan.

pub mod loader;
pub mod shared;

use std::path::PathBuf;

use hashbrown::{HashMap, HashSet};
use serde::Serialize;
use smallvec::SmallVec;

use crate::model::Code;
use crate::scoring::layer_of;
use crate::Result;

pub use loader::{load_taxonomy_file, parse_taxonomy, read_taxonomy};
pub use shared::SharedIndex;

/// Prefix lengths that end on a field boundary below the marker.
pub const HIERARCHICAL_PREFIX_LENS: [usize; 5] = [1, 2, 4, 5, 7];

/// Codes of one word. Most words have one or two senses.
pub type CodeList = SmallVec<[Code; 2]>;

// ============================================================================
// Index source
// ============================================================================

/// Where a taxonomy resource comes from.
#[derive(Debug, Clone)]
pub enum IndexSource {
    /// Taxonomy text already in memory.
    Text(String),
    /// Taxonomy file on disk.
    File(PathBuf),
}

impl IndexSource {
    pub fn load(&self) -> Result<CodeIndex> {
        match self {
            IndexSource::Text(text) => parse_taxonomy(text),
            IndexSource::File(path) => load_taxonomy_file(path),
        }
    }
}

// ============================================================================
// CodeIndex
// ============================================================================

/// Immutable code ↔ word index with a precomputed fanout table.
#[derive(Debug, Clone, Default)]
pub struct CodeIndex {
    code_words: HashMap<Code, Vec<String>>,
    word_codes: HashMap<String, CodeList>,
    /// Codes in first-insertion order.
    order: Vec<Code>,
    /// prefix → distinct values of the field below it.
    fanout: HashMap<Box<str>, usize>,
}

/// Summary counts for an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub codes: usize,
    pub words: usize,
    pub top_level_groups: usize,
}

impl CodeIndex {
    pub fn builder() -> CodeIndexBuilder {
        CodeIndexBuilder::default()
    }

    /// Build an index from `(code, words)` groups in order.
    pub fn from_entries<I, W>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Code, W)>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        let mut builder = Self::builder();
        for (code, words) in entries {
            builder.insert(code, words);
        }
        builder.build()
    }

    /// Fold `other` into a copy of this index.
    ///
    /// New codes are appended, existing groups gain words they did not
    /// list yet, and words gain codes they did not carry yet. Nothing
    /// already present is dropped.
    pub fn merge(&self, other: &CodeIndex) -> CodeIndex {
        let mut builder = CodeIndexBuilder::from_index(self);
        for (code, words) in other.entries() {
            builder.insert(*code, words.iter().cloned());
        }
        builder.build()
    }

    /// Codes of `word` in resource order; empty if the word is unknown.
    pub fn codes_of(&self, word: &str) -> &[Code] {
        self.word_codes.get(word).map(|codes| codes.as_slice()).unwrap_or(&[])
    }

    /// Words of the group `code`; empty if the code is unknown.
    pub fn words_of(&self, code: &Code) -> &[String] {
        self.code_words.get(code).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.word_codes.contains_key(word)
    }

    pub fn contains_code(&self, code: &Code) -> bool {
        self.code_words.contains_key(code)
    }

    /// All codes in first-insertion order.
    pub fn codes(&self) -> &[Code] {
        &self.order
    }

    /// `(code, words)` groups in first-insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&Code, &[String])> + '_ {
        self.order.iter().map(move |code| (code, self.words_of(code)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.word_codes.len()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            codes: self.len(),
            words: self.word_count(),
            top_level_groups: self.fanout_scan_top_level(),
        }
    }

    /// Number of distinct sibling values below `prefix`: the field at
    /// `layer_of(prefix)` of every code starting with `prefix`.
    ///
    /// Returns 0 for an empty prefix or a prefix no code starts with.
    pub fn fanout(&self, prefix: &str) -> usize {
        if prefix.is_empty() {
            return 0;
        }
        match self.fanout.get(prefix) {
            Some(&n) => n,
            None => self.fanout_scan(prefix),
        }
    }

    /// Fanout by scanning every code. Same result as [`fanout`](Self::fanout).
    pub fn fanout_scan(&self, prefix: &str) -> usize {
        if prefix.is_empty() {
            return 0;
        }
        let layer = layer_of(prefix);
        self.order
            .iter()
            .filter(|code| code.starts_with(prefix))
            .map(|code| code.layer().field(layer))
            .collect::<HashSet<_>>()
            .len()
    }

    fn fanout_scan_top_level(&self) -> usize {
        self.order
            .iter()
            .map(|code| code.as_bytes()[0])
            .collect::<HashSet<_>>()
            .len()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates groups and produces an immutable [`CodeIndex`].
#[derive(Debug, Default)]
pub struct CodeIndexBuilder {
    code_words: HashMap<Code, Vec<String>>,
    word_codes: HashMap<String, CodeList>,
    order: Vec<Code>,
}

impl CodeIndexBuilder {
    fn from_index(index: &CodeIndex) -> Self {
        Self {
            code_words: index.code_words.clone(),
            word_codes: index.word_codes.clone(),
            order: index.order.clone(),
        }
    }

    /// Add a group. Repeated codes extend the existing group.
    pub fn insert<W>(&mut self, code: Code, words: W) -> &mut Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
    {
        let group = self.code_words.entry(code).or_insert_with(|| {
            self.order.push(code);
            Vec::new()
        });
        for word in words {
            let word = word.into();
            if group.contains(&word) {
                continue;
            }
            let senses = self.word_codes.entry(word.clone()).or_default();
            if !senses.contains(&code) {
                senses.push(code);
            }
            group.push(word);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn build(self) -> CodeIndex {
        let fanout = fanout_table(&self.order);
        CodeIndex {
            code_words: self.code_words,
            word_codes: self.word_codes,
            order: self.order,
            fanout,
        }
    }
}

fn fanout_table(codes: &[Code]) -> HashMap<Box<str>, usize> {
    let mut distinct: HashMap<&str, HashSet<&str>> = HashMap::new();
    for code in codes {
        let layer = code.layer();
        for len in HIERARCHICAL_PREFIX_LENS {
            let prefix = &code.as_str()[..len];
            distinct
                .entry(prefix)
                .or_default()
                .insert(layer.field(layer_of(prefix)));
        }
    }
    distinct
        .into_iter()
        .map(|(prefix, siblings)| (Box::from(prefix), siblings.len()))
        .collect()
}
