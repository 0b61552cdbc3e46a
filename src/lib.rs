//! # cilin-rs — Word Similarity over the Cilin Synonym Taxonomy
//!
//! Deterministic, non-learned word similarity in [0, 1]. Every word sense
//! in the taxonomy carries an 8-character code locating it in a 5-level
//! classification tree; two words are as similar as their closest pair of
//! codes.
//!
//! ## Design Principles
//!
//! 1. **Codes are validated once**: a `Code` value is always well-formed
//! 2. **Scoring is pure**: `Scorer` is a function of one index snapshot and a `Param`
//! 3. **Indexes are immutable**: loading more data merges into a *new* index
//! 4. **Readers never see partial state**: `SharedIndex` swaps whole snapshots
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cilin_rs::{Param, Similarity};
//!
//! # fn example() -> cilin_rs::Result<()> {
//! let sim = Similarity::open("data/cilin.txt", Param::default())?;
//!
//! println!("{:?}", sim.codes_of("抄袭"));
//! println!("{:.6}", sim.similarity("抄袭", "克隆"));
//!
//! // Fold in a domain-specific extension without losing anything.
//! sim.load_file("data/extra.txt")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Score Rules
//!
//! | Situation | Score |
//! |-----------|-------|
//! | word not in taxonomy | 0 |
//! | no shared level, or a `@` group involved | `f` |
//! | same group, both `=` | 1 |
//! | same group, both `#` | `e` |
//! | same position, different markers | 0 |
//! | diverge at level 1..4 | `coef · cos(n°) · (n − k + 1) / n` |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod scoring;
pub mod index;
pub mod export;

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{Code, Layer, Marker, Param};
pub use index::{CodeIndex, CodeIndexBuilder, IndexSource, IndexStats, SharedIndex};
pub use scoring::{common_prefix, layer_of, sibling_distance, Scorer};
pub use export::{export_taxonomy, export_taxonomy_string};

// ============================================================================
// Top-level Similarity handle
// ============================================================================

/// The primary entry point. Holds the current index and the coefficients,
/// and answers word-level queries.
///
/// Cheap to clone; clones share the same index and see each other's merges.
#[derive(Debug, Clone)]
pub struct Similarity {
    index: SharedIndex,
    param: Param,
}

/// A candidate word and its similarity to the query word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedWord {
    pub word: String,
    pub score: f64,
}

impl Similarity {
    pub fn new(index: CodeIndex, param: Param) -> Self {
        Self { index: SharedIndex::new(index), param }
    }

    /// Build from a taxonomy file.
    pub fn open(path: impl AsRef<Path>, param: Param) -> Result<Self> {
        Ok(Self::new(index::load_taxonomy_file(path)?, param))
    }

    /// Build from taxonomy text held in memory.
    pub fn from_taxonomy_str(text: &str, param: Param) -> Result<Self> {
        Ok(Self::new(index::parse_taxonomy(text)?, param))
    }

    /// Build from several sources, merged in order.
    pub fn from_sources(sources: &[IndexSource], param: Param) -> Result<Self> {
        let mut merged = CodeIndex::default();
        for source in sources {
            merged = merged.merge(&source.load()?);
        }
        Ok(Self::new(merged, param))
    }

    // ========================================================================
    // Additive loading
    // ========================================================================

    /// Merge another taxonomy file into the current index.
    ///
    /// The file is parsed completely before anything is published; on error
    /// the current index is unchanged.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let extra = index::load_taxonomy_file(path)?;
        self.index.merge(&extra);
        Ok(())
    }

    pub fn load_str(&self, text: &str) -> Result<()> {
        let extra = index::parse_taxonomy(text)?;
        self.index.merge(&extra);
        Ok(())
    }

    pub fn load_reader<R: BufRead>(&self, reader: R) -> Result<()> {
        let extra = index::read_taxonomy(reader)?;
        self.index.merge(&extra);
        Ok(())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Codes of `word` in resource order; empty if unknown.
    pub fn codes_of(&self, word: &str) -> Vec<Code> {
        self.index.snapshot().codes_of(word).to_vec()
    }

    /// Words of the group `code`; empty if unknown.
    pub fn words_of(&self, code: &Code) -> Vec<String> {
        self.index.snapshot().words_of(code).to_vec()
    }

    /// Similarity of two words in [0, 1]: the best score over every pair of
    /// their codes, or 0 if either word is not in the taxonomy.
    pub fn similarity(&self, w1: &str, w2: &str) -> f64 {
        let index = self.index.snapshot();
        let scorer = Scorer::new(&index, &self.param);
        best_score(&scorer, index.codes_of(w1), index.codes_of(w2))
    }

    /// Similarity of two codes against the current index.
    pub fn score_codes(&self, c1: &Code, c2: &Code) -> f64 {
        let index = self.index.snapshot();
        Scorer::new(&index, &self.param).score(c1, c2)
    }

    /// Score every candidate against `word`, best first.
    ///
    /// Equal scores keep candidate order. `limit` truncates the result.
    pub fn rank<'c, I>(&self, word: &str, candidates: I, limit: Option<usize>) -> Vec<RankedWord>
    where
        I: IntoIterator<Item = &'c str>,
    {
        let index = self.index.snapshot();
        let scorer = Scorer::new(&index, &self.param);
        let query = index.codes_of(word);

        let mut ranked: Vec<RankedWord> = candidates
            .into_iter()
            .map(|candidate| RankedWord {
                word: candidate.to_string(),
                score: best_score(&scorer, query, index.codes_of(candidate)),
            })
            .collect();
        // Stable sort keeps candidate order among ties.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }

    /// The index as of now.
    pub fn snapshot(&self) -> Arc<CodeIndex> {
        self.index.snapshot()
    }

    pub fn stats(&self) -> IndexStats {
        self.index.snapshot().stats()
    }

    pub fn param(&self) -> &Param {
        &self.param
    }

    /// Access the shared index handle (for advanced use).
    pub fn shared_index(&self) -> &SharedIndex {
        &self.index
    }
}

fn best_score(scorer: &Scorer<'_>, codes1: &[Code], codes2: &[Code]) -> f64 {
    if codes1.is_empty() || codes2.is_empty() {
        return 0.0;
    }
    codes1
        .iter()
        .flat_map(|c1| codes2.iter().map(move |c2| scorer.score(c1, c2)))
        .fold(0.0, f64::max)
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed code {code:?}: {reason}")]
    MalformedCode { code: String, reason: &'static str },

    #[error("Taxonomy parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
