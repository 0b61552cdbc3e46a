//! Taxonomy export — write an index back in the line format it loads from.
//!
//! ```text
//! CodeIndex (merged from several resources) → export_taxonomy()
//!   → one `code word1 word2 ...` line per group, in insertion order
//! ```
//!
//! The output reloads into an index with the same groups, the same
//! word → code order, and the same fanout answers.

use std::io::Write;

use crate::index::CodeIndex;
use crate::Result;

/// Write every group of `index` as a taxonomy line.
pub fn export_taxonomy(index: &CodeIndex, writer: &mut dyn Write) -> Result<()> {
    for (code, words) in index.entries() {
        write!(writer, "{code}")?;
        for word in words {
            write!(writer, " {word}")?;
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    tracing::debug!(codes = index.len(), "exported taxonomy");
    Ok(())
}

/// Export into a `String`.
pub fn export_taxonomy_string(index: &CodeIndex) -> Result<String> {
    let mut buf = Vec::new();
    export_taxonomy(index, &mut buf)?;
    String::from_utf8(buf).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e).into()
    })
}
